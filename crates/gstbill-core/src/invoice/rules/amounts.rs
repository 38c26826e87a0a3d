//! Rupee amount formatting with Indian digit grouping.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Currency presentation: symbol and number of fraction digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyStyle<'a> {
    /// Symbol prefixed to the grouped amount.
    pub symbol: &'a str,
    /// Fraction digits always shown.
    pub fraction_digits: u32,
}

/// Indian Rupee, two fraction digits.
pub const INR: CurrencyStyle<'static> = CurrencyStyle {
    symbol: "\u{20b9}",
    fraction_digits: 2,
};

/// Owned currency settings, as stored in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    /// Symbol prefixed to amounts.
    pub symbol: String,

    /// Fraction digits always shown.
    pub fraction_digits: u32,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: INR.symbol.to_string(),
            fraction_digits: INR.fraction_digits,
        }
    }
}

impl CurrencyConfig {
    /// Borrow as a formatting style.
    pub fn style(&self) -> CurrencyStyle<'_> {
        CurrencyStyle {
            symbol: &self.symbol,
            fraction_digits: self.fraction_digits,
        }
    }
}

/// Format an amount as rupees, e.g. `₹1,25,000.00`.
pub fn format_currency(amount: Decimal) -> String {
    format_currency_with(amount, &INR)
}

/// Format an amount with an explicit currency style.
pub fn format_currency_with(amount: Decimal, style: &CurrencyStyle<'_>) -> String {
    let rounded = round_half_expand(amount, style.fraction_digits);
    let grouped = format_indian_number(rounded.abs(), style.fraction_digits);

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}{}", style.symbol, grouped)
    } else {
        format!("{}{}", style.symbol, grouped)
    }
}

/// Plain two-decimal rendering for table columns (`9` becomes `9.00`).
pub fn format_fixed2(amount: Decimal) -> String {
    let rounded = round_half_expand(amount, 2);
    if rounded.is_zero() {
        return "0.00".to_string();
    }
    format!("{:.2}", rounded)
}

/// Group digits the Indian way: last three, then pairs (`1,23,45,678.90`).
pub fn format_indian_number(amount: Decimal, fraction_digits: u32) -> String {
    let s = format!("{:.*}", fraction_digits as usize, round_half_expand(amount, fraction_digits));
    let (sign, s) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (s, None),
    };

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::with_capacity(chars.len() + chars.len() / 2);

    for (i, c) in chars.iter().enumerate() {
        let remaining = chars.len() - i;
        if i > 0 && remaining >= 3 && (remaining == 3 || (remaining - 3) % 2 == 0) {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    match decimal_part {
        Some(d) => format!("{}{}.{}", sign, formatted, d),
        None => format!("{}{}", sign, formatted),
    }
}

/// Round to `dp` places, halves away from zero.
pub fn round_half_expand(amount: Decimal, dp: u32) -> Decimal {
    amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
