//! Rupee amounts in English words using the Indian numbering scale.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::WordsError;

use super::round_half_up;

const ONES: [&str; 20] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
    "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const CRORE: u64 = 10_000_000;
const LAKH: u64 = 100_000;
const THOUSAND: u64 = 1_000;

/// One crore crore; the crore segment itself tops out below this.
const LIMIT: u64 = CRORE * CRORE;

/// Spell a rupee amount, e.g. `1234567` becomes
/// "Twelve Lakh Thirty Four Thousand Five Hundred Sixty Seven Rupees Only".
///
/// Paise are not spelled: the amount is rounded to whole rupees first.
pub fn amount_in_words_inr(amount: Decimal) -> Result<String, WordsError> {
    let rounded = round_half_up(amount, 0);

    if rounded.is_sign_negative() && !rounded.is_zero() {
        return Err(WordsError::Negative(amount.to_string()));
    }

    let rupees = match rounded.abs().to_u64() {
        Some(n) if n < LIMIT => n,
        _ => return Err(WordsError::OutOfRange(amount.to_string())),
    };

    if rupees == 0 {
        return Ok("Zero Rupees Only".to_string());
    }

    Ok(format!("{} Rupees Only", integer_to_words(rupees)))
}

/// Spell a whole number with crore, lakh and thousand segments.
///
/// Returns "Zero" for 0. The crore segment is spelled recursively, so
/// values up to `10^14 - 1` read naturally.
pub fn integer_to_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut parts: Vec<String> = Vec::new();

    let crore = n / CRORE;
    let lakh = (n % CRORE) / LAKH;
    let thousand = (n % LAKH) / THOUSAND;
    let rest = n % THOUSAND;

    if crore > 0 {
        parts.push(format!("{} Crore", integer_to_words(crore)));
    }
    if lakh > 0 {
        parts.push(format!("{} Lakh", below_thousand(lakh)));
    }
    if thousand > 0 {
        parts.push(format!("{} Thousand", below_thousand(thousand)));
    }
    if rest > 0 {
        parts.push(below_thousand(rest));
    }

    parts.join(" ")
}

fn below_thousand(n: u64) -> String {
    let hundreds = n / 100;
    let rest = n % 100;

    let mut parts = Vec::with_capacity(3);
    if hundreds > 0 {
        parts.push(format!("{} Hundred", ONES[hundreds as usize]));
    }
    if rest > 0 {
        parts.push(below_hundred(rest));
    }
    parts.join(" ")
}

fn below_hundred(n: u64) -> String {
    if n < 20 {
        return ONES[n as usize].to_string();
    }
    let tens = TENS[(n / 10) as usize];
    match n % 10 {
        0 => tens.to_string(),
        unit => format!("{} {}", tens, ONES[unit as usize]),
    }
}
