//! Formatting and validation rules for Indian GST invoices.

pub mod amounts;
pub mod dates;
pub mod gstin;
pub mod words;

pub use amounts::{
    format_currency, format_currency_with, format_fixed2, format_indian_number, CurrencyConfig,
    CurrencyStyle, INR,
};
pub use dates::{format_date, format_naive_date, parse_date};
pub use gstin::{format_gstin, state_code, validate_gstin};
pub use words::{amount_in_words_inr, integer_to_words};

use rust_decimal::{Decimal, RoundingStrategy};

/// Shown wherever a value is missing or unparseable.
pub const PLACEHOLDER: &str = "\u{2014}";

/// Round to `dp` places with halves going toward positive infinity,
/// matching how the web front end rounds (`-2.5` becomes `-2`).
pub fn round_half_up(amount: Decimal, dp: u32) -> Decimal {
    let strategy = if amount.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    amount.round_dp_with_strategy(dp, strategy)
}
