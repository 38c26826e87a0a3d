//! Words command - show an amount as rupees, fixed-2 and in words.

use clap::Args;
use serde_json::Value;

use gstbill_core::coerce::to_decimal;
use gstbill_core::{amount_in_words_inr, format_currency, format_fixed2};

/// Arguments for the words command.
#[derive(Args)]
pub struct WordsArgs {
    /// Amount in rupees (e.g. 1234567 or 2500.50)
    #[arg(required = true, allow_negative_numbers = true)]
    amount: String,
}

pub async fn run(args: WordsArgs) -> anyhow::Result<()> {
    let amount = to_decimal(Some(&Value::String(args.amount)));
    let words = amount_in_words_inr(amount)?;

    println!("Currency: {}", format_currency(amount));
    println!("Fixed:    {}", format_fixed2(amount));
    println!("Words:    {}", words);

    Ok(())
}
