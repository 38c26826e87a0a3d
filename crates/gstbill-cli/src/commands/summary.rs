//! Summary command - print the GST breakdown of an invoice.

use std::path::PathBuf;

use clap::Args;
use console::style;

use gstbill_core::invoice::rules::{format_currency_with, format_fixed2};
use gstbill_core::{compute_summary, CurrencyStyle, TaxSummary};

use super::{load_config, read_document, report_issues};

/// Arguments for the summary command.
#[derive(Args)]
pub struct SummaryArgs {
    /// Invoice JSON file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Report validation issues
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per GST rate
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: SummaryArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let document = read_document(&args.input).await?;

    if args.validate {
        report_issues(&document);
    }

    let summary = compute_summary(&document);
    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&summary)?,
        OutputFormat::Csv => format_csv(&summary)?,
        OutputFormat::Text => format_text(&summary, &config.render.currency.style()),
    };

    if let Some(output_path) = &args.output {
        tokio::fs::write(output_path, &output).await?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn format_csv(summary: &TaxSummary) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["rate", "taxable", "cgst", "sgst", "igst", "total_tax"])?;

    for row in &summary.rows {
        wtr.write_record([
            row.rate.normalize().to_string(),
            format_fixed2(row.taxable),
            format_fixed2(row.cgst),
            format_fixed2(row.sgst),
            format_fixed2(row.igst),
            format_fixed2(row.tax_total()),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(summary: &TaxSummary, currency: &CurrencyStyle<'_>) -> String {
    let money = |amount| format_currency_with(amount, currency);
    let totals = &summary.totals;
    let mut output = String::new();

    output.push_str(&format!(
        "{:>8} {:>14} {:>12} {:>12} {:>12}\n",
        "Rate", "Taxable", "CGST", "SGST", "IGST"
    ));
    for row in &summary.rows {
        output.push_str(&format!(
            "{:>7}% {:>14} {:>12} {:>12} {:>12}\n",
            row.rate.normalize().to_string(),
            format_fixed2(row.taxable),
            format_fixed2(row.cgst),
            format_fixed2(row.sgst),
            format_fixed2(row.igst),
        ));
    }
    output.push('\n');

    output.push_str(&format!("Subtotal:    {}\n", money(totals.subtotal)));
    output.push_str(&format!("CGST:        {}\n", money(totals.total_cgst)));
    output.push_str(&format!("SGST:        {}\n", money(totals.total_sgst)));
    output.push_str(&format!("IGST:        {}\n", money(totals.total_igst)));
    output.push_str(&format!("Total tax:   {}\n", money(totals.tax_total)));
    output.push_str(&format!("Grand total: {}\n", money(totals.grand)));
    output.push_str(&format!("Round off:   {}\n", format_fixed2(totals.round_off)));
    output.push_str(&format!("Payable:     {}", money(totals.rounded)));

    output
}
