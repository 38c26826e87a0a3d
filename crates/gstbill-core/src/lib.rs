//! Core library for GST invoices and quotations.
//!
//! This crate provides:
//! - Lenient reading of invoice JSON from the web front end
//! - Per-rate GST summaries with CGST/SGST/IGST totals and round-off
//! - Indian currency formatting and amounts in words (lakh/crore)
//! - GSTIN validation
//! - Printable HTML rendering for invoices and quotations

pub mod coerce;
pub mod error;
pub mod invoice;
pub mod models;

pub use error::{GstBillError, RenderError, Result, WordsError};
pub use invoice::rules::{
    amount_in_words_inr, format_currency, format_currency_with, format_date, format_fixed2,
    validate_gstin, CurrencyStyle, INR, PLACEHOLDER,
};
pub use invoice::{compute_summary, render_invoice_html, InvoiceRenderer, InvoiceTotals, TaxRateRow, TaxSummary};
pub use models::config::{BillConfig, RenderConfig};
pub use models::invoice::{BankDetails, DeclaredTotals, DocumentKind, InvoiceDocument, LineItem, Party};
