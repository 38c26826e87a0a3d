//! Tax summary, formatting rules and document rendering.

pub mod render;
pub mod rules;
pub mod summary;

pub use render::{render_invoice_html, InvoiceRenderer};
pub use summary::{compute_summary, InvoiceTotals, TaxRateRow, TaxSummary};
