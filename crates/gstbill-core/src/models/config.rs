//! Configuration for rendering invoices and quotations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GstBillError, Result};
use crate::invoice::rules::amounts::CurrencyConfig;
use crate::invoice::rules::PLACEHOLDER;
use crate::models::invoice::Party;

/// Main configuration for gstbill.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BillConfig {
    /// Document rendering configuration.
    pub render: RenderConfig,

    /// Company profile used when a document carries no seller.
    pub company: Party,
}

/// Document rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Currency formatting.
    pub currency: CurrencyConfig,

    /// Text shown for missing values.
    pub placeholder: String,

    /// Heading for tax invoices.
    pub invoice_title: String,

    /// Heading for quotations.
    pub quotation_title: String,

    /// Caption under the signature line.
    pub signature_label: String,

    /// Print the grand total in words.
    pub show_amount_in_words: bool,

    /// Print the seller's bank account block.
    pub show_bank_details: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            currency: CurrencyConfig::default(),
            placeholder: PLACEHOLDER.to_string(),
            invoice_title: "TAX INVOICE".to_string(),
            quotation_title: "QUOTATION".to_string(),
            signature_label: "Authorised Signatory".to_string(),
            show_amount_in_words: true,
            show_bank_details: true,
        }
    }
}

impl BillConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| GstBillError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
