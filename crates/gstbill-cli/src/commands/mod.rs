//! Subcommands of the `gstbill` binary.

pub mod batch;
pub mod config;
pub mod render;
pub mod summary;
pub mod words;

use std::path::{Path, PathBuf};

use gstbill_core::{BillConfig, InvoiceDocument, InvoiceRenderer};
use tracing::{debug, info};

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gstbill")
        .join("config.json")
}

/// Load the explicit config, else the default file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<BillConfig> {
    if let Some(path) = config_path {
        return Ok(BillConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config at {}", default_path.display());
        Ok(BillConfig::from_file(&default_path)?)
    } else {
        Ok(BillConfig::default())
    }
}

/// Build a renderer from configuration.
pub fn renderer(config: BillConfig) -> InvoiceRenderer {
    InvoiceRenderer::new(config.render).with_default_company(config.company)
}

/// Read an invoice JSON file.
pub async fn read_document(path: &Path) -> anyhow::Result<InvoiceDocument> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    info!("Reading invoice: {}", path.display());
    let text = tokio::fs::read_to_string(path).await?;
    Ok(InvoiceDocument::from_json(&text)?)
}

/// Print validation notes to stderr.
pub fn report_issues(document: &InvoiceDocument) {
    let issues = document.validate();
    if !issues.is_empty() {
        eprintln!("{}", console::style("Validation issues:").yellow());
        for issue in &issues {
            eprintln!("  - {}", issue);
        }
    }
}
