//! Error types for the gstbill-core library.
//!
//! Malformed business data is never an error here: numbers coerce to zero
//! and missing display fields render as a placeholder. Only template
//! failures and file/JSON handling surface as [`GstBillError`]; the words
//! converter reports unsupported amounts through its own [`WordsError`].

use thiserror::Error;

/// Main error type for the gstbill library.
#[derive(Error, Debug)]
pub enum GstBillError {
    /// Document rendering error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input was not valid JSON text.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors from the Indian-numbering words converter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WordsError {
    /// Negative amounts (credit notes) have no wording.
    #[error("cannot spell negative amount {0}")]
    Negative(String),

    /// Amount is at or beyond one crore crore (10^14).
    #[error("amount {0} exceeds the crore scale")]
    OutOfRange(String),
}

/// Errors related to document rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The markup template failed to render.
    #[error("template failed: {0}")]
    Template(#[from] askama::Error),
}

/// Result type for the gstbill library.
pub type Result<T> = std::result::Result<T, GstBillError>;
