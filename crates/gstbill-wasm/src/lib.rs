//! WASM bindings for GST invoice summaries and rendering.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Invoice documents are passed as plain JS objects in the same loose shape
//! the web front end stores them in.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

use gstbill_core::coerce::{to_date, to_decimal};
use gstbill_core::invoice::rules::format_naive_date;
use gstbill_core::{BillConfig, InvoiceDocument, InvoiceRenderer};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_json(value: JsValue) -> Result<Value, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_document(invoice: JsValue) -> Result<InvoiceDocument, JsValue> {
    Ok(InvoiceDocument::from_value(&to_json(invoice)?))
}

fn amount(value: f64) -> Decimal {
    to_decimal(Some(&Value::from(value)))
}

/// Compute the per-rate GST summary and totals of an invoice object.
#[wasm_bindgen(js_name = computeSummary)]
pub fn compute_summary(invoice: JsValue) -> Result<JsValue, JsValue> {
    let document = to_document(invoice)?;
    to_js(&gstbill_core::compute_summary(&document))
}

/// Render an invoice or quotation object to HTML with default settings.
#[wasm_bindgen(js_name = renderInvoiceHtml)]
pub fn render_invoice_html(invoice: JsValue) -> Result<String, JsValue> {
    let document = to_document(invoice)?;
    gstbill_core::render_invoice_html(&document).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Format an amount as Indian rupees (e.g. "₹1,25,000.00").
#[wasm_bindgen(js_name = formatCurrency)]
pub fn format_currency(value: f64) -> String {
    gstbill_core::format_currency(amount(value))
}

/// Format an amount with exactly two decimals and no grouping.
#[wasm_bindgen(js_name = formatFixed2)]
pub fn format_fixed2(value: f64) -> String {
    gstbill_core::format_fixed2(amount(value))
}

/// Format a date string or epoch-milliseconds timestamp as DD/MM/YYYY.
#[wasm_bindgen(js_name = formatDate)]
pub fn format_date(value: JsValue) -> String {
    let date = to_json(value).ok().as_ref().and_then(to_date);
    format_naive_date(date)
}

/// Spell a rupee amount in words using lakh and crore.
#[wasm_bindgen(js_name = amountInWordsInr)]
pub fn amount_in_words_inr(value: f64) -> Result<String, JsValue> {
    gstbill_core::amount_in_words_inr(amount(value)).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Validate a GSTIN, including its check character.
#[wasm_bindgen(js_name = validateGstin)]
pub fn validate_gstin(gstin: &str) -> bool {
    gstbill_core::validate_gstin(gstin)
}

/// Configured renderer for browser use.
#[wasm_bindgen(js_name = InvoiceRenderer)]
pub struct InvoiceRendererJs {
    renderer: InvoiceRenderer,
}

#[wasm_bindgen(js_class = InvoiceRenderer)]
impl InvoiceRendererJs {
    /// Create a renderer from a configuration object (`{render, company}`).
    ///
    /// Missing keys take their defaults; `undefined` gives the default renderer.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<InvoiceRendererJs, JsValue> {
        let config = match to_json(config)? {
            Value::Null => BillConfig::default(),
            value => serde_json::from_value::<BillConfig>(value)
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
        };

        Ok(Self {
            renderer: InvoiceRenderer::new(config.render).with_default_company(config.company),
        })
    }

    /// Render an invoice or quotation object to HTML.
    #[wasm_bindgen]
    pub fn render(&self, invoice: JsValue) -> Result<String, JsValue> {
        let document = to_document(invoice)?;
        self.renderer
            .render(&document)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Compute the GST summary of an invoice object.
    #[wasm_bindgen(js_name = computeSummary)]
    pub fn compute_summary(&self, invoice: JsValue) -> Result<JsValue, JsValue> {
        compute_summary(invoice)
    }
}
