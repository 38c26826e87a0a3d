//! Printable HTML for invoices and quotations.
//!
//! The renderer computes the tax summary once, formats every value into a
//! string view, and fills `templates/invoice.html`. The resulting markup is
//! what the surrounding application hands to its HTML-to-PDF step.

use askama::Template;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::{RenderError, Result};
use crate::models::config::RenderConfig;
use crate::models::invoice::{BankDetails, DocumentKind, InvoiceDocument, LineItem, Party};

use super::rules::amounts::{format_currency_with, format_fixed2};
use super::rules::dates::format_naive_date;
use super::rules::words::amount_in_words_inr;
use super::summary::{compute_summary, TaxRateRow, TaxSummary};

struct PartyView {
    name: String,
    address: String,
    gstin: String,
    state: String,
    contact: String,
}

struct ItemView {
    description: String,
    hsn: String,
    quantity: String,
    unit: String,
    rate: String,
    discount: String,
    taxable: String,
    gst_rate: String,
    tax: String,
    total: String,
}

struct TaxRowView {
    rate: String,
    taxable: String,
    cgst: String,
    sgst: String,
    igst: String,
    tax: String,
}

struct TotalLine {
    label: &'static str,
    amount: String,
}

struct BankView {
    account_name: String,
    account_number: String,
    ifsc: String,
    bank_name: String,
    branch: String,
}

#[derive(Template)]
#[template(path = "invoice.html")]
struct InvoiceTemplate<'a> {
    title: &'a str,
    number: String,
    date: String,
    due_label: &'static str,
    due_date: String,
    place_of_supply: String,
    seller: PartyView,
    buyer: PartyView,
    has_ship_to: bool,
    ship_to: PartyView,
    items: Vec<ItemView>,
    tax_rows: Vec<TaxRowView>,
    total_lines: Vec<TotalLine>,
    grand_total: String,
    amount_in_words: String,
    has_bank: bool,
    bank: BankView,
    notes: String,
    terms: String,
    signature_label: &'a str,
}

/// Renders invoice documents to HTML.
#[derive(Debug, Clone, Default)]
pub struct InvoiceRenderer {
    config: RenderConfig,
    default_company: Party,
}

impl InvoiceRenderer {
    /// Create a renderer with the given settings.
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            default_company: Party::default(),
        }
    }

    /// Company profile used when a document has neither seller nor company.
    pub fn with_default_company(mut self, company: Party) -> Self {
        self.default_company = company;
        self
    }

    /// Render a document to a complete HTML page.
    pub fn render(&self, invoice: &InvoiceDocument) -> Result<String> {
        self.render_with_summary(invoice, &compute_summary(invoice))
    }

    /// Render with a summary the caller already computed for `invoice`.
    pub fn render_with_summary(
        &self,
        invoice: &InvoiceDocument,
        summary: &TaxSummary,
    ) -> Result<String> {
        let html = self
            .build(invoice, summary)
            .render()
            .map_err(RenderError::from)?;

        debug!(
            number = invoice.number.as_deref().unwrap_or_default(),
            bytes = html.len(),
            "rendered document"
        );

        Ok(html)
    }

    fn build<'a>(&'a self, invoice: &InvoiceDocument, summary: &TaxSummary) -> InvoiceTemplate<'a> {
        let seller = if invoice.seller.is_empty() {
            &self.default_company
        } else {
            &invoice.seller
        };

        let (title, due_label) = match invoice.kind {
            DocumentKind::Invoice => (self.config.invoice_title.as_str(), "Due Date"),
            DocumentKind::Quotation => (self.config.quotation_title.as_str(), "Valid Until"),
        };

        let bank = [seller, &invoice.company, &self.default_company]
            .into_iter()
            .map(Party::bank)
            .find(|b| !b.is_empty())
            .filter(|_| self.config.show_bank_details);

        InvoiceTemplate {
            title,
            number: self.text(invoice.number.clone()),
            date: self.date(invoice.date),
            due_label,
            due_date: self.date(invoice.due_date),
            place_of_supply: self.text(
                invoice
                    .place_of_supply
                    .clone()
                    .or_else(|| invoice.buyer.state()),
            ),
            seller: self.party(seller),
            buyer: self.party(&invoice.buyer),
            has_ship_to: !invoice.ship_to.is_empty(),
            ship_to: self.party(&invoice.ship_to),
            items: invoice.items.iter().map(|item| self.item(item)).collect(),
            tax_rows: summary.rows.iter().map(|row| self.tax_row(row)).collect(),
            total_lines: self.total_lines(summary),
            grand_total: self.money(summary.totals.rounded),
            amount_in_words: self.words(summary.totals.rounded),
            has_bank: bank.is_some(),
            bank: self.bank(bank.unwrap_or_default()),
            notes: invoice.notes.clone().unwrap_or_default(),
            terms: invoice.terms.clone().unwrap_or_default(),
            signature_label: &self.config.signature_label,
        }
    }

    fn text(&self, value: Option<String>) -> String {
        value.unwrap_or_else(|| self.config.placeholder.clone())
    }

    fn date(&self, value: Option<NaiveDate>) -> String {
        match value {
            Some(_) => format_naive_date(value),
            None => self.config.placeholder.clone(),
        }
    }

    fn money(&self, amount: Decimal) -> String {
        format_currency_with(amount, &self.config.currency.style())
    }

    fn words(&self, amount: Decimal) -> String {
        if !self.config.show_amount_in_words {
            return String::new();
        }
        amount_in_words_inr(amount).unwrap_or_else(|e| {
            warn!("amount in words unavailable: {}", e);
            self.config.placeholder.clone()
        })
    }

    fn party(&self, party: &Party) -> PartyView {
        let contact = [party.phone(), party.email()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" | ");

        PartyView {
            name: self.text(party.name()),
            address: self.text(party.address()),
            gstin: self.text(party.gstin()),
            state: self.text(party.state()),
            contact,
        }
    }

    fn item(&self, item: &LineItem) -> ItemView {
        ItemView {
            description: self.text(item.description()),
            hsn: self.text(item.hsn()),
            quantity: item.quantity.normalize().to_string(),
            unit: self.text(item.unit()),
            rate: format_fixed2(item.rate),
            discount: format_fixed2(item.discount),
            taxable: format_fixed2(item.taxable_value()),
            gst_rate: format!("{}%", item.effective_rate().normalize()),
            tax: format_fixed2(item.tax_amount()),
            total: format_fixed2(item.line_total()),
        }
    }

    fn tax_row(&self, row: &TaxRateRow) -> TaxRowView {
        TaxRowView {
            rate: format!("{}%", row.rate.normalize()),
            taxable: format_fixed2(row.taxable),
            cgst: format_fixed2(row.cgst),
            sgst: format_fixed2(row.sgst),
            igst: format_fixed2(row.igst),
            tax: format_fixed2(row.tax_total()),
        }
    }

    fn total_lines(&self, summary: &TaxSummary) -> Vec<TotalLine> {
        let totals = &summary.totals;
        let mut lines = vec![TotalLine {
            label: "Taxable Value",
            amount: self.money(totals.subtotal),
        }];

        for (label, amount) in [
            ("CGST", totals.total_cgst),
            ("SGST", totals.total_sgst),
            ("IGST", totals.total_igst),
        ] {
            if !amount.is_zero() {
                lines.push(TotalLine {
                    label,
                    amount: self.money(amount),
                });
            }
        }

        lines.push(TotalLine {
            label: "Total Tax",
            amount: self.money(totals.tax_total),
        });
        lines.push(TotalLine {
            label: "Round Off",
            amount: format_fixed2(totals.round_off),
        });
        lines
    }

    fn bank(&self, bank: BankDetails) -> BankView {
        BankView {
            account_name: self.text(bank.account_name),
            account_number: self.text(bank.account_number),
            ifsc: self.text(bank.ifsc),
            bank_name: self.text(bank.bank_name),
            branch: self.text(bank.branch),
        }
    }
}

/// Render with default settings.
pub fn render_invoice_html(invoice: &InvoiceDocument) -> Result<String> {
    InvoiceRenderer::default().render(invoice)
}
