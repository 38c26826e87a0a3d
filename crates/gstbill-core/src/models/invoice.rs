//! Invoice and quotation models read leniently from front-end JSON.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::coerce::{
    as_text, declared_decimal, first_non_empty, first_object, lenient_decimal, lenient_object,
    lenient_override, to_date,
};
use crate::invoice::rules::gstin::validate_gstin;

/// Whether the document is a tax invoice or a quotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// GST tax invoice.
    #[default]
    Invoice,
    /// Quotation / estimate sent before invoicing.
    Quotation,
}

impl DocumentKind {
    /// Parse a document type label.
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "invoice" | "tax_invoice" | "tax invoice" | "bill" => Some(Self::Invoice),
            "quotation" | "quote" | "estimate" | "proforma" => Some(Self::Quotation),
            _ => None,
        }
    }
}

/// A single billable row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Quantity billed.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub quantity: Decimal,

    /// Unit price before discount and tax.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub rate: Decimal,

    /// Absolute discount subtracted before tax.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub discount: Decimal,

    /// Explicit taxable value; derived from quantity, rate and discount when absent.
    #[serde(
        default,
        deserialize_with = "lenient_override",
        skip_serializing_if = "Option::is_none"
    )]
    pub taxable_value: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient_decimal")]
    pub cgst_rate: Decimal,

    #[serde(default, deserialize_with = "lenient_decimal")]
    pub sgst_rate: Decimal,

    #[serde(default, deserialize_with = "lenient_decimal")]
    pub igst_rate: Decimal,

    /// Combined rate, used only when the split rates sum to zero.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub gst_rate: Decimal,

    #[serde(default, deserialize_with = "lenient_decimal")]
    pub cgst_amount: Decimal,

    #[serde(default, deserialize_with = "lenient_decimal")]
    pub sgst_amount: Decimal,

    #[serde(default, deserialize_with = "lenient_decimal")]
    pub igst_amount: Decimal,

    /// Display fields (description, HSN/SAC, unit) under whatever names the
    /// record used.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LineItem {
    /// Taxable value: the declared one, else `max(0, quantity * rate - discount)`,
    /// saturating at the decimal range.
    pub fn taxable_value(&self) -> Decimal {
        if let Some(value) = self.taxable_value {
            return value;
        }
        self.quantity
            .saturating_mul(self.rate)
            .saturating_sub(self.discount)
            .max(Decimal::ZERO)
    }

    /// Combined GST rate; falls back to `gstRate` when the split rates are zero.
    pub fn effective_rate(&self) -> Decimal {
        let split = self
            .cgst_rate
            .saturating_add(self.sgst_rate)
            .saturating_add(self.igst_rate);
        if split.is_zero() { self.gst_rate } else { split }
    }

    /// Sum of the three tax amounts on this row.
    pub fn tax_amount(&self) -> Decimal {
        self.cgst_amount
            .saturating_add(self.sgst_amount)
            .saturating_add(self.igst_amount)
    }

    /// Taxable value plus tax.
    pub fn line_total(&self) -> Decimal {
        self.taxable_value().saturating_add(self.tax_amount())
    }

    pub fn description(&self) -> Option<String> {
        first_non_empty(&self.extra, &["description", "name", "productName", "itemName"])
    }

    pub fn hsn(&self) -> Option<String> {
        first_non_empty(&self.extra, &["hsn", "hsnCode", "hsnSac", "sac", "hsnSacCode"])
    }

    pub fn unit(&self) -> Option<String> {
        first_non_empty(&self.extra, &["unit", "uom"])
    }
}

fn items_from_value(value: &Value) -> Vec<LineItem> {
    match value {
        Value::Array(rows) => rows
            .iter()
            .map(|row| {
                serde_json::from_value(row.clone()).unwrap_or_else(|e| {
                    warn!("unusable line item treated as empty: {}", e);
                    LineItem::default()
                })
            })
            .collect(),
        _ => Vec::new(),
    }
}

const ADDRESS_PARTS: [&[&str]; 5] = [
    &["address", "line1", "addressLine1", "street"],
    &["line2", "addressLine2"],
    &["city"],
    &["state", "stateName"],
    &["pincode", "pinCode", "zip", "postalCode"],
];

// A nested bank record may call the bank itself `name`; a party may not.
const NESTED_BANK_NAME: &[&str] = &["bankName", "bank", "name"];
const FLAT_BANK_NAME: &[&str] = &["bankName", "bank"];

/// A seller, buyer, ship-to or company profile record.
///
/// Parties are display-only and free-form, so the raw fields are kept and
/// resolved through alias lists on access.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Party {
    fields: Map<String, Value>,
}

impl<'de> Deserialize<'de> for Party {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient_object(deserializer).map(Self::from_map)
    }
}

impl Party {
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First non-blank value among the candidate field names.
    pub fn field(&self, candidates: &[&str]) -> Option<String> {
        first_non_empty(&self.fields, candidates)
    }

    pub fn name(&self) -> Option<String> {
        self.field(&["name", "companyName", "businessName", "legalName", "customerName"])
    }

    pub fn gstin(&self) -> Option<String> {
        self.field(&["gstin", "gstNo", "gstNumber", "GSTIN"])
    }

    pub fn state(&self) -> Option<String> {
        self.field(&["state", "stateName"])
    }

    pub fn phone(&self) -> Option<String> {
        self.field(&["phone", "mobile", "contactNumber"])
    }

    pub fn email(&self) -> Option<String> {
        self.field(&["email"])
    }

    /// Address as one line, joined from whichever parts are present.
    pub fn address(&self) -> Option<String> {
        let source = match self.fields.get("address") {
            Some(Value::Object(nested)) => nested,
            _ => &self.fields,
        };

        let parts: Vec<String> = ADDRESS_PARTS
            .iter()
            .filter_map(|candidates| first_non_empty(source, candidates))
            .collect();

        (!parts.is_empty()).then(|| parts.join(", "))
    }

    /// Bank details, from a nested `bankDetails` object or the record itself.
    pub fn bank(&self) -> BankDetails {
        let (source, name_keys) = match first_object(&self.fields, &["bankDetails", "bank"]) {
            Some(nested) => (nested, NESTED_BANK_NAME),
            None => (&self.fields, FLAT_BANK_NAME),
        };

        BankDetails {
            account_name: first_non_empty(source, &["accountName", "accountHolderName"]),
            account_number: first_non_empty(
                source,
                &["accountNumber", "accountNo", "bankAccount", "acNo"],
            ),
            ifsc: first_non_empty(source, &["ifsc", "ifscCode", "IFSC"]),
            bank_name: first_non_empty(source, name_keys),
            branch: first_non_empty(source, &["branch", "branchName"]),
        }
    }
}

/// Bank account block printed under the totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDetails {
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub ifsc: Option<String>,
    pub bank_name: Option<String>,
    pub branch: Option<String>,
}

impl BankDetails {
    pub fn is_empty(&self) -> bool {
        self.account_number.is_none() && self.ifsc.is_none() && self.bank_name.is_none()
    }
}

/// Invoice-level totals that, when present, win over item-derived sums.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredTotals {
    pub taxable_value: Option<Decimal>,
    pub total_tax: Option<Decimal>,
    pub total_cgst: Option<Decimal>,
    pub total_sgst: Option<Decimal>,
    pub total_igst: Option<Decimal>,
    pub grand_total: Option<Decimal>,
}

/// An invoice or quotation ready for summarising and rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceDocument {
    /// Invoice or quotation.
    pub kind: DocumentKind,

    /// Document number.
    pub number: Option<String>,

    /// Issue date.
    pub date: Option<NaiveDate>,

    /// Payment due date or quotation validity.
    pub due_date: Option<NaiveDate>,

    /// Place of supply (state).
    pub place_of_supply: Option<String>,

    /// Billable rows.
    pub items: Vec<LineItem>,

    /// Locked invoice-level totals.
    pub declared: DeclaredTotals,

    /// Seller; falls back to the company profile when absent.
    pub seller: Party,

    /// Buyer (`buyer` or `customer`).
    pub buyer: Party,

    /// Shipping address party.
    pub ship_to: Party,

    /// Company profile attached to the record.
    pub company: Party,

    pub notes: Option<String>,
    pub terms: Option<String>,
}

impl InvoiceDocument {
    /// Build a document from arbitrary JSON. Never fails: a non-object
    /// yields an empty document.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            warn!("invoice input is not an object, rendering an empty document");
            return Self::default();
        };

        let party = |candidates: &[&str]| {
            first_object(map, candidates)
                .cloned()
                .map(Party::from_map)
                .unwrap_or_default()
        };

        let company = party(&["company", "companyId", "companyProfile"]);
        let mut seller = party(&["seller"]);
        if seller.is_empty() {
            seller = company.clone();
        }

        let date_field = |candidates: &[&str]| {
            candidates
                .iter()
                .filter_map(|key| map.get(*key))
                .find_map(to_date)
        };

        Self {
            kind: document_kind(map),
            number: first_non_empty(map, &["invoiceNumber", "quotationNumber", "number"]),
            date: date_field(&["invoiceDate", "quotationDate", "date", "createdAt"]),
            due_date: date_field(&["dueDate", "validUntil"]),
            place_of_supply: first_non_empty(map, &["placeOfSupply"]),
            items: map.get("items").map(items_from_value).unwrap_or_default(),
            declared: DeclaredTotals {
                taxable_value: declared_decimal(map.get("taxableValue")),
                total_tax: declared_decimal(map.get("totalTax")),
                total_cgst: declared_decimal(map.get("totalCgst")),
                total_sgst: declared_decimal(map.get("totalSgst")),
                total_igst: declared_decimal(map.get("totalIgst")),
                grand_total: declared_decimal(map.get("grandTotal")),
            },
            seller,
            buyer: party(&["buyer", "customer"]),
            ship_to: party(&["shipTo", "shippingAddress"]),
            company,
            notes: first_non_empty(map, &["notes", "note"]),
            terms: first_non_empty(map, &["terms", "termsAndConditions"]),
        }
    }

    /// Parse a document from JSON text.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&value))
    }

    /// Review notes about the document. Rendering never depends on these.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.number.is_none() {
            issues.push("Missing document number".to_string());
        }

        if self.seller.name().is_none() {
            issues.push("Missing seller name".to_string());
        }

        match self.seller.gstin() {
            None => issues.push("Missing seller GSTIN".to_string()),
            Some(g) if !validate_gstin(&g) => issues.push(format!("Invalid seller GSTIN: {}", g)),
            Some(_) => {}
        }

        if let Some(g) = self.buyer.gstin().filter(|g| !validate_gstin(g)) {
            issues.push(format!("Invalid buyer GSTIN: {}", g));
        }

        if self.items.is_empty() {
            issues.push("No line items".to_string());
        }

        let tolerance = Decimal::new(1, 2);
        let item_taxable = self
            .items
            .iter()
            .map(LineItem::taxable_value)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        if let Some(declared) = self.declared.taxable_value {
            if declared.saturating_sub(item_taxable).abs() > tolerance {
                issues.push(format!(
                    "Declared taxable value ({}) differs from line items ({})",
                    declared, item_taxable
                ));
            }
        }

        if let (Some(grand), Some(taxable), Some(tax)) = (
            self.declared.grand_total,
            self.declared.taxable_value,
            self.declared.total_tax,
        ) {
            let expected = taxable.saturating_add(tax);
            if grand.saturating_sub(expected).abs() > tolerance {
                issues.push(format!(
                    "Declared grand total ({}) differs from taxable value plus tax ({})",
                    grand, expected
                ));
            }
        }

        issues
    }
}

fn document_kind(map: &Map<String, Value>) -> DocumentKind {
    if let Some(kind) = ["documentType", "type"]
        .iter()
        .filter_map(|key| map.get(*key))
        .filter_map(as_text)
        .find_map(|label| DocumentKind::from_label(&label))
    {
        return kind;
    }

    let has = |key: &str| map.get(key).and_then(as_text).is_some();
    if has("quotationNumber") && !has("invoiceNumber") {
        DocumentKind::Quotation
    } else {
        DocumentKind::Invoice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_line_item_lenient_fields() {
        let item: LineItem = serde_json::from_value(json!({
            "quantity": "2",
            "rate": 100,
            "discount": null,
            "cgstRate": "abc",
            "sgstRate": 9,
            "name": "Widget",
            "hsnCode": 8471
        }))
        .unwrap();

        assert_eq!(item.quantity, Decimal::from(2));
        assert_eq!(item.discount, Decimal::ZERO);
        assert_eq!(item.cgst_rate, Decimal::ZERO);
        assert_eq!(item.taxable_value(), Decimal::from(200));
        assert_eq!(item.description().as_deref(), Some("Widget"));
        assert_eq!(item.hsn().as_deref(), Some("8471"));
    }

    #[test]
    fn test_taxable_value_never_negative() {
        let item = LineItem {
            quantity: Decimal::ONE,
            rate: Decimal::from(50),
            discount: Decimal::from(80),
            ..Default::default()
        };
        assert_eq!(item.taxable_value(), Decimal::ZERO);
    }

    #[test]
    fn test_taxable_value_override() {
        let item: LineItem =
            serde_json::from_value(json!({"quantity": 3, "rate": 10, "taxableValue": 25}))
                .unwrap();
        assert_eq!(item.taxable_value(), Decimal::from(25));

        let item: LineItem =
            serde_json::from_value(json!({"quantity": 3, "rate": 10, "taxableValue": ""}))
                .unwrap();
        assert_eq!(item.taxable_value(), Decimal::from(30));
    }

    #[test]
    fn test_huge_values_saturate() {
        let item: LineItem = serde_json::from_value(json!({
            "quantity": 1e20,
            "rate": 1e20,
            "cgstRate": 5e28,
            "sgstRate": 5e28,
            "cgstAmount": 5e28,
            "sgstAmount": 5e28
        }))
        .unwrap();

        assert_eq!(item.taxable_value(), Decimal::MAX);
        assert_eq!(item.effective_rate(), Decimal::MAX);
        assert_eq!(item.tax_amount(), Decimal::MAX);
        assert_eq!(item.line_total(), Decimal::MAX);
    }

    #[test]
    fn test_validate_survives_huge_declared_totals() {
        let doc = InvoiceDocument::from_value(&json!({
            "items": [{"quantity": 1e20, "rate": 1e20}, {"quantity": 1e20, "rate": 1e20}],
            "taxableValue": -5e28,
            "totalTax": 5e28,
            "grandTotal": -5e28
        }));

        let issues = doc.validate();
        assert!(issues.iter().any(|i| i.contains("Declared taxable value")));
        assert!(issues.iter().any(|i| i.contains("Declared grand total")));
    }

    #[test]
    fn test_effective_rate_fallback() {
        let split = LineItem {
            cgst_rate: Decimal::from(9),
            sgst_rate: Decimal::from(9),
            gst_rate: Decimal::from(5),
            ..Default::default()
        };
        assert_eq!(split.effective_rate(), Decimal::from(18));

        let combined = LineItem {
            gst_rate: Decimal::from(12),
            ..Default::default()
        };
        assert_eq!(combined.effective_rate(), Decimal::from(12));
    }

    #[test]
    fn test_from_value_aliases() {
        let doc = InvoiceDocument::from_value(&json!({
            "quotationNumber": "Q-7",
            "date": "2024-01-05",
            "customer": {"name": "Buyer Co", "gstin": "29AAGCB7383J1Z4"},
            "companyId": {"companyName": "Seller Pvt Ltd", "accountNo": "00112233"},
            "items": "not-a-list",
            "grandTotal": "1000"
        }));

        assert_eq!(doc.kind, DocumentKind::Quotation);
        assert_eq!(doc.number.as_deref(), Some("Q-7"));
        assert_eq!(doc.date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(doc.buyer.name().as_deref(), Some("Buyer Co"));
        assert_eq!(doc.seller.name().as_deref(), Some("Seller Pvt Ltd"));
        assert_eq!(doc.seller.bank().account_number.as_deref(), Some("00112233"));
        assert!(doc.items.is_empty());
        assert_eq!(doc.declared.grand_total, Some(Decimal::from(1000)));
        assert_eq!(doc.declared.taxable_value, None);
    }

    #[test]
    fn test_from_value_bad_rows_and_non_object() {
        let doc = InvoiceDocument::from_value(&json!({"items": [null, {"quantity": 1, "rate": 5}]}));
        assert_eq!(doc.items.len(), 2);
        assert_eq!(doc.items[0], LineItem::default());
        assert_eq!(doc.items[1].taxable_value(), Decimal::from(5));

        assert_eq!(InvoiceDocument::from_value(&json!(42)), InvoiceDocument::default());
    }

    #[test]
    fn test_document_kind() {
        let doc = InvoiceDocument::from_value(&json!({"documentType": "Estimate", "invoiceNumber": "X"}));
        assert_eq!(doc.kind, DocumentKind::Quotation);
        let doc = InvoiceDocument::from_value(&json!({"invoiceNumber": "INV-1"}));
        assert_eq!(doc.kind, DocumentKind::Invoice);
    }

    #[test]
    fn test_party_address_and_bank() {
        let party = Party::from_map(
            json!({
                "name": "Acme",
                "address": {"line1": "12 MG Road", "city": "Bengaluru", "state": "Karnataka", "pincode": 560001},
                "bankDetails": {"bankName": "HDFC Bank", "accountNumber": "5010", "ifscCode": "HDFC0000001"}
            })
            .as_object()
            .cloned()
            .unwrap(),
        );

        assert_eq!(
            party.address().as_deref(),
            Some("12 MG Road, Bengaluru, Karnataka, 560001")
        );
        assert_eq!(
            party.bank(),
            BankDetails {
                account_name: None,
                account_number: Some("5010".to_string()),
                ifsc: Some("HDFC0000001".to_string()),
                bank_name: Some("HDFC Bank".to_string()),
                branch: None,
            }
        );
    }

    #[test]
    fn test_validate_reports_drift() {
        let doc = InvoiceDocument::from_value(&json!({
            "invoiceNumber": "INV-1",
            "seller": {"name": "Acme", "gstin": "27AAPFU0939F1ZV"},
            "buyer": {"name": "B", "gstin": "BADGSTIN"},
            "items": [{"quantity": 1, "rate": 100}],
            "taxableValue": 150,
            "totalTax": 18,
            "grandTotal": 168
        }));

        let issues = doc.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues[0].contains("Invalid buyer GSTIN"));
        assert!(issues[1].contains("Declared taxable value"));
    }
}
