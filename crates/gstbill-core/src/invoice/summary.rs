//! GST summary: per-rate buckets and invoice totals.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::invoice::InvoiceDocument;

use super::rules::amounts::round_half_expand;
use super::rules::round_half_up;

/// Aggregated tax for one combined GST rate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRateRow {
    /// Combined rate in percent (CGST + SGST + IGST).
    pub rate: Decimal,
    pub taxable: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
}

impl TaxRateRow {
    /// Tax collected at this rate.
    pub fn tax_total(&self) -> Decimal {
        self.cgst.saturating_add(self.sgst).saturating_add(self.igst)
    }
}

/// Invoice-level totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub total_cgst: Decimal,
    pub total_sgst: Decimal,
    pub total_igst: Decimal,
    pub tax_total: Decimal,
    pub grand: Decimal,
    /// `grand` rounded to whole rupees.
    pub rounded: Decimal,
    /// `rounded - grand` to two places; printed as its own line.
    pub round_off: Decimal,
}

/// Output of [`compute_summary`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSummary {
    /// One row per distinct rate, ascending.
    pub rows: Vec<TaxRateRow>,
    pub totals: InvoiceTotals,
}

/// Bucket line items by effective rate and derive the invoice totals.
///
/// Declared invoice-level totals win over sums from the items, so a record
/// with locked totals renders the same even if its items drifted.
pub fn compute_summary(invoice: &InvoiceDocument) -> TaxSummary {
    let mut buckets: BTreeMap<Decimal, TaxRateRow> = BTreeMap::new();

    for item in &invoice.items {
        let rate = item.effective_rate();
        let bucket = buckets.entry(rate).or_insert_with(|| TaxRateRow {
            rate,
            ..Default::default()
        });
        bucket.taxable = bucket.taxable.saturating_add(item.taxable_value());
        bucket.cgst = bucket.cgst.saturating_add(item.cgst_amount);
        bucket.sgst = bucket.sgst.saturating_add(item.sgst_amount);
        bucket.igst = bucket.igst.saturating_add(item.igst_amount);
    }

    let rows: Vec<TaxRateRow> = buckets.into_values().collect();
    let sum = |f: fn(&TaxRateRow) -> Decimal| {
        rows.iter().map(f).fold(Decimal::ZERO, Decimal::saturating_add)
    };

    let declared = &invoice.declared;
    let subtotal = declared.taxable_value.unwrap_or_else(|| sum(|r| r.taxable));
    let total_cgst = declared.total_cgst.unwrap_or_else(|| sum(|r| r.cgst));
    let total_sgst = declared.total_sgst.unwrap_or_else(|| sum(|r| r.sgst));
    let total_igst = declared.total_igst.unwrap_or_else(|| sum(|r| r.igst));
    let tax_total = declared
        .total_tax
        .unwrap_or_else(|| total_cgst.saturating_add(total_sgst).saturating_add(total_igst));
    let grand = declared
        .grand_total
        .unwrap_or_else(|| subtotal.saturating_add(tax_total));

    let rounded = round_half_up(grand, 0);
    let round_off = round_half_expand(rounded - grand, 2);

    debug!(
        rows = rows.len(),
        %grand,
        %rounded,
        "computed tax summary"
    );

    TaxSummary {
        rows,
        totals: InvoiceTotals {
            subtotal,
            total_cgst,
            total_sgst,
            total_igst,
            tax_total,
            grand,
            rounded,
            round_off,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn summary(value: serde_json::Value) -> TaxSummary {
        compute_summary(&InvoiceDocument::from_value(&value))
    }

    #[test]
    fn test_empty_items() {
        let result = summary(json!({"items": []}));
        assert_eq!(result, TaxSummary::default());
    }

    #[test]
    fn test_single_item() {
        let result = summary(json!({
            "items": [{
                "quantity": 2, "rate": 100, "discount": 0,
                "cgstRate": 9, "sgstRate": 9,
                "cgstAmount": 18, "sgstAmount": 18
            }]
        }));

        assert_eq!(
            result.rows,
            vec![TaxRateRow {
                rate: dec("18"),
                taxable: dec("200"),
                cgst: dec("18"),
                sgst: dec("18"),
                igst: Decimal::ZERO,
            }]
        );
        assert_eq!(result.totals.subtotal, dec("200"));
        assert_eq!(result.totals.tax_total, dec("36"));
        assert_eq!(result.totals.grand, dec("236"));
        assert_eq!(result.totals.rounded, dec("236"));
        assert!(result.totals.round_off.is_zero());
    }

    #[test]
    fn test_rows_sorted_and_merged() {
        let result = summary(json!({
            "items": [
                {"quantity": 1, "rate": 100, "igstRate": 28, "igstAmount": 28},
                {"quantity": 1, "rate": 50, "gstRate": 5},
                {"quantity": 1, "rate": 10, "cgstRate": 2.5, "sgstRate": 2.5},
                {"quantity": 2, "rate": 30, "igstRate": "28.0", "igstAmount": 16.8}
            ]
        }));

        let rates: Vec<Decimal> = result.rows.iter().map(|r| r.rate).collect();
        assert_eq!(rates, vec![dec("5"), dec("28")]);
        assert_eq!(result.rows[0].taxable, dec("60"));
        assert_eq!(result.rows[1].taxable, dec("160"));
        assert_eq!(result.rows[1].igst, dec("44.8"));
        assert_eq!(result.totals.grand, dec("264.8"));
        assert_eq!(result.totals.rounded, dec("265"));
        assert_eq!(result.totals.round_off, dec("0.2"));
    }

    #[test]
    fn test_fractional_rate_bucket() {
        let result = summary(json!({
            "items": [
                {"quantity": 1, "rate": 1000, "cgstRate": 0.125, "sgstRate": 0.125, "cgstAmount": 1.25, "sgstAmount": 1.25}
            ]
        }));
        assert_eq!(result.rows[0].rate, dec("0.25"));
        assert_eq!(result.totals.grand, dec("1002.5"));
        assert_eq!(result.totals.rounded, dec("1003"));
        assert_eq!(result.totals.round_off, dec("0.5"));
    }

    #[test]
    fn test_declared_totals_win() {
        let result = summary(json!({
            "items": [{"quantity": 1, "rate": 100, "cgstAmount": 9, "sgstAmount": 9, "cgstRate": 9, "sgstRate": 9}],
            "taxableValue": 90,
            "totalCgst": "8.1",
            "grandTotal": 500.4
        }));

        assert_eq!(result.totals.subtotal, dec("90"));
        assert_eq!(result.totals.total_cgst, dec("8.1"));
        assert_eq!(result.totals.total_sgst, dec("9"));
        assert_eq!(result.totals.tax_total, dec("17.1"));
        assert_eq!(result.totals.grand, dec("500.4"));
        assert_eq!(result.totals.rounded, dec("500"));
        assert_eq!(result.totals.round_off, dec("-0.4"));
        // Rows still reflect the items.
        assert_eq!(result.rows[0].taxable, dec("100"));
    }

    #[test]
    fn test_overrides_without_items() {
        let result = summary(json!({"totalTax": 18, "taxableValue": 100}));
        assert!(result.rows.is_empty());
        assert_eq!(result.totals.grand, dec("118"));
        assert_eq!(result.totals.total_cgst, Decimal::ZERO);
    }

    #[test]
    fn test_round_off_of_three_decimal_grand() {
        let result = summary(json!({"grandTotal": 100.125}));
        assert_eq!(result.totals.rounded, dec("100"));
        assert_eq!(result.totals.round_off, dec("-0.13"));

        let result = summary(json!({"grandTotal": "-100.125"}));
        assert_eq!(result.totals.rounded, dec("-100"));
        assert_eq!(result.totals.round_off, dec("0.13"));

        let result = summary(json!({"grandTotal": "49.996"}));
        assert_eq!(result.totals.rounded, dec("50"));
        assert_eq!(result.totals.round_off, dec("0"));
    }

    #[test]
    fn test_overflowing_rates_and_amounts_saturate() {
        let result = summary(json!({
            "items": [
                {"quantity": 1, "rate": 1, "cgstRate": 5e28, "sgstRate": 5e28},
                {"quantity": 1, "rate": 1, "cgstRate": 5e28, "sgstRate": 5e28,
                 "cgstAmount": 5e28, "sgstAmount": 5e28}
            ]
        }));

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].rate, Decimal::MAX);
        assert_eq!(result.rows[0].taxable, dec("2"));
        assert_eq!(result.rows[0].tax_total(), Decimal::MAX);
        assert_eq!(result.totals.tax_total, Decimal::MAX);
        assert_eq!(result.totals.grand, Decimal::MAX);
        assert_eq!(result.totals.rounded, Decimal::MAX);
        assert!(result.totals.round_off.is_zero());
    }

    #[test]
    fn test_negative_grand_rounds_toward_positive() {
        let result = summary(json!({"grandTotal": -10.5}));
        assert_eq!(result.totals.rounded, dec("-10"));
        assert_eq!(result.totals.round_off, dec("0.5"));
    }

    #[test]
    fn test_malformed_values_coerce_to_zero() {
        let result = summary(json!({
            "items": [{"quantity": "lots", "rate": {}, "cgstAmount": "x"}]
        }));
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].rate, Decimal::ZERO);
        assert_eq!(result.totals.grand, Decimal::ZERO);
    }
}
