//! Lenient coercion of loosely-typed invoice JSON.
//!
//! Invoices arrive from a web front end and from legacy records, so any
//! numeric field may be a number, a numeric string, an empty string, `null`
//! or missing entirely. Everything funnels through [`to_decimal_or_default`]
//! and [`first_non_empty`] so the leniency policy lives in one place.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::invoice::rules::dates::parse_date;

/// Coerce a JSON value to a decimal, falling back to `default`.
pub fn to_decimal_or_default(value: &Value, default: Decimal) -> Decimal {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()).unwrap_or(default),
        Value::String(s) => parse_decimal(s.trim()).unwrap_or(default),
        Value::Bool(true) => Decimal::ONE,
        _ => default,
    }
}

/// Coerce an optional field, treating absence as zero.
pub fn to_decimal(value: Option<&Value>) -> Decimal {
    value.map_or(Decimal::ZERO, |v| to_decimal_or_default(v, Decimal::ZERO))
}

/// A field is declared when present, non-null and not blank.
pub fn declared_decimal(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        v => Some(to_decimal_or_default(v, Decimal::ZERO)),
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Render a scalar JSON value as display text, skipping blanks.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Resolve the first candidate field holding non-blank text.
pub fn first_non_empty(object: &Map<String, Value>, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|key| object.get(*key))
        .find_map(as_text)
}

/// Resolve the first candidate field holding a non-empty object.
pub fn first_object<'a>(
    object: &'a Map<String, Value>,
    candidates: &[&str],
) -> Option<&'a Map<String, Value>> {
    candidates
        .iter()
        .filter_map(|key| object.get(*key))
        .find_map(|v| v.as_object().filter(|o| !o.is_empty()))
}

/// Coerce a JSON value to a calendar date.
///
/// Strings go through [`parse_date`]; numbers are epoch milliseconds.
pub fn to_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date(s),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|ms| ms as i64))
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive()),
        _ => None,
    }
}

/// Serde adapter: lenient decimal, zero on anything unusable.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(to_decimal_or_default(&value, Decimal::ZERO))
}

/// Serde adapter: optional override with declared-field semantics.
pub fn lenient_override<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(declared_decimal(Some(&value)))
}

/// Serde adapter: any non-object becomes an empty map.
pub fn lenient_object<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_and_strings() {
        assert_eq!(to_decimal_or_default(&json!(12.5), Decimal::ZERO), Decimal::new(125, 1));
        assert_eq!(to_decimal_or_default(&json!(" 42 "), Decimal::ZERO), Decimal::from(42));
        assert_eq!(to_decimal_or_default(&json!("1e3"), Decimal::ZERO), Decimal::from(1000));
        assert_eq!(to_decimal_or_default(&json!(true), Decimal::ZERO), Decimal::ONE);
    }

    #[test]
    fn test_garbage_defaults() {
        let seven = Decimal::from(7);
        assert_eq!(to_decimal_or_default(&json!("abc"), seven), seven);
        assert_eq!(to_decimal_or_default(&json!(""), seven), seven);
        assert_eq!(to_decimal_or_default(&json!(null), seven), seven);
        assert_eq!(to_decimal_or_default(&json!([1]), seven), seven);
        assert_eq!(to_decimal_or_default(&json!(false), seven), seven);
        assert_eq!(to_decimal(None), Decimal::ZERO);
    }

    #[test]
    fn test_declared() {
        assert_eq!(declared_decimal(None), None);
        assert_eq!(declared_decimal(Some(&json!(null))), None);
        assert_eq!(declared_decimal(Some(&json!("  "))), None);
        assert_eq!(declared_decimal(Some(&json!(0))), Some(Decimal::ZERO));
        assert_eq!(declared_decimal(Some(&json!("n/a"))), Some(Decimal::ZERO));
        assert_eq!(declared_decimal(Some(&json!("99.5"))), Some(Decimal::new(995, 1)));
    }

    #[test]
    fn test_first_non_empty() {
        let obj = json!({"description": "", "name": "Widget", "productName": "Other"});
        let map = obj.as_object().unwrap();
        assert_eq!(
            first_non_empty(map, &["description", "name", "productName"]),
            Some("Widget".to_string())
        );
        assert_eq!(first_non_empty(map, &["missing"]), None);

        let obj = json!({"accountNo": 1234567890});
        assert_eq!(
            first_non_empty(obj.as_object().unwrap(), &["accountNumber", "accountNo"]),
            Some("1234567890".to_string())
        );
    }

    #[test]
    fn test_first_object_skips_empty() {
        let obj = json!({"buyer": {}, "customer": {"name": "Acme"}});
        let found = first_object(obj.as_object().unwrap(), &["buyer", "customer"]).unwrap();
        assert_eq!(found.get("name"), Some(&json!("Acme")));
    }

    #[test]
    fn test_to_date() {
        assert_eq!(to_date(&json!("2024-01-05")), NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(to_date(&json!(1704412800000i64)), NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(to_date(&json!("not-a-date")), None);
        assert_eq!(to_date(&json!(null)), None);
    }
}
