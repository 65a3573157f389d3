//! Tolerant deserializers for loosely typed backend payloads.
//!
//! The finance backend serializes database rows as-is, so numbers may arrive
//! as JSON numbers or numeric strings and booleans as `true`, `1` or `"1"`.
//! Every helper treats `null` like a missing value.

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().map(|float| float as i64))
        }
        _ => None,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

/// Parses the datetime formats the backend emits.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(parsed.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

/// Parses a calendar date, accepting a datetime and dropping the time part.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(text).map(|datetime| datetime.date()))
}

pub fn de_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if is_blank(&value) {
        return Ok(0.0);
    }
    value_to_f64(&value).ok_or_else(|| D::Error::custom(format!("expected a number, got {value}")))
}

pub fn de_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if is_blank(&value) {
        return Ok(None);
    }
    value_to_f64(&value)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("expected a number, got {value}")))
}

pub fn de_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if is_blank(&value) {
        return Ok(0);
    }
    value_to_i64(&value).ok_or_else(|| D::Error::custom(format!("expected an integer, got {value}")))
}

pub fn de_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = de_i64(deserializer)?;
    i32::try_from(raw).map_err(|_| D::Error::custom(format!("integer {raw} out of range")))
}

pub fn de_opt_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if is_blank(&value) {
        return Ok(None);
    }
    let raw = value_to_i64(&value)
        .ok_or_else(|| D::Error::custom(format!("expected an integer, got {value}")))?;
    i32::try_from(raw)
        .map(Some)
        .map_err(|_| D::Error::custom(format!("integer {raw} out of range")))
}

pub fn de_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Null => Ok(false),
        Value::Bool(flag) => Ok(*flag),
        Value::Number(_) => Ok(value_to_f64(&value).is_some_and(|number| number != 0.0)),
        Value::String(text) => match text.trim().to_lowercase().as_str() {
            "" | "0" | "false" | "no" | "off" => Ok(false),
            "1" | "true" | "yes" | "on" => Ok(true),
            other => Err(D::Error::custom(format!("expected a boolean, got `{other}`"))),
        },
        other => Err(D::Error::custom(format!("expected a boolean, got {other}"))),
    }
}

pub fn de_opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    de_bool(value).map(Some).map_err(D::Error::custom)
}

/// Strings that may be `null` collapse to an empty string.
pub fn de_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

/// Optional strings where blank values count as absent.
pub fn de_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

/// Unparseable timestamps are treated as absent.
pub fn de_opt_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(parse_datetime))
}

pub fn de_opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(parse_date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "de_f64")]
        amount: f64,
        #[serde(default, deserialize_with = "de_i32")]
        count: i32,
        #[serde(default, deserialize_with = "de_opt_i32")]
        template_id: Option<i32>,
        #[serde(default, deserialize_with = "de_bool")]
        active: bool,
        #[serde(default, deserialize_with = "de_opt_datetime")]
        sent_at: Option<NaiveDateTime>,
        #[serde(default, deserialize_with = "de_opt_date")]
        due: Option<NaiveDate>,
    }

    #[test]
    fn accepts_numbers_encoded_as_strings() {
        let row: Row = serde_json::from_str(
            r#"{"amount": "125.50", "count": "7", "template_id": "3", "active": "1"}"#,
        )
        .unwrap();

        assert_eq!(row.amount, 125.5);
        assert_eq!(row.count, 7);
        assert_eq!(row.template_id, Some(3));
        assert!(row.active);
    }

    #[test]
    fn treats_null_and_missing_as_defaults() {
        let row: Row =
            serde_json::from_str(r#"{"amount": null, "template_id": "", "active": 0}"#).unwrap();

        assert_eq!(row.amount, 0.0);
        assert_eq!(row.count, 0);
        assert_eq!(row.template_id, None);
        assert!(!row.active);
        assert_eq!(row.sent_at, None);
    }

    #[test]
    fn parses_mysql_and_iso_timestamps() {
        let mysql: Row = serde_json::from_str(r#"{"sent_at": "2026-03-04 10:15:00"}"#).unwrap();
        let iso: Row = serde_json::from_str(r#"{"sent_at": "2026-03-04T10:15:00Z"}"#).unwrap();

        assert_eq!(mysql.sent_at, iso.sent_at);
        assert!(mysql.sent_at.is_some());
    }

    #[test]
    fn date_accepts_datetime_values() {
        let row: Row = serde_json::from_str(r#"{"due": "2026-02-01 00:00:00"}"#).unwrap();
        assert_eq!(row.due, NaiveDate::from_ymd_opt(2026, 2, 1));
    }

    #[test]
    fn rejects_garbage_numbers() {
        let result = serde_json::from_str::<Row>(r#"{"amount": "lots"}"#);
        assert!(result.is_err());
    }
}
