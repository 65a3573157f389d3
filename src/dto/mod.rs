//! DTO modules that bridge services with templates.
//!
//! Values are formatted here so templates only place strings.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::types::CurrencyCode;

pub mod accounting;
pub mod analytics;
pub mod dunning;
pub mod overview;
pub mod settings;

/// Placeholder shown for timestamps that never happened.
pub const NEVER: &str = "Never";

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        _ => None,
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Formats an amount as `$1,234.50`, or `CHF 1,234.50` for codes without a symbol.
pub fn format_money(amount: f64, currency: &CurrencyCode) -> String {
    let rounded = format!("{:.2}", amount.abs());
    let (whole, cents) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let number = format!("{}.{cents}", group_thousands(whole));
    let sign = if amount < 0.0 && rounded != "0.00" { "-" } else { "" };

    match currency_symbol(currency.as_str()) {
        Some(symbol) => format!("{sign}{symbol}{number}"),
        None => format!("{sign}{} {number}", currency.as_str()),
    }
}

pub fn format_usd(amount: f64) -> String {
    format_money(amount, &CurrencyCode::default())
}

/// Short timestamp such as `Mar 4, 09:15`, or `Never`.
pub fn format_short_datetime(value: Option<NaiveDateTime>) -> String {
    value
        .map(|dt| dt.format("%b %-d, %H:%M").to_string())
        .unwrap_or_else(|| NEVER.to_string())
}

/// Full timestamp such as `Mar 4, 2026 09:15`, or `Never`.
pub fn format_datetime(value: Option<NaiveDateTime>) -> String {
    value
        .map(|dt| dt.format("%b %-d, %Y %H:%M").to_string())
        .unwrap_or_else(|| NEVER.to_string())
}

pub fn format_date(value: Option<NaiveDate>) -> String {
    value
        .map(|date| date.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Bootstrap color for an invoice, payment or sync status badge.
pub fn status_class(status: &str) -> &'static str {
    match status {
        "paid" | "completed" | "success" | "synced" => "success",
        "sent" | "viewed" | "processing" => "info",
        "partially_paid" | "pending" => "warning",
        "overdue" | "failed" | "cancelled" | "void" => "danger",
        "refunded" => "secondary",
        _ => "light",
    }
}

/// Human readable status such as `Partially paid`.
pub fn status_label(status: &str) -> String {
    let spaced = status.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_uses_symbol_and_grouping() {
        assert_eq!(format_usd(1234.5), "$1,234.50");
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(-12.5), "-$12.50");
        assert_eq!(format_usd(1_000_000.0), "$1,000,000.00");
        assert_eq!(
            format_money(999.999, &CurrencyCode::new("EUR").unwrap()),
            "€1,000.00"
        );
        assert_eq!(
            format_money(15.0, &CurrencyCode::new("chf").unwrap()),
            "CHF 15.00"
        );
    }

    #[test]
    fn short_datetime_falls_back_to_never() {
        let dt = NaiveDate::from_ymd_opt(2026, 3, 4)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        assert_eq!(format_short_datetime(Some(dt)), "Mar 4, 09:15");
        assert_eq!(format_short_datetime(None), "Never");
    }

    #[test]
    fn status_helpers() {
        assert_eq!(status_class("paid"), "success");
        assert_eq!(status_class("partially_paid"), "warning");
        assert_eq!(status_class("mystery"), "light");
        assert_eq!(status_label("partially_paid"), "Partially paid");
        assert_eq!(status_label(""), "-");
    }
}
