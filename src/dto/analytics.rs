//! DTOs used on the revenue analytics page.

use serde::Serialize;
use serde_json::json;

use crate::domain::analytics::RevenueAnalytics;
use crate::dto::{format_date, format_usd, status_class, status_label};

#[derive(Debug, Serialize)]
pub struct StatusRow {
    pub status: String,
    pub status_class: &'static str,
    pub count: i64,
    pub total: String,
}

/// Data required to render the analytics page.
#[derive(Debug, Default, Serialize)]
pub struct AnalyticsPageData {
    pub load_failed: bool,
    pub total_revenue: String,
    pub avg_payment: String,
    pub total_payments: i64,
    pub successful_payments: i64,
    pub refunded_count: i64,
    pub success_rate: f64,
    pub refund_rate: f64,
    pub by_status: Vec<StatusRow>,
    pub period_from: String,
    pub period_to: String,
    /// Daily trend serialized for the chart script.
    pub chart_json: String,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl AnalyticsPageData {
    pub fn failed() -> Self {
        Self {
            load_failed: true,
            chart_json: chart_json(&[], &[], &[]),
            ..Self::default()
        }
    }
}

fn chart_json(labels: &[String], revenue: &[f64], count: &[i64]) -> String {
    json!({ "labels": labels, "revenue": revenue, "count": count }).to_string()
}

impl From<&RevenueAnalytics> for AnalyticsPageData {
    fn from(analytics: &RevenueAnalytics) -> Self {
        let summary = &analytics.summary;
        let labels: Vec<String> = analytics
            .daily_trend
            .iter()
            .map(|day| day.date.format("%b %-d").to_string())
            .collect();
        let revenue: Vec<f64> = analytics.daily_trend.iter().map(|day| day.revenue).collect();
        let count: Vec<i64> = analytics.daily_trend.iter().map(|day| day.count).collect();

        Self {
            load_failed: false,
            total_revenue: format_usd(summary.total_revenue),
            avg_payment: format_usd(summary.avg_payment),
            total_payments: summary.total_payments,
            successful_payments: summary.successful_payments,
            refunded_count: summary.refunded_count,
            success_rate: round1(summary.success_rate()),
            refund_rate: round1(summary.refund_rate()),
            by_status: analytics
                .by_status
                .iter()
                .map(|row| StatusRow {
                    status: status_label(&row.status),
                    status_class: status_class(&row.status),
                    count: row.count,
                    total: format_usd(row.total),
                })
                .collect(),
            period_from: format_date(analytics.period.from),
            period_to: format_date(analytics.period.to),
            chart_json: chart_json(&labels, &revenue, &count),
        }
    }
}
