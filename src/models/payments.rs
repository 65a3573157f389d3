//! Wire models for the `/payments` endpoints.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::analytics::{
    AnalyticsPeriod, AnalyticsSummary, DailyRevenue, RevenueAnalytics, StatusBreakdown,
};
use crate::domain::payments::{
    DashboardStats as DomainDashboardStats, Invoice as DomainInvoice, Payment as DomainPayment,
};
use crate::domain::settings::PaymentSettings as DomainPaymentSettings;
use crate::domain::types::{
    CurrencyCode, InvoiceId, InvoicePrefix, PaymentId, TypeConstraintError,
};
use crate::models::lenient::{
    de_f64, de_i32, de_i64, de_opt_bool, de_opt_date, de_opt_datetime, de_opt_f64, de_opt_i32,
    de_opt_string, de_string,
};

fn currency_or_default(code: Option<String>) -> CurrencyCode {
    code.and_then(|code| CurrencyCode::new(code).ok())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardStatsRecord {
    #[serde(default, deserialize_with = "de_f64")]
    pub total_revenue: f64,
    #[serde(default, deserialize_with = "de_f64")]
    pub outstanding_amount: f64,
    #[serde(default, deserialize_with = "de_f64")]
    pub this_month_revenue: f64,
    #[serde(default, deserialize_with = "de_i64")]
    pub overdue_invoices: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceRecord {
    #[serde(deserialize_with = "de_i32")]
    pub id: i32,
    #[serde(default, deserialize_with = "de_string")]
    pub invoice_number: String,
    #[serde(default, deserialize_with = "de_f64")]
    pub total: f64,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub amount_due: Option<f64>,
    #[serde(default, deserialize_with = "de_string")]
    pub status: String,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub issue_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub contact_first_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub contact_last_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub contact_email: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRecord {
    #[serde(deserialize_with = "de_i32")]
    pub id: i32,
    #[serde(default, deserialize_with = "de_f64")]
    pub amount: f64,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub paid_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub payment_method: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i32")]
    pub invoice_id: Option<i32>,
    #[serde(default, deserialize_with = "de_string")]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsSummaryRecord {
    #[serde(default, deserialize_with = "de_i64")]
    pub total_payments: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub successful_payments: i64,
    #[serde(default, deserialize_with = "de_f64")]
    pub total_revenue: f64,
    #[serde(default, deserialize_with = "de_i64")]
    pub refunded_count: i64,
    #[serde(default, deserialize_with = "de_f64")]
    pub avg_payment: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyRevenueRecord {
    #[serde(default, deserialize_with = "de_opt_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_i64")]
    pub count: i64,
    #[serde(default, deserialize_with = "de_f64")]
    pub revenue: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusBreakdownRecord {
    #[serde(default, deserialize_with = "de_string")]
    pub status: String,
    #[serde(default, deserialize_with = "de_i64")]
    pub count: i64,
    #[serde(default, deserialize_with = "de_f64")]
    pub total: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsPeriodRecord {
    #[serde(default, deserialize_with = "de_opt_date")]
    pub from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
/// Aggregate returned by `GET /payments/analytics`.
pub struct AnalyticsRecord {
    #[serde(default)]
    pub summary: AnalyticsSummaryRecord,
    #[serde(default)]
    pub daily_trend: Vec<DailyRevenueRecord>,
    #[serde(default)]
    pub by_status: Vec<StatusBreakdownRecord>,
    #[serde(default)]
    pub period: AnalyticsPeriodRecord,
}

#[derive(Debug, Clone, Default, Deserialize)]
/// Settings row; absent columns fall back to the hub defaults.
pub struct PaymentSettingsRecord {
    #[serde(default, deserialize_with = "de_opt_string")]
    pub default_currency: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub default_tax_rate: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub invoice_prefix: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub invoice_footer: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub payment_terms: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub stripe_publishable_key: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub paypal_client_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_bool")]
    pub auto_send_receipts: Option<bool>,
}

#[derive(Debug, Serialize)]
/// Body of `PUT /payments/settings`.
pub struct PaymentSettingsBody<'a> {
    pub default_currency: &'a str,
    pub default_tax_rate: f64,
    pub invoice_prefix: &'a str,
    pub invoice_footer: &'a str,
    pub payment_terms: &'a str,
    pub stripe_publishable_key: &'a str,
    pub paypal_client_id: &'a str,
    pub auto_send_receipts: bool,
}

impl From<DashboardStatsRecord> for DomainDashboardStats {
    fn from(record: DashboardStatsRecord) -> Self {
        Self {
            total_revenue: record.total_revenue,
            outstanding_amount: record.outstanding_amount,
            this_month_revenue: record.this_month_revenue,
            overdue_invoices: record.overdue_invoices,
        }
    }
}

impl TryFrom<InvoiceRecord> for DomainInvoice {
    type Error = TypeConstraintError;

    fn try_from(record: InvoiceRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: InvoiceId::try_from(record.id)?,
            invoice_number: record.invoice_number,
            total: record.total,
            amount_due: record.amount_due,
            status: record.status,
            issue_date: record.issue_date,
            due_date: record.due_date,
            contact_first_name: record.contact_first_name,
            contact_last_name: record.contact_last_name,
            contact_email: record.contact_email,
            currency: currency_or_default(record.currency),
        })
    }
}

impl TryFrom<PaymentRecord> for DomainPayment {
    type Error = TypeConstraintError;

    fn try_from(record: PaymentRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PaymentId::try_from(record.id)?,
            amount: record.amount,
            currency: currency_or_default(record.currency),
            paid_at: record.paid_at,
            payment_method: record.payment_method,
            invoice_id: record.invoice_id.map(InvoiceId::try_from).transpose()?,
            status: record.status,
        })
    }
}

impl From<AnalyticsRecord> for RevenueAnalytics {
    fn from(record: AnalyticsRecord) -> Self {
        let summary = record.summary;
        Self {
            summary: AnalyticsSummary {
                total_payments: summary.total_payments,
                successful_payments: summary.successful_payments,
                total_revenue: summary.total_revenue,
                refunded_count: summary.refunded_count,
                avg_payment: summary.avg_payment,
            },
            // Rows without a parseable date cannot be plotted.
            daily_trend: record
                .daily_trend
                .into_iter()
                .filter_map(|row| {
                    row.date.map(|date| DailyRevenue {
                        date,
                        count: row.count,
                        revenue: row.revenue,
                    })
                })
                .collect(),
            by_status: record
                .by_status
                .into_iter()
                .map(|row| StatusBreakdown {
                    status: row.status,
                    count: row.count,
                    total: row.total,
                })
                .collect(),
            period: AnalyticsPeriod {
                from: record.period.from,
                to: record.period.to,
            },
        }
    }
}

impl From<PaymentSettingsRecord> for DomainPaymentSettings {
    fn from(record: PaymentSettingsRecord) -> Self {
        let defaults = DomainPaymentSettings::default();
        Self {
            default_currency: currency_or_default(record.default_currency),
            default_tax_rate: record
                .default_tax_rate
                .unwrap_or(defaults.default_tax_rate),
            invoice_prefix: record
                .invoice_prefix
                .and_then(|prefix| InvoicePrefix::new(prefix).ok())
                .unwrap_or(defaults.invoice_prefix),
            invoice_footer: record.invoice_footer.unwrap_or_default(),
            payment_terms: record.payment_terms.unwrap_or_default(),
            stripe_publishable_key: record.stripe_publishable_key.unwrap_or_default(),
            paypal_client_id: record.paypal_client_id.unwrap_or_default(),
            auto_send_receipts: record
                .auto_send_receipts
                .unwrap_or(defaults.auto_send_receipts),
        }
    }
}

impl<'a> From<&'a DomainPaymentSettings> for PaymentSettingsBody<'a> {
    fn from(settings: &'a DomainPaymentSettings) -> Self {
        Self {
            default_currency: settings.default_currency.as_str(),
            default_tax_rate: settings.default_tax_rate,
            invoice_prefix: settings.invoice_prefix.as_str(),
            invoice_footer: &settings.invoice_footer,
            payment_terms: &settings.payment_terms,
            stripe_publishable_key: &settings.stripe_publishable_key,
            paypal_client_id: &settings.paypal_client_id,
            auto_send_receipts: settings.auto_send_receipts,
        }
    }
}
