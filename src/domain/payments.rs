//! Invoices, payments and the aggregates shown on the overview dashboard.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{CurrencyCode, InvoiceId, PaymentId};

/// Invoice statuses counted as still awaiting payment.
pub const PENDING_INVOICE_STATUSES: [&str; 3] = ["sent", "viewed", "partially_paid"];

/// Headline figures computed by the backend.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub total_revenue: f64,
    pub outstanding_amount: f64,
    pub this_month_revenue: f64,
    pub overdue_invoices: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub total: f64,
    pub amount_due: Option<f64>,
    pub status: String,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub contact_first_name: Option<String>,
    pub contact_last_name: Option<String>,
    pub contact_email: Option<String>,
    pub currency: CurrencyCode,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: PaymentId,
    pub amount: f64,
    pub currency: CurrencyCode,
    pub paid_at: Option<NaiveDateTime>,
    pub payment_method: Option<String>,
    pub invoice_id: Option<InvoiceId>,
    pub status: String,
}

/// Figures derived locally from the most recent invoices and payments.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct ExtendedStats {
    pub total_invoices: usize,
    pub paid_invoices: usize,
    pub pending_invoices: usize,
    pub total_payments: usize,
    pub avg_invoice_value: f64,
    pub last_month_revenue: f64,
    /// Percent change of this month's revenue against last month.
    pub revenue_growth: f64,
}

impl ExtendedStats {
    /// Computes the derived figures relative to `today`.
    pub fn compute(
        stats: &DashboardStats,
        invoices: &[Invoice],
        payments: &[Payment],
        today: NaiveDate,
    ) -> Self {
        let total_invoices = invoices.len();
        let paid_invoices = invoices.iter().filter(|inv| inv.status == "paid").count();
        let pending_invoices = invoices
            .iter()
            .filter(|inv| PENDING_INVOICE_STATUSES.contains(&inv.status.as_str()))
            .count();
        let avg_invoice_value = if total_invoices > 0 {
            invoices.iter().map(|inv| inv.total).sum::<f64>() / total_invoices as f64
        } else {
            0.0
        };

        let (last_year, last_month) = previous_month(today);
        let last_month_revenue = payments
            .iter()
            .filter(|p| p.status == "completed")
            .filter(|p| {
                p.paid_at
                    .is_some_and(|paid| paid.year() == last_year && paid.month() == last_month)
            })
            .map(|p| p.amount)
            .sum::<f64>();

        let revenue_growth = if last_month_revenue > 0.0 {
            (stats.this_month_revenue - last_month_revenue) / last_month_revenue * 100.0
        } else {
            0.0
        };

        Self {
            total_invoices,
            paid_invoices,
            pending_invoices,
            total_payments: payments.len(),
            avg_invoice_value,
            last_month_revenue,
            revenue_growth,
        }
    }
}

/// Returns `(year, month)` of the calendar month preceding `today`.
fn previous_month(today: NaiveDate) -> (i32, u32) {
    if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    }
}
