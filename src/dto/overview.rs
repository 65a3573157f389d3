//! DTOs used on the overview dashboard.

use serde::Serialize;

use crate::domain::payments::{DashboardStats, ExtendedStats, Invoice, Payment};
use crate::dto::{format_date, format_datetime, format_money, format_usd, status_class, status_label};

/// Number of recent invoices and payments shown on the dashboard.
pub const RECENT_ROWS: usize = 5;

#[derive(Debug, Serialize)]
pub struct InvoiceRow {
    pub id: i32,
    pub invoice_number: String,
    pub customer: String,
    pub total: String,
    pub due_date: String,
    pub status: String,
    pub status_class: &'static str,
}

impl From<&Invoice> for InvoiceRow {
    fn from(invoice: &Invoice) -> Self {
        let customer = [
            invoice.contact_first_name.as_deref(),
            invoice.contact_last_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

        Self {
            id: invoice.id.get(),
            invoice_number: invoice.invoice_number.clone(),
            customer: if customer.trim().is_empty() {
                invoice.contact_email.clone().unwrap_or_else(|| "-".to_string())
            } else {
                customer
            },
            total: format_money(invoice.total, &invoice.currency),
            due_date: format_date(invoice.due_date),
            status: status_label(&invoice.status),
            status_class: status_class(&invoice.status),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentRow {
    pub id: i32,
    pub amount: String,
    pub method: String,
    pub paid_at: String,
    pub status: String,
    pub status_class: &'static str,
}

impl From<&Payment> for PaymentRow {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id.get(),
            amount: format_money(payment.amount, &payment.currency),
            method: payment
                .payment_method
                .as_deref()
                .map(status_label)
                .unwrap_or_else(|| "-".to_string()),
            paid_at: format_datetime(payment.paid_at),
            status: status_label(&payment.status),
            status_class: status_class(&payment.status),
        }
    }
}

/// Data required to render the overview page.
#[derive(Debug, Default, Serialize)]
pub struct OverviewPageData {
    /// Set when the backend could not be reached.
    pub load_failed: bool,
    pub total_revenue: String,
    pub outstanding_amount: String,
    pub this_month_revenue: String,
    pub last_month_revenue: String,
    pub avg_invoice_value: String,
    /// Percent change against last month, rounded to one decimal.
    pub revenue_growth: f64,
    pub overdue_invoices: i64,
    pub stats: ExtendedStats,
    pub recent_invoices: Vec<InvoiceRow>,
    pub recent_payments: Vec<PaymentRow>,
}

impl OverviewPageData {
    pub fn failed() -> Self {
        Self {
            load_failed: true,
            ..Self::default()
        }
    }

    pub fn new(
        stats: &DashboardStats,
        extended: ExtendedStats,
        invoices: &[Invoice],
        payments: &[Payment],
    ) -> Self {
        Self {
            load_failed: false,
            total_revenue: format_usd(stats.total_revenue),
            outstanding_amount: format_usd(stats.outstanding_amount),
            this_month_revenue: format_usd(stats.this_month_revenue),
            last_month_revenue: format_usd(extended.last_month_revenue),
            avg_invoice_value: format_usd(extended.avg_invoice_value),
            revenue_growth: (extended.revenue_growth * 10.0).round() / 10.0,
            overdue_invoices: stats.overdue_invoices,
            stats: extended,
            recent_invoices: invoices.iter().take(RECENT_ROWS).map(InvoiceRow::from).collect(),
            recent_payments: payments.iter().take(RECENT_ROWS).map(PaymentRow::from).collect(),
        }
    }
}
