//! DTOs used on the dunning page.

use serde::Serialize;

use crate::domain::dunning::{DunningSchedule, MessageTemplate, OverdueInvoice, TEMPLATE_VARIABLES};
use crate::domain::types::{ReminderChannel, TemplateId};
use crate::dto::{format_date, format_short_datetime, format_usd};

/// Schedule row with resolved template names.
#[derive(Debug, Serialize)]
pub struct ScheduleRow {
    pub id: i32,
    pub name: String,
    pub days_after_due: i32,
    pub email_template: Option<String>,
    pub sms_template: Option<String>,
    pub is_active: bool,
}

impl ScheduleRow {
    pub fn new(
        schedule: &DunningSchedule,
        email_templates: &[MessageTemplate],
        sms_templates: &[MessageTemplate],
    ) -> Self {
        Self {
            id: schedule.id.get(),
            name: schedule.name.to_string(),
            days_after_due: schedule.days_after_due.get(),
            email_template: template_name(email_templates, schedule.email_template_id),
            sms_template: template_name(sms_templates, schedule.sms_template_id),
            is_active: schedule.is_active,
        }
    }
}

/// Name of the referenced template; unknown ids show as `#<id>`.
fn template_name(templates: &[MessageTemplate], id: Option<TemplateId>) -> Option<String> {
    let id = id?;
    Some(
        templates
            .iter()
            .find(|template| template.id == id)
            .map(|template| template.name.clone())
            .unwrap_or_else(|| format!("#{id}")),
    )
}

/// Overdue invoice row; the disabled flags drive the reminder buttons.
#[derive(Debug, Serialize)]
pub struct OverdueInvoiceRow {
    pub id: i32,
    pub invoice_number: String,
    pub customer: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub amount_due: String,
    pub total: String,
    pub due_date: String,
    pub overdue_label: String,
    pub dunning_count: i32,
    pub last_reminder: String,
    pub email_disabled: bool,
    pub sms_disabled: bool,
}

impl From<&OverdueInvoice> for OverdueInvoiceRow {
    fn from(invoice: &OverdueInvoice) -> Self {
        Self {
            id: invoice.id.get(),
            invoice_number: invoice.invoice_number.clone(),
            customer: invoice.customer_name().unwrap_or_else(|| "-".to_string()),
            email: invoice.email.clone(),
            phone: invoice.phone.clone(),
            amount_due: format_usd(invoice.amount_due),
            total: format_usd(invoice.total),
            due_date: format_date(invoice.due_date),
            overdue_label: format!("{}d overdue", invoice.days_overdue),
            dunning_count: invoice.dunning_count,
            last_reminder: format_short_datetime(invoice.last_dunning_sent_at),
            email_disabled: !invoice.accepts(ReminderChannel::Email),
            sms_disabled: !invoice.accepts(ReminderChannel::Sms),
        }
    }
}

/// Data required to render the dunning page.
#[derive(Debug, Serialize)]
pub struct DunningPageData {
    pub schedules: Vec<ScheduleRow>,
    /// Set when the schedule list could not be loaded.
    pub schedules_failed: bool,
    pub overdue_invoices: Vec<OverdueInvoiceRow>,
    pub email_templates: Vec<MessageTemplate>,
    pub sms_templates: Vec<MessageTemplate>,
    pub template_variables: Vec<&'static str>,
}

/// Data displayed inside the schedule edit dialog.
#[derive(Debug, Serialize)]
pub struct ScheduleModalData {
    pub schedule: DunningSchedule,
    pub email_templates: Vec<MessageTemplate>,
    pub sms_templates: Vec<MessageTemplate>,
    pub template_variables: Vec<&'static str>,
}

pub fn template_variables() -> Vec<&'static str> {
    TEMPLATE_VARIABLES.to_vec()
}
