//! Dunning schedules and the overdue invoices they act upon.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    DaysAfterDue, InvoiceId, ReminderChannel, ScheduleId, ScheduleName, TemplateId,
};

/// Rule describing when and through which templates a reminder fires.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DunningSchedule {
    pub id: ScheduleId,
    pub name: ScheduleName,
    pub days_after_due: DaysAfterDue,
    pub email_template_id: Option<TemplateId>,
    pub sms_template_id: Option<TemplateId>,
    pub is_active: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Full replacement payload for creating or updating a schedule.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScheduleDraft {
    pub name: ScheduleName,
    pub days_after_due: DaysAfterDue,
    pub email_template_id: Option<TemplateId>,
    pub sms_template_id: Option<TemplateId>,
    pub is_active: bool,
}

impl ScheduleDraft {
    #[must_use]
    pub fn new(
        name: ScheduleName,
        days_after_due: DaysAfterDue,
        email_template_id: Option<TemplateId>,
        sms_template_id: Option<TemplateId>,
        is_active: bool,
    ) -> Self {
        Self {
            name,
            days_after_due,
            email_template_id,
            sms_template_id,
            is_active,
        }
    }
}

impl DunningSchedule {
    /// Builds the full record with the active flag inverted.
    ///
    /// The update endpoint replaces the whole record, so every field of the
    /// cached schedule is resubmitted.
    #[must_use]
    pub fn toggled(&self) -> ScheduleDraft {
        ScheduleDraft {
            name: self.name.clone(),
            days_after_due: self.days_after_due,
            email_template_id: self.email_template_id,
            sms_template_id: self.sms_template_id,
            is_active: !self.is_active,
        }
    }
}

/// Read-only projection joining an invoice, its contact and dunning history.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OverdueInvoice {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub contact_first_name: Option<String>,
    pub contact_last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub total: f64,
    pub amount_due: f64,
    pub due_date: Option<NaiveDate>,
    pub days_overdue: i32,
    pub dunning_count: i32,
    pub last_dunning_sent_at: Option<NaiveDateTime>,
}

impl OverdueInvoice {
    /// Whether the invoice carries the contact detail required by `channel`.
    pub fn accepts(&self, channel: ReminderChannel) -> bool {
        let field = match channel {
            ReminderChannel::Email => &self.email,
            ReminderChannel::Sms => &self.phone,
        };
        field.as_deref().is_some_and(|value| !value.trim().is_empty())
    }

    /// Customer display name, `None` when neither name part is present.
    pub fn customer_name(&self) -> Option<String> {
        let first = self.contact_first_name.as_deref().unwrap_or("");
        let last = self.contact_last_name.as_deref().unwrap_or("");
        let full = format!("{first} {last}").trim().to_string();
        if full.is_empty() { None } else { Some(full) }
    }
}

/// Email or SMS template available for a schedule.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageTemplate {
    pub id: TemplateId,
    pub name: String,
}

/// Outcome of a bulk dunning sweep.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub reminders_sent: u32,
}

/// Placeholders the backend substitutes when rendering reminder templates.
pub const TEMPLATE_VARIABLES: [&str; 9] = [
    "first_name",
    "name",
    "invoice_number",
    "amount_due",
    "total_amount",
    "due_date",
    "days_overdue",
    "currency",
    "payment_url",
];
