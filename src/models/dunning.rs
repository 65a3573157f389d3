//! Wire models for dunning schedules, overdue invoices and templates.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::dunning::{
    DunningSchedule as DomainDunningSchedule, MessageTemplate as DomainMessageTemplate,
    OverdueInvoice as DomainOverdueInvoice, ProcessOutcome as DomainProcessOutcome,
    ScheduleDraft as DomainScheduleDraft,
};
use crate::domain::types::{
    DaysAfterDue, InvoiceId, ReminderChannel, ScheduleId, ScheduleName, TemplateId,
    TypeConstraintError,
};
use crate::models::lenient::{
    de_bool, de_f64, de_i32, de_i64, de_opt_date, de_opt_datetime, de_opt_i32, de_opt_string,
    de_string,
};

#[derive(Debug, Clone, Deserialize)]
/// Schedule row returned by `GET /dunning/schedules`.
pub struct DunningScheduleRecord {
    #[serde(deserialize_with = "de_i32")]
    pub id: i32,
    #[serde(default, deserialize_with = "de_string")]
    pub name: String,
    #[serde(default, deserialize_with = "de_i32")]
    pub days_after_due: i32,
    #[serde(default, deserialize_with = "de_opt_i32")]
    pub email_template_id: Option<i32>,
    #[serde(default, deserialize_with = "de_opt_i32")]
    pub sms_template_id: Option<i32>,
    #[serde(default, deserialize_with = "de_bool")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize)]
/// Body of the create and replace schedule requests.
pub struct ScheduleBody<'a> {
    pub name: &'a str,
    pub days_after_due: i32,
    pub email_template_id: Option<i32>,
    pub sms_template_id: Option<i32>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverdueInvoiceRecord {
    #[serde(deserialize_with = "de_i32")]
    pub id: i32,
    #[serde(default, deserialize_with = "de_string")]
    pub invoice_number: String,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub contact_first_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub contact_last_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "de_f64")]
    pub total: f64,
    #[serde(default, deserialize_with = "de_f64")]
    pub amount_due: f64,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_i32")]
    pub days_overdue: i32,
    #[serde(default, deserialize_with = "de_i32")]
    pub dunning_count: i32,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub last_dunning_sent_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
/// Email or SMS template row; only the lookup fields are kept.
pub struct TemplateRecord {
    #[serde(deserialize_with = "de_i32")]
    pub id: i32,
    #[serde(default, deserialize_with = "de_string")]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ReminderBody {
    pub channel: ReminderChannel,
}

#[derive(Debug, Default, Deserialize)]
/// Result of `POST /dunning/process`.
pub struct ProcessOutcomeRecord {
    #[serde(default, deserialize_with = "de_i64")]
    pub reminders_sent: i64,
}

/// A missing or non-positive template id means no template is attached.
fn template_ref(id: Option<i32>) -> Option<TemplateId> {
    id.and_then(|id| TemplateId::new(id).ok())
}

impl TryFrom<DunningScheduleRecord> for DomainDunningSchedule {
    type Error = TypeConstraintError;

    fn try_from(record: DunningScheduleRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ScheduleId::try_from(record.id)?,
            name: ScheduleName::new(record.name)?,
            days_after_due: DaysAfterDue::try_from(record.days_after_due)?,
            email_template_id: template_ref(record.email_template_id),
            sms_template_id: template_ref(record.sms_template_id),
            is_active: record.is_active,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

impl<'a> From<&'a DomainScheduleDraft> for ScheduleBody<'a> {
    fn from(draft: &'a DomainScheduleDraft) -> Self {
        Self {
            name: draft.name.as_str(),
            days_after_due: draft.days_after_due.get(),
            email_template_id: draft.email_template_id.map(TemplateId::get),
            sms_template_id: draft.sms_template_id.map(TemplateId::get),
            is_active: draft.is_active,
        }
    }
}

impl TryFrom<OverdueInvoiceRecord> for DomainOverdueInvoice {
    type Error = TypeConstraintError;

    fn try_from(record: OverdueInvoiceRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: InvoiceId::try_from(record.id)?,
            invoice_number: record.invoice_number,
            contact_first_name: record.contact_first_name,
            contact_last_name: record.contact_last_name,
            email: record.email,
            phone: record.phone,
            total: record.total,
            amount_due: record.amount_due,
            due_date: record.due_date,
            days_overdue: record.days_overdue,
            dunning_count: record.dunning_count,
            last_dunning_sent_at: record.last_dunning_sent_at,
        })
    }
}

impl TryFrom<TemplateRecord> for DomainMessageTemplate {
    type Error = TypeConstraintError;

    fn try_from(record: TemplateRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TemplateId::try_from(record.id)?,
            name: record.name,
        })
    }
}

impl From<ProcessOutcomeRecord> for DomainProcessOutcome {
    fn from(record: ProcessOutcomeRecord) -> Self {
        Self {
            reminders_sent: u32::try_from(record.reminders_sent.max(0)).unwrap_or(u32::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::envelope::Envelope;

    #[test]
    fn schedule_record_converts_from_php_payload() {
        let record: DunningScheduleRecord = serde_json::from_str(
            r#"{
                "id": "4",
                "name": "Final notice",
                "days_after_due": "30",
                "email_template_id": 12,
                "sms_template_id": null,
                "is_active": "1",
                "created_at": "2026-01-02 03:04:05",
                "updated_at": null
            }"#,
        )
        .unwrap();

        let schedule = DomainDunningSchedule::try_from(record).unwrap();

        assert_eq!(schedule.id.get(), 4);
        assert_eq!(schedule.days_after_due.get(), 30);
        assert_eq!(schedule.email_template_id.map(TemplateId::get), Some(12));
        assert_eq!(schedule.sms_template_id, None);
        assert!(schedule.is_active);
        assert!(schedule.created_at.is_some());
    }

    #[test]
    fn schedule_with_negative_offset_is_rejected() {
        let record: DunningScheduleRecord =
            serde_json::from_str(r#"{"id": 1, "name": "x", "days_after_due": -2}"#).unwrap();

        assert_eq!(
            DomainDunningSchedule::try_from(record),
            Err(TypeConstraintError::NegativeDays)
        );
    }

    #[test]
    fn zero_template_id_means_no_template() {
        let record: DunningScheduleRecord = serde_json::from_str(
            r#"{"id": 1, "name": "Soft", "days_after_due": 3, "email_template_id": 0, "sms_template_id": "-1"}"#,
        )
        .unwrap();

        let schedule = DomainDunningSchedule::try_from(record).unwrap();

        assert_eq!(schedule.email_template_id, None);
        assert_eq!(schedule.sms_template_id, None);
    }

    #[test]
    fn draft_serializes_flat_ids() {
        let draft = DomainScheduleDraft::new(
            ScheduleName::new("Reminder").unwrap(),
            DaysAfterDue::new(7).unwrap(),
            Some(TemplateId::new(2).unwrap()),
            None,
            true,
        );

        let body = serde_json::to_value(ScheduleBody::from(&draft)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "name": "Reminder",
                "days_after_due": 7,
                "email_template_id": 2,
                "sms_template_id": null,
                "is_active": true
            })
        );
    }

    #[test]
    fn missing_reminders_sent_counts_as_zero() {
        let outcome: DomainProcessOutcome =
            serde_json::from_str::<Envelope<ProcessOutcomeRecord>>(r#"{"success": true}"#)
                .unwrap()
                .into_inner()
                .into();
        assert_eq!(outcome.reminders_sent, 0);

        let outcome: DomainProcessOutcome =
            serde_json::from_str::<Envelope<ProcessOutcomeRecord>>(r#"{"data": {"reminders_sent": 3}}"#)
                .unwrap()
                .into_inner()
                .into();
        assert_eq!(outcome.reminders_sent, 3);
    }

    #[test]
    fn reminder_body_uses_lowercase_channel() {
        let body = serde_json::to_string(&ReminderBody {
            channel: ReminderChannel::Sms,
        })
        .unwrap();
        assert_eq!(body, r#"{"channel":"sms"}"#);
    }
}
