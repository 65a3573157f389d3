//! Forms for dunning schedules and reminders.

use serde::Deserialize;
use validator::Validate;

use crate::domain::dunning::ScheduleDraft;
use crate::domain::types::{DaysAfterDue, ReminderChannel, ScheduleName, TemplateId};
use crate::forms::{FormError, checkbox};

#[derive(Debug, Default, Deserialize, Validate)]
/// Form data for creating or editing a dunning schedule.
pub struct ScheduleForm {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub name: String,
    /// Raw input; an absent or blank value is rejected.
    #[serde(default)]
    pub days_after_due: Option<String>,
    #[serde(default)]
    pub email_template_id: Option<String>,
    #[serde(default)]
    pub sms_template_id: Option<String>,
    #[serde(default)]
    pub is_active: Option<String>,
}

/// Validated schedule data ready to be sent to the backend.
pub struct SchedulePayload {
    pub name: ScheduleName,
    pub days_after_due: DaysAfterDue,
    pub email_template_id: Option<TemplateId>,
    pub sms_template_id: Option<TemplateId>,
    pub is_active: bool,
}

fn parse_template_id(raw: Option<&str>) -> Result<Option<TemplateId>, FormError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i32>()
        .ok()
        .and_then(|id| TemplateId::new(id).ok())
        .map(Some)
        .ok_or(FormError::InvalidTemplateId)
}

fn parse_days_after_due(raw: Option<&str>) -> Result<DaysAfterDue, FormError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    raw.parse::<i32>()
        .ok()
        .and_then(|days| DaysAfterDue::new(days).ok())
        .ok_or(FormError::InvalidDaysAfterDue)
}

impl TryFrom<ScheduleForm> for SchedulePayload {
    type Error = FormError;

    fn try_from(form: ScheduleForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let name = ScheduleName::new(form.name).map_err(|_| FormError::InvalidName)?;
        let days_after_due = parse_days_after_due(form.days_after_due.as_deref())?;
        let email_template_id = parse_template_id(form.email_template_id.as_deref())?;
        let sms_template_id = parse_template_id(form.sms_template_id.as_deref())?;

        Ok(Self {
            name,
            days_after_due,
            email_template_id,
            sms_template_id,
            is_active: checkbox(form.is_active.as_deref()),
        })
    }
}

impl SchedulePayload {
    pub fn into_domain(self) -> ScheduleDraft {
        ScheduleDraft::new(
            self.name,
            self.days_after_due,
            self.email_template_id,
            self.sms_template_id,
            self.is_active,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
/// Form carrying the explicit confirmation of a destructive action.
pub struct ConfirmForm {
    #[serde(default)]
    pub confirmed: Option<String>,
}

impl ConfirmForm {
    /// Fails unless the confirmation flag was submitted.
    pub fn require(&self) -> Result<(), FormError> {
        if checkbox(self.confirmed.as_deref()) {
            Ok(())
        } else {
            Err(FormError::NotConfirmed)
        }
    }
}

#[derive(Debug, Deserialize)]
/// Form data for sending a single reminder.
pub struct ReminderForm {
    pub channel: String,
}

pub struct ReminderPayload {
    pub channel: ReminderChannel,
}

impl TryFrom<ReminderForm> for ReminderPayload {
    type Error = FormError;

    fn try_from(form: ReminderForm) -> Result<Self, Self::Error> {
        let channel = form
            .channel
            .parse::<ReminderChannel>()
            .map_err(|_| FormError::InvalidChannel)?;
        Ok(Self { channel })
    }
}
