//! Services behind the dunning page: schedule CRUD and reminder dispatch.

use futures_util::future::join4;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::ensure_role;

use crate::domain::dunning::{DunningSchedule, MessageTemplate, ProcessOutcome};
use crate::domain::types::{HubId, InvoiceId, ReminderChannel, ScheduleId};
use crate::dto::dunning::{
    DunningPageData, OverdueInvoiceRow, ScheduleModalData, ScheduleRow, template_variables,
};
use crate::forms::dunning::{
    ConfirmForm, ReminderForm, ReminderPayload, ScheduleForm, SchedulePayload,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DunningReader, DunningWriter, TemplateReader};
use crate::services::{ServiceError, ServiceResult};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Logs a failed secondary lookup and substitutes an empty list.
fn or_empty<T>(result: RepositoryResult<Vec<T>>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|err| {
        log::error!("Failed to load {what}: {err}");
        Vec::new()
    })
}

/// Loads schedules, overdue invoices and templates for the dunning page.
pub async fn load_dunning_page<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<DunningPageData>
where
    R: DunningReader + TemplateReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;

    let (schedules, overdue, email_templates, sms_templates) = join4(
        repo.list_schedules(hub_id),
        repo.list_overdue_invoices(hub_id),
        repo.list_email_templates(hub_id),
        repo.list_sms_templates(hub_id),
    )
    .await;

    let email_templates = or_empty(email_templates, "email templates");
    let sms_templates = or_empty(sms_templates, "SMS templates");
    let overdue = or_empty(overdue, "overdue invoices");

    let (schedules, schedules_failed) = match schedules {
        Ok(schedules) => (schedules, false),
        Err(err) => {
            log::error!("Failed to load dunning schedules: {err}");
            (Vec::new(), true)
        }
    };

    Ok(DunningPageData {
        schedules: schedules
            .iter()
            .map(|schedule| ScheduleRow::new(schedule, &email_templates, &sms_templates))
            .collect(),
        schedules_failed,
        overdue_invoices: overdue.iter().map(OverdueInvoiceRow::from).collect(),
        email_templates,
        sms_templates,
        template_variables: template_variables(),
    })
}

async fn find_schedule<R>(repo: &R, hub_id: HubId, schedule_id: i32) -> ServiceResult<DunningSchedule>
where
    R: DunningReader + ?Sized,
{
    let schedule_id = ScheduleId::new(schedule_id)?;

    repo.list_schedules(hub_id)
        .await?
        .into_iter()
        .find(|schedule| schedule.id == schedule_id)
        .ok_or(ServiceError::NotFound)
}

/// Loads the schedule and template lookups for the edit dialog.
pub async fn load_schedule_modal<R>(
    repo: &R,
    user: &AuthenticatedUser,
    schedule_id: i32,
) -> ServiceResult<ScheduleModalData>
where
    R: DunningReader + TemplateReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;

    let schedule = find_schedule(repo, hub_id, schedule_id).await?;

    let email_templates: Vec<MessageTemplate> =
        or_empty(repo.list_email_templates(hub_id).await, "email templates");
    let sms_templates: Vec<MessageTemplate> =
        or_empty(repo.list_sms_templates(hub_id).await, "SMS templates");

    Ok(ScheduleModalData {
        schedule,
        email_templates,
        sms_templates,
        template_variables: template_variables(),
    })
}

/// Validates the form and creates a new schedule.
pub async fn create_schedule<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ScheduleForm,
) -> ServiceResult<()>
where
    R: DunningWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let draft = SchedulePayload::try_from(form)?.into_domain();

    let hub_id = HubId::new(user.hub_id)?;

    repo.create_schedule(hub_id, &draft).await?;

    Ok(())
}

/// Validates the form and replaces the stored schedule.
pub async fn update_schedule<R>(
    repo: &R,
    user: &AuthenticatedUser,
    schedule_id: i32,
    form: ScheduleForm,
) -> ServiceResult<()>
where
    R: DunningWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let draft = SchedulePayload::try_from(form)?.into_domain();

    let hub_id = HubId::new(user.hub_id)?;
    let schedule_id = ScheduleId::new(schedule_id)?;

    repo.update_schedule(hub_id, schedule_id, &draft).await?;

    Ok(())
}

/// Flips `is_active` by resubmitting the cached record.
///
/// Returns the new active state.
pub async fn toggle_schedule<R>(
    repo: &R,
    user: &AuthenticatedUser,
    schedule_id: i32,
) -> ServiceResult<bool>
where
    R: DunningReader + DunningWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;

    let schedule = find_schedule(repo, hub_id, schedule_id).await?;
    let draft = schedule.toggled();

    repo.update_schedule(hub_id, schedule.id, &draft).await?;

    Ok(draft.is_active)
}

/// Deletes a schedule once the form carries the confirmation flag.
pub async fn delete_schedule<R>(
    repo: &R,
    user: &AuthenticatedUser,
    schedule_id: i32,
    form: ConfirmForm,
) -> ServiceResult<()>
where
    R: DunningWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    form.require()?;

    let hub_id = HubId::new(user.hub_id)?;
    let schedule_id = ScheduleId::new(schedule_id)?;

    repo.delete_schedule(hub_id, schedule_id).await?;

    Ok(())
}

/// Sends one reminder for an overdue invoice through the chosen channel.
pub async fn send_reminder<R>(
    repo: &R,
    user: &AuthenticatedUser,
    invoice_id: i32,
    form: ReminderForm,
) -> ServiceResult<ReminderChannel>
where
    R: DunningWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let ReminderPayload { channel } = ReminderPayload::try_from(form)?;

    let hub_id = HubId::new(user.hub_id)?;
    let invoice_id = InvoiceId::new(invoice_id)?;

    repo.send_reminder(hub_id, invoice_id, channel).await?;

    Ok(channel)
}

/// Runs the bulk dunning sweep once the form carries the confirmation flag.
pub async fn process_reminders<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ConfirmForm,
) -> ServiceResult<ProcessOutcome>
where
    R: DunningWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    form.require()?;

    let hub_id = HubId::new(user.hub_id)?;

    let outcome = repo.process_reminders(hub_id).await?;

    Ok(outcome)
}

pub fn reminders_sent_message(outcome: ProcessOutcome) -> String {
    match outcome.reminders_sent {
        1 => "Sent 1 reminder.".to_string(),
        n => format!("Sent {n} reminders."),
    }
}

pub fn reminder_sent_message(channel: ReminderChannel) -> String {
    format!("{} reminder sent", channel.label())
}
