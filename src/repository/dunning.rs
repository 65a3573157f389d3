use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::Method;

use crate::domain::dunning::{
    DunningSchedule, MessageTemplate, OverdueInvoice, ProcessOutcome, ScheduleDraft,
};
use crate::domain::types::{HubId, InvoiceId, ReminderChannel, ScheduleId};
use crate::models::dunning::{
    DunningScheduleRecord, OverdueInvoiceRecord, ProcessOutcomeRecord, ReminderBody,
    ScheduleBody, TemplateRecord,
};
use crate::models::envelope::{Envelope, Listing};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DunningReader, DunningWriter, HttpRepository, NO_BODY, TemplateReader,
};

/// Drops repeated ids, keeping the first occurrence.
pub(crate) fn dedup_schedules(schedules: Vec<DunningSchedule>) -> Vec<DunningSchedule> {
    let mut seen = HashSet::new();
    schedules
        .into_iter()
        .filter(|schedule| {
            let fresh = seen.insert(schedule.id);
            if !fresh {
                log::warn!("Dropping duplicate dunning schedule {}", schedule.id);
            }
            fresh
        })
        .collect()
}

/// Converts backend rows, skipping the ones that fail validation.
pub(crate) fn convert_schedules(records: Vec<DunningScheduleRecord>) -> Vec<DunningSchedule> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id;
            DunningSchedule::try_from(record)
                .inspect_err(|err| log::warn!("Skipping invalid dunning schedule {id}: {err}"))
                .ok()
        })
        .collect()
}

#[async_trait]
impl DunningReader for HttpRepository {
    async fn list_schedules(&self, hub_id: HubId) -> RepositoryResult<Vec<DunningSchedule>> {
        let records = self
            .get::<Listing<DunningScheduleRecord>>(hub_id, "dunning/schedules")
            .await?
            .into_vec();

        Ok(dedup_schedules(convert_schedules(records)))
    }

    async fn list_overdue_invoices(&self, hub_id: HubId) -> RepositoryResult<Vec<OverdueInvoice>> {
        let records = self
            .get::<Listing<OverdueInvoiceRecord>>(hub_id, "dunning/overdue-invoices")
            .await?
            .into_vec();

        records
            .into_iter()
            .map(|record| OverdueInvoice::try_from(record).map_err(RepositoryError::from))
            .collect()
    }
}

#[async_trait]
impl DunningWriter for HttpRepository {
    async fn create_schedule(&self, hub_id: HubId, draft: &ScheduleDraft) -> RepositoryResult<()> {
        let body = ScheduleBody::from(draft);
        self.send(Method::POST, hub_id, "dunning/schedules", Some(&body))
            .await?;
        Ok(())
    }

    async fn update_schedule(
        &self,
        hub_id: HubId,
        schedule_id: ScheduleId,
        draft: &ScheduleDraft,
    ) -> RepositoryResult<()> {
        let body = ScheduleBody::from(draft);
        self.send(
            Method::PUT,
            hub_id,
            &format!("dunning/schedules/{schedule_id}"),
            Some(&body),
        )
        .await?;
        Ok(())
    }

    async fn delete_schedule(
        &self,
        hub_id: HubId,
        schedule_id: ScheduleId,
    ) -> RepositoryResult<()> {
        self.send(
            Method::DELETE,
            hub_id,
            &format!("dunning/schedules/{schedule_id}"),
            NO_BODY,
        )
        .await?;
        Ok(())
    }

    async fn send_reminder(
        &self,
        hub_id: HubId,
        invoice_id: InvoiceId,
        channel: ReminderChannel,
    ) -> RepositoryResult<()> {
        let body = ReminderBody { channel };
        self.send(
            Method::POST,
            hub_id,
            &format!("dunning/send/{invoice_id}"),
            Some(&body),
        )
        .await?;
        Ok(())
    }

    async fn process_reminders(&self, hub_id: HubId) -> RepositoryResult<ProcessOutcome> {
        let body = self
            .send(Method::POST, hub_id, "dunning/process", NO_BODY)
            .await?;

        if body.trim().is_empty() {
            return Ok(ProcessOutcome::default());
        }

        let record = serde_json::from_str::<Envelope<ProcessOutcomeRecord>>(&body)?.into_inner();
        Ok(record.into())
    }
}

#[async_trait]
impl TemplateReader for HttpRepository {
    async fn list_email_templates(&self, hub_id: HubId) -> RepositoryResult<Vec<MessageTemplate>> {
        let records = self
            .get::<Listing<TemplateRecord>>(hub_id, "templates")
            .await?
            .into_vec();

        records
            .into_iter()
            .map(|record| MessageTemplate::try_from(record).map_err(RepositoryError::from))
            .collect()
    }

    async fn list_sms_templates(&self, hub_id: HubId) -> RepositoryResult<Vec<MessageTemplate>> {
        let records = self
            .get::<Listing<TemplateRecord>>(hub_id, "sms-templates")
            .await?
            .into_vec();

        records
            .into_iter()
            .map(|record| MessageTemplate::try_from(record).map_err(RepositoryError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{DaysAfterDue, ScheduleName};

    fn schedule(id: i32, name: &str) -> DunningSchedule {
        DunningSchedule {
            id: ScheduleId::new(id).unwrap(),
            name: ScheduleName::new(name).unwrap(),
            days_after_due: DaysAfterDue::new(1).unwrap(),
            email_template_id: None,
            sms_template_id: None,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn duplicate_schedule_ids_keep_first_row() {
        let schedules = vec![schedule(1, "First"), schedule(2, "Second"), schedule(1, "Copy")];

        let unique = dedup_schedules(schedules);

        let names: Vec<_> = unique.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn invalid_rows_are_skipped_and_the_rest_kept() {
        let records = serde_json::from_str::<Envelope<Listing<DunningScheduleRecord>>>(
            r#"{"data": [
                {"id": 1, "name": "Soft", "days_after_due": 3, "email_template_id": 0},
                {"id": 2, "name": "   ", "days_after_due": 7},
                {"id": 3, "name": "Late", "days_after_due": -5},
                {"id": 4, "name": "Final", "days_after_due": 30, "sms_template_id": 9}
            ]}"#,
        )
        .unwrap()
        .into_inner()
        .into_vec();

        let schedules = convert_schedules(records);

        let ids: Vec<_> = schedules.iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(schedules[0].email_template_id, None);
        assert_eq!(schedules[1].sms_template_id.map(|id| id.get()), Some(9));
    }
}
