//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::accounting::{AccountingConnection, SyncSetting, SyncStatus};
use crate::domain::analytics::RevenueAnalytics;
use crate::domain::dunning::{
    DunningSchedule, MessageTemplate, OverdueInvoice, ProcessOutcome, ScheduleDraft,
};
use crate::domain::payments::{DashboardStats, Invoice, Payment};
use crate::domain::settings::PaymentSettings;
use crate::domain::types::{HubId, InvoiceId, ReminderChannel, ScheduleId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AccountingReader, AccountingWriter, DunningReader, DunningWriter, PaymentsReader,
    SettingsReader, SettingsWriter, TemplateReader,
};

mock! {
    pub Repository {}

    #[async_trait]
    impl DunningReader for Repository {
        async fn list_schedules(&self, hub_id: HubId) -> RepositoryResult<Vec<DunningSchedule>>;
        async fn list_overdue_invoices(&self, hub_id: HubId) -> RepositoryResult<Vec<OverdueInvoice>>;
    }

    #[async_trait]
    impl DunningWriter for Repository {
        async fn create_schedule(&self, hub_id: HubId, draft: &ScheduleDraft) -> RepositoryResult<()>;
        async fn update_schedule(
            &self,
            hub_id: HubId,
            schedule_id: ScheduleId,
            draft: &ScheduleDraft,
        ) -> RepositoryResult<()>;
        async fn delete_schedule(&self, hub_id: HubId, schedule_id: ScheduleId) -> RepositoryResult<()>;
        async fn send_reminder(
            &self,
            hub_id: HubId,
            invoice_id: InvoiceId,
            channel: ReminderChannel,
        ) -> RepositoryResult<()>;
        async fn process_reminders(&self, hub_id: HubId) -> RepositoryResult<ProcessOutcome>;
    }

    #[async_trait]
    impl TemplateReader for Repository {
        async fn list_email_templates(&self, hub_id: HubId) -> RepositoryResult<Vec<MessageTemplate>>;
        async fn list_sms_templates(&self, hub_id: HubId) -> RepositoryResult<Vec<MessageTemplate>>;
    }

    #[async_trait]
    impl PaymentsReader for Repository {
        async fn get_dashboard_stats(&self, hub_id: HubId) -> RepositoryResult<DashboardStats>;
        async fn list_recent_invoices(&self, hub_id: HubId, limit: usize) -> RepositoryResult<Vec<Invoice>>;
        async fn list_recent_payments(&self, hub_id: HubId, limit: usize) -> RepositoryResult<Vec<Payment>>;
        async fn get_revenue_analytics(&self, hub_id: HubId) -> RepositoryResult<RevenueAnalytics>;
    }

    #[async_trait]
    impl SettingsReader for Repository {
        async fn get_payment_settings(&self, hub_id: HubId) -> RepositoryResult<PaymentSettings>;
    }

    #[async_trait]
    impl SettingsWriter for Repository {
        async fn save_payment_settings(
            &self,
            hub_id: HubId,
            settings: &PaymentSettings,
        ) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl AccountingReader for Repository {
        async fn get_accounting_connection(&self, hub_id: HubId) -> RepositoryResult<AccountingConnection>;
        async fn get_sync_status(&self, hub_id: HubId) -> RepositoryResult<SyncStatus>;
    }

    #[async_trait]
    impl AccountingWriter for Repository {
        async fn update_sync_setting(
            &self,
            hub_id: HubId,
            setting: SyncSetting,
            enabled: bool,
        ) -> RepositoryResult<()>;
        async fn sync_all(&self, hub_id: HubId) -> RepositoryResult<()>;
        async fn disconnect_accounting(&self, hub_id: HubId) -> RepositoryResult<()>;
    }
}
