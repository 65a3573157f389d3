use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::accounting::{AccountingConnection, SyncSetting, SyncStatus};
use crate::domain::analytics::RevenueAnalytics;
use crate::domain::dunning::{
    DunningSchedule, MessageTemplate, OverdueInvoice, ProcessOutcome, ScheduleDraft,
};
use crate::domain::payments::{DashboardStats, Invoice, Payment};
use crate::domain::settings::PaymentSettings;
use crate::domain::types::{HubId, InvoiceId, ReminderChannel, ScheduleId};
use crate::models::config::ServerConfig;
use crate::models::envelope::Envelope;
use crate::repository::errors::{RepositoryError, RepositoryResult};

pub mod accounting;
pub mod cache;
pub mod dunning;
pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod payments;

pub use cache::{CachedRepository, QueryCache, QueryKey};

/// Repository the HTTP handlers share: the backend client behind the query cache.
pub type FinanceRepository = CachedRepository<HttpRepository>;

/// Header carrying the workspace the request acts upon.
pub const WORKSPACE_HEADER: &str = "X-Workspace-Id";

#[async_trait]
pub trait DunningReader {
    async fn list_schedules(&self, hub_id: HubId) -> RepositoryResult<Vec<DunningSchedule>>;
    async fn list_overdue_invoices(&self, hub_id: HubId) -> RepositoryResult<Vec<OverdueInvoice>>;
}

#[async_trait]
pub trait DunningWriter {
    async fn create_schedule(&self, hub_id: HubId, draft: &ScheduleDraft) -> RepositoryResult<()>;
    async fn update_schedule(
        &self,
        hub_id: HubId,
        schedule_id: ScheduleId,
        draft: &ScheduleDraft,
    ) -> RepositoryResult<()>;
    async fn delete_schedule(&self, hub_id: HubId, schedule_id: ScheduleId)
    -> RepositoryResult<()>;
    async fn send_reminder(
        &self,
        hub_id: HubId,
        invoice_id: InvoiceId,
        channel: ReminderChannel,
    ) -> RepositoryResult<()>;
    async fn process_reminders(&self, hub_id: HubId) -> RepositoryResult<ProcessOutcome>;
}

#[async_trait]
pub trait TemplateReader {
    async fn list_email_templates(&self, hub_id: HubId) -> RepositoryResult<Vec<MessageTemplate>>;
    async fn list_sms_templates(&self, hub_id: HubId) -> RepositoryResult<Vec<MessageTemplate>>;
}

#[async_trait]
pub trait PaymentsReader {
    async fn get_dashboard_stats(&self, hub_id: HubId) -> RepositoryResult<DashboardStats>;
    async fn list_recent_invoices(&self, hub_id: HubId, limit: usize)
    -> RepositoryResult<Vec<Invoice>>;
    async fn list_recent_payments(&self, hub_id: HubId, limit: usize)
    -> RepositoryResult<Vec<Payment>>;
    async fn get_revenue_analytics(&self, hub_id: HubId) -> RepositoryResult<RevenueAnalytics>;
}

#[async_trait]
pub trait SettingsReader {
    async fn get_payment_settings(&self, hub_id: HubId) -> RepositoryResult<PaymentSettings>;
}

#[async_trait]
pub trait SettingsWriter {
    async fn save_payment_settings(
        &self,
        hub_id: HubId,
        settings: &PaymentSettings,
    ) -> RepositoryResult<()>;
}

#[async_trait]
pub trait AccountingReader {
    async fn get_accounting_connection(&self, hub_id: HubId)
    -> RepositoryResult<AccountingConnection>;
    async fn get_sync_status(&self, hub_id: HubId) -> RepositoryResult<SyncStatus>;
}

#[async_trait]
pub trait AccountingWriter {
    async fn update_sync_setting(
        &self,
        hub_id: HubId,
        setting: SyncSetting,
        enabled: bool,
    ) -> RepositoryResult<()>;
    async fn sync_all(&self, hub_id: HubId) -> RepositoryResult<()>;
    async fn disconnect_accounting(&self, hub_id: HubId) -> RepositoryResult<()>;
}

/// Repository backed by the finance REST API.
#[derive(Clone)]
pub struct HttpRepository {
    client: Client,
    base_url: String,
    api_token: String,
    accounting_provider: String,
}

impl HttpRepository {
    pub fn new(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        accounting_provider: impl Into<String>,
    ) -> RepositoryResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| RepositoryError::ConnectionError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
            accounting_provider: accounting_provider.into(),
        })
    }

    pub fn from_config(config: &ServerConfig) -> RepositoryResult<Self> {
        Self::new(
            config.api_base_url.as_str(),
            config.api_token.as_str(),
            config.accounting_provider.as_str(),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Path below the configured accounting provider.
    fn provider_path(&self, path: &str) -> String {
        format!("{}/{}", self.accounting_provider, path)
    }

    fn request(&self, method: Method, hub_id: HubId, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(&self.api_token)
            .header(WORKSPACE_HEADER, hub_id.get())
    }

    /// Sends the request and returns the raw body of a successful response.
    async fn execute(&self, request: RequestBuilder) -> RepositoryResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RepositoryError::from_status(status, &body));
        }

        Ok(body)
    }

    async fn get<T: DeserializeOwned>(&self, hub_id: HubId, path: &str) -> RepositoryResult<T> {
        log::debug!("GET {path} for hub {hub_id}");
        let body = self.execute(self.request(Method::GET, hub_id, path)).await?;
        decode(&body)
    }

    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        hub_id: HubId,
        path: &str,
        body: Option<&B>,
    ) -> RepositoryResult<String> {
        log::debug!("{method} {path} for hub {hub_id}");
        let mut request = self.request(method, hub_id, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request).await
    }
}

/// Decodes a wrapped or bare body; an empty body reads as JSON `null`.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> RepositoryResult<T> {
    let body = if body.trim().is_empty() { "null" } else { body };
    Ok(serde_json::from_str::<Envelope<T>>(body)?.into_inner())
}

/// Body used for requests that carry no payload.
pub(crate) const NO_BODY: Option<&()> = None;
