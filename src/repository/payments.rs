use async_trait::async_trait;
use reqwest::Method;

use crate::domain::analytics::RevenueAnalytics;
use crate::domain::payments::{DashboardStats, Invoice, Payment};
use crate::domain::settings::PaymentSettings;
use crate::domain::types::HubId;
use crate::models::envelope::Listing;
use crate::models::payments::{
    AnalyticsRecord, DashboardStatsRecord, InvoiceRecord, PaymentRecord, PaymentSettingsBody,
    PaymentSettingsRecord,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{HttpRepository, PaymentsReader, SettingsReader, SettingsWriter};

#[async_trait]
impl PaymentsReader for HttpRepository {
    async fn get_dashboard_stats(&self, hub_id: HubId) -> RepositoryResult<DashboardStats> {
        let record = self
            .get::<DashboardStatsRecord>(hub_id, "payments/dashboard-stats")
            .await?;
        Ok(record.into())
    }

    async fn list_recent_invoices(
        &self,
        hub_id: HubId,
        limit: usize,
    ) -> RepositoryResult<Vec<Invoice>> {
        let records = self
            .get::<Listing<InvoiceRecord>>(hub_id, &format!("payments/invoices?limit={limit}"))
            .await?
            .into_vec();

        records
            .into_iter()
            .map(|record| Invoice::try_from(record).map_err(RepositoryError::from))
            .collect()
    }

    async fn list_recent_payments(
        &self,
        hub_id: HubId,
        limit: usize,
    ) -> RepositoryResult<Vec<Payment>> {
        let records = self
            .get::<Listing<PaymentRecord>>(hub_id, &format!("payments/payments?limit={limit}"))
            .await?
            .into_vec();

        records
            .into_iter()
            .map(|record| Payment::try_from(record).map_err(RepositoryError::from))
            .collect()
    }

    async fn get_revenue_analytics(&self, hub_id: HubId) -> RepositoryResult<RevenueAnalytics> {
        let record = self
            .get::<AnalyticsRecord>(hub_id, "payments/analytics")
            .await?;
        Ok(record.into())
    }
}

#[async_trait]
impl SettingsReader for HttpRepository {
    async fn get_payment_settings(&self, hub_id: HubId) -> RepositoryResult<PaymentSettings> {
        let record = self
            .get::<PaymentSettingsRecord>(hub_id, "payments/settings")
            .await?;
        Ok(record.into())
    }
}

#[async_trait]
impl SettingsWriter for HttpRepository {
    async fn save_payment_settings(
        &self,
        hub_id: HubId,
        settings: &PaymentSettings,
    ) -> RepositoryResult<()> {
        let body = PaymentSettingsBody::from(settings);
        self.send(Method::PUT, hub_id, "payments/settings", Some(&body))
            .await?;
        Ok(())
    }
}
