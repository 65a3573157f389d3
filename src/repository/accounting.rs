use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Map, Value};

use crate::domain::accounting::{AccountingConnection, SyncSetting, SyncStatus};
use crate::domain::types::HubId;
use crate::models::accounting::{AccountingConnectionRecord, SyncStatusRecord};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{AccountingReader, AccountingWriter, HttpRepository, NO_BODY};

/// Partial settings body carrying only the toggled field.
pub(crate) fn sync_setting_body(setting: SyncSetting, enabled: bool) -> Value {
    let mut body = Map::new();
    body.insert(setting.as_str().to_string(), Value::Bool(enabled));
    Value::Object(body)
}

#[async_trait]
impl AccountingReader for HttpRepository {
    async fn get_accounting_connection(
        &self,
        hub_id: HubId,
    ) -> RepositoryResult<AccountingConnection> {
        let path = self.provider_path("connection");
        match self.get::<AccountingConnectionRecord>(hub_id, &path).await {
            Ok(record) => Ok(record.into()),
            // No connection record yet.
            Err(RepositoryError::NotFound) => Ok(AccountingConnection::default()),
            Err(err) => Err(err),
        }
    }

    async fn get_sync_status(&self, hub_id: HubId) -> RepositoryResult<SyncStatus> {
        let path = self.provider_path("sync-status");
        match self.get::<SyncStatusRecord>(hub_id, &path).await {
            Ok(record) => Ok(record.into()),
            Err(RepositoryError::NotFound) => Ok(SyncStatus::default()),
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl AccountingWriter for HttpRepository {
    async fn update_sync_setting(
        &self,
        hub_id: HubId,
        setting: SyncSetting,
        enabled: bool,
    ) -> RepositoryResult<()> {
        let body = sync_setting_body(setting, enabled);
        self.send(Method::PUT, hub_id, &self.provider_path("settings"), Some(&body))
            .await?;
        Ok(())
    }

    async fn sync_all(&self, hub_id: HubId) -> RepositoryResult<()> {
        self.send(Method::POST, hub_id, &self.provider_path("sync-all"), NO_BODY)
            .await?;
        Ok(())
    }

    async fn disconnect_accounting(&self, hub_id: HubId) -> RepositoryResult<()> {
        self.send(Method::POST, hub_id, &self.provider_path("disconnect"), NO_BODY)
            .await?;
        Ok(())
    }
}
