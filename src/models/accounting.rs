//! Wire models for the accounting provider endpoints.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::domain::accounting::{
    AccountingConnection as DomainAccountingConnection, SyncRecord, SyncStat, SyncStatus,
};
use crate::models::lenient::{de_bool, de_i64, de_opt_datetime, de_opt_string, de_string};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountingConnectionRecord {
    #[serde(default, deserialize_with = "de_bool")]
    pub connected: bool,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub last_sync_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "de_bool")]
    pub sync_enabled: bool,
    #[serde(default, deserialize_with = "de_bool")]
    pub auto_sync_invoices: bool,
    #[serde(default, deserialize_with = "de_bool")]
    pub auto_sync_payments: bool,
    #[serde(default, deserialize_with = "de_bool")]
    pub auto_sync_customers: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncCountsRecord {
    #[serde(default, deserialize_with = "de_i64")]
    pub synced: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub failed: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub pending: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncStatRecord {
    #[serde(default, alias = "entity_type", deserialize_with = "de_string")]
    pub entity: String,
    #[serde(flatten)]
    pub counts: SyncCountsRecord,
}

/// Stats arrive either as a list of rows or keyed by entity name.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SyncStatsRecord {
    Rows(Vec<SyncStatRecord>),
    Keyed(BTreeMap<String, SyncCountsRecord>),
}

impl Default for SyncStatsRecord {
    fn default() -> Self {
        SyncStatsRecord::Rows(Vec::new())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncHistoryRecord {
    #[serde(default, deserialize_with = "de_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "de_string")]
    pub entity_type: String,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub entity_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub direction: Option<String>,
    #[serde(default, deserialize_with = "de_string")]
    pub status: String,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub synced_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Deserialize)]
/// Body of `GET /{provider}/sync-status`.
pub struct SyncStatusRecord {
    #[serde(default)]
    pub stats: SyncStatsRecord,
    #[serde(default, alias = "history")]
    pub recent_syncs: Vec<SyncHistoryRecord>,
}

impl From<AccountingConnectionRecord> for DomainAccountingConnection {
    fn from(record: AccountingConnectionRecord) -> Self {
        Self {
            connected: record.connected,
            company_name: record.company_name,
            last_sync_at: record.last_sync_at,
            sync_enabled: record.sync_enabled,
            auto_sync_invoices: record.auto_sync_invoices,
            auto_sync_payments: record.auto_sync_payments,
            auto_sync_customers: record.auto_sync_customers,
        }
    }
}

impl From<SyncHistoryRecord> for SyncRecord {
    fn from(record: SyncHistoryRecord) -> Self {
        Self {
            id: record.id,
            entity_type: record.entity_type,
            entity_id: record.entity_id,
            direction: record.direction,
            status: record.status,
            error_message: record.error_message,
            synced_at: record.synced_at,
        }
    }
}

impl From<SyncStatusRecord> for SyncStatus {
    fn from(record: SyncStatusRecord) -> Self {
        let stats = match record.stats {
            SyncStatsRecord::Rows(rows) => rows
                .into_iter()
                .map(|row| (row.entity, row.counts))
                .collect::<Vec<_>>(),
            SyncStatsRecord::Keyed(map) => map.into_iter().collect(),
        }
        .into_iter()
        .map(|(entity, counts)| SyncStat {
            entity,
            synced: counts.synced,
            failed: counts.failed,
            pending: counts.pending,
        })
        .collect();

        Self {
            stats,
            history: record.recent_syncs.into_iter().map(SyncRecord::from).collect(),
        }
    }
}
