//! Accounting-system connection and synchronisation status.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Connection state of the hub's accounting integration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountingConnection {
    pub connected: bool,
    pub company_name: Option<String>,
    pub last_sync_at: Option<NaiveDateTime>,
    /// Master switch gating every automatic sync.
    pub sync_enabled: bool,
    pub auto_sync_invoices: bool,
    pub auto_sync_payments: bool,
    pub auto_sync_customers: bool,
}

impl AccountingConnection {
    /// Current value of a single sync setting.
    pub fn setting(&self, setting: SyncSetting) -> bool {
        match setting {
            SyncSetting::SyncEnabled => self.sync_enabled,
            SyncSetting::AutoSyncInvoices => self.auto_sync_invoices,
            SyncSetting::AutoSyncPayments => self.auto_sync_payments,
            SyncSetting::AutoSyncCustomers => self.auto_sync_customers,
        }
    }

    /// Whether `setting` may be changed in the current state.
    pub fn can_toggle(&self, setting: SyncSetting) -> bool {
        match setting {
            SyncSetting::SyncEnabled => self.connected,
            _ => self.connected && self.sync_enabled,
        }
    }

    pub fn can_sync(&self) -> bool {
        self.connected
    }
}

/// Boolean settings of the accounting integration that can be toggled.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SyncSetting {
    SyncEnabled,
    AutoSyncInvoices,
    AutoSyncPayments,
    AutoSyncCustomers,
}

impl SyncSetting {
    pub const ALL: [SyncSetting; 4] = [
        SyncSetting::SyncEnabled,
        SyncSetting::AutoSyncInvoices,
        SyncSetting::AutoSyncPayments,
        SyncSetting::AutoSyncCustomers,
    ];

    /// Field name used by the backend settings endpoint.
    pub const fn as_str(self) -> &'static str {
        match self {
            SyncSetting::SyncEnabled => "sync_enabled",
            SyncSetting::AutoSyncInvoices => "auto_sync_invoices",
            SyncSetting::AutoSyncPayments => "auto_sync_payments",
            SyncSetting::AutoSyncCustomers => "auto_sync_customers",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SyncSetting::SyncEnabled => "Enable sync",
            SyncSetting::AutoSyncInvoices => "Auto-sync invoices",
            SyncSetting::AutoSyncPayments => "Auto-sync payments",
            SyncSetting::AutoSyncCustomers => "Auto-sync customers",
        }
    }
}

impl Display for SyncSetting {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SyncSetting {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SyncSetting::ALL
            .into_iter()
            .find(|setting| setting.as_str() == s.trim())
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("unknown sync setting `{s}`")))
    }
}

/// Aggregated sync counters for one entity type.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncStat {
    pub entity: String,
    pub synced: i64,
    pub failed: i64,
    pub pending: i64,
}

/// Single entry of the sync history.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncRecord {
    pub id: i64,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub direction: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
    pub synced_at: Option<NaiveDateTime>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncStatus {
    pub stats: Vec<SyncStat>,
    pub history: Vec<SyncRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected(sync_enabled: bool) -> AccountingConnection {
        AccountingConnection {
            connected: true,
            sync_enabled,
            ..AccountingConnection::default()
        }
    }

    #[test]
    fn disconnected_state_locks_every_control() {
        let connection = AccountingConnection::default();
        for setting in SyncSetting::ALL {
            assert!(!connection.can_toggle(setting));
        }
        assert!(!connection.can_sync());
    }

    #[test]
    fn master_switch_gates_auto_sync_toggles() {
        let paused = connected(false);
        assert!(paused.can_toggle(SyncSetting::SyncEnabled));
        assert!(!paused.can_toggle(SyncSetting::AutoSyncInvoices));
        assert!(paused.can_sync());

        let running = connected(true);
        assert!(running.can_toggle(SyncSetting::AutoSyncCustomers));
    }

    #[test]
    fn setting_names_round_trip() {
        for setting in SyncSetting::ALL {
            assert_eq!(setting.as_str().parse::<SyncSetting>(), Ok(setting));
        }
        assert!("auto_sync_everything".parse::<SyncSetting>().is_err());
    }
}
