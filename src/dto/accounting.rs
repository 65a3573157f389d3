//! DTOs used on the accounting sync panel.

use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::Serialize;

use crate::domain::accounting::{AccountingConnection, SyncRecord, SyncSetting, SyncStat};
use crate::dto::{format_datetime, status_class, status_label};

/// One switch of the sync settings card.
#[derive(Debug, PartialEq, Serialize)]
pub struct SyncToggleRow {
    pub setting: &'static str,
    pub label: &'static str,
    pub enabled: bool,
    pub disabled: bool,
}

#[derive(Debug, Serialize)]
pub struct SyncHistoryRow {
    pub entity_type: String,
    pub entity_id: String,
    pub direction: String,
    pub status: String,
    pub status_class: &'static str,
    pub error_message: Option<String>,
    pub synced_at: String,
}

impl From<SyncRecord> for SyncHistoryRow {
    fn from(record: SyncRecord) -> Self {
        Self {
            entity_type: status_label(&record.entity_type),
            entity_id: record.entity_id.unwrap_or_else(|| "-".to_string()),
            direction: record
                .direction
                .as_deref()
                .map(status_label)
                .unwrap_or_else(|| "-".to_string()),
            status_class: status_class(&record.status),
            status: status_label(&record.status),
            error_message: record.error_message,
            synced_at: format_datetime(record.synced_at),
        }
    }
}

/// The backend returns the whole history; one page of it is cut out here.
/// Out-of-range pages are clamped to the nearest valid one.
fn history_page(records: Vec<SyncRecord>, page: usize) -> Paginated<SyncHistoryRow> {
    let total_pages = records.len().div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let page = page.clamp(1, total_pages.max(1));

    let rows = records
        .into_iter()
        .skip((page - 1) * DEFAULT_ITEMS_PER_PAGE)
        .take(DEFAULT_ITEMS_PER_PAGE)
        .map(SyncHistoryRow::from)
        .collect();

    Paginated::new(rows, page, total_pages)
}

/// Data required to render the accounting page.
#[derive(Serialize)]
pub struct AccountingPageData {
    pub provider: String,
    pub connection: AccountingConnection,
    pub last_sync: String,
    pub toggles: Vec<SyncToggleRow>,
    pub sync_all_disabled: bool,
    pub stats: Vec<SyncStat>,
    pub history: Paginated<SyncHistoryRow>,
    /// Number of history rows across all pages.
    pub history_total: usize,
    pub load_failed: bool,
}

impl AccountingPageData {
    pub fn new(
        provider: &str,
        connection: AccountingConnection,
        stats: Vec<SyncStat>,
        history: Vec<SyncRecord>,
        page: usize,
        load_failed: bool,
    ) -> Self {
        let toggles = SyncSetting::ALL
            .into_iter()
            .map(|setting| SyncToggleRow {
                setting: setting.as_str(),
                label: setting.label(),
                enabled: connection.setting(setting),
                disabled: !connection.can_toggle(setting),
            })
            .collect();

        Self {
            provider: provider.to_string(),
            last_sync: format_datetime(connection.last_sync_at),
            sync_all_disabled: !connection.can_sync(),
            toggles,
            connection,
            stats,
            history_total: history.len(),
            history: history_page(history, page),
            load_failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disconnected_panel_disables_all_controls() {
        let data = AccountingPageData::new(
            "quickbooks",
            AccountingConnection::default(),
            vec![],
            vec![],
            1,
            false,
        );

        assert_eq!(data.toggles.len(), 4);
        assert!(data.toggles.iter().all(|toggle| toggle.disabled));
        assert!(data.sync_all_disabled);
        assert_eq!(data.last_sync, "Never");
        assert_eq!(data.history_total, 0);
        assert!(data.history.items.is_empty());
    }

    #[test]
    fn paused_sync_only_unlocks_master_switch() {
        let connection = AccountingConnection {
            connected: true,
            auto_sync_payments: true,
            ..AccountingConnection::default()
        };

        let data = AccountingPageData::new(
            "quickbooks",
            connection,
            vec![],
            vec![],
            1,
            false,
        );

        let master = &data.toggles[0];
        assert_eq!(master.setting, "sync_enabled");
        assert!(!master.disabled);
        assert!(!master.enabled);

        let payments = &data.toggles[2];
        assert_eq!(payments.setting, "auto_sync_payments");
        assert!(payments.enabled);
        assert!(payments.disabled);
        assert!(!data.sync_all_disabled);
    }

    fn record(id: usize) -> SyncRecord {
        SyncRecord {
            entity_id: Some(id.to_string()),
            ..SyncRecord::default()
        }
    }

    #[test]
    fn history_is_cut_into_pages() {
        let records = (1..=DEFAULT_ITEMS_PER_PAGE + 3).map(record).collect();

        let data = AccountingPageData::new(
            "quickbooks",
            AccountingConnection::default(),
            vec![],
            records,
            2,
            false,
        );

        assert_eq!(data.history_total, DEFAULT_ITEMS_PER_PAGE + 3);
        assert_eq!(data.history.page, 2);
        assert_eq!(data.history.items.len(), 3);
        assert_eq!(
            data.history.items[0].entity_id,
            (DEFAULT_ITEMS_PER_PAGE + 1).to_string()
        );
    }

    #[test]
    fn out_of_range_history_page_is_clamped() {
        let data = AccountingPageData::new(
            "quickbooks",
            AccountingConnection::default(),
            vec![],
            vec![record(1), record(2)],
            9,
            false,
        );

        assert_eq!(data.history.page, 1);
        assert_eq!(data.history.items.len(), 2);
    }
}
