//! Accounting sync panel services.

use futures_util::future::join;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::ensure_role;

use crate::domain::accounting::{AccountingConnection, SyncStatus};
use crate::domain::types::HubId;
use crate::dto::accounting::AccountingPageData;
use crate::forms::accounting::{SyncToggleForm, SyncTogglePayload};
use crate::repository::{AccountingReader, AccountingWriter};
use crate::services::{ServiceError, ServiceResult};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Loads connection state, sync counters and one page of history.
pub async fn load_accounting_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    provider: &str,
    page: usize,
) -> ServiceResult<AccountingPageData>
where
    R: AccountingReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;

    let (connection, status) = join(
        repo.get_accounting_connection(hub_id),
        repo.get_sync_status(hub_id),
    )
    .await;

    let mut load_failed = false;

    let connection = connection.unwrap_or_else(|err| {
        log::error!("Failed to load accounting connection: {err}");
        load_failed = true;
        AccountingConnection::default()
    });
    let SyncStatus { stats, history } = status.unwrap_or_else(|err| {
        log::error!("Failed to load sync status: {err}");
        load_failed = true;
        SyncStatus::default()
    });

    Ok(AccountingPageData::new(
        provider,
        connection,
        stats,
        history,
        page,
        load_failed,
    ))
}

/// Flips a single sync setting when the current state allows it.
pub async fn toggle_sync_setting<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: SyncToggleForm,
) -> ServiceResult<()>
where
    R: AccountingReader + AccountingWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let SyncTogglePayload { setting, enabled } = SyncTogglePayload::try_from(form)?;

    let hub_id = HubId::new(user.hub_id)?;

    let connection = repo.get_accounting_connection(hub_id).await?;
    if !connection.can_toggle(setting) {
        return Err(ServiceError::Form(format!(
            "{} is unavailable while sync is off.",
            setting.label()
        )));
    }

    repo.update_sync_setting(hub_id, setting, enabled).await?;

    Ok(())
}

/// Triggers a manual sync of every entity.
pub async fn sync_all<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<()>
where
    R: AccountingReader + AccountingWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;

    if !repo.get_accounting_connection(hub_id).await?.can_sync() {
        return Err(ServiceError::Form(
            "Connect an accounting system first.".to_string(),
        ));
    }

    repo.sync_all(hub_id).await?;

    Ok(())
}

pub async fn disconnect<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<()>
where
    R: AccountingWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;

    repo.disconnect_accounting(hub_id).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use pushkind_common::pagination::DEFAULT_ITEMS_PER_PAGE;

    use super::*;
    use crate::domain::accounting::{SyncRecord, SyncSetting, SyncStat};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{admin_user, viewer_user};

    fn record(id: i64) -> SyncRecord {
        SyncRecord {
            id,
            entity_type: "invoice".to_string(),
            entity_id: Some(id.to_string()),
            direction: Some("push".to_string()),
            status: "success".to_string(),
            error_message: None,
            synced_at: None,
        }
    }

    fn connected(sync_enabled: bool) -> AccountingConnection {
        AccountingConnection {
            connected: true,
            company_name: Some("Acme Ltd".to_string()),
            sync_enabled,
            ..AccountingConnection::default()
        }
    }

    #[actix_web::test]
    async fn disconnected_state_renders_every_control_disabled() {
        let mut repo = MockRepository::new();
        repo.expect_get_accounting_connection()
            .returning(|_| Ok(AccountingConnection::default()));
        repo.expect_get_sync_status()
            .returning(|_| Ok(SyncStatus::default()));

        let data = load_accounting_page(&repo, &viewer_user(), "quickbooks", 1)
            .await
            .unwrap();

        assert!(!data.load_failed);
        assert!(data.toggles.iter().all(|toggle| toggle.disabled));
        assert!(data.sync_all_disabled);
    }

    #[actix_web::test]
    async fn history_is_paginated_locally() {
        let mut repo = MockRepository::new();
        repo.expect_get_accounting_connection()
            .returning(|_| Ok(connected(true)));
        repo.expect_get_sync_status().returning(|_| {
            Ok(SyncStatus {
                stats: vec![SyncStat {
                    entity: "invoices".to_string(),
                    synced: 25,
                    failed: 0,
                    pending: 0,
                }],
                history: (1..=DEFAULT_ITEMS_PER_PAGE as i64 + 5).map(record).collect(),
            })
        });

        let data = load_accounting_page(&repo, &viewer_user(), "quickbooks", 2)
            .await
            .unwrap();

        assert_eq!(data.history.page, 2);
        assert_eq!(data.history.items.len(), 5);
        assert_eq!(data.history_total, DEFAULT_ITEMS_PER_PAGE + 5);
        assert_eq!(
            data.history.items[0].entity_id,
            (DEFAULT_ITEMS_PER_PAGE + 1).to_string()
        );
        assert_eq!(data.stats.len(), 1);
        assert!(!data.sync_all_disabled);
    }

    #[actix_web::test]
    async fn failed_status_keeps_page_renderable() {
        let mut repo = MockRepository::new();
        repo.expect_get_accounting_connection()
            .returning(|_| Ok(connected(false)));
        repo.expect_get_sync_status()
            .returning(|_| Err(RepositoryError::ConnectionError("down".to_string())));

        let data = load_accounting_page(&repo, &viewer_user(), "quickbooks", 1)
            .await
            .unwrap();

        assert!(data.load_failed);
        assert!(data.connection.connected);
        assert!(data.history.items.is_empty());
    }

    #[actix_web::test]
    async fn toggle_sends_requested_value() {
        let mut repo = MockRepository::new();
        repo.expect_get_accounting_connection()
            .returning(|_| Ok(connected(true)));
        repo.expect_update_sync_setting()
            .with(
                eq(HubId::new(42).unwrap()),
                eq(SyncSetting::AutoSyncPayments),
                eq(true),
            )
            .times(1)
            .returning(|_, _, _| Ok(()));

        toggle_sync_setting(
            &repo,
            &admin_user(),
            SyncToggleForm {
                setting: "auto_sync_payments".to_string(),
                value: Some("on".to_string()),
            },
        )
        .await
        .expect("toggle should succeed");
    }

    #[actix_web::test]
    async fn auto_sync_toggle_is_refused_while_master_switch_is_off() {
        let mut repo = MockRepository::new();
        repo.expect_get_accounting_connection()
            .returning(|_| Ok(connected(false)));
        repo.expect_update_sync_setting().times(0);

        let result = toggle_sync_setting(
            &repo,
            &admin_user(),
            SyncToggleForm {
                setting: "auto_sync_invoices".to_string(),
                value: Some("true".to_string()),
            },
        )
        .await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[actix_web::test]
    async fn sync_all_requires_connection() {
        let mut repo = MockRepository::new();
        repo.expect_get_accounting_connection()
            .returning(|_| Ok(AccountingConnection::default()));
        repo.expect_sync_all().times(0);

        let result = sync_all(&repo, &admin_user()).await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[actix_web::test]
    async fn disconnect_requires_admin_role() {
        let mut repo = MockRepository::new();
        repo.expect_disconnect_accounting().times(0);

        let result = disconnect(&repo, &viewer_user()).await;

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
