//! Overview dashboard service.

use chrono::{Local, NaiveDate};
use futures_util::future::try_join3;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::ensure_role;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::payments::ExtendedStats;
use crate::domain::types::HubId;
use crate::dto::overview::OverviewPageData;
use crate::repository::PaymentsReader;
use crate::services::ServiceResult;

/// Number of invoices and payments requested for the local statistics.
pub const RECENT_LIMIT: usize = 10;

/// Loads the overview dashboard for the current day.
pub async fn load_overview<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<OverviewPageData>
where
    R: PaymentsReader + ?Sized,
{
    load_overview_at(repo, user, Local::now().date_naive()).await
}

/// Loads stats, recent invoices and recent payments concurrently.
///
/// A backend failure yields a page flagged with `load_failed`.
pub async fn load_overview_at<R>(
    repo: &R,
    user: &AuthenticatedUser,
    today: NaiveDate,
) -> ServiceResult<OverviewPageData>
where
    R: PaymentsReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;

    let loaded = try_join3(
        repo.get_dashboard_stats(hub_id),
        repo.list_recent_invoices(hub_id, RECENT_LIMIT),
        repo.list_recent_payments(hub_id, RECENT_LIMIT),
    )
    .await;

    let (stats, invoices, payments) = match loaded {
        Ok(loaded) => loaded,
        Err(err) => {
            log::error!("Failed to load finance overview: {err}");
            return Ok(OverviewPageData::failed());
        }
    };

    let extended = ExtendedStats::compute(&stats, &invoices, &payments, today);

    Ok(OverviewPageData::new(&stats, extended, &invoices, &payments))
}
