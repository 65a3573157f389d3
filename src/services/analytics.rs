use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::ensure_role;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::types::HubId;
use crate::dto::analytics::AnalyticsPageData;
use crate::repository::PaymentsReader;
use crate::services::ServiceResult;

/// Loads the revenue analytics aggregate; failures render an empty page.
pub async fn load_analytics<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<AnalyticsPageData>
where
    R: PaymentsReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;

    match repo.get_revenue_analytics(hub_id).await {
        Ok(analytics) => Ok(AnalyticsPageData::from(&analytics)),
        Err(err) => {
            log::error!("Failed to load revenue analytics: {err}");
            Ok(AnalyticsPageData::failed())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analytics::{AnalyticsPeriod, AnalyticsSummary, RevenueAnalytics, StatusBreakdown};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::viewer_user;

    #[actix_web::test]
    async fn analytics_are_formatted() {
        let mut repo = MockRepository::new();
        repo.expect_get_revenue_analytics().times(1).returning(|_| {
            Ok(RevenueAnalytics {
                summary: AnalyticsSummary {
                    total_payments: 4,
                    successful_payments: 4,
                    total_revenue: 1000.0,
                    refunded_count: 0,
                    avg_payment: 250.0,
                },
                daily_trend: vec![],
                by_status: vec![StatusBreakdown {
                    status: "completed".to_string(),
                    count: 4,
                    total: 1000.0,
                }],
                period: AnalyticsPeriod { from: None, to: None },
            })
        });

        let data = load_analytics(&repo, &viewer_user()).await.unwrap();

        assert!(!data.load_failed);
        assert_eq!(data.success_rate, 100.0);
        assert_eq!(data.refund_rate, 0.0);
        assert_eq!(data.by_status[0].status, "Completed");
        assert_eq!(data.by_status[0].status_class, "success");
        assert_eq!(data.total_revenue, "$1,000.00");
    }

    #[actix_web::test]
    async fn failed_load_renders_empty_page() {
        let mut repo = MockRepository::new();
        repo.expect_get_revenue_analytics()
            .returning(|_| Err(RepositoryError::Unexpected("boom".to_string())));

        let data = load_analytics(&repo, &viewer_user()).await.unwrap();

        assert!(data.load_failed);
        assert_eq!(data.chart_json, r#"{"count":[],"labels":[],"revenue":[]}"#);
    }
}
