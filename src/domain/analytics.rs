//! Revenue analytics aggregated by the backend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsSummary {
    pub total_payments: i64,
    pub successful_payments: i64,
    pub total_revenue: f64,
    pub refunded_count: i64,
    pub avg_payment: f64,
}

impl AnalyticsSummary {
    /// Share of successful payments in percent.
    pub fn success_rate(&self) -> f64 {
        percent(self.successful_payments, self.total_payments)
    }

    /// Share of refunded payments in percent.
    pub fn refund_rate(&self) -> f64 {
        percent(self.refunded_count, self.total_payments)
    }
}

fn percent(part: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

/// Revenue collected on a single day.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub count: i64,
    pub revenue: f64,
}

/// Payment totals grouped by status.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusBreakdown {
    pub status: String,
    pub count: i64,
    pub total: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsPeriod {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RevenueAnalytics {
    pub summary: AnalyticsSummary,
    pub daily_trend: Vec<DailyRevenue>,
    pub by_status: Vec<StatusBreakdown>,
    pub period: AnalyticsPeriod,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_are_zero_without_payments() {
        let summary = AnalyticsSummary::default();
        assert_eq!(summary.success_rate(), 0.0);
        assert_eq!(summary.refund_rate(), 0.0);
    }

    #[test]
    fn rates_are_expressed_in_percent() {
        let summary = AnalyticsSummary {
            total_payments: 8,
            successful_payments: 6,
            refunded_count: 1,
            ..AnalyticsSummary::default()
        };
        assert!((summary.success_rate() - 75.0).abs() < f64::EPSILON);
        assert!((summary.refund_rate() - 12.5).abs() < f64::EPSILON);
    }
}
