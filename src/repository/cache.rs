//! Query cache sitting in front of the backend repository.
//!
//! Reads are cached per hub and [`QueryKey`] for a bounded time. Successful
//! mutations drop the keys they affect so the next render refetches them.
//! Every invalidation bumps a generation counter for the key; a read that was
//! already in flight when the counter moved is returned but not stored.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::accounting::{AccountingConnection, SyncSetting, SyncStatus};
use crate::domain::analytics::RevenueAnalytics;
use crate::domain::dunning::{
    DunningSchedule, MessageTemplate, OverdueInvoice, ProcessOutcome, ScheduleDraft,
};
use crate::domain::payments::{DashboardStats, Invoice, Payment};
use crate::domain::settings::PaymentSettings;
use crate::domain::types::{HubId, InvoiceId, ReminderChannel, ScheduleId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AccountingReader, AccountingWriter, DunningReader, DunningWriter, PaymentsReader,
    SettingsReader, SettingsWriter, TemplateReader,
};

/// Identifies a cached backend read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryKey {
    DunningSchedules,
    OverdueInvoices,
    EmailTemplates,
    SmsTemplates,
    DashboardStats,
    /// Recent invoices, keyed by the requested row limit.
    RecentInvoices(usize),
    RecentPayments(usize),
    RevenueAnalytics,
    PaymentSettings,
    AccountingConnection,
    SyncStatus,
}

impl QueryKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            QueryKey::DunningSchedules => "dunning-schedules",
            QueryKey::OverdueInvoices => "overdue-invoices",
            QueryKey::EmailTemplates => "email-templates",
            QueryKey::SmsTemplates => "sms-templates",
            QueryKey::DashboardStats => "dashboard-stats",
            QueryKey::RecentInvoices(_) => "recent-invoices",
            QueryKey::RecentPayments(_) => "recent-payments",
            QueryKey::RevenueAnalytics => "revenue-analytics",
            QueryKey::PaymentSettings => "payment-settings",
            QueryKey::AccountingConnection => "accounting-connection",
            QueryKey::SyncStatus => "sync-status",
        }
    }
}

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    stored_at: Instant,
}

/// Shared map of cached reads keyed by hub and query.
pub struct QueryCache {
    entries: DashMap<(HubId, QueryKey), CacheEntry>,
    generations: DashMap<(HubId, QueryKey), u64>,
    ttl: Duration,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            generations: DashMap::new(),
            ttl,
        }
    }

    fn is_stale(&self, entry: &CacheEntry) -> bool {
        entry.stored_at.elapsed() >= self.ttl
    }

    /// Returns a fresh cached value, evicting it when expired.
    pub fn get<T>(&self, hub_id: HubId, key: QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let slot = (hub_id, key);
        if self
            .entries
            .remove_if(&slot, |_, entry| self.is_stale(entry))
            .is_some()
        {
            log::debug!("Expired {} for hub {hub_id}", key.as_str());
            return None;
        }

        self.entries
            .get(&slot)
            .filter(|entry| !self.is_stale(entry))
            .and_then(|entry| entry.value.downcast_ref::<T>().cloned())
    }

    pub fn insert<T>(&self, hub_id: HubId, key: QueryKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.entries.insert(
            (hub_id, key),
            CacheEntry {
                value: Arc::new(value),
                stored_at: Instant::now(),
            },
        );
    }

    /// Current generation of `key`; starts at zero and only grows.
    pub fn generation(&self, hub_id: HubId, key: QueryKey) -> u64 {
        self.generations
            .get(&(hub_id, key))
            .map_or(0, |generation| *generation)
    }

    /// Stores `value` only if `key` was not invalidated since `generation` was read.
    fn insert_if_current<T>(&self, hub_id: HubId, key: QueryKey, generation: u64, value: T) -> bool
    where
        T: Send + Sync + 'static,
    {
        // The generation guard is held across the insert so `invalidate` cannot interleave.
        let current = self.generations.entry((hub_id, key)).or_insert(0);
        if *current != generation {
            log::debug!("Discarding {} read for hub {hub_id} overtaken by a write", key.as_str());
            return false;
        }
        self.insert(hub_id, key, value);
        true
    }

    pub fn invalidate(&self, hub_id: HubId, key: QueryKey) {
        let mut generation = self.generations.entry((hub_id, key)).or_insert(0);
        *generation += 1;
        if self.entries.remove(&(hub_id, key)).is_some() {
            log::debug!("Invalidated {} for hub {hub_id}", key.as_str());
        }
    }

    pub fn contains(&self, hub_id: HubId, key: QueryKey) -> bool {
        self.entries.contains_key(&(hub_id, key))
    }

    /// Serves `key` from the cache or fills it from `fetch`.
    ///
    /// Failed fetches are not cached, and neither are fetches that an
    /// invalidation of the same key overtook.
    pub async fn get_or_fetch<T, F, Fut>(
        &self,
        hub_id: HubId,
        key: QueryKey,
        fetch: F,
    ) -> RepositoryResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = RepositoryResult<T>> + Send,
    {
        if let Some(value) = self.get::<T>(hub_id, key) {
            return Ok(value);
        }

        let generation = self.generation(hub_id, key);
        let value = fetch().await?;
        self.insert_if_current(hub_id, key, generation, value.clone());
        Ok(value)
    }
}

/// Repository decorator caching reads of the wrapped repository.
#[derive(Clone)]
pub struct CachedRepository<R> {
    inner: R,
    cache: Arc<QueryCache>,
}

impl<R> CachedRepository<R> {
    pub fn new(inner: R, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Arc::new(QueryCache::new(ttl)),
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

#[async_trait]
impl<R> DunningReader for CachedRepository<R>
where
    R: DunningReader + Send + Sync,
{
    async fn list_schedules(&self, hub_id: HubId) -> RepositoryResult<Vec<DunningSchedule>> {
        self.cache
            .get_or_fetch(hub_id, QueryKey::DunningSchedules, || {
                self.inner.list_schedules(hub_id)
            })
            .await
    }

    async fn list_overdue_invoices(&self, hub_id: HubId) -> RepositoryResult<Vec<OverdueInvoice>> {
        self.cache
            .get_or_fetch(hub_id, QueryKey::OverdueInvoices, || {
                self.inner.list_overdue_invoices(hub_id)
            })
            .await
    }
}

#[async_trait]
impl<R> DunningWriter for CachedRepository<R>
where
    R: DunningWriter + Send + Sync,
{
    async fn create_schedule(&self, hub_id: HubId, draft: &ScheduleDraft) -> RepositoryResult<()> {
        self.inner.create_schedule(hub_id, draft).await?;
        self.cache.invalidate(hub_id, QueryKey::DunningSchedules);
        Ok(())
    }

    async fn update_schedule(
        &self,
        hub_id: HubId,
        schedule_id: ScheduleId,
        draft: &ScheduleDraft,
    ) -> RepositoryResult<()> {
        self.inner
            .update_schedule(hub_id, schedule_id, draft)
            .await?;
        self.cache.invalidate(hub_id, QueryKey::DunningSchedules);
        Ok(())
    }

    async fn delete_schedule(
        &self,
        hub_id: HubId,
        schedule_id: ScheduleId,
    ) -> RepositoryResult<()> {
        self.inner.delete_schedule(hub_id, schedule_id).await?;
        self.cache.invalidate(hub_id, QueryKey::DunningSchedules);
        Ok(())
    }

    async fn send_reminder(
        &self,
        hub_id: HubId,
        invoice_id: InvoiceId,
        channel: ReminderChannel,
    ) -> RepositoryResult<()> {
        self.inner.send_reminder(hub_id, invoice_id, channel).await?;
        self.cache.invalidate(hub_id, QueryKey::OverdueInvoices);
        Ok(())
    }

    async fn process_reminders(&self, hub_id: HubId) -> RepositoryResult<ProcessOutcome> {
        let outcome = self.inner.process_reminders(hub_id).await?;
        self.cache.invalidate(hub_id, QueryKey::OverdueInvoices);
        Ok(outcome)
    }
}

#[async_trait]
impl<R> TemplateReader for CachedRepository<R>
where
    R: TemplateReader + Send + Sync,
{
    async fn list_email_templates(&self, hub_id: HubId) -> RepositoryResult<Vec<MessageTemplate>> {
        self.cache
            .get_or_fetch(hub_id, QueryKey::EmailTemplates, || {
                self.inner.list_email_templates(hub_id)
            })
            .await
    }

    async fn list_sms_templates(&self, hub_id: HubId) -> RepositoryResult<Vec<MessageTemplate>> {
        self.cache
            .get_or_fetch(hub_id, QueryKey::SmsTemplates, || {
                self.inner.list_sms_templates(hub_id)
            })
            .await
    }
}

#[async_trait]
impl<R> PaymentsReader for CachedRepository<R>
where
    R: PaymentsReader + Send + Sync,
{
    async fn get_dashboard_stats(&self, hub_id: HubId) -> RepositoryResult<DashboardStats> {
        self.cache
            .get_or_fetch(hub_id, QueryKey::DashboardStats, || {
                self.inner.get_dashboard_stats(hub_id)
            })
            .await
    }

    async fn list_recent_invoices(
        &self,
        hub_id: HubId,
        limit: usize,
    ) -> RepositoryResult<Vec<Invoice>> {
        self.cache
            .get_or_fetch(hub_id, QueryKey::RecentInvoices(limit), || {
                self.inner.list_recent_invoices(hub_id, limit)
            })
            .await
    }

    async fn list_recent_payments(
        &self,
        hub_id: HubId,
        limit: usize,
    ) -> RepositoryResult<Vec<Payment>> {
        self.cache
            .get_or_fetch(hub_id, QueryKey::RecentPayments(limit), || {
                self.inner.list_recent_payments(hub_id, limit)
            })
            .await
    }

    async fn get_revenue_analytics(&self, hub_id: HubId) -> RepositoryResult<RevenueAnalytics> {
        self.cache
            .get_or_fetch(hub_id, QueryKey::RevenueAnalytics, || {
                self.inner.get_revenue_analytics(hub_id)
            })
            .await
    }
}

#[async_trait]
impl<R> SettingsReader for CachedRepository<R>
where
    R: SettingsReader + Send + Sync,
{
    async fn get_payment_settings(&self, hub_id: HubId) -> RepositoryResult<PaymentSettings> {
        self.cache
            .get_or_fetch(hub_id, QueryKey::PaymentSettings, || {
                self.inner.get_payment_settings(hub_id)
            })
            .await
    }
}

#[async_trait]
impl<R> SettingsWriter for CachedRepository<R>
where
    R: SettingsWriter + Send + Sync,
{
    async fn save_payment_settings(
        &self,
        hub_id: HubId,
        settings: &PaymentSettings,
    ) -> RepositoryResult<()> {
        self.inner.save_payment_settings(hub_id, settings).await?;
        self.cache.invalidate(hub_id, QueryKey::PaymentSettings);
        Ok(())
    }
}

#[async_trait]
impl<R> AccountingReader for CachedRepository<R>
where
    R: AccountingReader + Send + Sync,
{
    async fn get_accounting_connection(
        &self,
        hub_id: HubId,
    ) -> RepositoryResult<AccountingConnection> {
        self.cache
            .get_or_fetch(hub_id, QueryKey::AccountingConnection, || {
                self.inner.get_accounting_connection(hub_id)
            })
            .await
    }

    async fn get_sync_status(&self, hub_id: HubId) -> RepositoryResult<SyncStatus> {
        self.cache
            .get_or_fetch(hub_id, QueryKey::SyncStatus, || {
                self.inner.get_sync_status(hub_id)
            })
            .await
    }
}

#[async_trait]
impl<R> AccountingWriter for CachedRepository<R>
where
    R: AccountingWriter + Send + Sync,
{
    async fn update_sync_setting(
        &self,
        hub_id: HubId,
        setting: SyncSetting,
        enabled: bool,
    ) -> RepositoryResult<()> {
        self.inner
            .update_sync_setting(hub_id, setting, enabled)
            .await?;
        self.cache.invalidate(hub_id, QueryKey::AccountingConnection);
        Ok(())
    }

    async fn sync_all(&self, hub_id: HubId) -> RepositoryResult<()> {
        self.inner.sync_all(hub_id).await?;
        self.cache.invalidate(hub_id, QueryKey::SyncStatus);
        self.cache.invalidate(hub_id, QueryKey::AccountingConnection);
        Ok(())
    }

    async fn disconnect_accounting(&self, hub_id: HubId) -> RepositoryResult<()> {
        self.inner.disconnect_accounting(hub_id).await?;
        self.cache.invalidate(hub_id, QueryKey::AccountingConnection);
        self.cache.invalidate(hub_id, QueryKey::SyncStatus);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{DaysAfterDue, ScheduleName};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    fn hub() -> HubId {
        HubId::new(42).unwrap()
    }

    fn schedule(active: bool) -> DunningSchedule {
        DunningSchedule {
            id: ScheduleId::new(1).unwrap(),
            name: ScheduleName::new("Reminder").unwrap(),
            days_after_due: DaysAfterDue::new(3).unwrap(),
            email_template_id: None,
            sms_template_id: None,
            is_active: active,
            created_at: None,
            updated_at: None,
        }
    }

    #[actix_web::test]
    async fn repeated_reads_hit_backend_once() {
        let mut inner = MockRepository::new();
        inner
            .expect_list_schedules()
            .times(1)
            .returning(|_| Ok(vec![schedule(true)]));
        let repo = CachedRepository::new(inner, Duration::from_secs(60));

        let first = repo.list_schedules(hub()).await.unwrap();
        let second = repo.list_schedules(hub()).await.unwrap();

        assert_eq!(first, second);
        assert!(repo.cache().contains(hub(), QueryKey::DunningSchedules));
    }

    #[actix_web::test]
    async fn expired_entries_are_refetched() {
        let mut inner = MockRepository::new();
        inner
            .expect_list_overdue_invoices()
            .times(2)
            .returning(|_| Ok(vec![]));
        let repo = CachedRepository::new(inner, Duration::ZERO);

        repo.list_overdue_invoices(hub()).await.unwrap();
        repo.list_overdue_invoices(hub()).await.unwrap();

        assert!(!repo.cache().contains(hub(), QueryKey::OverdueInvoices));
    }

    #[actix_web::test]
    async fn read_overtaken_by_invalidation_is_not_stored() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let key = QueryKey::DunningSchedules;
        let shared = &cache;

        // The snapshot is taken, then a toggle lands and invalidates before the read completes.
        let stale = cache
            .get_or_fetch(hub(), key, move || async move {
                let snapshot = vec![schedule(true)];
                shared.invalidate(hub(), key);
                Ok::<_, RepositoryError>(snapshot)
            })
            .await
            .unwrap();

        assert!(stale[0].is_active);
        assert!(!cache.contains(hub(), key));
        assert_eq!(cache.generation(hub(), key), 1);

        let fresh = cache
            .get_or_fetch(hub(), key, || async {
                Ok::<_, RepositoryError>(vec![schedule(false)])
            })
            .await
            .unwrap();

        assert!(!fresh[0].is_active);
        assert_eq!(cache.get::<Vec<DunningSchedule>>(hub(), key), Some(fresh));
    }

    #[actix_web::test]
    async fn recent_rows_are_cached_per_limit() {
        let mut inner = MockRepository::new();
        inner
            .expect_list_recent_invoices()
            .withf(|_, limit| *limit == 5)
            .times(1)
            .returning(|_, _| Ok(vec![]));
        inner
            .expect_list_recent_invoices()
            .withf(|_, limit| *limit == 10)
            .times(1)
            .returning(|_, _| Ok(vec![]));
        let repo = CachedRepository::new(inner, Duration::from_secs(60));

        repo.list_recent_invoices(hub(), 5).await.unwrap();
        repo.list_recent_invoices(hub(), 10).await.unwrap();
        repo.list_recent_invoices(hub(), 5).await.unwrap();

        assert!(repo.cache().contains(hub(), QueryKey::RecentInvoices(5)));
        assert!(repo.cache().contains(hub(), QueryKey::RecentInvoices(10)));
    }

    #[actix_web::test]
    async fn successful_update_makes_list_reflect_new_state() {
        let mut inner = MockRepository::new();
        let mut seq = mockall::Sequence::new();
        inner
            .expect_list_schedules()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![schedule(true)]));
        inner
            .expect_update_schedule()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        inner
            .expect_list_schedules()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![schedule(false)]));
        let repo = CachedRepository::new(inner, Duration::from_secs(60));

        let before = repo.list_schedules(hub()).await.unwrap();
        repo.update_schedule(hub(), before[0].id, &before[0].toggled())
            .await
            .unwrap();
        let after = repo.list_schedules(hub()).await.unwrap();

        assert!(before[0].is_active);
        assert!(!after[0].is_active);
    }

    #[actix_web::test]
    async fn failed_mutation_keeps_cached_state() {
        let mut inner = MockRepository::new();
        inner
            .expect_list_schedules()
            .times(1)
            .returning(|_| Ok(vec![schedule(true)]));
        inner
            .expect_delete_schedule()
            .times(1)
            .returning(|_, _| Err(RepositoryError::ConnectionError("down".to_string())));
        let repo = CachedRepository::new(inner, Duration::from_secs(60));

        repo.list_schedules(hub()).await.unwrap();
        let result = repo
            .delete_schedule(hub(), ScheduleId::new(1).unwrap())
            .await;

        assert!(result.is_err());
        assert!(repo.cache().contains(hub(), QueryKey::DunningSchedules));
    }

    #[actix_web::test]
    async fn failed_reads_are_not_cached() {
        let mut inner = MockRepository::new();
        inner
            .expect_get_dashboard_stats()
            .times(1)
            .returning(|_| Err(RepositoryError::Unauthorized));
        let repo = CachedRepository::new(inner, Duration::from_secs(60));

        assert!(repo.get_dashboard_stats(hub()).await.is_err());
        assert!(!repo.cache().contains(hub(), QueryKey::DashboardStats));
    }

    #[actix_web::test]
    async fn hubs_do_not_share_entries() {
        let mut inner = MockRepository::new();
        inner
            .expect_get_payment_settings()
            .times(2)
            .returning(|_| Ok(PaymentSettings::default()));
        let repo = CachedRepository::new(inner, Duration::from_secs(60));

        repo.get_payment_settings(hub()).await.unwrap();
        repo.get_payment_settings(HubId::new(7).unwrap())
            .await
            .unwrap();
    }
}
