//! Keyed cache for server state.
//!
//! Views ask for data through [`QueryClient::fetch_query`] with a
//! [`QueryKey`]. Fresh entries are served without a network call, fetches
//! for one key are serialized so concurrent callers share a single request,
//! and mutations mark dependent keys stale through prefix invalidation.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::errors::ClientError;

/// Cache key: entity type followed by its parameters, e.g. `["project", id]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// Every cache key the views use.
pub mod keys {
    use super::QueryKey;

    pub fn projects() -> QueryKey {
        QueryKey::new(["projects"])
    }

    pub fn project(id: &str) -> QueryKey {
        QueryKey::new(["project", id])
    }

    pub fn keywords(project_id: &str) -> QueryKey {
        QueryKey::new(["keywords", project_id])
    }

    pub fn rank_tracking(project_id: &str) -> QueryKey {
        QueryKey::new(["rank-tracking", project_id])
    }

    pub fn rank_stats(project_id: &str) -> QueryKey {
        QueryKey::new(["rank-stats", project_id])
    }

    pub fn rank_history(project_id: &str, keyword_id: &str, days: u32) -> QueryKey {
        QueryKey::new([
            "rank-history".to_string(),
            project_id.to_string(),
            keyword_id.to_string(),
            days.to_string(),
        ])
    }

    pub fn serp_snapshot(project_id: &str, keyword_id: &str) -> QueryKey {
        QueryKey::new(["serp-snapshot", project_id, keyword_id])
    }

    pub fn keyword_movers(project_id: &str) -> QueryKey {
        QueryKey::new(["keyword-movers", project_id])
    }

    pub fn api_usage(project_id: &str) -> QueryKey {
        QueryKey::new(["api-usage", project_id])
    }

    pub fn competitors(project_id: &str) -> QueryKey {
        QueryKey::new(["competitors", project_id])
    }

    pub fn competitor_overlap(project_id: &str) -> QueryKey {
        QueryKey::new(["competitor-overlap", project_id])
    }

    pub fn competitor_gaps(project_id: &str, competitor_id: &str) -> QueryKey {
        QueryKey::new(["competitor-gaps", project_id, competitor_id])
    }

    pub fn serp_features(project_id: &str) -> QueryKey {
        QueryKey::new(["serp-features", project_id])
    }

    pub fn backlinks_summary(project_id: &str) -> QueryKey {
        QueryKey::new(["backlinks-summary", project_id])
    }

    pub fn backlinks_list(project_id: &str) -> QueryKey {
        QueryKey::new(["backlinks-list", project_id])
    }

    pub fn referring_domains(project_id: &str) -> QueryKey {
        QueryKey::new(["referring-domains", project_id])
    }

    pub fn credentials(provider: &str) -> QueryKey {
        QueryKey::new(["credentials", provider])
    }

    pub fn ai_permissions() -> QueryKey {
        QueryKey::new(["ai-permissions"])
    }
}

struct Entry {
    data: Arc<dyn Any + Send + Sync>,
    updated_at: Instant,
    stale: bool,
}

pub struct QueryClient {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    fetch_locks: Mutex<HashMap<QueryKey, Arc<tokio::sync::Mutex<()>>>>,
    /// Bumped by every invalidation so in-flight fetches know their result may be outdated.
    generation: AtomicU64,
    /// Bumped by `clear`; a fetch that straddles a clear does not store its result.
    clears: AtomicU64,
    stale_time: Duration,
}

impl QueryClient {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            fetch_locks: Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
            clears: AtomicU64::new(0),
            stale_time,
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    /// Return fresh cached data for `key`, or run `fetch` and cache its result.
    ///
    /// Errors are returned to the caller and leave any previous entry in place.
    pub async fn fetch_query<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, ClientError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        if let Some(value) = self.fresh::<T>(&key) {
            tracing::debug!("Cache hit for {}", key);
            return Ok(value);
        }

        let lock = self.fetch_lock(&key);
        let result = {
            let _guard = lock.lock().await;

            // Another caller may have filled the entry while we waited.
            if let Some(value) = self.fresh::<T>(&key) {
                tracing::debug!("Cache filled by concurrent fetch for {}", key);
                Ok(value)
            } else {
                self.fetch_and_store(&key, fetch).await
            }
        };
        self.release_fetch_lock(&key, lock);
        result
    }

    async fn fetch_and_store<T, F, Fut>(&self, key: &QueryKey, fetch: F) -> Result<T, ClientError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let started = self.generation.load(Ordering::SeqCst);
        let clears = self.clears.load(Ordering::SeqCst);
        tracing::debug!("Fetching {}", key);
        let value = fetch().await?;

        if self.clears.load(Ordering::SeqCst) != clears {
            tracing::debug!("Cache cleared during fetch of {}, result not stored", key);
            return Ok(value);
        }
        let outdated = self.generation.load(Ordering::SeqCst) != started;
        self.entries().insert(
            key.clone(),
            Entry {
                data: Arc::new(value.clone()),
                updated_at: Instant::now(),
                stale: outdated,
            },
        );
        Ok(value)
    }

    /// Cached data for `key`, fresh or stale.
    pub fn get_query_data<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let entries = self.entries();
        entries.get(key).and_then(|e| e.data.downcast_ref::<T>().cloned())
    }

    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries()
            .get(key)
            .map(|e| self.entry_is_stale(e))
            .unwrap_or(true)
    }

    /// Mark every entry under `prefix` stale. Returns how many were marked.
    pub fn invalidate_queries(&self, prefix: &QueryKey) -> usize {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut count = 0;
        for (key, entry) in self.entries().iter_mut() {
            if key.starts_with(prefix) {
                entry.stale = true;
                count += 1;
            }
        }
        tracing::debug!("Invalidated {} entries under {}", count, prefix);
        count
    }

    /// Run a mutation and, when it succeeds, invalidate `invalidates`.
    pub async fn mutate<T, Fut>(&self, mutation: Fut, invalidates: &[QueryKey]) -> Result<T, ClientError>
    where
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let result = mutation.await;
        match &result {
            Ok(_) => {
                for key in invalidates {
                    self.invalidate_queries(key);
                }
            }
            Err(e) => tracing::debug!("Mutation failed, cache untouched: {}", e),
        }
        result
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.fetch_locks().clear();
        let mut entries = self.entries();
        let count = entries.len();
        entries.clear();
        tracing::debug!("Cleared {} cached queries", count);
    }

    fn fresh<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let entries = self.entries();
        let entry = entries.get(key)?;
        if self.entry_is_stale(entry) {
            return None;
        }
        match entry.data.downcast_ref::<T>() {
            Some(value) => Some(value.clone()),
            None => {
                tracing::warn!("Cached value for {} has an unexpected type", key);
                None
            }
        }
    }

    fn entry_is_stale(&self, entry: &Entry) -> bool {
        entry.stale || entry.updated_at.elapsed() >= self.stale_time
    }

    fn fetch_lock(&self, key: &QueryKey) -> Arc<tokio::sync::Mutex<()>> {
        self.fetch_locks().entry(key.clone()).or_default().clone()
    }

    /// Drop the map's lock for `key` once no other caller holds or awaits it.
    fn release_fetch_lock(&self, key: &QueryKey, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self.fetch_locks();
        let idle = locks
            .get(key)
            .is_some_and(|held| Arc::ptr_eq(held, &lock) && Arc::strong_count(&lock) == 2);
        if idle {
            locks.remove(key);
        }
    }

    fn fetch_locks(&self) -> MutexGuard<'_, HashMap<QueryKey, Arc<tokio::sync::Mutex<()>>>> {
        self.fetch_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
