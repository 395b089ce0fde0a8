use crate::{AsyncState, AsyncStateContainer, IntoOutcome, StateValue};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// One cached value and the instant it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub stored_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(value: T) -> Self {
        CacheEntry {
            value,
            stored_at: Instant::now(),
        }
    }

    /// Stale when `stored_at.elapsed() >= ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

/// Keyed backing store for cached fetches. Instance-scoped: each store is an
/// independent handle-shared map, never a process-wide singleton. Sharing one
/// store between containers is an explicit opt-in via
/// [`CachedContainer::with_store`].
pub struct CacheStore<T> {
    entries: Arc<Mutex<HashMap<String, CacheEntry<T>>>>,
}

impl<T> Clone for CacheStore<T> {
    fn clone(&self) -> Self {
        CacheStore {
            entries: self.entries.clone(),
        }
    }
}

impl<T> Default for CacheStore<T> {
    fn default() -> Self {
        CacheStore::new()
    }
}

impl<T> CacheStore<T> {
    pub fn new() -> Self {
        CacheStore {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }

    fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    fn is_fresh(&self, key: &str, ttl: Duration) -> bool {
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .is_some_and(|entry| entry.is_fresh(ttl))
    }
}

impl<T: Clone> CacheStore<T> {
    fn fresh_value(&self, key: &str, ttl: Duration) -> Option<T> {
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .filter(|entry| entry.is_fresh(ttl))
            .map(|entry| entry.value.clone())
    }

    fn insert(&self, key: &str, value: T) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), CacheEntry::new(value));
    }
}

/// Single-key TTL guard over one container's fetch.
///
/// Bound to exactly one key at construction. A fresh hit returns the stored
/// value without touching the container at all; a miss or stale entry runs
/// the full execute lifecycle and stores the result on success.
pub struct CachedContainer<T: StateValue> {
    inner: AsyncStateContainer<T>,
    store: CacheStore<T>,
    key: String,
    ttl: Duration,
}

impl<T: StateValue> Clone for CachedContainer<T> {
    fn clone(&self) -> Self {
        CachedContainer {
            inner: self.inner.clone(),
            store: self.store.clone(),
            key: self.key.clone(),
            ttl: self.ttl,
        }
    }
}

impl<T: StateValue> CachedContainer<T> {
    pub fn new(key: impl Into<String>, ttl: Duration) -> Self {
        Self::over(AsyncStateContainer::new(), key, ttl)
    }

    /// Share a backing store with other containers. Entries written under
    /// other keys become visible to `clear_all_cache` here, and vice versa.
    pub fn with_store(key: impl Into<String>, ttl: Duration, store: CacheStore<T>) -> Self {
        CachedContainer {
            inner: AsyncStateContainer::new(),
            store,
            key: key.into(),
            ttl,
        }
    }

    /// Wrap a pre-configured container with a private store.
    pub fn over(inner: AsyncStateContainer<T>, key: impl Into<String>, ttl: Duration) -> Self {
        CachedContainer {
            inner,
            store: CacheStore::new(),
            key: key.into(),
            ttl,
        }
    }

    pub fn container(&self) -> &AsyncStateContainer<T> {
        &self.inner
    }

    pub fn state(&self) -> AsyncState<T> {
        self.inner.state()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn dispose(&self) {
        self.inner.dispose();
    }

    /// Serve from the cache while the entry is fresh, bypassing execute
    /// entirely (loading and error are left untouched); otherwise run the
    /// fetch and store a fresh entry on success.
    pub async fn fetch_with_cache<Op, Fut, R>(&self, op: Op) -> Option<T>
    where
        Op: Fn() -> Fut,
        Fut: Future<Output = R>,
        R: IntoOutcome<T>,
    {
        if let Some(value) = self.store.fresh_value(&self.key, self.ttl) {
            tracing::debug!(key = %self.key, "cache hit");
            return Some(value);
        }
        tracing::debug!(key = %self.key, "cache miss");
        let fetched = self.inner.execute(op).await;
        if let Some(value) = &fetched {
            self.store.insert(&self.key, value.clone());
        }
        fetched
    }

    /// Drop the bound key's entry. Public so an external event source (focus,
    /// visibility, reconnect) can be wired to it; the subscription itself is
    /// outside this crate.
    pub fn invalidate_cache(&self) {
        tracing::debug!(key = %self.key, "cache invalidated");
        self.store.remove(&self.key);
    }

    /// Clear the whole backing store. Relevant when the store is shared.
    pub fn clear_all_cache(&self) {
        self.store.clear();
    }

    /// Pure staleness predicate for the bound key.
    pub fn is_cache_valid(&self) -> bool {
        self.store.is_fresh(&self.key, self.ttl)
    }
}
