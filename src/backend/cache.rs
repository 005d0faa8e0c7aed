use im::Vector;
use log::debug;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

const DEFAULT_CAPACITY: usize = 32;

/// Path-keyed cache of fetched lists. Mutations invalidate their collection
/// path, so the next fetch goes back to the store. Keys are
/// `"{path}?owner={id}"`, one entry per signed-in owner.
pub struct ListCache<R> {
    inner: Mutex<LruCache<String, Vector<R>>>,
}

impl<R: Clone> ListCache<R> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        ListCache {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, key: &str) -> Option<Vector<R>> {
        let mut cache = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        cache.get(key).cloned()
    }

    pub fn put(&self, key: impl Into<String>, list: Vector<R>) {
        let mut cache = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        cache.put(key.into(), list);
    }

    /// Drops every cached list under one collection path, all owners.
    pub fn invalidate_path(&self, path: &str) {
        let mut cache = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let prefix = format!("{path}?");
        let stale: Vec<String> = cache
            .iter()
            .filter(|(key, _)| key.as_str() == path || key.starts_with(&prefix))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            cache.pop(key);
        }
        if !stale.is_empty() {
            debug!("invalidated {} cached list(s) under {}", stale.len(), path);
        }
    }

    pub fn len(&self) -> usize {
        let cache = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: Clone> Default for ListCache<R> {
    fn default() -> Self {
        Self::new()
    }
}
