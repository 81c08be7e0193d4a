//! Blob-client factory cache: an LRU map from
//! `hash(connection|container|blob)` to a constructed client, bounded by a
//! fixed capacity of 100 entries.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

/// Cache capacity.
pub const DEFAULT_CAPACITY: usize = 100;

/// Hashes `connection|container|blob` with SHA-256 and keeps the first 16
/// hex characters.
pub fn cache_key(connection: &str, container: &str, blob: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(connection.as_bytes());
    hasher.update(b"|");
    hasher.update(container.as_bytes());
    hasher.update(b"|");
    hasher.update(blob.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(16);
    for byte in digest.iter().take(8) {
        hex.push_str(&format!("{byte:02x}"));
    }
    hex
}

/// A value stored in the cache. Eviction calls [`Disposable::dispose`] on
/// the outgoing entry.
pub trait Disposable {
    /// Releases any resources the client holds (connections, handles).
    fn dispose(&self);
}

/// An LRU cache of blob clients, safe to share across invocation threads.
pub struct BlobClientCache<T: Disposable> {
    inner: Mutex<LruCache<String, T>>,
}

impl<T: Disposable> std::fmt::Debug for BlobClientCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobClientCache")
            .field("len", &self.inner.lock().len())
            .finish()
    }
}

impl<T: Disposable> BlobClientCache<T> {
    /// Creates a cache bounded at [`DEFAULT_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a cache bounded at `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity.max(1) is never zero");
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Returns the cached client for `key`, if present, marking it
    /// most-recently-used.
    pub fn get(&self, key: &str) -> Option<T>
    where
        T: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Inserts `value` under `key`, disposing the evicted entry (if the
    /// cache was at capacity) or the entry this call displaced.
    pub fn put(&self, key: String, value: T) {
        if let Some((_, evicted)) = self.inner.lock().push(key, value) {
            evicted.dispose();
        }
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the cache currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Disposable> Default for BlobClientCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
