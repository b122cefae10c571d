use crate::CacheError;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of a cache read.
///
/// `Unavailable` covers backend errors and timeouts; callers treat it like
/// `Miss` and fall through to the source of truth.
#[derive(Debug)]
pub enum CacheLookup {
    Hit(Vec<u8>),
    Miss,
    Unavailable(CacheError),
}

impl CacheLookup {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    /// Collapse to the bytes, dropping the miss/unavailable distinction
    pub fn into_value(self) -> Option<Vec<u8>> {
        match self {
            CacheLookup::Hit(bytes) => Some(bytes),
            CacheLookup::Miss | CacheLookup::Unavailable(_) => None,
        }
    }
}

/// Key/value store with per-entry expiry and prefix deletion
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    /// Read a value
    async fn get(&self, key: &str) -> CacheLookup;

    /// Store a value, replacing any previous entry, expiring after `ttl`
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError>;

    /// Delete every key starting with `prefix`, returning how many were removed
    async fn delete_matching(&self, prefix: &str) -> Result<usize, CacheError>;

    /// Backend health check
    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}

/// Cache handle shared between the aggregator and the invalidation path
pub type SharedCacheStore = Arc<dyn CacheStore>;
