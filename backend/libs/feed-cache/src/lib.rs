//! Feed page caching for microtweet services
//!
//! - Key schema with page/page-size suffixed to the partition, so a whole
//!   partition can be dropped by prefix
//! - `CacheStore` capability with Redis (SCAN based) and in-memory backends
//! - Lookup outcomes that separate "absent" from "unavailable"
//! - Write-path invalidation that never fails the triggering write

mod backend;
mod error;
mod keys;
mod memory_store;
mod metrics;
mod pagination;
mod redis_store;
mod store;

pub mod invalidation;

pub use backend::CacheBackend;
pub use error::{CacheError, CacheResult};
pub use invalidation::{FeedInvalidator, InvalidationReport};
pub use keys::{FeedCacheKey, FeedKind, KEY_NAMESPACE};
pub use memory_store::MemoryCacheStore;
pub use metrics::CacheMetrics;
pub use pagination::{Pagination, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
pub use redis_store::RedisCacheStore;
pub use store::{CacheLookup, CacheStore, SharedCacheStore};

/// Default TTL values (seconds)
pub mod ttl {
    /// Backstop expiry for a computed feed page; invalidation is the primary mechanism.
    pub const FEED_PAGE: u64 = 300;
}

/// Default bound on a single cache round trip (milliseconds)
pub const DEFAULT_OP_TIMEOUT_MS: u64 = 2_000;
