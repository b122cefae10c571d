//! Feed aggregation with read-through page caching
//!
//! Each feed page is looked up in the cache first. On a miss (or when the
//! cache is unreachable or holds an undecodable entry) the page is computed
//! from the store, written back with a fixed TTL and returned. Cache problems
//! only cost latency; store problems fail the request as a whole.

use crate::db::{AuthorScope, FeedStore, StoreError};
use crate::error::{AppError, Result};
use crate::metrics::{self, PageSource};
use crate::models::FeedPage;
use feed_cache::{CacheLookup, CacheMetrics, FeedCacheKey, FeedKind, Pagination, SharedCacheStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct FeedAggregator {
    store: Arc<dyn FeedStore>,
    cache: SharedCacheStore,
    metrics: CacheMetrics,
    page_ttl: Duration,
}

impl FeedAggregator {
    pub fn new(store: Arc<dyn FeedStore>, cache: SharedCacheStore, page_ttl: Duration) -> Self {
        Self {
            store,
            cache,
            metrics: CacheMetrics::new(),
            page_ttl,
        }
    }

    /// All tweets, newest first
    pub async fn public_feed(&self, pagination: Pagination) -> Result<FeedPage> {
        let feed = FeedKind::Public.label();
        let key = FeedCacheKey::public(pagination).to_string();

        if let Some(page) = self.read_cached(&key).await {
            metrics::record_page_served(feed, PageSource::Cache);
            return Ok(page);
        }

        let page = self
            .compute(AuthorScope::All, pagination)
            .await
            .map_err(|e| unavailable(feed, e))?;

        self.write_through(&key, &page).await;
        metrics::record_page_served(feed, PageSource::Store);
        Ok(page)
    }

    /// Tweets authored by the accounts `user_id` follows, newest first.
    ///
    /// An empty follow set yields the no-follows page, which is not cached so
    /// that a first follow shows up on the next read.
    pub async fn personal_feed(&self, user_id: i64, pagination: Pagination) -> Result<FeedPage> {
        let feed = FeedKind::Personal(user_id).label();
        let key = FeedCacheKey::personal(user_id, pagination).to_string();

        if let Some(page) = self.read_cached(&key).await {
            metrics::record_page_served(feed, PageSource::Cache);
            return Ok(page);
        }

        let followees = self
            .store
            .followee_ids(user_id)
            .await
            .map_err(|e| unavailable(feed, e))?;

        if followees.is_empty() {
            debug!(user_id, "Subject follows nobody");
            metrics::record_page_served(feed, PageSource::NoFollows);
            return Ok(FeedPage::no_follows(pagination));
        }

        let page = self
            .compute(AuthorScope::Authors(&followees), pagination)
            .await
            .map_err(|e| unavailable(feed, e))?;

        self.write_through(&key, &page).await;
        metrics::record_page_served(feed, PageSource::Store);
        Ok(page)
    }

    async fn compute(
        &self,
        scope: AuthorScope<'_>,
        pagination: Pagination,
    ) -> std::result::Result<FeedPage, StoreError> {
        let (tweets, total) = tokio::try_join!(
            self.store
                .fetch_tweets(scope, pagination.limit(), pagination.offset()),
            self.store.count_tweets(scope),
        )?;

        Ok(FeedPage::new(tweets, total, pagination))
    }

    /// Cached page, or `None` on miss, outage or undecodable entry
    async fn read_cached(&self, key: &str) -> Option<FeedPage> {
        match self.cache.get(key).await {
            CacheLookup::Hit(bytes) => match serde_json::from_slice::<FeedPage>(&bytes) {
                Ok(page) => {
                    debug!(cache_key = %key, "Feed cache hit");
                    self.metrics.record_hit(key);
                    Some(page)
                }
                Err(e) => {
                    warn!(cache_key = %key, error = %e, "Discarding undecodable feed cache entry");
                    self.metrics.record_corrupt(key);
                    None
                }
            },
            CacheLookup::Miss => {
                debug!(cache_key = %key, "Feed cache miss");
                self.metrics.record_miss(key);
                None
            }
            CacheLookup::Unavailable(e) => {
                warn!(cache_key = %key, error = %e, "Feed cache read failed, computing page");
                self.metrics.record_unavailable(key);
                None
            }
        }
    }

    async fn write_through(&self, key: &str, page: &FeedPage) {
        let bytes = match serde_json::to_vec(page) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(cache_key = %key, error = %e, "Failed to encode feed page for cache");
                self.metrics.record_write(key, false);
                return;
            }
        };

        match self.cache.set(key, &bytes, self.page_ttl).await {
            Ok(()) => self.metrics.record_write(key, true),
            Err(e) => {
                warn!(cache_key = %key, error = %e, "Feed cache write failed, serving uncached page");
                self.metrics.record_write(key, false);
            }
        }
    }
}

fn unavailable(feed: &'static str, source: StoreError) -> AppError {
    metrics::record_feed_failure(feed);
    AppError::feed_unavailable(feed, source)
}
