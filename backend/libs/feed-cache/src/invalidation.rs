//! Write-path feed cache invalidation
//!
//! Runs after a tweet create/update/delete has been committed. Drops the whole
//! public partition and the author's own personal partition.
//!
//! Followers' personal partitions are not touched: personal keys are grouped by
//! subject, not by the authors they contain, so a follower keeps seeing its
//! cached page until the TTL runs out.

use crate::{CacheMetrics, FeedKind, SharedCacheStore};
use tracing::{info, warn};

/// Keys removed per partition; `None` marks a partition whose delete failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InvalidationReport {
    pub public_removed: Option<usize>,
    pub personal_removed: Option<usize>,
}

impl InvalidationReport {
    /// Both partitions were dropped
    pub fn is_complete(&self) -> bool {
        self.public_removed.is_some() && self.personal_removed.is_some()
    }
}

#[derive(Clone)]
pub struct FeedInvalidator {
    cache: SharedCacheStore,
    metrics: CacheMetrics,
}

impl FeedInvalidator {
    pub fn new(cache: SharedCacheStore) -> Self {
        Self {
            cache,
            metrics: CacheMetrics::new(),
        }
    }

    /// Drop every cached page affected by a tweet mutation of `author_id`.
    ///
    /// Never fails: a cache outage leaves stale pages behind until they expire.
    pub async fn invalidate_for_author(&self, author_id: i64) -> InvalidationReport {
        let public_prefix = FeedKind::Public.partition_prefix();
        let personal_prefix = FeedKind::Personal(author_id).partition_prefix();

        let (public_removed, personal_removed) = tokio::join!(
            self.drop_partition(&public_prefix),
            self.drop_partition(&personal_prefix)
        );

        let report = InvalidationReport {
            public_removed,
            personal_removed,
        };

        if report.is_complete() {
            info!(
                author_id,
                public_removed = ?report.public_removed,
                personal_removed = ?report.personal_removed,
                "Feed cache invalidated"
            );
        } else {
            warn!(
                author_id,
                public_removed = ?report.public_removed,
                personal_removed = ?report.personal_removed,
                "Feed cache invalidation incomplete, stale pages remain until TTL expiry"
            );
        }

        report
    }

    async fn drop_partition(&self, prefix: &str) -> Option<usize> {
        match self.cache.delete_matching(prefix).await {
            Ok(removed) => {
                self.metrics.record_invalidation(prefix, Some(removed));
                Some(removed)
            }
            Err(e) => {
                warn!(prefix = %prefix, error = %e, "Feed cache partition delete failed");
                self.metrics.record_invalidation(prefix, None);
                None
            }
        }
    }
}
