//! Cache metrics for observability

use crate::keys::partition_of;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    /// Feed cache read outcomes (hit/miss/unavailable/corrupt).
    static ref FEED_CACHE_EVENTS: IntCounterVec = register_int_counter_vec!(
        "feed_cache_events_total",
        "Feed cache reads segmented by partition and outcome",
        &["partition", "event"]
    )
    .expect("failed to register feed_cache_events_total");

    /// Feed cache write-through attempts (success/error).
    static ref FEED_CACHE_WRITE_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_cache_write_total",
        "Feed cache write-through attempts segmented by partition and result",
        &["partition", "result"]
    )
    .expect("failed to register feed_cache_write_total");

    /// Partition invalidations (success/error).
    static ref FEED_CACHE_INVALIDATIONS: IntCounterVec = register_int_counter_vec!(
        "feed_cache_invalidations_total",
        "Feed cache partition invalidations segmented by partition and result",
        &["partition", "result"]
    )
    .expect("failed to register feed_cache_invalidations_total");

    static ref FEED_CACHE_KEYS_REMOVED: IntCounterVec = register_int_counter_vec!(
        "feed_cache_keys_removed_total",
        "Feed cache keys removed by invalidation",
        &["partition"]
    )
    .expect("failed to register feed_cache_keys_removed_total");
}

/// Cache metrics recorder, labelled by the partition encoded in the key
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheMetrics;

impl CacheMetrics {
    pub fn new() -> Self {
        Self
    }

    pub fn record_hit(&self, key: &str) {
        Self::event(key, "hit");
    }

    pub fn record_miss(&self, key: &str) {
        Self::event(key, "miss");
    }

    pub fn record_unavailable(&self, key: &str) {
        Self::event(key, "unavailable");
    }

    /// Entry present but not decodable
    pub fn record_corrupt(&self, key: &str) {
        Self::event(key, "corrupt");
    }

    pub fn record_write(&self, key: &str, success: bool) {
        FEED_CACHE_WRITE_TOTAL
            .with_label_values(&[partition_of(key), result_label(success)])
            .inc();
    }

    pub fn record_invalidation(&self, prefix: &str, removed: Option<usize>) {
        let partition = partition_of(prefix);
        FEED_CACHE_INVALIDATIONS
            .with_label_values(&[partition, result_label(removed.is_some())])
            .inc();
        if let Some(removed) = removed {
            FEED_CACHE_KEYS_REMOVED
                .with_label_values(&[partition])
                .inc_by(removed as u64);
        }
    }

    fn event(key: &str, event: &str) {
        FEED_CACHE_EVENTS
            .with_label_values(&[partition_of(key), event])
            .inc();
    }
}

fn result_label(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "error"
    }
}
