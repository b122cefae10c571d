//! Prometheus metrics for feed-service.
//!
//! Exposes feed collectors and an HTTP handler for the `/metrics` endpoint.
//! Cache counters are registered by `feed_cache` and gathered from the same
//! default registry.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};
use std::time::Duration;

lazy_static! {
    /// Feed pages served, by feed kind and where the page came from.
    static ref FEED_PAGES_SERVED: IntCounterVec = register_int_counter_vec!(
        "feed_pages_served_total",
        "Feed pages served segmented by feed and source (cache/store/no_follows)",
        &["feed", "source"]
    )
    .expect("failed to register feed_pages_served_total");

    static ref FEED_FAILURES: IntCounterVec = register_int_counter_vec!(
        "feed_failures_total",
        "Feed requests that failed because the store was unavailable",
        &["feed"]
    )
    .expect("failed to register feed_failures_total");

    static ref STORE_QUERY_DURATION: HistogramVec = register_histogram_vec!(
        "feed_store_query_duration_seconds",
        "Feed store query latency segmented by query and result",
        &["query", "result"],
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 3.0]
    )
    .expect("failed to register feed_store_query_duration_seconds");
}

/// Where a served page came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    Cache,
    Store,
    NoFollows,
}

impl PageSource {
    fn as_str(self) -> &'static str {
        match self {
            PageSource::Cache => "cache",
            PageSource::Store => "store",
            PageSource::NoFollows => "no_follows",
        }
    }
}

pub fn record_page_served(feed: &str, source: PageSource) {
    FEED_PAGES_SERVED
        .with_label_values(&[feed, source.as_str()])
        .inc();
}

pub fn record_feed_failure(feed: &str) {
    FEED_FAILURES.with_label_values(&[feed]).inc();
}

pub fn record_store_query(query: &str, success: bool, elapsed: Duration) {
    let result = if success { "success" } else { "error" };
    STORE_QUERY_DURATION
        .with_label_values(&[query, result])
        .observe(elapsed.as_secs_f64());
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
