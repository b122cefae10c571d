//! Prometheus metrics for tweet-service

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    static ref TWEET_MUTATIONS: IntCounterVec = register_int_counter_vec!(
        "tweet_mutations_total",
        "Tweet writes segmented by operation and result",
        &["operation", "result"]
    )
    .expect("failed to register tweet_mutations_total");
}

/// `operation`: create/update/delete; `result`: success/not_found/forbidden/error
pub fn record_mutation(operation: &str, result: &str) {
    TWEET_MUTATIONS
        .with_label_values(&[operation, result])
        .inc();
}

pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&prometheus::gather(), &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
