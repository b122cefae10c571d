//! Prometheus metrics for graph-service

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    static ref FOLLOW_MUTATIONS: IntCounterVec = register_int_counter_vec!(
        "follow_mutations_total",
        "Follow edge writes segmented by operation and result",
        &["operation", "result"]
    )
    .expect("failed to register follow_mutations_total");
}

/// `operation`: follow/unfollow; `result`: success/self/not_found/duplicate/error
pub fn record_mutation(operation: &str, result: &str) {
    FOLLOW_MUTATIONS
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
