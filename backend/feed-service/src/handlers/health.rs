use crate::db::FeedStore;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use feed_cache::SharedCacheStore;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

pub struct HealthState {
    store: Arc<dyn FeedStore>,
    cache: SharedCacheStore,
}

impl HealthState {
    pub fn new(store: Arc<dyn FeedStore>, cache: SharedCacheStore) -> Self {
        Self { store, cache }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct ComponentCheck {
    pub status: ComponentStatus,
    pub message: String,
    pub latency_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub status: ComponentStatus,
    pub checks: HashMap<String, ComponentCheck>,
    pub timestamp: String,
}

/// GET /health
pub async fn health_summary() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "feed-service",
    }))
}

/// GET /health/ready
///
/// PostgreSQL is required. A cache outage only degrades the service, since
/// every feed can still be computed from the store.
pub async fn readiness_summary(state: web::Data<HealthState>) -> HttpResponse {
    let mut checks = HashMap::new();

    let start = Instant::now();
    let store_result = state.store.ping().await;
    let latency_ms = start.elapsed().as_millis() as u64;
    let ready = store_result.is_ok();
    checks.insert(
        "postgresql".to_string(),
        match store_result {
            Ok(()) => ComponentCheck {
                status: ComponentStatus::Healthy,
                message: "PostgreSQL connection successful".to_string(),
                latency_ms,
            },
            Err(e) => ComponentCheck {
                status: ComponentStatus::Unhealthy,
                message: format!("PostgreSQL connection failed: {}", e),
                latency_ms,
            },
        },
    );

    let start = Instant::now();
    let cache_result = state.cache.ping().await;
    let latency_ms = start.elapsed().as_millis() as u64;
    let cache_ok = cache_result.is_ok();
    checks.insert(
        "cache".to_string(),
        match cache_result {
            Ok(()) => ComponentCheck {
                status: ComponentStatus::Healthy,
                message: "Cache ping successful".to_string(),
                latency_ms,
            },
            Err(e) => ComponentCheck {
                status: ComponentStatus::Degraded,
                message: format!("Cache ping failed: {}", e),
                latency_ms,
            },
        },
    );

    let status = match (ready, cache_ok) {
        (false, _) => ComponentStatus::Unhealthy,
        (true, false) => ComponentStatus::Degraded,
        (true, true) => ComponentStatus::Healthy,
    };

    let response = ReadinessResponse {
        ready,
        status,
        checks,
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
