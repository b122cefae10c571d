use crate::db::TweetRepository;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use feed_cache::SharedCacheStore;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

pub struct HealthState {
    repo: Arc<dyn TweetRepository>,
    cache: SharedCacheStore,
}

impl HealthState {
    pub fn new(repo: Arc<dyn TweetRepository>, cache: SharedCacheStore) -> Self {
        Self { repo, cache }
    }
}

#[derive(Debug, Serialize)]
pub struct ComponentCheck {
    pub status: &'static str,
    pub message: String,
    pub latency_ms: u64,
}

/// GET /health
pub async fn health_summary() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "tweet-service",
    }))
}

/// GET /health/ready
///
/// Writes need PostgreSQL. Without the cache, writes still succeed but their
/// invalidations are lost until the pages expire, so that only degrades.
pub async fn readiness_summary(state: web::Data<HealthState>) -> HttpResponse {
    let mut checks = HashMap::new();

    let start = Instant::now();
    let repo_result = state.repo.ping().await;
    let ready = repo_result.is_ok();
    checks.insert(
        "postgresql",
        ComponentCheck {
            status: if ready { "healthy" } else { "unhealthy" },
            message: match repo_result {
                Ok(()) => "PostgreSQL connection successful".to_string(),
                Err(e) => format!("PostgreSQL connection failed: {}", e),
            },
            latency_ms: start.elapsed().as_millis() as u64,
        },
    );

    let start = Instant::now();
    let cache_result = state.cache.ping().await;
    let cache_ok = cache_result.is_ok();
    checks.insert(
        "cache",
        ComponentCheck {
            status: if cache_ok { "healthy" } else { "degraded" },
            message: match cache_result {
                Ok(()) => "Cache ping successful".to_string(),
                Err(e) => format!("Cache ping failed: {}", e),
            },
            latency_ms: start.elapsed().as_millis() as u64,
        },
    );

    let status = match (ready, cache_ok) {
        (false, _) => "unhealthy",
        (true, false) => "degraded",
        (true, true) => "healthy",
    };
    let body = serde_json::json!({
        "ready": ready,
        "status": status,
        "checks": checks,
        "timestamp": Utc::now().to_rfc3339(),
    });

    if ready {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
