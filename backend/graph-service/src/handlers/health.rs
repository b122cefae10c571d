use crate::db::FollowRepository;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

pub struct HealthState {
    repo: Arc<dyn FollowRepository>,
}

impl HealthState {
    pub fn new(repo: Arc<dyn FollowRepository>) -> Self {
        Self { repo }
    }
}

/// GET /health
pub async fn health_summary() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "graph-service",
    }))
}

/// GET /health/ready
pub async fn readiness_summary(state: web::Data<HealthState>) -> HttpResponse {
    let start = Instant::now();
    let result = state.repo.ping().await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let (ready, check) = match result {
        Ok(()) => (
            true,
            serde_json::json!({
                "status": "healthy",
                "message": "PostgreSQL connection successful",
                "latency_ms": latency_ms,
            }),
        ),
        Err(e) => (
            false,
            serde_json::json!({
                "status": "unhealthy",
                "message": format!("PostgreSQL connection failed: {}", e),
                "latency_ms": latency_ms,
            }),
        ),
    };

    let body = serde_json::json!({
        "ready": ready,
        "status": if ready { "healthy" } else { "unhealthy" },
        "checks": { "postgresql": check },
        "timestamp": Utc::now().to_rfc3339(),
    });

    if ready {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
