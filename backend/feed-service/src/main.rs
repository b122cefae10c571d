use actix_cors::Cors;
use actix_middleware::JwtValidator;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use feed_cache::{MemoryCacheStore, RedisCacheStore, SharedCacheStore};
use feed_service::config::{CacheBackend, Config};
use feed_service::db::{FeedStore, PgFeedStore};
use feed_service::handlers::{self, HealthState};
use feed_service::{metrics, FeedAggregator};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(true),
        )
        .init();
}

async fn build_cache(config: &Config) -> anyhow::Result<SharedCacheStore> {
    match config.cache.backend {
        CacheBackend::Redis => {
            let store = RedisCacheStore::connect(&config.cache.url, config.cache_op_timeout())
                .await
                .context("failed to connect to Redis")?;
            tracing::info!(op_timeout_ms = config.cache.op_timeout_ms, "Redis feed cache connected");
            Ok(Arc::new(store))
        }
        CacheBackend::Memory => {
            tracing::warn!("Using in-process feed cache; invalidations from other processes are not seen");
            Ok(Arc::new(MemoryCacheStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            anyhow::bail!("failed to load configuration: {}", e);
        }
    };

    tracing::info!("Starting feed-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let db_cfg = db_pool::DbConfig::for_service("feed-service", &config.database.url);
    db_cfg.log_config();
    let pool = db_pool::create_pool(&db_cfg)
        .await
        .context("failed to create database pool")?;

    let cache = build_cache(&config).await?;
    let store: Arc<dyn FeedStore> = Arc::new(PgFeedStore::new(pool, config.query_timeout()));

    let aggregator = web::Data::new(FeedAggregator::new(
        store.clone(),
        cache.clone(),
        config.feed_ttl(),
    ));
    let health_state = web::Data::new(HealthState::new(store, cache));
    let validator = Arc::new(JwtValidator::new(&config.auth.jwt_secret));

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!(
        feed_ttl_secs = config.cache.feed_ttl_secs,
        "Starting HTTP server at {}",
        bind_address
    );

    let allowed_origins = config.cors.allowed_origins.clone();
    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(aggregator.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/health", web::get().to(handlers::health_summary))
            .route("/health/ready", web::get().to(handlers::readiness_summary))
            .route("/metrics", web::get().to(metrics::serve_metrics))
            .configure(handlers::configure(validator.clone()))
    })
    .bind(&bind_address)
    .with_context(|| format!("failed to bind {}", bind_address))?
    .run()
    .await
    .context("feed-service HTTP server failed")?;

    tracing::info!("feed-service shut down");
    Ok(())
}
