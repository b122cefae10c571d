use actix_cors::Cors;
use actix_middleware::JwtValidator;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use feed_cache::{
    CacheBackend, FeedInvalidator, MemoryCacheStore, RedisCacheStore, SharedCacheStore,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tweet_service::db::{PgTweetRepository, TweetRepository};
use tweet_service::handlers::{self, HealthState};
use tweet_service::{metrics, Config, TweetService};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_line_number(true)
                .with_target(true),
        )
        .init();

    let config = Config::from_env()
        .map_err(|e| anyhow::anyhow!("failed to load configuration: {}", e))?;

    tracing::info!("Starting tweet-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let db_cfg = db_pool::DbConfig::for_service("tweet-service", &config.database.url);
    db_cfg.log_config();
    let pool = db_pool::create_pool(&db_cfg)
        .await
        .context("failed to create database pool")?;

    let cache: SharedCacheStore = match config.cache.backend {
        CacheBackend::Memory => {
            tracing::warn!("In-process cache backend: invalidations do not reach feed-service");
            Arc::new(MemoryCacheStore::new())
        }
        CacheBackend::Redis => Arc::new(
            RedisCacheStore::connect(&config.cache.url, config.cache_op_timeout())
                .await
                .context("failed to connect to Redis")?,
        ),
    };

    let repo: Arc<dyn TweetRepository> =
        Arc::new(PgTweetRepository::new(pool, config.query_timeout()));
    let health = web::Data::new(HealthState::new(repo.clone(), cache.clone()));
    let service = web::Data::new(TweetService::new(repo, FeedInvalidator::new(cache)));
    let validator = Arc::new(JwtValidator::new(&config.auth.jwt_secret));

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',').map(str::trim) {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(service.clone())
            .app_data(health.clone())
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
    .context("tweet-service HTTP server failed")?;

    Ok(())
}
