/// Configuration management for Feed Service
///
/// All settings come from environment variables (optionally seeded from a
/// `.env` file by the binary). Defaults target a local development stack.
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use feed_cache::CacheBackend;

/// Secret the auth service ships with; refused in production.
pub const DEFAULT_JWT_SECRET: &str = "your-super-secret-jwt-key";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins, `*` for any
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    /// Upper bound for each feed query
    pub query_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub url: String,
    /// Upper bound for a single cache round trip
    pub op_timeout_ms: u64,
    /// Expiry of a cached feed page
    pub feed_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let backend = match std::env::var("CACHE_BACKEND") {
            Ok(value) => value.parse::<CacheBackend>()?,
            Err(_) => CacheBackend::default(),
        };

        let jwt_secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string());
        if production && (jwt_secret.trim().is_empty() || jwt_secret == DEFAULT_JWT_SECRET) {
            return Err("JWT_SECRET must be set to a non-default value in production".to_string());
        }

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env_parse("PORT", 3004),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "*".to_string(),
                };

                if production && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: database_url(),
                query_timeout_ms: env_parse("STORE_QUERY_TIMEOUT_MS", 3_000),
            },
            cache: CacheConfig {
                backend,
                url: redis_url(),
                op_timeout_ms: env_parse("CACHE_OP_TIMEOUT_MS", feed_cache::DEFAULT_OP_TIMEOUT_MS),
                feed_ttl_secs: env_parse("FEED_CACHE_TTL_SECS", feed_cache::ttl::FEED_PAGE),
            },
            auth: AuthConfig { jwt_secret },
        })
    }

    pub fn feed_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.feed_ttl_secs.max(1))
    }

    pub fn cache_op_timeout(&self) -> Duration {
        Duration::from_millis(self.cache.op_timeout_ms)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.database.query_timeout_ms)
    }
}

/// `DATABASE_URL`, or a URL assembled from the `DB_*` variables
fn database_url() -> String {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        return url;
    }

    let host = std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port: u16 = env_parse("DB_PORT", 5432);
    let name = std::env::var("DB_NAME").unwrap_or_else(|_| "microtweet_db".to_string());
    let user = std::env::var("DB_USER").unwrap_or_else(|_| "microtweet".to_string());
    let password = std::env::var("DB_PASSWORD").unwrap_or_else(|_| "microtweet123".to_string());

    format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, name)
}

/// `REDIS_URL`, or a URL assembled from `REDIS_HOST`/`REDIS_PORT`
fn redis_url() -> String {
    if let Ok(url) = std::env::var("REDIS_URL") {
        return url;
    }

    let host = std::env::var("REDIS_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port: u16 = env_parse("REDIS_PORT", 6379);
    format!("redis://{}:{}", host, port)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
