/// Configuration management for Tweet Service
use feed_cache::CacheBackend;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_JWT_SECRET: &str = "your-super-secret-jwt-key";

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
    pub env: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub query_timeout_ms: u64,
}

/// Cache the feed service reads from; this service only invalidates it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub url: String,
    pub op_timeout_ms: u64,
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

        let jwt_secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string());
        if production && (jwt_secret.trim().is_empty() || jwt_secret == DEFAULT_JWT_SECRET) {
            return Err("JWT_SECRET must be set to a non-default value in production".to_string());
        }

        let backend = match std::env::var("CACHE_BACKEND") {
            Ok(value) => value.parse::<CacheBackend>()?,
            Err(_) => CacheBackend::default(),
        };

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

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env_parse("PORT", 3003),
            },
            cors: CorsConfig { allowed_origins },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL").unwrap_or_else(|_| {
                    format!(
                        "postgres://{}:{}@{}:{}/{}",
                        env_or("DB_USER", "microtweet"),
                        env_or("DB_PASSWORD", "microtweet123"),
                        env_or("DB_HOST", "localhost"),
                        env_parse::<u16>("DB_PORT", 5432),
                        env_or("DB_NAME", "microtweet_db"),
                    )
                }),
                query_timeout_ms: env_parse("STORE_QUERY_TIMEOUT_MS", 3_000),
            },
            cache: CacheConfig {
                backend,
                url: std::env::var("REDIS_URL").unwrap_or_else(|_| {
                    format!(
                        "redis://{}:{}",
                        env_or("REDIS_HOST", "localhost"),
                        env_parse::<u16>("REDIS_PORT", 6379)
                    )
                }),
                op_timeout_ms: env_parse("CACHE_OP_TIMEOUT_MS", feed_cache::DEFAULT_OP_TIMEOUT_MS),
            },
            auth: AuthConfig { jwt_secret },
        })
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.database.query_timeout_ms)
    }

    pub fn cache_op_timeout(&self) -> Duration {
        Duration::from_millis(self.cache.op_timeout_ms)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
