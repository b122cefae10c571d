use crate::{CacheError, CacheLookup, CacheResult, CacheStore};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Keys fetched per SCAN round trip
const SCAN_BATCH: usize = 100;

/// Redis-backed cache store
///
/// Every round trip is bounded by `op_timeout`; an elapsed timeout is
/// reported the same way as a Redis error.
#[derive(Clone)]
pub struct RedisCacheStore {
    redis: ConnectionManager,
    op_timeout: Duration,
}

impl RedisCacheStore {
    pub fn new(redis: ConnectionManager, op_timeout: Duration) -> Self {
        Self { redis, op_timeout }
    }

    /// Open a managed connection to `redis_url`
    pub async fn connect(redis_url: &str, op_timeout: Duration) -> CacheResult<Self> {
        let client = redis::Client::open(redis_url)?;
        let manager = tokio::time::timeout(op_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout(op_timeout))??;

        Ok(Self::new(manager, op_timeout))
    }

    async fn bounded<F, T>(&self, op: F) -> CacheResult<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.op_timeout, op).await {
            Ok(result) => result.map_err(CacheError::Redis),
            Err(_) => Err(CacheError::Timeout(self.op_timeout)),
        }
    }
}

#[async_trait::async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> CacheLookup {
        let mut conn = self.redis.clone();

        match self.bounded(conn.get::<_, Option<Vec<u8>>>(key)).await {
            Ok(Some(bytes)) => CacheLookup::Hit(bytes),
            Ok(None) => CacheLookup::Miss,
            Err(e) => {
                warn!(key = %key, error = %e, "Redis GET failed");
                CacheLookup::Unavailable(e)
            }
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        let mut conn = self.redis.clone();
        // SETEX rejects a zero expiry
        let ttl_secs = ttl.as_secs().max(1);

        self.bounded(conn.set_ex::<_, _, ()>(key, value, ttl_secs))
            .await?;

        debug!(key = %key, ttl = ttl_secs, "Redis SETEX");
        Ok(())
    }

    async fn delete_matching(&self, prefix: &str) -> CacheResult<usize> {
        let pattern = format!("{}*", escape_glob(prefix));
        let mut conn = self.redis.clone();
        let mut cursor: u64 = 0;
        let mut removed = 0;

        loop {
            // SCAN instead of KEYS so a large keyspace never blocks Redis
            let (next_cursor, keys): (u64, Vec<String>) = self
                .bounded(
                    redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(&pattern)
                        .arg("COUNT")
                        .arg(SCAN_BATCH)
                        .query_async(&mut conn),
                )
                .await?;

            if !keys.is_empty() {
                let deleted: usize = self
                    .bounded(redis::cmd("DEL").arg(&keys).query_async(&mut conn))
                    .await?;
                removed += deleted;
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        debug!(pattern = %pattern, removed, "Redis scan delete");
        Ok(removed)
    }

    async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.redis.clone();
        let pong: String = self
            .bounded(redis::cmd("PING").query_async(&mut conn))
            .await?;

        if pong == "PONG" {
            Ok(())
        } else {
            Err(CacheError::Unavailable(format!(
                "unexpected PING response: {}",
                pong
            )))
        }
    }
}

/// Escape glob metacharacters so a key prefix matches literally in SCAN MATCH
fn escape_glob(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
