use super::{AuthorScope, FeedStore, StoreError};
use crate::metrics;
use crate::models::FeedTweet;
use async_trait::async_trait;
use sqlx::PgPool;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::error;

// Integer columns are widened so rows decode into i64 regardless of the
// column width the schema owner picked.
const SELECT_FEED_TWEETS: &str = r#"
    SELECT t.id::BIGINT AS id,
           t.user_id::BIGINT AS user_id,
           t.content,
           t.created_at,
           t.updated_at,
           u.username,
           u.avatar_url
    FROM tweets t
    JOIN users u ON t.user_id = u.id
"#;

const NEWEST_FIRST: &str = "ORDER BY t.created_at DESC, t.id DESC";

/// PostgreSQL-backed feed reads; every query is bounded by `query_timeout`
#[derive(Clone)]
pub struct PgFeedStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgFeedStore {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn bounded<T, F>(&self, query: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        let start = Instant::now();
        let result = match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                error!(query, error = %e, "Feed store query failed");
                Err(StoreError::Database(e))
            }
            Err(_) => {
                error!(
                    query,
                    timeout_ms = self.query_timeout.as_millis() as u64,
                    "Feed store query timed out"
                );
                Err(StoreError::Timeout(self.query_timeout))
            }
        };
        metrics::record_store_query(query, result.is_ok(), start.elapsed());
        result
    }
}

#[async_trait]
impl FeedStore for PgFeedStore {
    async fn fetch_tweets(
        &self,
        scope: AuthorScope<'_>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FeedTweet>, StoreError> {
        match scope {
            AuthorScope::All => {
                let sql = format!("{} {} LIMIT $1 OFFSET $2", SELECT_FEED_TWEETS, NEWEST_FIRST);
                self.bounded(
                    "fetch_public",
                    sqlx::query_as::<_, FeedTweet>(&sql)
                        .bind(limit)
                        .bind(offset)
                        .fetch_all(&self.pool),
                )
                .await
            }
            AuthorScope::Authors(ids) => {
                let sql = format!(
                    "{} WHERE t.user_id = ANY($1::BIGINT[]) {} LIMIT $2 OFFSET $3",
                    SELECT_FEED_TWEETS, NEWEST_FIRST
                );
                self.bounded(
                    "fetch_authors",
                    sqlx::query_as::<_, FeedTweet>(&sql)
                        .bind(ids)
                        .bind(limit)
                        .bind(offset)
                        .fetch_all(&self.pool),
                )
                .await
            }
        }
    }

    async fn count_tweets(&self, scope: AuthorScope<'_>) -> Result<i64, StoreError> {
        match scope {
            AuthorScope::All => {
                self.bounded(
                    "count_public",
                    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tweets")
                        .fetch_one(&self.pool),
                )
                .await
            }
            AuthorScope::Authors(ids) => {
                self.bounded(
                    "count_authors",
                    sqlx::query_scalar::<_, i64>(
                        "SELECT COUNT(*) FROM tweets WHERE user_id = ANY($1::BIGINT[])",
                    )
                    .bind(ids)
                    .fetch_one(&self.pool),
                )
                .await
            }
        }
    }

    async fn followee_ids(&self, follower_id: i64) -> Result<Vec<i64>, StoreError> {
        self.bounded(
            "followees",
            sqlx::query_scalar::<_, i64>(
                "SELECT following_id::BIGINT FROM follows WHERE follower_id = $1::BIGINT",
            )
            .bind(follower_id)
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.bounded(
            "ping",
            sqlx::query("SELECT 1").execute(&self.pool),
        )
        .await
        .map(|_| ())
    }
}
