use super::{RepositoryError, TweetRepository};
use crate::models::Tweet;
use async_trait::async_trait;
use sqlx::PgPool;
use std::future::Future;
use std::time::Duration;

const TWEET_COLUMNS: &str =
    "id::BIGINT AS id, user_id::BIGINT AS user_id, content, created_at, updated_at";

#[derive(Clone)]
pub struct PgTweetRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgTweetRepository {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, RepositoryError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(RepositoryError::from),
            Err(_) => Err(RepositoryError::Timeout(self.query_timeout)),
        }
    }
}

#[async_trait]
impl TweetRepository for PgTweetRepository {
    async fn insert(&self, user_id: i64, content: &str) -> Result<Tweet, RepositoryError> {
        let sql = format!(
            "INSERT INTO tweets (user_id, content, created_at, updated_at) \
             VALUES ($1, $2, NOW(), NOW()) RETURNING {}",
            TWEET_COLUMNS
        );
        self.bounded(
            sqlx::query_as::<_, Tweet>(&sql)
                .bind(user_id)
                .bind(content)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn find(&self, id: i64) -> Result<Option<Tweet>, RepositoryError> {
        let sql = format!("SELECT {} FROM tweets WHERE id = $1", TWEET_COLUMNS);
        self.bounded(
            sqlx::query_as::<_, Tweet>(&sql)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn update_content(
        &self,
        id: i64,
        content: &str,
    ) -> Result<Option<Tweet>, RepositoryError> {
        let sql = format!(
            "UPDATE tweets SET content = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            TWEET_COLUMNS
        );
        self.bounded(
            sqlx::query_as::<_, Tweet>(&sql)
                .bind(id)
                .bind(content)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let result = self
            .bounded(
                sqlx::query("DELETE FROM tweets WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool),
            )
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Tweet>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM tweets WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
            TWEET_COLUMNS
        );
        self.bounded(
            sqlx::query_as::<_, Tweet>(&sql)
                .bind(user_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn count_by_user(&self, user_id: i64) -> Result<i64, RepositoryError> {
        self.bounded(
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tweets WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.bounded(sqlx::query("SELECT 1").execute(&self.pool))
            .await
            .map(|_| ())
    }
}
