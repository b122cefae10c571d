use super::{FollowRepository, RepositoryError};
use crate::models::{Direction, UserSummary};
use async_trait::async_trait;
use sqlx::PgPool;
use std::future::Future;
use std::time::Duration;

/// (column matched against the subject, column joined to `users`)
fn edge_columns(direction: Direction) -> (&'static str, &'static str) {
    match direction {
        Direction::Followers => ("following_id", "follower_id"),
        Direction::Following => ("follower_id", "following_id"),
    }
}

#[derive(Clone)]
pub struct PgFollowRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgFollowRepository {
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
impl FollowRepository for PgFollowRepository {
    async fn user_exists(&self, user_id: i64) -> Result<bool, RepositoryError> {
        self.bounded(
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(user_id)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn insert_follow(
        &self,
        follower_id: i64,
        following_id: i64,
    ) -> Result<bool, RepositoryError> {
        let result = self
            .bounded(
                sqlx::query(
                    r#"
                    INSERT INTO follows (follower_id, following_id, created_at)
                    VALUES ($1, $2, NOW())
                    ON CONFLICT (follower_id, following_id) DO NOTHING
                    "#,
                )
                .bind(follower_id)
                .bind(following_id)
                .execute(&self.pool),
            )
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_follow(
        &self,
        follower_id: i64,
        following_id: i64,
    ) -> Result<bool, RepositoryError> {
        let result = self
            .bounded(
                sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
                    .bind(follower_id)
                    .bind(following_id)
                    .execute(&self.pool),
            )
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_connections(
        &self,
        user_id: i64,
        direction: Direction,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserSummary>, RepositoryError> {
        let (subject, other) = edge_columns(direction);
        let sql = format!(
            "SELECT u.id::BIGINT AS id, u.username, u.bio, u.avatar_url \
             FROM follows f JOIN users u ON u.id = f.{other} \
             WHERE f.{subject} = $1 \
             ORDER BY f.created_at DESC, f.{other} DESC LIMIT $2 OFFSET $3",
        );
        self.bounded(
            sqlx::query_as::<_, UserSummary>(&sql)
                .bind(user_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn count_connections(
        &self,
        user_id: i64,
        direction: Direction,
    ) -> Result<i64, RepositoryError> {
        let (subject, _) = edge_columns(direction);
        let sql = format!("SELECT COUNT(*) FROM follows WHERE {subject} = $1");
        self.bounded(
            sqlx::query_scalar::<_, i64>(&sql)
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
