mod tweet_repo;

pub use tweet_repo::PgTweetRepository;

use crate::models::Tweet;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("query timed out after {0:?}")]
    Timeout(Duration),
}

/// Persistence for tweets
#[async_trait]
pub trait TweetRepository: Send + Sync {
    async fn insert(&self, user_id: i64, content: &str) -> Result<Tweet, RepositoryError>;

    async fn find(&self, id: i64) -> Result<Option<Tweet>, RepositoryError>;

    /// Replace content and bump `updated_at`; `None` if the tweet is gone
    async fn update_content(&self, id: i64, content: &str)
        -> Result<Option<Tweet>, RepositoryError>;

    /// `true` if a row was removed
    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;

    /// A user's tweets, newest first
    async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Tweet>, RepositoryError>;

    async fn count_by_user(&self, user_id: i64) -> Result<i64, RepositoryError>;

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
