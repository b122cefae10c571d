//! Relational reads behind the feed aggregator

mod postgres;

pub use postgres::PgFeedStore;

use crate::models::FeedTweet;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Which authors a feed query covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorScope<'a> {
    All,
    Authors(&'a [i64]),
}

impl AuthorScope<'_> {
    pub fn includes(&self, author_id: i64) -> bool {
        match self {
            AuthorScope::All => true,
            AuthorScope::Authors(ids) => ids.contains(&author_id),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("query timed out after {0:?}")]
    Timeout(Duration),
}

/// Read access to tweets, authors and follow edges
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Tweets joined with author fields, newest first (`created_at DESC, id DESC`)
    async fn fetch_tweets(
        &self,
        scope: AuthorScope<'_>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FeedTweet>, StoreError>;

    /// Number of tweets under `scope`
    async fn count_tweets(&self, scope: AuthorScope<'_>) -> Result<i64, StoreError>;

    /// Ids of the accounts `follower_id` follows
    async fn followee_ids(&self, follower_id: i64) -> Result<Vec<i64>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
