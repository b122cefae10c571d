mod follow_repo;

pub use follow_repo::PgFollowRepository;

use crate::models::{Direction, UserSummary};
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

/// Directed follow edges between users
///
/// A pair is stored at most once; `insert_follow` reports whether it created
/// the edge.
#[async_trait]
pub trait FollowRepository: Send + Sync {
    async fn user_exists(&self, user_id: i64) -> Result<bool, RepositoryError>;

    /// `false` if the edge already existed
    async fn insert_follow(&self, follower_id: i64, following_id: i64)
        -> Result<bool, RepositoryError>;

    /// `false` if there was no such edge
    async fn delete_follow(&self, follower_id: i64, following_id: i64)
        -> Result<bool, RepositoryError>;

    /// The other end of `user_id`'s edges, newest edge first
    async fn list_connections(
        &self,
        user_id: i64,
        direction: Direction,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserSummary>, RepositoryError>;

    async fn count_connections(
        &self,
        user_id: i64,
        direction: Direction,
    ) -> Result<i64, RepositoryError>;

    async fn ping(&self) -> Result<(), RepositoryError>;
}
