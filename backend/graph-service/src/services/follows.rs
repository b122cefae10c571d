//! Follow edge rules
//!
//! A user may follow any other existing user once. Personal feed pages the
//! follower already has cached keep their old follow set until they expire.

use crate::db::{FollowRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{ConnectionPage, Direction};
use feed_cache::Pagination;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct FollowService {
    repo: Arc<dyn FollowRepository>,
}

impl FollowService {
    pub fn new(repo: Arc<dyn FollowRepository>) -> Self {
        Self { repo }
    }

    pub async fn follow(&self, follower_id: i64, target_id: i64) -> Result<()> {
        if follower_id == target_id {
            metrics::record_mutation("follow", "self");
            return Err(AppError::SelfFollow);
        }

        let exists = self
            .repo
            .user_exists(target_id)
            .await
            .map_err(failed("follow", "following user"))?;
        if !exists {
            metrics::record_mutation("follow", "not_found");
            return Err(AppError::UserNotFound);
        }

        let created = self
            .repo
            .insert_follow(follower_id, target_id)
            .await
            .map_err(failed("follow", "following user"))?;
        if !created {
            metrics::record_mutation("follow", "duplicate");
            return Err(AppError::AlreadyFollowing);
        }

        info!(follower_id, following_id = target_id, "Follow created");
        metrics::record_mutation("follow", "success");
        Ok(())
    }

    pub async fn unfollow(&self, follower_id: i64, target_id: i64) -> Result<()> {
        let removed = self
            .repo
            .delete_follow(follower_id, target_id)
            .await
            .map_err(failed("unfollow", "unfollowing user"))?;
        if !removed {
            metrics::record_mutation("unfollow", "not_found");
            return Err(AppError::NotFollowing);
        }

        info!(follower_id, following_id = target_id, "Follow removed");
        metrics::record_mutation("unfollow", "success");
        Ok(())
    }

    pub async fn connections(
        &self,
        user_id: i64,
        direction: Direction,
        pagination: Pagination,
    ) -> Result<ConnectionPage> {
        let action = match direction {
            Direction::Followers => "fetching followers",
            Direction::Following => "fetching following",
        };

        let (users, total) = tokio::try_join!(
            self.repo.list_connections(
                user_id,
                direction,
                pagination.limit(),
                pagination.offset()
            ),
            self.repo.count_connections(user_id, direction),
        )
        .map_err(|source| {
            tracing::error!(user_id, direction = direction.label(), error = %source, "Follow listing failed");
            AppError::Database { action, source }
        })?;

        Ok(ConnectionPage::new(users, total, pagination))
    }
}

fn failed(
    operation: &'static str,
    action: &'static str,
) -> impl FnOnce(RepositoryError) -> AppError {
    move |source| {
        tracing::error!(operation, error = %source, "Follow store operation failed");
        metrics::record_mutation(operation, "error");
        AppError::Database { action, source }
    }
}
