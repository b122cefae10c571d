//! Tweet business logic
//!
//! Writes go to the repository first. Only after a write has succeeded is the
//! feed cache invalidated for the author; a failed write leaves the cache alone.

use crate::db::TweetRepository;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{validate_content, Tweet, TweetPage};
use feed_cache::{FeedInvalidator, Pagination};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct TweetService {
    repo: Arc<dyn TweetRepository>,
    invalidator: FeedInvalidator,
}

impl TweetService {
    pub fn new(repo: Arc<dyn TweetRepository>, invalidator: FeedInvalidator) -> Self {
        Self { repo, invalidator }
    }

    pub async fn create_tweet(&self, author_id: i64, content: Option<&str>) -> Result<Tweet> {
        let content = validate_content(content)?;

        let tweet = self
            .repo
            .insert(author_id, &content)
            .await
            .map_err(failed("create", "creating tweet"))?;

        info!(tweet_id = tweet.id, author_id, "Tweet created");
        metrics::record_mutation("create", "success");
        self.invalidator.invalidate_for_author(author_id).await;
        Ok(tweet)
    }

    pub async fn get_tweet(&self, tweet_id: i64) -> Result<Tweet> {
        self.repo
            .find(tweet_id)
            .await
            .map_err(AppError::database("fetching tweet"))?
            .ok_or(AppError::NotFound)
    }

    /// Replace the content of one of the caller's own tweets
    pub async fn update_tweet(
        &self,
        author_id: i64,
        tweet_id: i64,
        content: Option<&str>,
    ) -> Result<Tweet> {
        let content = validate_content(content)?;
        self.authorize(author_id, tweet_id, "update", "updating tweet")
            .await?;

        let tweet = self
            .repo
            .update_content(tweet_id, &content)
            .await
            .map_err(failed("update", "updating tweet"))?
            .ok_or(AppError::NotFound)?;

        info!(tweet_id, author_id, "Tweet updated");
        metrics::record_mutation("update", "success");
        self.invalidator.invalidate_for_author(author_id).await;
        Ok(tweet)
    }

    /// Delete one of the caller's own tweets
    pub async fn delete_tweet(&self, author_id: i64, tweet_id: i64) -> Result<()> {
        self.authorize(author_id, tweet_id, "delete", "deleting tweet")
            .await?;

        let removed = self
            .repo
            .delete(tweet_id)
            .await
            .map_err(failed("delete", "deleting tweet"))?;
        if !removed {
            return Err(AppError::NotFound);
        }

        info!(tweet_id, author_id, "Tweet deleted");
        metrics::record_mutation("delete", "success");
        self.invalidator.invalidate_for_author(author_id).await;
        Ok(())
    }

    pub async fn list_user_tweets(&self, user_id: i64, pagination: Pagination) -> Result<TweetPage> {
        let (tweets, total) = tokio::try_join!(
            self.repo
                .list_by_user(user_id, pagination.limit(), pagination.offset()),
            self.repo.count_by_user(user_id),
        )
        .map_err(AppError::database("fetching tweets"))?;

        Ok(TweetPage::new(tweets, total, pagination))
    }

    async fn authorize(
        &self,
        author_id: i64,
        tweet_id: i64,
        operation: &'static str,
        action: &'static str,
    ) -> Result<()> {
        let existing = self
            .repo
            .find(tweet_id)
            .await
            .map_err(failed(operation, action))?;

        match existing {
            None => {
                metrics::record_mutation(operation, "not_found");
                Err(AppError::NotFound)
            }
            Some(tweet) if tweet.user_id != author_id => {
                tracing::warn!(tweet_id, author_id, owner_id = tweet.user_id, "Tweet mutation by non-author refused");
                metrics::record_mutation(operation, "forbidden");
                Err(AppError::Forbidden)
            }
            Some(_) => Ok(()),
        }
    }
}

fn failed(
    operation: &'static str,
    action: &'static str,
) -> impl FnOnce(crate::db::RepositoryError) -> AppError {
    move |source| {
        tracing::error!(operation, error = %source, "Tweet store operation failed");
        metrics::record_mutation(operation, "error");
        AppError::Database { action, source }
    }
}
