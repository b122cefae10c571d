use crate::error::AppError;
use chrono::{DateTime, Utc};
use feed_cache::Pagination;
use serde::{Deserialize, Serialize};

pub const MAX_TWEET_CHARS: usize = 280;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tweet {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shape returned when a tweet has just been created
#[derive(Debug, Clone, Serialize)]
pub struct CreatedTweet {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Tweet> for CreatedTweet {
    fn from(tweet: Tweet) -> Self {
        Self {
            id: tweet.id,
            user_id: tweet.user_id,
            content: tweet.content,
            created_at: tweet.created_at,
        }
    }
}

/// Body of create and update requests
#[derive(Debug, Default, Deserialize)]
pub struct TweetInput {
    pub content: Option<String>,
}

/// Check raw content and return what gets stored (trimmed)
pub fn validate_content(raw: Option<&str>) -> Result<String, AppError> {
    let raw = raw.unwrap_or_default();
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(AppError::Validation("Tweet content is required".to_string()));
    }
    if raw.chars().count() > MAX_TWEET_CHARS {
        return Err(AppError::Validation(
            "Tweet cannot exceed 280 characters".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}

/// One page of a user's own tweets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetPage {
    pub tweets: Vec<Tweet>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

impl TweetPage {
    pub fn new(tweets: Vec<Tweet>, total: i64, pagination: Pagination) -> Self {
        Self {
            tweets,
            total,
            page: pagination.page(),
            pages: pagination.page_count(total),
        }
    }
}
