use chrono::{DateTime, Utc};
use feed_cache::Pagination;
use serde::{Deserialize, Serialize};

/// Shown on the personal feed of a subject who follows nobody
pub const NO_FOLLOWS_MESSAGE: &str = "Follow some users to see their tweets here";

/// A tweet joined with its author's display fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FeedTweet {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub username: String,
    pub avatar_url: Option<String>,
}

/// One page of a feed, as cached and as returned over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPage {
    pub tweets: Vec<FeedTweet>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FeedPage {
    pub fn new(tweets: Vec<FeedTweet>, total: i64, pagination: Pagination) -> Self {
        Self {
            tweets,
            total,
            page: pagination.page(),
            pages: pagination.page_count(total),
            message: None,
        }
    }

    /// Terminal result for a subject with an empty follow set
    pub fn no_follows(pagination: Pagination) -> Self {
        Self {
            tweets: Vec::new(),
            total: 0,
            page: pagination.page(),
            pages: 0,
            message: Some(NO_FOLLOWS_MESSAGE.to_string()),
        }
    }
}
