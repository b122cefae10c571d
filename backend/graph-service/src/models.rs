use feed_cache::Pagination;
use serde::{Deserialize, Serialize};

/// Public profile fields shown in follower listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Which end of the follow edge a listing walks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Users following the subject
    Followers,
    /// Users the subject follows
    Following,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::Followers => "followers",
            Direction::Following => "following",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowersPage {
    pub followers: Vec<UserSummary>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowingPage {
    pub following: Vec<UserSummary>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

/// One page of either listing, before it is given its field name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionPage {
    pub users: Vec<UserSummary>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

impl ConnectionPage {
    pub fn new(users: Vec<UserSummary>, total: i64, pagination: Pagination) -> Self {
        Self {
            users,
            total,
            page: pagination.page(),
            pages: pagination.page_count(total),
        }
    }
}

impl From<ConnectionPage> for FollowersPage {
    fn from(page: ConnectionPage) -> Self {
        Self {
            followers: page.users,
            total: page.total,
            page: page.page,
            pages: page.pages,
        }
    }
}

impl From<ConnectionPage> for FollowingPage {
    fn from(page: ConnectionPage) -> Self {
        Self {
            following: page.users,
            total: page.total,
            page: page.page,
            pages: page.pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_field_names() {
        let page = ConnectionPage::new(Vec::new(), 3, Pagination::new(Some(1), Some(2)));

        let followers = serde_json::to_value(FollowersPage::from(page.clone())).unwrap();
        assert_eq!(
            followers,
            serde_json::json!({ "followers": [], "total": 3, "page": 1, "pages": 2 })
        );

        let following = serde_json::to_value(FollowingPage::from(page)).unwrap();
        assert!(following.get("following").is_some());
        assert!(following.get("followers").is_none());
    }
}
