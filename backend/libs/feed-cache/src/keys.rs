//! Feed cache key schema
//!
//! Key format: feed:{kind}[:{subject}]:{page}:{limit}
//!
//! Page and page size always come last so that one feed partition
//! (public, or personal for a single subject) is a plain key prefix.

use crate::Pagination;
use std::fmt;

/// Namespace shared by every feed cache key
pub const KEY_NAMESPACE: &str = "feed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    Public,
    Personal(i64),
}

impl FeedKind {
    /// Label used in logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            FeedKind::Public => "public",
            FeedKind::Personal(_) => "personal",
        }
    }

    /// Prefix covering every page/page-size of this partition.
    ///
    /// The trailing separator keeps `feed:personal:1:` from matching subject 12.
    pub fn partition_prefix(&self) -> String {
        match self {
            FeedKind::Public => format!("{}:public:", KEY_NAMESPACE),
            FeedKind::Personal(user_id) => format!("{}:personal:{}:", KEY_NAMESPACE, user_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedCacheKey {
    pub kind: FeedKind,
    pub pagination: Pagination,
}

impl FeedCacheKey {
    /// Format: feed:public:{page}:{limit}
    pub fn public(pagination: Pagination) -> Self {
        Self {
            kind: FeedKind::Public,
            pagination,
        }
    }

    /// Format: feed:personal:{user_id}:{page}:{limit}
    pub fn personal(user_id: i64, pagination: Pagination) -> Self {
        Self {
            kind: FeedKind::Personal(user_id),
            pagination,
        }
    }
}

impl fmt::Display for FeedCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.partition_prefix(), self.pagination)
    }
}

/// Partition label for a rendered key, `unknown` for foreign keys
pub(crate) fn partition_of(key: &str) -> &str {
    let mut parts = key.split(':');
    match (parts.next(), parts.next()) {
        (Some(KEY_NAMESPACE), Some(kind @ ("public" | "personal"))) => kind,
        _ => "unknown",
    }
}
