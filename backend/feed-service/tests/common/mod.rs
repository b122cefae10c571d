//! In-memory collaborators for feed-service tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use feed_cache::{CacheError, CacheLookup, CacheResult, CacheStore};
use feed_service::db::{AuthorScope, FeedStore, StoreError};
use feed_service::models::FeedTweet;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Minute `minute` past `hour` on a fixed day
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

#[derive(Default)]
struct Tables {
    users: HashMap<i64, String>,
    tweets: Vec<FeedTweet>,
    follows: HashSet<(i64, i64)>,
}

/// Tweets, users and follow edges held in memory
#[derive(Default)]
pub struct InMemoryFeedStore {
    tables: Mutex<Tables>,
    failing: AtomicBool,
    queries: AtomicUsize,
}

impl InMemoryFeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, id: i64, username: &str) {
        self.tables
            .lock()
            .unwrap()
            .users
            .insert(id, username.to_string());
    }

    pub fn add_tweet(&self, id: i64, user_id: i64, content: &str, created_at: DateTime<Utc>) {
        let mut tables = self.tables.lock().unwrap();
        let username = tables.users.get(&user_id).cloned().unwrap_or_default();
        tables.tweets.push(FeedTweet {
            id,
            user_id,
            content: content.to_string(),
            created_at,
            updated_at: created_at,
            username,
            avatar_url: None,
        });
    }

    pub fn remove_tweet(&self, id: i64) {
        self.tables.lock().unwrap().tweets.retain(|t| t.id != id);
    }

    pub fn follow(&self, follower_id: i64, followee_id: i64) {
        self.tables
            .lock()
            .unwrap()
            .follows
            .insert((follower_id, followee_id));
    }

    /// Make every subsequent query fail like an unreachable database
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of queries answered so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<(), StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl FeedStore for InMemoryFeedStore {
    async fn fetch_tweets(
        &self,
        scope: AuthorScope<'_>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FeedTweet>, StoreError> {
        self.begin()?;
        let tables = self.tables.lock().unwrap();
        let mut tweets: Vec<FeedTweet> = tables
            .tweets
            .iter()
            .filter(|t| scope.includes(t.user_id) && tables.users.contains_key(&t.user_id))
            .cloned()
            .collect();
        tweets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(tweets
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }

    async fn count_tweets(&self, scope: AuthorScope<'_>) -> Result<i64, StoreError> {
        self.begin()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .tweets
            .iter()
            .filter(|t| scope.includes(t.user_id))
            .count() as i64)
    }

    async fn followee_ids(&self, follower_id: i64) -> Result<Vec<i64>, StoreError> {
        self.begin()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .follows
            .iter()
            .filter(|(follower, _)| *follower == follower_id)
            .map(|(_, followee)| *followee)
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.begin()
    }
}

/// Cache whose backend is unreachable
pub struct DownCache;

#[async_trait]
impl CacheStore for DownCache {
    async fn get(&self, _key: &str) -> CacheLookup {
        CacheLookup::Unavailable(CacheError::Unavailable("connection refused".into()))
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) -> CacheResult<()> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn delete_matching(&self, _prefix: &str) -> CacheResult<usize> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn ping(&self) -> CacheResult<()> {
        Err(CacheError::Unavailable("connection refused".into()))
    }
}
