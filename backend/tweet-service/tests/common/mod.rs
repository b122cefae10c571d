//! In-memory database shared by the tweet write path and the feed read path

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use feed_cache::{CacheError, CacheLookup, CacheResult, CacheStore, MemoryCacheStore};
use feed_service::db::{AuthorScope, FeedStore, StoreError};
use feed_service::models::FeedTweet;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tweet_service::db::{RepositoryError, TweetRepository};
use tweet_service::models::Tweet;

struct Tables {
    users: HashMap<i64, String>,
    tweets: BTreeMap<i64, Tweet>,
    follows: HashSet<(i64, i64)>,
    next_id: i64,
    clock: DateTime<Utc>,
}

impl Tables {
    /// Each write happens one minute after the previous one
    fn tick(&mut self) -> DateTime<Utc> {
        self.clock = self.clock + ChronoDuration::minutes(1);
        self.clock
    }

    fn sorted(&self, keep: impl Fn(&Tweet) -> bool) -> Vec<&Tweet> {
        let mut tweets: Vec<&Tweet> = self.tweets.values().filter(|t| keep(t)).collect();
        tweets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        tweets
    }
}

fn page<T>(items: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
    items
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(0))
        .collect()
}

pub struct SharedDb {
    tables: Mutex<Tables>,
    failing: AtomicBool,
}

impl Default for SharedDb {
    fn default() -> Self {
        Self {
            tables: Mutex::new(Tables {
                users: HashMap::new(),
                tweets: BTreeMap::new(),
                follows: HashSet::new(),
                next_id: 1,
                clock: Utc
                    .with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
                    .single()
                    .expect("valid timestamp"),
            }),
            failing: AtomicBool::new(false),
        }
    }
}

impl SharedDb {
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

    pub fn follow(&self, follower_id: i64, followee_id: i64) {
        self.tables
            .lock()
            .unwrap()
            .follows
            .insert((follower_id, followee_id));
    }

    pub fn tweet_count(&self) -> usize {
        self.tables.lock().unwrap().tweets.len()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.failing.load(Ordering::SeqCst) {
            Err(sqlx::Error::PoolTimedOut)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TweetRepository for SharedDb {
    async fn insert(&self, user_id: i64, content: &str) -> Result<Tweet, RepositoryError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let now = tables.tick();
        let id = tables.next_id;
        tables.next_id += 1;

        let tweet = Tweet {
            id,
            user_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.tweets.insert(id, tweet.clone());
        Ok(tweet)
    }

    async fn find(&self, id: i64) -> Result<Option<Tweet>, RepositoryError> {
        self.check()?;
        Ok(self.tables.lock().unwrap().tweets.get(&id).cloned())
    }

    async fn update_content(
        &self,
        id: i64,
        content: &str,
    ) -> Result<Option<Tweet>, RepositoryError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let now = tables.tick();
        Ok(tables.tweets.get_mut(&id).map(|tweet| {
            tweet.content = content.to_string();
            tweet.updated_at = now;
            tweet.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        self.check()?;
        Ok(self.tables.lock().unwrap().tweets.remove(&id).is_some())
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Tweet>, RepositoryError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let tweets = tables
            .sorted(|t| t.user_id == user_id)
            .into_iter()
            .cloned()
            .collect();
        Ok(page(tweets, limit, offset))
    }

    async fn count_by_user(&self, user_id: i64) -> Result<i64, RepositoryError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.tweets.values().filter(|t| t.user_id == user_id).count() as i64)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check()?;
        Ok(())
    }
}

#[async_trait]
impl FeedStore for SharedDb {
    async fn fetch_tweets(
        &self,
        scope: AuthorScope<'_>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FeedTweet>, StoreError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let tweets = tables
            .sorted(|t| scope.includes(t.user_id) && tables.users.contains_key(&t.user_id))
            .into_iter()
            .map(|t| FeedTweet {
                id: t.id,
                user_id: t.user_id,
                content: t.content.clone(),
                created_at: t.created_at,
                updated_at: t.updated_at,
                username: tables.users[&t.user_id].clone(),
                avatar_url: None,
            })
            .collect();
        Ok(page(tweets, limit, offset))
    }

    async fn count_tweets(&self, scope: AuthorScope<'_>) -> Result<i64, StoreError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .tweets
            .values()
            .filter(|t| scope.includes(t.user_id))
            .count() as i64)
    }

    async fn followee_ids(&self, follower_id: i64) -> Result<Vec<i64>, StoreError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .follows
            .iter()
            .filter(|(follower, _)| *follower == follower_id)
            .map(|(_, followee)| *followee)
            .collect())
    }
}

/// Memory cache that can be switched off to simulate an outage
#[derive(Clone, Default)]
pub struct FlakyCache {
    pub inner: MemoryCacheStore,
    down: std::sync::Arc<AtomicBool>,
}

impl FlakyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn is_down(&self) -> bool {
        self.down.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStore for FlakyCache {
    async fn get(&self, key: &str) -> CacheLookup {
        if self.is_down() {
            return CacheLookup::Unavailable(CacheError::Unavailable("cache down".into()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        if self.is_down() {
            return Err(CacheError::Unavailable("cache down".into()));
        }
        self.inner.set(key, value, ttl).await
    }

    async fn delete_matching(&self, prefix: &str) -> CacheResult<usize> {
        if self.is_down() {
            return Err(CacheError::Unavailable("cache down".into()));
        }
        self.inner.delete_matching(prefix).await
    }

    async fn ping(&self) -> CacheResult<()> {
        if self.is_down() {
            return Err(CacheError::Unavailable("cache down".into()));
        }
        Ok(())
    }
}
