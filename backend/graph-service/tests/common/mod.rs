//! In-memory social graph, also readable as a feed store

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use feed_service::db::{AuthorScope, FeedStore, StoreError};
use feed_service::models::FeedTweet;
use graph_service::db::{FollowRepository, RepositoryError};
use graph_service::models::{Direction, UserSummary};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

struct Tables {
    users: BTreeMap<i64, String>,
    /// (follower, following) -> edge creation order
    follows: HashMap<(i64, i64), u64>,
    tweets: Vec<FeedTweet>,
    sequence: u64,
    clock: DateTime<Utc>,
}

impl Tables {
    fn next(&mut self) -> (u64, DateTime<Utc>) {
        self.sequence += 1;
        self.clock = self.clock + ChronoDuration::minutes(1);
        (self.sequence, self.clock)
    }
}

fn page<T>(items: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
    items
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(0))
        .collect()
}

pub struct SocialDb {
    tables: Mutex<Tables>,
    failing: AtomicBool,
}

impl Default for SocialDb {
    fn default() -> Self {
        Self {
            tables: Mutex::new(Tables {
                users: BTreeMap::new(),
                follows: HashMap::new(),
                tweets: Vec::new(),
                sequence: 0,
                clock: Utc
                    .with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
                    .single()
                    .expect("valid timestamp"),
            }),
            failing: AtomicBool::new(false),
        }
    }
}

impl SocialDb {
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

    pub fn add_tweet(&self, user_id: i64, content: &str) {
        let mut tables = self.tables.lock().unwrap();
        let (id, now) = tables.next();
        let username = tables.users.get(&user_id).cloned().unwrap_or_default();
        tables.tweets.push(FeedTweet {
            id: id as i64,
            user_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
            username,
            avatar_url: None,
        });
    }

    pub fn edge_count(&self) -> usize {
        self.tables.lock().unwrap().follows.len()
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
impl FollowRepository for SocialDb {
    async fn user_exists(&self, user_id: i64) -> Result<bool, RepositoryError> {
        self.check()?;
        Ok(self.tables.lock().unwrap().users.contains_key(&user_id))
    }

    async fn insert_follow(
        &self,
        follower_id: i64,
        following_id: i64,
    ) -> Result<bool, RepositoryError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.follows.contains_key(&(follower_id, following_id)) {
            return Ok(false);
        }
        let (seq, _) = tables.next();
        tables.follows.insert((follower_id, following_id), seq);
        Ok(true)
    }

    async fn delete_follow(
        &self,
        follower_id: i64,
        following_id: i64,
    ) -> Result<bool, RepositoryError> {
        self.check()?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .follows
            .remove(&(follower_id, following_id))
            .is_some())
    }

    async fn list_connections(
        &self,
        user_id: i64,
        direction: Direction,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserSummary>, RepositoryError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut edges: Vec<(u64, i64)> = tables
            .follows
            .iter()
            .filter_map(|(&(follower, following), &seq)| match direction {
                Direction::Followers if following == user_id => Some((seq, follower)),
                Direction::Following if follower == user_id => Some((seq, following)),
                _ => None,
            })
            .collect();
        edges.sort_by(|a, b| b.cmp(a));

        let users = edges
            .into_iter()
            .filter_map(|(_, id)| {
                tables.users.get(&id).map(|username| UserSummary {
                    id,
                    username: username.clone(),
                    bio: None,
                    avatar_url: None,
                })
            })
            .collect();
        Ok(page(users, limit, offset))
    }

    async fn count_connections(
        &self,
        user_id: i64,
        direction: Direction,
    ) -> Result<i64, RepositoryError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .follows
            .keys()
            .filter(|(follower, following)| match direction {
                Direction::Followers => *following == user_id,
                Direction::Following => *follower == user_id,
            })
            .count() as i64)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check()?;
        Ok(())
    }
}

#[async_trait]
impl FeedStore for SocialDb {
    async fn fetch_tweets(
        &self,
        scope: AuthorScope<'_>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FeedTweet>, StoreError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut tweets: Vec<FeedTweet> = tables
            .tweets
            .iter()
            .filter(|t| scope.includes(t.user_id))
            .cloned()
            .collect();
        tweets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(page(tweets, limit, offset))
    }

    async fn count_tweets(&self, scope: AuthorScope<'_>) -> Result<i64, StoreError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .tweets
            .iter()
            .filter(|t| scope.includes(t.user_id))
            .count() as i64)
    }

    async fn followee_ids(&self, follower_id: i64) -> Result<Vec<i64>, StoreError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .follows
            .keys()
            .filter(|(follower, _)| *follower == follower_id)
            .map(|(_, following)| *following)
            .collect())
    }
}
