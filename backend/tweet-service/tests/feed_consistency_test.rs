//! Tweet writes followed by feed reads, over one database and one cache

mod common;

use common::{FlakyCache, SharedDb};
use feed_cache::{FeedInvalidator, Pagination};
use feed_service::models::FeedPage;
use feed_service::FeedAggregator;
use std::sync::Arc;
use std::time::Duration;
use tweet_service::TweetService;

const TTL: Duration = Duration::from_secs(300);
const AUTHOR: i64 = 1;
const FOLLOWER: i64 = 2;
const BYSTANDER: i64 = 3;

struct World {
    db: Arc<SharedDb>,
    cache: FlakyCache,
    feeds: FeedAggregator,
    tweets: TweetService,
}

fn world() -> World {
    let db = Arc::new(SharedDb::new());
    db.add_user(AUTHOR, "author");
    db.add_user(FOLLOWER, "follower");
    db.add_user(BYSTANDER, "bystander");
    db.follow(FOLLOWER, AUTHOR);
    db.follow(AUTHOR, BYSTANDER);

    let cache = FlakyCache::new();
    let feeds = FeedAggregator::new(db.clone(), Arc::new(cache.clone()), TTL);
    let tweets = TweetService::new(db.clone(), FeedInvalidator::new(Arc::new(cache.clone())));

    World {
        db,
        cache,
        feeds,
        tweets,
    }
}

fn contents(page: &FeedPage) -> Vec<&str> {
    page.tweets.iter().map(|t| t.content.as_str()).collect()
}

impl World {
    async fn public(&self) -> FeedPage {
        self.feeds.public_feed(Pagination::default()).await.unwrap()
    }

    async fn personal(&self, user_id: i64) -> FeedPage {
        self.feeds
            .personal_feed(user_id, Pagination::default())
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn test_new_tweet_visible_in_cached_public_feed() {
    let w = world();
    w.tweets.create_tweet(AUTHOR, Some("one")).await.unwrap();
    assert_eq!(contents(&w.public().await), vec!["one"]);

    w.tweets.create_tweet(AUTHOR, Some("two")).await.unwrap();
    let public = w.public().await;
    assert_eq!(contents(&public), vec!["two", "one"]);
    assert_eq!(public.total, 2);
}

#[tokio::test]
async fn test_author_partition_is_refreshed_after_write() {
    let w = world();
    w.tweets
        .create_tweet(BYSTANDER, Some("followed"))
        .await
        .unwrap();
    assert_eq!(contents(&w.personal(AUTHOR).await), vec!["followed"]);
    assert!(w.cache.inner.contains("feed:personal:1:1:20"));

    // Author's own write drops the author's personal pages
    w.tweets.create_tweet(AUTHOR, Some("mine")).await.unwrap();
    assert!(!w.cache.inner.contains("feed:personal:1:1:20"));
}

#[tokio::test]
async fn test_update_visible_in_public_feed() {
    let w = world();
    let tweet = w.tweets.create_tweet(AUTHOR, Some("typo")).await.unwrap();
    assert_eq!(contents(&w.public().await), vec!["typo"]);

    w.tweets
        .update_tweet(AUTHOR, tweet.id, Some("fixed"))
        .await
        .unwrap();
    assert_eq!(contents(&w.public().await), vec!["fixed"]);
}

#[tokio::test]
async fn test_deleted_tweet_gone_from_public_and_follower_feeds() {
    let w = world();
    let keep = w.tweets.create_tweet(AUTHOR, Some("keep")).await.unwrap();
    let gone = w.tweets.create_tweet(AUTHOR, Some("gone")).await.unwrap();

    assert_eq!(contents(&w.public().await), vec!["gone", "keep"]);

    w.tweets.delete_tweet(AUTHOR, gone.id).await.unwrap();

    let public = w.public().await;
    assert_eq!(contents(&public), vec!["keep"]);
    assert_eq!(public.total, 1);

    let follower = w.personal(FOLLOWER).await;
    assert_eq!(contents(&follower), vec!["keep"]);
    assert_eq!(follower.tweets[0].id, keep.id);
}

#[tokio::test(start_paused = true)]
async fn test_follower_feed_stays_stale_until_ttl() {
    let w = world();
    w.tweets.create_tweet(AUTHOR, Some("old")).await.unwrap();
    assert_eq!(contents(&w.personal(FOLLOWER).await), vec!["old"]);

    w.tweets.create_tweet(AUTHOR, Some("new")).await.unwrap();

    // Public partition was dropped, the follower's was not
    assert_eq!(contents(&w.public().await), vec!["new", "old"]);
    assert_eq!(contents(&w.personal(FOLLOWER).await), vec!["old"]);

    tokio::time::advance(TTL + Duration::from_secs(1)).await;
    assert_eq!(contents(&w.personal(FOLLOWER).await), vec!["new", "old"]);
}

#[tokio::test(start_paused = true)]
async fn test_invalidation_lost_during_outage_heals_at_ttl() {
    let w = world();
    w.tweets.create_tweet(AUTHOR, Some("before")).await.unwrap();
    assert_eq!(contents(&w.public().await), vec!["before"]);

    w.cache.set_down(true);
    w.tweets.create_tweet(AUTHOR, Some("during")).await.unwrap();
    assert_eq!(w.db.tweet_count(), 2);

    // Reads during the outage bypass the cache
    assert_eq!(contents(&w.public().await), vec!["during", "before"]);

    w.cache.set_down(false);
    assert_eq!(contents(&w.public().await), vec!["before"]);

    tokio::time::advance(TTL + Duration::from_secs(1)).await;
    assert_eq!(contents(&w.public().await), vec!["during", "before"]);
}

#[tokio::test]
async fn test_no_follows_feed_ignores_global_volume() {
    let w = world();
    for n in 0..25 {
        w.tweets
            .create_tweet(AUTHOR, Some(&format!("tweet {}", n)))
            .await
            .unwrap();
    }

    let page = w.personal(BYSTANDER).await;
    assert!(page.tweets.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.pages, 0);
    assert!(page.message.is_some());
}
