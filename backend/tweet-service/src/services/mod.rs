pub mod tweets;

pub use tweets::TweetService;
