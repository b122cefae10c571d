//! Graph service
//!
//! Owns follow edges, the only input to personal feeds besides tweets.
//! Edge writes do not touch the feed cache: a personal page cached before a
//! follow or unfollow is served until it expires.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::FollowService;
