//! Feed service
//!
//! Serves the public timeline and per-user personal timelines, computed from
//! PostgreSQL and memoized page by page in the feed cache.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::FeedAggregator;
