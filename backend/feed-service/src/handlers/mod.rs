pub mod feeds;
pub mod health;

pub use feeds::{configure, get_personal_feed, get_public_feed, FeedQuery};
pub use health::{health_summary, readiness_summary, HealthState};
