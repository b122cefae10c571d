pub mod health;
pub mod tweets;

pub use health::{health_summary, readiness_summary, HealthState};
pub use tweets::configure;
