pub mod follows;
pub mod health;

pub use follows::configure;
pub use health::{health_summary, readiness_summary, HealthState};
