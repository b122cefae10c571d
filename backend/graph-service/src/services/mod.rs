pub mod follows;

pub use follows::FollowService;
