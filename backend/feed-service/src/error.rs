/// Error types for Feed Service
///
/// Store failures surface as a generic "feed unavailable" error. Cache
/// failures never reach this type: the aggregator degrades around them.
use crate::db::StoreError;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Relational store unreachable, failed or timed out
    #[error("Error fetching {feed} feed")]
    FeedUnavailable {
        feed: &'static str,
        #[source]
        source: StoreError,
    },

    /// Authenticated caller asked for another subject's personal feed
    #[error("Unauthorized")]
    Forbidden,
}

impl AppError {
    pub fn feed_unavailable(feed: &'static str, source: StoreError) -> Self {
        AppError::FeedUnavailable { feed, source }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::FeedUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    /// The message never carries store details; those stay in the logs
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}
