/// Error types for Graph Service
use crate::db::RepositoryError;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Cannot follow yourself")]
    SelfFollow,

    #[error("User not found")]
    UserNotFound,

    #[error("Already following this user")]
    AlreadyFollowing,

    #[error("Not following this user")]
    NotFollowing,

    /// `action` names the failed operation ("following user", ...)
    #[error("Error {action}")]
    Database {
        action: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::SelfFollow => StatusCode::BAD_REQUEST,
            AppError::UserNotFound | AppError::NotFollowing => StatusCode::NOT_FOUND,
            AppError::AlreadyFollowing => StatusCode::CONFLICT,
            AppError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}
