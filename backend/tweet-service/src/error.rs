/// Error types for Tweet Service
use crate::db::RepositoryError;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Tweet not found")]
    NotFound,

    /// Caller is not the tweet's author
    #[error("Unauthorized")]
    Forbidden,

    /// `action` names the failed operation ("creating tweet", ...)
    #[error("Error {action}")]
    Database {
        action: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl AppError {
    pub fn database(action: &'static str) -> impl FnOnce(RepositoryError) -> AppError {
        move |source| AppError::Database { action, source }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}
