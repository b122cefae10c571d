//! # Actix Middleware Library
//!
//! Request authorization shared by microtweet Actix services
//!
//! ## Modules
//! - `jwt`: HS256 token validation against the shared auth secret
//! - `jwt_auth`: required/optional JWT authentication middleware and extractors

pub mod jwt;
pub mod jwt_auth;

pub use jwt::{AuthError, Claims, JwtValidator};
pub use jwt_auth::{JwtAuthMiddleware, UserId, Viewer};
