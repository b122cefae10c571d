use crate::error::{AppError, Result};
use crate::models::{ConnectionPage, Direction, FollowersPage, FollowingPage};
use crate::services::FollowService;
use actix_middleware::{JwtAuthMiddleware, JwtValidator, UserId};
use actix_web::{web, HttpResponse};
use feed_cache::Pagination;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    fn pagination(&self) -> Pagination {
        Pagination::from_query(self.page.as_deref(), self.limit.as_deref())
    }
}

fn parse_user_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// POST /api/users/{id}/follow
pub async fn follow_user(
    service: web::Data<FollowService>,
    user: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    // A non-numeric id cannot name an existing user
    let target_id = parse_user_id(&path).ok_or(AppError::UserNotFound)?;
    service.follow(user.0, target_id).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "User followed successfully",
    })))
}

/// DELETE /api/users/{id}/follow
pub async fn unfollow_user(
    service: web::Data<FollowService>,
    user: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let target_id = parse_user_id(&path).ok_or(AppError::NotFollowing)?;
    service.unfollow(user.0, target_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "User unfollowed successfully",
    })))
}

async fn connections(
    service: &FollowService,
    raw_id: &str,
    direction: Direction,
    pagination: Pagination,
) -> Result<ConnectionPage> {
    match parse_user_id(raw_id) {
        Some(user_id) => service.connections(user_id, direction, pagination).await,
        None => Ok(ConnectionPage::new(Vec::new(), 0, pagination)),
    }
}

/// GET /api/users/{id}/followers
pub async fn get_followers(
    service: web::Data<FollowService>,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let page = connections(&service, &path, Direction::Followers, query.pagination()).await?;
    Ok(HttpResponse::Ok().json(FollowersPage::from(page)))
}

/// GET /api/users/{id}/following
pub async fn get_following(
    service: web::Data<FollowService>,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let page = connections(&service, &path, Direction::Following, query.pagination()).await?;
    Ok(HttpResponse::Ok().json(FollowingPage::from(page)))
}

/// Mount the follow routes under `/api/users`; edge writes require a valid token
pub fn configure(validator: Arc<JwtValidator>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(
            web::scope("/api/users")
                .service(
                    web::resource("/{id}/follow")
                        .wrap(JwtAuthMiddleware::required(validator))
                        .route(web::post().to(follow_user))
                        .route(web::delete().to(unfollow_user)),
                )
                .route("/{id}/followers", web::get().to(get_followers))
                .route("/{id}/following", web::get().to(get_following)),
        );
    }
}
