use crate::error::{AppError, Result};
use crate::models::{CreatedTweet, TweetInput, TweetPage};
use crate::services::TweetService;
use actix_middleware::{JwtAuthMiddleware, JwtValidator, UserId};
use actix_web::{guard, web, HttpResponse};
use feed_cache::Pagination;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Ids that are not numbers cannot name a stored tweet
fn parse_tweet_id(raw: &str) -> Result<i64> {
    raw.trim().parse::<i64>().map_err(|_| AppError::NotFound)
}

/// POST /api/tweets
pub async fn create_tweet(
    service: web::Data<TweetService>,
    user: UserId,
    body: web::Json<TweetInput>,
) -> Result<HttpResponse> {
    let tweet = service
        .create_tweet(user.0, body.content.as_deref())
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Tweet created successfully",
        "tweet": CreatedTweet::from(tweet),
    })))
}

/// GET /api/tweets/{id}
pub async fn get_tweet(
    service: web::Data<TweetService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let tweet = service.get_tweet(parse_tweet_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(tweet))
}

/// PUT /api/tweets/{id}
pub async fn update_tweet(
    service: web::Data<TweetService>,
    user: UserId,
    path: web::Path<String>,
    body: web::Json<TweetInput>,
) -> Result<HttpResponse> {
    // Content problems are reported before lookup problems
    let tweet_id = path.trim().parse::<i64>().unwrap_or(-1);
    let tweet = service
        .update_tweet(user.0, tweet_id, body.content.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Tweet updated successfully",
        "tweet": tweet,
    })))
}

/// DELETE /api/tweets/{id}
pub async fn delete_tweet(
    service: web::Data<TweetService>,
    user: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    service.delete_tweet(user.0, parse_tweet_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Tweet deleted successfully",
    })))
}

/// GET /api/tweets/user/{user_id}
pub async fn get_user_tweets(
    service: web::Data<TweetService>,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let pagination = Pagination::from_query(query.page.as_deref(), query.limit.as_deref());

    let page = match path.trim().parse::<i64>() {
        Ok(user_id) => service.list_user_tweets(user_id, pagination).await?,
        Err(_) => TweetPage::new(Vec::new(), 0, pagination),
    };

    Ok(HttpResponse::Ok().json(page))
}

/// Mount the tweet routes under `/api/tweets`; writes require a valid token
pub fn configure(validator: Arc<JwtValidator>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(
            web::scope("/api/tweets")
                .service(
                    web::resource(["", "/"])
                        .wrap(JwtAuthMiddleware::required(validator.clone()))
                        .route(web::post().to(create_tweet)),
                )
                .route("/user/{user_id}", web::get().to(get_user_tweets))
                .service(
                    web::resource("/{id}")
                        .guard(guard::Get())
                        .route(web::get().to(get_tweet)),
                )
                .service(
                    web::resource("/{id}")
                        .wrap(JwtAuthMiddleware::required(validator))
                        .route(web::put().to(update_tweet))
                        .route(web::delete().to(delete_tweet)),
                ),
        );
    }
}
