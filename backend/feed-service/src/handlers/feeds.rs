use crate::error::{AppError, Result};
use crate::models::FeedPage;
use crate::services::FeedAggregator;
use actix_middleware::{JwtAuthMiddleware, JwtValidator, Viewer};
use actix_web::{web, HttpResponse};
use feed_cache::Pagination;
use serde::Deserialize;
use std::sync::Arc;

/// Raw pagination query; values are normalized, never rejected
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl FeedQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::from_query(self.page.as_deref(), self.limit.as_deref())
    }
}

/// GET /api/feeds/public
pub async fn get_public_feed(
    aggregator: web::Data<FeedAggregator>,
    query: web::Query<FeedQuery>,
) -> Result<HttpResponse> {
    let page = aggregator.public_feed(query.pagination()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/feeds/personal/{user_id}
///
/// Anonymous callers may read any personal feed; an authenticated caller
/// only its own. A subject that is not a valid account id follows nobody.
pub async fn get_personal_feed(
    aggregator: web::Data<FeedAggregator>,
    path: web::Path<String>,
    query: web::Query<FeedQuery>,
    viewer: Viewer,
) -> Result<HttpResponse> {
    let subject = path.trim().parse::<i64>().ok();
    let pagination = query.pagination();

    if let Some(viewer_id) = viewer.0 {
        if subject != Some(viewer_id) {
            tracing::debug!(viewer_id, subject = %path.as_str(), "Personal feed of another user refused");
            return Err(AppError::Forbidden);
        }
    }

    let page = match subject {
        Some(user_id) => aggregator.personal_feed(user_id, pagination).await?,
        None => FeedPage::no_follows(pagination),
    };

    Ok(HttpResponse::Ok().json(page))
}

/// Mount the feed routes under `/api/feeds`
pub fn configure(validator: Arc<JwtValidator>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(
            web::scope("/api/feeds")
                .route("/public", web::get().to(get_public_feed))
                .service(
                    web::resource("/personal/{user_id}")
                        .wrap(JwtAuthMiddleware::optional(validator))
                        .route(web::get().to(get_personal_feed)),
                ),
        );
    }
}
