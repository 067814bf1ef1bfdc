// src/handlers/realtor.rs
// DOCUMENTATION: Realtor-facing review endpoints
// PURPOSE: Moderation listing and portfolio analytics

use crate::errors::ReviewsError;
use crate::handlers::identity::require_user;
use crate::models::ModerationListQuery;
use crate::services::{PlatformClient, ReviewService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;

/// GET /realtor/reviews
/// Reviews across the caller's portfolio, including hidden rows
pub async fn list_realtor_reviews(
    pool: web::Data<PgPool>,
    platform: web::Data<PlatformClient>,
    req: HttpRequest,
    query: web::Query<ModerationListQuery>,
) -> Result<impl Responder, ReviewsError> {
    let requester = require_user(&req)?;

    let page = ReviewService::list_realtor_reviews(
        pool.get_ref(),
        platform.get_ref(),
        requester.user_id,
        query.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// GET /realtor/reviews/analytics
/// Portfolio-wide rating analytics, recomputed per request
pub async fn get_realtor_analytics(
    pool: web::Data<PgPool>,
    platform: web::Data<PlatformClient>,
    req: HttpRequest,
) -> Result<impl Responder, ReviewsError> {
    let requester = require_user(&req)?;

    let analytics =
        ReviewService::realtor_analytics(pool.get_ref(), platform.get_ref(), requester.user_id)
            .await?;

    Ok(HttpResponse::Ok().json(analytics))
}

/// Configuration for realtor routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/realtor/reviews")
            .route("", web::get().to(list_realtor_reviews))
            .route("/analytics", web::get().to(get_realtor_analytics)),
    );
}
