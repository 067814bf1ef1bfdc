// src/handlers/reviews.rs
// DOCUMENTATION: HTTP handlers for the review lifecycle
// PURPOSE: Parse requests, check identity, call services, return responses

use crate::errors::ReviewsError;
use crate::handlers::identity::require_user;
use crate::models::{
    CreateReviewRequest, RespondRequest, ReviewListQuery, UpdateReviewRequest, VisibilityRequest,
};
use crate::services::{
    HostResponseService, MediaClient, ModerationService, NotificationEmitter, PlatformClient,
    ReviewService,
};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// POST /reviews
/// Create a review for a completed booking
pub async fn create_review(
    pool: web::Data<PgPool>,
    platform: web::Data<PlatformClient>,
    notifier: web::Data<NotificationEmitter>,
    req: HttpRequest,
    body: web::Json<CreateReviewRequest>,
) -> Result<impl Responder, ReviewsError> {
    let requester = require_user(&req)?;

    if let Err(e) = body.validate() {
        return Err(ReviewsError::Validation(e.to_string()));
    }

    let review = ReviewService::create_review(
        pool.get_ref(),
        platform.get_ref(),
        notifier.get_ref(),
        requester.user_id,
        body.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Created().json(review))
}

/// GET /reviews/my
/// Reviews written by the caller
pub async fn list_my_reviews(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    query: web::Query<ReviewListQuery>,
) -> Result<impl Responder, ReviewsError> {
    let requester = require_user(&req)?;
    let page =
        ReviewService::list_my_reviews(pool.get_ref(), requester.user_id, query.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// PATCH /reviews/{id}
/// Update content fields of the caller's own review
pub async fn update_review(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<UpdateReviewRequest>,
) -> Result<impl Responder, ReviewsError> {
    let requester = require_user(&req)?;

    if let Err(e) = body.validate() {
        return Err(ReviewsError::Validation(e.to_string()));
    }

    let review = ReviewService::update_review(
        pool.get_ref(),
        path.into_inner(),
        requester.user_id,
        body.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(review))
}

/// DELETE /reviews/{id}
/// Remove a review (author, owning realtor, or admin)
pub async fn delete_review(
    pool: web::Data<PgPool>,
    platform: web::Data<PlatformClient>,
    media: web::Data<MediaClient>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ReviewsError> {
    let requester = require_user(&req)?;

    ReviewService::delete_review(
        pool.get_ref(),
        platform.get_ref(),
        media.get_ref(),
        path.into_inner(),
        requester.user_id,
        requester.is_admin(),
    )
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /reviews/{id}/response
/// Attach the single host response to a review
pub async fn respond_to_review(
    pool: web::Data<PgPool>,
    platform: web::Data<PlatformClient>,
    notifier: web::Data<NotificationEmitter>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<RespondRequest>,
) -> Result<impl Responder, ReviewsError> {
    let requester = require_user(&req)?;

    if let Err(e) = body.validate() {
        return Err(ReviewsError::Validation(e.to_string()));
    }

    let response = HostResponseService::respond(
        pool.get_ref(),
        platform.get_ref(),
        notifier.get_ref(),
        path.into_inner(),
        &body.comment,
        requester.user_id,
    )
    .await?;

    Ok(HttpResponse::Created().json(response))
}

/// PATCH /reviews/{id}/visibility
/// Moderate a review's visibility (owning realtor only)
pub async fn set_review_visibility(
    pool: web::Data<PgPool>,
    platform: web::Data<PlatformClient>,
    notifier: web::Data<NotificationEmitter>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<VisibilityRequest>,
) -> Result<impl Responder, ReviewsError> {
    let requester = require_user(&req)?;

    let review = ModerationService::set_visibility(
        pool.get_ref(),
        platform.get_ref(),
        notifier.get_ref(),
        path.into_inner(),
        body.is_visible,
        requester.user_id,
    )
    .await?;

    Ok(HttpResponse::Ok().json(review))
}

/// GET /properties/{id}/reviews
/// Public listing of a property's visible reviews
pub async fn get_property_reviews(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    query: web::Query<ReviewListQuery>,
) -> Result<impl Responder, ReviewsError> {
    let page = ReviewService::list_property_reviews(
        pool.get_ref(),
        path.into_inner(),
        query.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /properties/{id}/reviews/summary
/// On-demand rating summary over a property's visible reviews
pub async fn get_property_review_summary(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ReviewsError> {
    let summary =
        ReviewService::property_rating_summary(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Configuration for review routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reviews")
            .route("", web::post().to(create_review))
            .route("/my", web::get().to(list_my_reviews))
            .route("/{id}", web::patch().to(update_review))
            .route("/{id}", web::delete().to(delete_review))
            .route("/{id}/response", web::post().to(respond_to_review))
            .route("/{id}/visibility", web::patch().to(set_review_visibility)),
    );
    cfg.service(
        web::scope("/properties")
            .route("/{id}/reviews", web::get().to(get_property_reviews))
            .route(
                "/{id}/reviews/summary",
                web::get().to(get_property_review_summary),
            ),
    );
}
