// src/services/review_service.rs
// DOCUMENTATION: Business logic for the review lifecycle
// PURPOSE: Eligibility and authorization checks, atomic writes via the
// repositories, post-commit notification emission, listing composition

use crate::db::{HostResponseRepository, ReviewPhotoRepository, ReviewRepository};
use crate::errors::ReviewsError;
use crate::models::{
    CreateReviewRequest, HostResponse, ModerationListQuery, NewReview, PagedReviewsResponse,
    Review, ReviewListQuery, ReviewPhoto, ReviewResponse, UpdateReviewRequest,
};
use crate::services::rating_aggregator::{RatingAggregator, RatingDistribution, RatingSummary};
use crate::services::{MediaClient, NotificationEmitter, NotificationEvent, PlatformClient};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// How many reviews the analytics payload carries verbatim
const RECENT_REVIEWS_LIMIT: i64 = 5;

/// Analytics payload for GET /realtor/reviews/analytics
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtorAnalyticsResponse {
    pub total_reviews: i64,
    pub average_rating: f64,
    pub rating_distribution: RatingDistribution,
    pub recent_reviews: Vec<ReviewResponse>,
    pub response_rate: i64,
    pub responses_given: i64,
}

pub struct ReviewService;

impl ReviewService {
    /// Create a review for a completed booking
    /// DOCUMENTATION: The requester must be the booking's guest, the booking
    /// COMPLETED, and the booking unreviewed. The existence pre-check only
    /// serves the common path; under concurrent submission the storage
    /// constraint decides, and the losing insert surfaces as 409.
    pub async fn create_review(
        pool: &PgPool,
        platform: &PlatformClient,
        notifier: &NotificationEmitter,
        requester_id: Uuid,
        req: CreateReviewRequest,
    ) -> Result<ReviewResponse, ReviewsError> {
        let booking = platform.get_booking(req.booking_id).await?;

        if booking.guest_id != requester_id {
            return Err(ReviewsError::Forbidden(
                "You can only review your own bookings".to_string(),
            ));
        }
        if !booking.status.is_completed() {
            return Err(ReviewsError::InvalidState(
                "Only completed bookings can be reviewed".to_string(),
            ));
        }
        if booking.existing_review_id.is_some()
            || ReviewRepository::exists_for_booking(pool, req.booking_id).await?
        {
            return Err(ReviewsError::Conflict(
                "Review already exists for this booking".to_string(),
            ));
        }

        let photos = req.photos.unwrap_or_default();
        let fields = NewReview {
            booking_id: req.booking_id,
            property_id: booking.property_id,
            author_id: requester_id,
            rating: req.rating,
            cleanliness_rating: req.cleanliness_rating,
            communication_rating: req.communication_rating,
            check_in_rating: req.check_in_rating,
            accuracy_rating: req.accuracy_rating,
            location_rating: req.location_rating,
            value_rating: req.value_rating,
            comment: req.comment,
            // Creation is gated on the COMPLETED booking above
            is_verified: true,
        };

        let (review, photo_rows) =
            ReviewRepository::create_with_photos(pool, &fields, &photos).await?;

        Self::notify_review_received(platform.clone(), notifier.clone(), review.clone());

        Ok(review.to_response(photo_rows, None))
    }

    /// Resolve ownership and emit reviewReceived off the request path.
    /// Runs strictly after commit; every failure is logged and swallowed.
    fn notify_review_received(
        platform: PlatformClient,
        notifier: NotificationEmitter,
        review: Review,
    ) {
        tokio::spawn(async move {
            match platform.get_property_ownership(review.property_id).await {
                Ok(ownership) => notifier.emit(NotificationEvent::ReviewReceived {
                    realtor_id: ownership.realtor_id,
                    review_id: review.id,
                    property_title: ownership.property_title,
                    rating: review.rating,
                }),
                Err(e) => log::warn!(
                    "Skipping reviewReceived notification for review {}: {}",
                    review.id,
                    e
                ),
            }
        });
    }

    /// Update content fields of the requester's own review
    pub async fn update_review(
        pool: &PgPool,
        review_id: Uuid,
        requester_id: Uuid,
        req: UpdateReviewRequest,
    ) -> Result<ReviewResponse, ReviewsError> {
        let review = ReviewRepository::get_by_id(pool, review_id).await?;
        if review.author_id != requester_id {
            return Err(ReviewsError::Forbidden(
                "You can only edit your own reviews".to_string(),
            ));
        }

        let updated = ReviewRepository::update_content(pool, review_id, &req).await?;
        let photos = ReviewPhotoRepository::list_by_review(pool, review_id).await?;
        let response = HostResponseRepository::get_by_review(pool, review_id).await?;

        Ok(updated.to_response(photos, response))
    }

    /// Delete a review: author, owning realtor, or admin
    /// DOCUMENTATION: Media blobs are cleaned up best-effort before the row
    /// delete; one blob failure never blocks the rest or the delete itself.
    /// Photos and host response go with the row via cascade.
    pub async fn delete_review(
        pool: &PgPool,
        platform: &PlatformClient,
        media: &MediaClient,
        review_id: Uuid,
        requester_id: Uuid,
        requester_is_admin: bool,
    ) -> Result<(), ReviewsError> {
        let review = ReviewRepository::get_by_id(pool, review_id).await?;

        let mut authorized = requester_is_admin || review.author_id == requester_id;
        if !authorized {
            authorized = match platform.get_property_ownership(review.property_id).await {
                Ok(ownership) => ownership.realtor_user_id == requester_id,
                Err(ReviewsError::NotFound(_)) => false,
                Err(e) => return Err(e),
            };
        }
        if !authorized {
            return Err(ReviewsError::Forbidden(
                "You are not allowed to delete this review".to_string(),
            ));
        }

        let photos = ReviewPhotoRepository::list_by_review(pool, review_id).await?;
        for photo in &photos {
            match MediaClient::extract_public_id(&photo.url) {
                Some(public_id) => {
                    if let Err(e) = media.delete_image(&public_id).await {
                        log::warn!(
                            "Failed to delete media {} for review {}: {}",
                            public_id,
                            review_id,
                            e
                        );
                    }
                }
                None => log::warn!("Could not derive public id from photo url {}", photo.url),
            }
        }

        ReviewRepository::delete(pool, review_id).await
    }

    /// Public listing of a property's visible reviews
    pub async fn list_property_reviews(
        pool: &PgPool,
        property_id: Uuid,
        query: ReviewListQuery,
    ) -> Result<PagedReviewsResponse, ReviewsError> {
        let (reviews, total_count) =
            ReviewRepository::list_by_property(pool, property_id, true, &query).await?;
        Self::to_page(pool, reviews, total_count, query.page, query.limit).await
    }

    /// On-demand rating summary for a property's visible reviews
    pub async fn property_rating_summary(
        pool: &PgPool,
        property_id: Uuid,
    ) -> Result<RatingSummary, ReviewsError> {
        let samples = ReviewRepository::rating_samples(pool, &[property_id], true).await?;
        Ok(RatingAggregator::summarize(&samples))
    }

    /// Reviews written by the requester, any visibility
    pub async fn list_my_reviews(
        pool: &PgPool,
        requester_id: Uuid,
        query: ReviewListQuery,
    ) -> Result<PagedReviewsResponse, ReviewsError> {
        let (reviews, total_count) =
            ReviewRepository::list_by_author(pool, requester_id, &query).await?;
        Self::to_page(pool, reviews, total_count, query.page, query.limit).await
    }

    /// Moderation listing across the requesting realtor's portfolio
    pub async fn list_realtor_reviews(
        pool: &PgPool,
        platform: &PlatformClient,
        requester_id: Uuid,
        query: ModerationListQuery,
    ) -> Result<PagedReviewsResponse, ReviewsError> {
        let properties = platform.get_realtor_properties(requester_id).await?;
        let mut property_ids: Vec<Uuid> = properties.iter().map(|p| p.id).collect();

        if let Some(filter) = query.property_id {
            if !property_ids.contains(&filter) {
                return Err(ReviewsError::Forbidden(
                    "You can only view reviews of your own properties".to_string(),
                ));
            }
            property_ids = vec![filter];
        }

        if property_ids.is_empty() {
            return Self::to_page(pool, Vec::new(), 0, query.page, query.limit).await;
        }

        let (reviews, total_count) = ReviewRepository::list_by_properties(
            pool,
            &property_ids,
            query.visible,
            query.page,
            query.limit,
        )
        .await?;
        Self::to_page(pool, reviews, total_count, query.page, query.limit).await
    }

    /// Portfolio-wide analytics for the requesting realtor
    /// DOCUMENTATION: Hidden reviews are included; they remain the realtor's
    /// data even while withheld from public listings
    pub async fn realtor_analytics(
        pool: &PgPool,
        platform: &PlatformClient,
        requester_id: Uuid,
    ) -> Result<RealtorAnalyticsResponse, ReviewsError> {
        let properties = platform.get_realtor_properties(requester_id).await?;
        let property_ids: Vec<Uuid> = properties.iter().map(|p| p.id).collect();

        if property_ids.is_empty() {
            let summary = RatingAggregator::summarize(&[]);
            return Ok(Self::analytics_payload(summary, Vec::new()));
        }

        let samples = ReviewRepository::rating_samples(pool, &property_ids, false).await?;
        let summary = RatingAggregator::summarize(&samples);

        let recent =
            ReviewRepository::recent_by_properties(pool, &property_ids, RECENT_REVIEWS_LIMIT)
                .await?;
        let recent = Self::with_relations(pool, recent).await?;

        Ok(Self::analytics_payload(summary, recent))
    }

    fn analytics_payload(
        summary: RatingSummary,
        recent_reviews: Vec<ReviewResponse>,
    ) -> RealtorAnalyticsResponse {
        RealtorAnalyticsResponse {
            total_reviews: summary.total_reviews,
            average_rating: summary.average_rating,
            rating_distribution: summary.rating_distribution,
            recent_reviews,
            response_rate: summary.response_rate,
            responses_given: summary.responses_given,
        }
    }

    /// Attach photos and host responses to a page of reviews
    /// DOCUMENTATION: Two batch queries for the whole page instead of one
    /// pair per review
    async fn with_relations(
        pool: &PgPool,
        reviews: Vec<Review>,
    ) -> Result<Vec<ReviewResponse>, ReviewsError> {
        if reviews.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = reviews.iter().map(|r| r.id).collect();

        let mut photos_by_review: HashMap<Uuid, Vec<ReviewPhoto>> = HashMap::new();
        for photo in ReviewPhotoRepository::list_by_reviews(pool, &ids).await? {
            photos_by_review
                .entry(photo.review_id)
                .or_default()
                .push(photo);
        }

        let mut responses_by_review: HashMap<Uuid, HostResponse> = HashMap::new();
        for response in HostResponseRepository::list_by_reviews(pool, &ids).await? {
            responses_by_review.insert(response.review_id, response);
        }

        Ok(reviews
            .into_iter()
            .map(|review| {
                let photos = photos_by_review.remove(&review.id).unwrap_or_default();
                let response = responses_by_review.remove(&review.id);
                review.to_response(photos, response)
            })
            .collect())
    }

    /// Wrap a repository page into the listing DTO with pagination metadata
    async fn to_page(
        pool: &PgPool,
        reviews: Vec<Review>,
        total_count: i64,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<PagedReviewsResponse, ReviewsError> {
        let limit = limit.unwrap_or(20).clamp(1, 100);
        let page = page.unwrap_or(1).max(1);
        let data = Self::with_relations(pool, reviews).await?;
        let has_more = total_count > page * limit;

        Ok(PagedReviewsResponse {
            data,
            total_count,
            page,
            limit,
            has_more,
        })
    }
}
