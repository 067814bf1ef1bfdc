// src/services/response_service.rs
// DOCUMENTATION: Host response creation
// PURPOSE: One realtor reply per review, with ownership authorization

use crate::db::{HostResponseRepository, ReviewRepository};
use crate::errors::ReviewsError;
use crate::models::HostResponse;
use crate::services::{NotificationEmitter, NotificationEvent, PlatformClient};
use sqlx::PgPool;
use uuid::Uuid;

pub struct HostResponseService;

impl HostResponseService {
    /// Attach the host response to a review
    /// DOCUMENTATION: The requester must own the reviewed property, the
    /// comment must be non-empty after trimming, and the review must not
    /// already carry a response. The duplicate pre-check serves the common
    /// path; the unique constraint decides concurrent duplicates.
    pub async fn respond(
        pool: &PgPool,
        platform: &PlatformClient,
        notifier: &NotificationEmitter,
        review_id: Uuid,
        comment: &str,
        requester_id: Uuid,
    ) -> Result<HostResponse, ReviewsError> {
        let trimmed = comment.trim();
        if trimmed.is_empty() {
            return Err(ReviewsError::Validation(
                "Response comment cannot be empty".to_string(),
            ));
        }

        let review = ReviewRepository::get_by_id(pool, review_id).await?;

        let ownership = platform.get_property_ownership(review.property_id).await?;
        if ownership.realtor_user_id != requester_id {
            return Err(ReviewsError::Forbidden(
                "You can only respond to reviews of your own properties".to_string(),
            ));
        }

        if HostResponseRepository::get_by_review(pool, review_id)
            .await?
            .is_some()
        {
            return Err(ReviewsError::Conflict(
                "A response already exists for this review".to_string(),
            ));
        }

        let response =
            HostResponseRepository::create(pool, review_id, requester_id, trimmed).await?;

        notifier.emit(NotificationEvent::ReviewResponse {
            author_id: review.author_id,
            review_id: review.id,
            property_title: ownership.property_title,
        });

        Ok(response)
    }
}
