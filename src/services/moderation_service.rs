// src/services/moderation_service.rs
// DOCUMENTATION: Review visibility moderation
// PURPOSE: Let the owning realtor hide or re-show a review without touching
// its content

use crate::db::{HostResponseRepository, ReviewPhotoRepository, ReviewRepository};
use crate::errors::ReviewsError;
use crate::models::ReviewResponse;
use crate::services::{ModerationAction, NotificationEmitter, NotificationEvent, PlatformClient};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ModerationService;

impl ModerationService {
    /// Set a review's visibility flag
    /// DOCUMENTATION: Owning realtor only. Idempotent on data: re-applying
    /// the current value is a valid request, and each accepted request emits
    /// a moderation notice to the review's author (best-effort).
    pub async fn set_visibility(
        pool: &PgPool,
        platform: &PlatformClient,
        notifier: &NotificationEmitter,
        review_id: Uuid,
        is_visible: bool,
        requester_id: Uuid,
    ) -> Result<ReviewResponse, ReviewsError> {
        let review = ReviewRepository::get_by_id(pool, review_id).await?;

        let ownership = platform.get_property_ownership(review.property_id).await?;
        if ownership.realtor_user_id != requester_id {
            return Err(ReviewsError::Forbidden(
                "You can only moderate reviews of your own properties".to_string(),
            ));
        }

        let updated = ReviewRepository::set_visibility(pool, review_id, is_visible).await?;

        let action = if is_visible {
            ModerationAction::MadeVisible
        } else {
            ModerationAction::Hidden
        };
        notifier.emit(NotificationEvent::ModerationNotice {
            user_id: updated.author_id,
            review_id: updated.id,
            property_title: ownership.property_title,
            action,
            business_name: ownership.business_name,
        });

        let photos = ReviewPhotoRepository::list_by_review(pool, review_id).await?;
        let response = HostResponseRepository::get_by_review(pool, review_id).await?;
        Ok(updated.to_response(photos, response))
    }
}
