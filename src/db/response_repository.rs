// src/db/response_repository.rs
// DOCUMENTATION: Host response database operations
// PURPOSE: Handle the single realtor reply attached to a review

use crate::db::is_unique_violation;
use crate::errors::ReviewsError;
use crate::models::HostResponse;
use sqlx::PgPool;
use uuid::Uuid;

pub struct HostResponseRepository;

impl HostResponseRepository {
    /// Insert the host response for a review
    /// DOCUMENTATION: The unique review_id constraint enforces at most one
    /// response per review; a concurrent duplicate surfaces as Conflict
    pub async fn create(
        pool: &PgPool,
        review_id: Uuid,
        author_id: Uuid,
        comment: &str,
    ) -> Result<HostResponse, ReviewsError> {
        let response = sqlx::query_as::<_, HostResponse>(
            r#"
            INSERT INTO review_responses (review_id, author_id, comment)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(review_id)
        .bind(author_id)
        .bind(comment)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ReviewsError::Conflict("A response already exists for this review".to_string())
            } else {
                log::error!("Failed to create response for review {}: {}", review_id, e);
                ReviewsError::DatabaseError(format!("Create response failed: {}", e))
            }
        })?;

        log::info!("Created host response for review {}", review_id);
        Ok(response)
    }

    /// Get the host response for a review, if any
    pub async fn get_by_review(
        pool: &PgPool,
        review_id: Uuid,
    ) -> Result<Option<HostResponse>, ReviewsError> {
        let response = sqlx::query_as::<_, HostResponse>(
            "SELECT * FROM review_responses WHERE review_id = $1",
        )
        .bind(review_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch response for review {}: {}", review_id, e);
            ReviewsError::DatabaseError(format!("Fetch response failed: {}", e))
        })?;

        Ok(response)
    }

    /// Batch-load responses for a page of reviews
    pub async fn list_by_reviews(
        pool: &PgPool,
        review_ids: &[Uuid],
    ) -> Result<Vec<HostResponse>, ReviewsError> {
        let responses = sqlx::query_as::<_, HostResponse>(
            "SELECT * FROM review_responses WHERE review_id = ANY($1)",
        )
        .bind(review_ids)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to batch-fetch responses: {}", e);
            ReviewsError::DatabaseError(format!("Fetch responses failed: {}", e))
        })?;

        Ok(responses)
    }
}
