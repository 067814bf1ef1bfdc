// src/db/photo_repository.rs
// DOCUMENTATION: Review photo database operations
// PURPOSE: Handle photo rows owned by reviews

use crate::errors::ReviewsError;
use crate::models::{PhotoUpload, ReviewPhoto};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

pub struct ReviewPhotoRepository;

impl ReviewPhotoRepository {
    /// Insert all photos for a review on an open transaction
    /// DOCUMENTATION: Runs on the review-creation transaction so the review
    /// and its photos commit or roll back together. display_order is the
    /// zero-based position of the photo in the submitted array.
    pub async fn insert_many(
        tx: &mut Transaction<'_, Postgres>,
        review_id: Uuid,
        photos: &[PhotoUpload],
    ) -> Result<Vec<ReviewPhoto>, ReviewsError> {
        let mut rows = Vec::with_capacity(photos.len());

        for (index, photo) in photos.iter().enumerate() {
            let row = sqlx::query_as::<_, ReviewPhoto>(
                r#"
                INSERT INTO review_photos (review_id, url, caption, display_order)
                VALUES ($1, $2, $3, $4)
                RETURNING *
                "#,
            )
            .bind(review_id)
            .bind(&photo.url)
            .bind(&photo.caption)
            .bind(index as i32)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| {
                log::error!("Failed to create photo for review {}: {}", review_id, e);
                ReviewsError::DatabaseError(format!("Create photo failed: {}", e))
            })?;

            rows.push(row);
        }

        Ok(rows)
    }

    /// Get photos for a review, in display order
    pub async fn list_by_review(
        pool: &PgPool,
        review_id: Uuid,
    ) -> Result<Vec<ReviewPhoto>, ReviewsError> {
        let photos = sqlx::query_as::<_, ReviewPhoto>(
            "SELECT * FROM review_photos WHERE review_id = $1 ORDER BY display_order ASC",
        )
        .bind(review_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch photos for review {}: {}", review_id, e);
            ReviewsError::DatabaseError(format!("Fetch photos failed: {}", e))
        })?;

        Ok(photos)
    }

    /// Batch-load photos for a page of reviews
    /// DOCUMENTATION: Single query for the whole page; callers group the
    /// rows by review_id instead of issuing one query per review
    pub async fn list_by_reviews(
        pool: &PgPool,
        review_ids: &[Uuid],
    ) -> Result<Vec<ReviewPhoto>, ReviewsError> {
        let photos = sqlx::query_as::<_, ReviewPhoto>(
            "SELECT * FROM review_photos WHERE review_id = ANY($1) ORDER BY review_id, display_order ASC",
        )
        .bind(review_ids)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to batch-fetch photos: {}", e);
            ReviewsError::DatabaseError(format!("Fetch photos failed: {}", e))
        })?;

        Ok(photos)
    }
}
