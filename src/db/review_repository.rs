// src/db/review_repository.rs
// DOCUMENTATION: Review database operations
// PURPOSE: Handle CRUD, listing and aggregation reads for reviews

use crate::db::{is_unique_violation, ReviewPhotoRepository};
use crate::errors::ReviewsError;
use crate::models::{
    NewReview, PhotoUpload, RatingSample, Review, ReviewListQuery, ReviewPhoto,
    UpdateReviewRequest,
};
use sqlx::PgPool;
use uuid::Uuid;

/// Maximum page size for listings
const MAX_PAGE_SIZE: i64 = 100;

pub struct ReviewRepository;

impl ReviewRepository {
    /// Create a review and all of its photos in one transaction
    /// DOCUMENTATION: Any failure (including the unique booking_id
    /// constraint) rolls the whole operation back, leaving zero rows.
    /// A review with a subset of its photos is never observable.
    pub async fn create_with_photos(
        pool: &PgPool,
        fields: &NewReview,
        photos: &[PhotoUpload],
    ) -> Result<(Review, Vec<ReviewPhoto>), ReviewsError> {
        let mut tx = pool.begin().await.map_err(|e| {
            log::error!("Failed to open transaction: {}", e);
            ReviewsError::DatabaseError(e.to_string())
        })?;

        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (
                booking_id, property_id, author_id, rating,
                cleanliness_rating, communication_rating, check_in_rating,
                accuracy_rating, location_rating, value_rating,
                comment, is_verified
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(fields.booking_id)
        .bind(fields.property_id)
        .bind(fields.author_id)
        .bind(fields.rating)
        .bind(fields.cleanliness_rating)
        .bind(fields.communication_rating)
        .bind(fields.check_in_rating)
        .bind(fields.accuracy_rating)
        .bind(fields.location_rating)
        .bind(fields.value_rating)
        .bind(&fields.comment)
        .bind(fields.is_verified)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ReviewsError::Conflict("Review already exists for this booking".to_string())
            } else {
                log::error!("Failed to create review: {}", e);
                ReviewsError::DatabaseError(format!("Create review failed: {}", e))
            }
        })?;

        let photo_rows = ReviewPhotoRepository::insert_many(&mut tx, review.id, photos).await?;

        tx.commit().await.map_err(|e| {
            log::error!("Failed to commit review creation: {}", e);
            ReviewsError::DatabaseError(e.to_string())
        })?;

        log::info!(
            "Created review {} for booking {} ({} photos)",
            review.id,
            review.booking_id,
            photo_rows.len()
        );
        Ok((review, photo_rows))
    }

    /// Retrieve review by ID
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Review, ReviewsError> {
        let review = sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch review {}: {}", id, e);
                ReviewsError::DatabaseError(e.to_string())
            })?
            .ok_or_else(|| ReviewsError::NotFound("Review not found".to_string()))?;

        Ok(review)
    }

    /// Check whether a booking already has a review
    /// DOCUMENTATION: Advisory pre-check for the common path; the unique
    /// constraint remains authoritative under concurrent submission
    pub async fn exists_for_booking(
        pool: &PgPool,
        booking_id: Uuid,
    ) -> Result<bool, ReviewsError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM reviews WHERE booking_id = $1)")
                .bind(booking_id)
                .fetch_one(pool)
                .await
                .map_err(|e| {
                    log::error!("Failed to check review existence: {}", e);
                    ReviewsError::DatabaseError(e.to_string())
                })?;

        Ok(exists)
    }

    /// List reviews for a property
    /// DOCUMENTATION: Returns a page of reviews and the total count.
    /// Public listings pass visible_only = true so hidden rows never leak.
    pub async fn list_by_property(
        pool: &PgPool,
        property_id: Uuid,
        visible_only: bool,
        query: &ReviewListQuery,
    ) -> Result<(Vec<Review>, i64), ReviewsError> {
        let (page, limit, offset) = page_bounds(query.page, query.limit);
        let visibility = if visible_only {
            " AND is_visible = TRUE"
        } else {
            ""
        };

        let count_sql = format!(
            "SELECT COUNT(*) FROM reviews WHERE property_id = $1{}",
            visibility
        );
        let (total,): (i64,) = sqlx::query_as(&count_sql)
            .bind(property_id)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Count query failed for property {}: {}", property_id, e);
                ReviewsError::DatabaseError(e.to_string())
            })?;

        let (sort_field, sort_dir) = sort_clause(query.sort_by.as_deref(), query.sort_order.as_deref());
        let sql = format!(
            "SELECT * FROM reviews WHERE property_id = $1{} ORDER BY {} {} LIMIT $2 OFFSET $3",
            visibility, sort_field, sort_dir
        );

        let reviews = sqlx::query_as::<_, Review>(&sql)
            .bind(property_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list reviews for property {}: {}", property_id, e);
                ReviewsError::DatabaseError(e.to_string())
            })?;

        log::debug!(
            "Listed {} of {} reviews for property {} (page {})",
            reviews.len(),
            total,
            property_id,
            page
        );
        Ok((reviews, total))
    }

    /// List reviews written by an author
    pub async fn list_by_author(
        pool: &PgPool,
        author_id: Uuid,
        query: &ReviewListQuery,
    ) -> Result<(Vec<Review>, i64), ReviewsError> {
        let (_, limit, offset) = page_bounds(query.page, query.limit);

        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM reviews WHERE author_id = $1")
                .bind(author_id)
                .fetch_one(pool)
                .await
                .map_err(|e| {
                    log::error!("Count query failed for author {}: {}", author_id, e);
                    ReviewsError::DatabaseError(e.to_string())
                })?;

        let reviews = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE author_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list reviews for author {}: {}", author_id, e);
            ReviewsError::DatabaseError(e.to_string())
        })?;

        Ok((reviews, total))
    }

    /// List reviews across a set of properties (moderation view)
    /// DOCUMENTATION: Scoped by the realtor's portfolio; an optional
    /// visibility filter narrows to hidden or visible rows only
    pub async fn list_by_properties(
        pool: &PgPool,
        property_ids: &[Uuid],
        visible: Option<bool>,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<(Vec<Review>, i64), ReviewsError> {
        let (_, limit, offset) = page_bounds(page, limit);
        let visibility = match visible {
            Some(true) => " AND is_visible = TRUE",
            Some(false) => " AND is_visible = FALSE",
            None => "",
        };

        let count_sql = format!(
            "SELECT COUNT(*) FROM reviews WHERE property_id = ANY($1){}",
            visibility
        );
        let (total,): (i64,) = sqlx::query_as(&count_sql)
            .bind(property_ids)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Portfolio count query failed: {}", e);
                ReviewsError::DatabaseError(e.to_string())
            })?;

        let sql = format!(
            "SELECT * FROM reviews WHERE property_id = ANY($1){} ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            visibility
        );
        let reviews = sqlx::query_as::<_, Review>(&sql)
            .bind(property_ids)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list portfolio reviews: {}", e);
                ReviewsError::DatabaseError(e.to_string())
            })?;

        Ok((reviews, total))
    }

    /// Partial content update - only provided fields are modified
    /// DOCUMENTATION: Visibility and booking binding are not touchable here
    pub async fn update_content(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateReviewRequest,
    ) -> Result<Review, ReviewsError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews
            SET rating = COALESCE($1, rating),
                cleanliness_rating = COALESCE($2, cleanliness_rating),
                communication_rating = COALESCE($3, communication_rating),
                check_in_rating = COALESCE($4, check_in_rating),
                accuracy_rating = COALESCE($5, accuracy_rating),
                location_rating = COALESCE($6, location_rating),
                value_rating = COALESCE($7, value_rating),
                comment = COALESCE($8, comment),
                updated_at = NOW()
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(req.rating)
        .bind(req.cleanliness_rating)
        .bind(req.communication_rating)
        .bind(req.check_in_rating)
        .bind(req.accuracy_rating)
        .bind(req.location_rating)
        .bind(req.value_rating)
        .bind(&req.comment)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Update failed for review {}: {}", id, e);
            ReviewsError::DatabaseError(e.to_string())
        })?
        .ok_or_else(|| ReviewsError::NotFound("Review not found".to_string()))?;

        log::info!("Updated review: {}", id);
        Ok(review)
    }

    /// Persist the moderation visibility flag
    /// DOCUMENTATION: Idempotent on data; re-applying the current value is a
    /// valid request and still bumps updated_at
    pub async fn set_visibility(
        pool: &PgPool,
        id: Uuid,
        is_visible: bool,
    ) -> Result<Review, ReviewsError> {
        let review = sqlx::query_as::<_, Review>(
            "UPDATE reviews SET is_visible = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(is_visible)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Visibility update failed for review {}: {}", id, e);
            ReviewsError::DatabaseError(e.to_string())
        })?
        .ok_or_else(|| ReviewsError::NotFound("Review not found".to_string()))?;

        log::info!("Set review {} visibility to {}", id, is_visible);
        Ok(review)
    }

    /// Delete a review row
    /// DOCUMENTATION: Photos and host response are removed by ON DELETE
    /// CASCADE, so no partial ownership state survives
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), ReviewsError> {
        let rows = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Delete failed for review {}: {}", id, e);
                ReviewsError::DatabaseError(e.to_string())
            })?
            .rows_affected();

        if rows == 0 {
            return Err(ReviewsError::NotFound("Review not found".to_string()));
        }

        log::info!("Deleted review: {}", id);
        Ok(())
    }

    /// Fetch rating observations for the aggregator
    /// DOCUMENTATION: One (rating, has_response) pair per review across the
    /// given properties; computed fresh per request from committed rows
    pub async fn rating_samples(
        pool: &PgPool,
        property_ids: &[Uuid],
        visible_only: bool,
    ) -> Result<Vec<RatingSample>, ReviewsError> {
        let visibility = if visible_only {
            " AND r.is_visible = TRUE"
        } else {
            ""
        };
        let sql = format!(
            r#"
            SELECT r.rating, (hr.id IS NOT NULL) AS has_response
            FROM reviews r
            LEFT JOIN review_responses hr ON hr.review_id = r.id
            WHERE r.property_id = ANY($1){}
            "#,
            visibility
        );

        let samples = sqlx::query_as::<_, RatingSample>(&sql)
            .bind(property_ids)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch rating samples: {}", e);
                ReviewsError::DatabaseError(e.to_string())
            })?;

        Ok(samples)
    }

    /// Most recent reviews across a set of properties
    pub async fn recent_by_properties(
        pool: &PgPool,
        property_ids: &[Uuid],
        limit: i64,
    ) -> Result<Vec<Review>, ReviewsError> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE property_id = ANY($1) ORDER BY created_at DESC LIMIT $2",
        )
        .bind(property_ids)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch recent reviews: {}", e);
            ReviewsError::DatabaseError(e.to_string())
        })?;

        Ok(reviews)
    }
}

/// Normalize page/limit query values into (page, limit, offset)
fn page_bounds(page: Option<i64>, limit: Option<i64>) -> (i64, i64, i64) {
    let limit = limit.unwrap_or(20).clamp(1, MAX_PAGE_SIZE);
    let page = page.unwrap_or(1).max(1);
    (page, limit, (page - 1) * limit)
}

/// Map client sort parameters onto whitelisted SQL fragments.
/// Unknown fields fall back to newest-first; anything but "asc" sorts DESC.
fn sort_clause(sort_by: Option<&str>, sort_order: Option<&str>) -> (&'static str, &'static str) {
    let field = match sort_by {
        Some("rating") => "rating",
        Some("updated_at") | Some("updatedAt") => "updated_at",
        _ => "created_at",
    };
    let dir = match sort_order {
        Some(order) if order.eq_ignore_ascii_case("asc") => "ASC",
        _ => "DESC",
    };
    (field, dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_clause_whitelist() {
        assert_eq!(sort_clause(Some("rating"), Some("asc")), ("rating", "ASC"));
        assert_eq!(
            sort_clause(Some("updatedAt"), Some("desc")),
            ("updated_at", "DESC")
        );
        assert_eq!(sort_clause(None, None), ("created_at", "DESC"));
    }

    #[test]
    fn test_sort_clause_rejects_unknown_fields() {
        // Arbitrary client input must never reach the ORDER BY clause
        assert_eq!(
            sort_clause(Some("comment; DROP TABLE reviews"), Some("asc")),
            ("created_at", "ASC")
        );
        assert_eq!(sort_clause(Some(""), Some("sideways")), ("created_at", "DESC"));
    }

    #[test]
    fn test_page_bounds_defaults_and_clamps() {
        assert_eq!(page_bounds(None, None), (1, 20, 0));
        assert_eq!(page_bounds(Some(3), Some(10)), (3, 10, 20));
        assert_eq!(page_bounds(Some(0), Some(0)), (1, 1, 0));
        assert_eq!(page_bounds(Some(-2), Some(1000)), (1, MAX_PAGE_SIZE, 0));
    }
}
