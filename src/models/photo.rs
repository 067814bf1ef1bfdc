// src/models/photo.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Photo owned by a review
/// DOCUMENTATION: Created only inside the review-creation transaction;
/// display_order is zero-based and unique within the review
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewPhoto {
    pub id: Uuid,
    pub review_id: Uuid,
    pub url: String,
    pub caption: Option<String>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Photo DTO for API responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPhotoResponse {
    pub id: Uuid,
    pub url: String,
    pub caption: Option<String>,
    pub display_order: i32,
}

impl ReviewPhoto {
    /// Convert database photo into API response DTO
    pub fn to_response(&self) -> ReviewPhotoResponse {
        ReviewPhotoResponse {
            id: self.id,
            url: self.url.clone(),
            caption: self.caption.clone(),
            display_order: self.display_order,
        }
    }
}
