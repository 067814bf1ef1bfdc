// src/models/review.rs

use crate::models::{HostResponse, ReviewPhoto, ReviewPhotoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Guest review of a property, tied 1:1 to a completed booking
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub property_id: Uuid,
    pub author_id: Uuid,
    pub rating: i32,
    pub cleanliness_rating: Option<i32>,
    pub communication_rating: Option<i32>,
    pub check_in_rating: Option<i32>,
    pub accuracy_rating: Option<i32>,
    pub location_rating: Option<i32>,
    pub value_rating: Option<i32>,
    pub comment: Option<String>,
    pub is_verified: bool,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields persisted when a review is created
/// DOCUMENTATION: Built by the service after eligibility checks pass;
/// is_verified is derived from the booking status, never client-supplied
#[derive(Debug, Clone)]
pub struct NewReview {
    pub booking_id: Uuid,
    pub property_id: Uuid,
    pub author_id: Uuid,
    pub rating: i32,
    pub cleanliness_rating: Option<i32>,
    pub communication_rating: Option<i32>,
    pub check_in_rating: Option<i32>,
    pub accuracy_rating: Option<i32>,
    pub location_rating: Option<i32>,
    pub value_rating: Option<i32>,
    pub comment: Option<String>,
    pub is_verified: bool,
}

/// Request to create a new review
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub booking_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(range(min = 1, max = 5, message = "Cleanliness rating must be between 1 and 5"))]
    pub cleanliness_rating: Option<i32>,

    #[validate(range(min = 1, max = 5, message = "Communication rating must be between 1 and 5"))]
    pub communication_rating: Option<i32>,

    #[validate(range(min = 1, max = 5, message = "Check-in rating must be between 1 and 5"))]
    pub check_in_rating: Option<i32>,

    #[validate(range(min = 1, max = 5, message = "Accuracy rating must be between 1 and 5"))]
    pub accuracy_rating: Option<i32>,

    #[validate(range(min = 1, max = 5, message = "Location rating must be between 1 and 5"))]
    pub location_rating: Option<i32>,

    #[validate(range(min = 1, max = 5, message = "Value rating must be between 1 and 5"))]
    pub value_rating: Option<i32>,

    #[validate(length(max = 4000, message = "Comment is too long"))]
    pub comment: Option<String>,

    #[validate]
    pub photos: Option<Vec<PhotoUpload>>,
}

/// Request to update review content
/// DOCUMENTATION: Partial update - only provided fields are modified.
/// Visibility and booking binding are deliberately absent here.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,

    #[validate(range(min = 1, max = 5, message = "Cleanliness rating must be between 1 and 5"))]
    pub cleanliness_rating: Option<i32>,

    #[validate(range(min = 1, max = 5, message = "Communication rating must be between 1 and 5"))]
    pub communication_rating: Option<i32>,

    #[validate(range(min = 1, max = 5, message = "Check-in rating must be between 1 and 5"))]
    pub check_in_rating: Option<i32>,

    #[validate(range(min = 1, max = 5, message = "Accuracy rating must be between 1 and 5"))]
    pub accuracy_rating: Option<i32>,

    #[validate(range(min = 1, max = 5, message = "Location rating must be between 1 and 5"))]
    pub location_rating: Option<i32>,

    #[validate(range(min = 1, max = 5, message = "Value rating must be between 1 and 5"))]
    pub value_rating: Option<i32>,

    #[validate(length(max = 4000, message = "Comment is too long"))]
    pub comment: Option<String>,
}

/// Photo attached to a review at creation time
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUpload {
    #[validate(url(message = "Photo url must be a valid URL"))]
    pub url: String,

    #[validate(length(max = 500, message = "Photo caption is too long"))]
    pub caption: Option<String>,
}

/// Review DTO exposed via API, with its photos and host response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub property_id: Uuid,
    pub author_id: Uuid,
    pub rating: i32,
    pub cleanliness_rating: Option<i32>,
    pub communication_rating: Option<i32>,
    pub check_in_rating: Option<i32>,
    pub accuracy_rating: Option<i32>,
    pub location_rating: Option<i32>,
    pub value_rating: Option<i32>,
    pub comment: Option<String>,
    pub is_verified: bool,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub photos: Vec<ReviewPhotoResponse>,
    pub response: Option<HostResponse>,
}

impl Review {
    /// Convert database Review into API response
    pub fn to_response(
        &self,
        photos: Vec<ReviewPhoto>,
        response: Option<HostResponse>,
    ) -> ReviewResponse {
        ReviewResponse {
            id: self.id,
            booking_id: self.booking_id,
            property_id: self.property_id,
            author_id: self.author_id,
            rating: self.rating,
            cleanliness_rating: self.cleanliness_rating,
            communication_rating: self.communication_rating,
            check_in_rating: self.check_in_rating,
            accuracy_rating: self.accuracy_rating,
            location_rating: self.location_rating,
            value_rating: self.value_rating,
            comment: self.comment.clone(),
            is_verified: self.is_verified,
            is_visible: self.is_visible,
            created_at: self.created_at,
            updated_at: self.updated_at,
            photos: photos.into_iter().map(|p| p.to_response()).collect(),
            response,
        }
    }
}

/// Rating observation used by the aggregator
/// DOCUMENTATION: One row per review: the overall rating and whether a host
/// response exists. Fetched fresh per request; nothing caches these counts.
#[derive(Debug, Clone, FromRow)]
pub struct RatingSample {
    pub rating: i32,
    pub has_response: bool,
}

/// Query parameters for paginated review listings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Query parameters for the realtor moderation listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationListQuery {
    pub property_id: Option<Uuid>,
    pub visible: Option<bool>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Paginated review listing with metadata
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedReviewsResponse {
    pub data: Vec<ReviewResponse>,
    pub total_count: i64,
    pub page: i64,
    pub limit: i64,
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateReviewRequest {
        CreateReviewRequest {
            booking_id: Uuid::new_v4(),
            rating: 5,
            cleanliness_rating: Some(4),
            communication_rating: None,
            check_in_rating: None,
            accuracy_rating: None,
            location_rating: Some(5),
            value_rating: None,
            comment: Some("Great stay".to_string()),
            photos: None,
        }
    }

    #[test]
    fn test_valid_request_passes_validation() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        let mut req = valid_request();
        req.rating = 6;
        assert!(req.validate().is_err());

        req.rating = 0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_sub_rating_out_of_range_rejected() {
        let mut req = valid_request();
        req.cleanliness_rating = Some(0);
        assert!(req.validate().is_err());

        let mut req = valid_request();
        req.value_rating = Some(6);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_invalid_photo_url_rejected() {
        let mut req = valid_request();
        req.photos = Some(vec![PhotoUpload {
            url: "not a url".to_string(),
            caption: None,
        }]);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_request_deserializes_from_camel_case() {
        let body = r#"{
            "bookingId": "7a0c9f3e-52cf-4f0a-9f6f-0c7e3f9a1b2c",
            "rating": 4,
            "checkInRating": 3,
            "comment": "Nice place",
            "photos": [{"url": "https://media.example.com/upload/v12/abc.jpg", "caption": "View"}]
        }"#;

        let req: CreateReviewRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.rating, 4);
        assert_eq!(req.check_in_rating, Some(3));
        assert_eq!(req.photos.as_ref().unwrap().len(), 1);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_request_all_fields_optional() {
        let req: UpdateReviewRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.rating.is_none());
    }
}
