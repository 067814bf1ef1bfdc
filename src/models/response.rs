// src/models/response.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Host (realtor) reply attached to a review, at most one per review
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HostResponse {
    pub id: Uuid,
    pub review_id: Uuid,
    pub author_id: Uuid,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for POST /reviews/{id}/response
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RespondRequest {
    #[validate(length(max = 4000, message = "Response comment is too long"))]
    pub comment: String,
}

/// Request body for PATCH /reviews/{id}/visibility
/// DOCUMENTATION: A non-boolean value fails typed deserialization upstream
/// of the handler, producing the 400 the contract requires
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityRequest {
    pub is_visible: bool,
}
