// src/services/platform_client.rs
// DOCUMENTATION: Platform core API client
// PURPOSE: Resolve bookings, property ownership and realtor portfolios
// owned by the platform core service

use crate::errors::ReviewsError;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

/// Platform core API client
/// DOCUMENTATION: Bookings, properties and realtor profiles live in the
/// platform core; this service only ever reads them at its boundary
#[derive(Clone)]
pub struct PlatformClient {
    /// HTTP client for making requests
    client: Client,
    /// Base URL of the platform core API
    base_url: String,
    /// Service-to-service bearer token
    service_token: String,
    /// Per-request timeout
    timeout: Duration,
}

/// Booking lifecycle status as exposed by the platform core.
/// Only COMPLETED matters here; any unrecognized value is treated as
/// not-completed rather than failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, BookingStatus::Completed)
    }
}

/// Booking record consumed from the platform core
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub guest_id: Uuid,
    pub property_id: Uuid,
    pub status: BookingStatus,
    #[serde(default)]
    pub existing_review_id: Option<Uuid>,
}

/// Ownership resolution for a property
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyOwnership {
    pub property_id: Uuid,
    pub property_title: String,
    /// Realtor profile id
    pub realtor_id: Uuid,
    /// User id behind the realtor profile; authorization compares this
    pub realtor_user_id: Uuid,
    pub business_name: String,
}

/// A property in a realtor's portfolio
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRef {
    pub id: Uuid,
    pub title: String,
}

impl PlatformClient {
    pub fn new(base_url: String, service_token: String, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url,
            service_token,
            timeout,
        }
    }

    /// Fetch a booking by id
    pub async fn get_booking(&self, booking_id: Uuid) -> Result<Booking, ReviewsError> {
        let url = format!("{}/internal/bookings/{}", self.base_url, booking_id);
        let response = self.send_get(&url).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ReviewsError::NotFound("Booking not found".to_string()));
        }
        Self::check_status(&response, "Booking lookup")?;

        response.json::<Booking>().await.map_err(|e| {
            log::error!("Failed to decode booking {}: {}", booking_id, e);
            ReviewsError::ExternalApi(format!("Booking lookup failed: {}", e))
        })
    }

    /// Resolve the realtor owning a property
    pub async fn get_property_ownership(
        &self,
        property_id: Uuid,
    ) -> Result<PropertyOwnership, ReviewsError> {
        let url = format!(
            "{}/internal/properties/{}/ownership",
            self.base_url, property_id
        );
        let response = self.send_get(&url).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ReviewsError::NotFound("Property not found".to_string()));
        }
        Self::check_status(&response, "Ownership lookup")?;

        response.json::<PropertyOwnership>().await.map_err(|e| {
            log::error!("Failed to decode ownership for {}: {}", property_id, e);
            ReviewsError::ExternalApi(format!("Ownership lookup failed: {}", e))
        })
    }

    /// List the properties owned by a realtor's user id
    pub async fn get_realtor_properties(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PropertyRef>, ReviewsError> {
        let url = format!("{}/internal/realtors/{}/properties", self.base_url, user_id);
        let response = self.send_get(&url).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ReviewsError::NotFound("Realtor profile not found".to_string()));
        }
        Self::check_status(&response, "Portfolio lookup")?;

        response.json::<Vec<PropertyRef>>().await.map_err(|e| {
            log::error!("Failed to decode portfolio for {}: {}", user_id, e);
            ReviewsError::ExternalApi(format!("Portfolio lookup failed: {}", e))
        })
    }

    async fn send_get(&self, url: &str) -> Result<reqwest::Response, ReviewsError> {
        self.client
            .get(url)
            .bearer_auth(&self.service_token)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                log::error!("Platform core request failed ({}): {}", url, e);
                ReviewsError::ExternalApi(format!("Platform core unreachable: {}", e))
            })
    }

    fn check_status(response: &reqwest::Response, what: &str) -> Result<(), ReviewsError> {
        if !response.status().is_success() {
            log::error!("{} returned HTTP {}", what, response.status());
            return Err(ReviewsError::ExternalApi(format!(
                "{} returned HTTP {}",
                what,
                response.status()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_status_parsing() {
        let completed: BookingStatus = serde_json::from_str(r#""COMPLETED""#).unwrap();
        assert!(completed.is_completed());

        let cancelled: BookingStatus = serde_json::from_str(r#""CANCELLED""#).unwrap();
        assert!(!cancelled.is_completed());
    }

    #[test]
    fn test_unknown_booking_status_is_not_completed() {
        // New upstream statuses must never unlock review creation
        let status: BookingStatus = serde_json::from_str(r#""CHECKED_IN""#).unwrap();
        assert_eq!(status, BookingStatus::Unknown);
        assert!(!status.is_completed());
    }

    #[test]
    fn test_booking_deserializes_from_camel_case() {
        let body = r#"{
            "id": "0b6f3a34-9a6f-4b7e-8a4f-2f4f4dbe2a11",
            "guestId": "bf0d7d2e-3c46-4f7a-8e9e-6a1a2b3c4d5e",
            "propertyId": "c5e7b8a9-1234-4f7a-8e9e-6a1a2b3c4d5e",
            "status": "COMPLETED"
        }"#;

        let booking: Booking = serde_json::from_str(body).unwrap();
        assert!(booking.status.is_completed());
        assert!(booking.existing_review_id.is_none());
    }
}
