// src/services/notifier.rs
// DOCUMENTATION: Post-commit domain event emission
// PURPOSE: Deliver notification events to the notification service without
// coupling the write path to delivery success

use crate::errors::ReviewsError;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Wording delivered to the review author when moderation changes visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModerationAction {
    #[serde(rename = "made visible")]
    MadeVisible,
    #[serde(rename = "hidden")]
    Hidden,
}

/// Domain events published after a committed mutation
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NotificationEvent {
    /// A guest left a review; tell the property's realtor
    #[serde(rename_all = "camelCase")]
    ReviewReceived {
        realtor_id: Uuid,
        review_id: Uuid,
        property_title: String,
        rating: i32,
    },
    /// The host responded; tell the review's author
    #[serde(rename_all = "camelCase")]
    ReviewResponse {
        author_id: Uuid,
        review_id: Uuid,
        property_title: String,
    },
    /// Moderation changed visibility; tell the review's author
    #[serde(rename_all = "camelCase")]
    ModerationNotice {
        user_id: Uuid,
        review_id: Uuid,
        property_title: String,
        action: ModerationAction,
        business_name: String,
    },
}

/// Notification service emitter
/// DOCUMENTATION: emit() is fire-and-forget and must only be called after
/// the owning transaction has committed. Delivery failures are logged and
/// swallowed; they never reverse or fail the committed mutation.
#[derive(Clone)]
pub struct NotificationEmitter {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl NotificationEmitter {
    pub fn new(base_url: String, timeout_ms: u64) -> Self {
        Self {
            client: Client::new(),
            base_url,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// Publish an event without blocking the caller
    pub fn emit(&self, event: NotificationEvent) {
        let emitter = self.clone();
        tokio::spawn(async move {
            if let Err(e) = emitter.deliver(&event).await {
                log::warn!("Notification delivery failed: {}", e);
            }
        });
    }

    /// Deliver one event with a bounded timeout
    /// DOCUMENTATION: The timeout caps how long a slow downstream can hold
    /// a delivery task; emit() callers are never held at all
    pub async fn deliver(&self, event: &NotificationEvent) -> Result<(), ReviewsError> {
        let url = format!("{}/notifications", self.base_url);
        let send = self.client.post(&url).json(event).send();

        let response = tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| {
                ReviewsError::ExternalApi("Notification delivery timed out".to_string())
            })?
            .map_err(|e| {
                ReviewsError::ExternalApi(format!("Notification delivery failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(ReviewsError::ExternalApi(format!(
                "Notification service returned HTTP {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_review_received_wire_shape() {
        let event = NotificationEvent::ReviewReceived {
            realtor_id: Uuid::new_v4(),
            review_id: Uuid::new_v4(),
            property_title: "Seaside Loft".to_string(),
            rating: 5,
        };

        let value: Value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "reviewReceived");
        assert_eq!(value["propertyTitle"], "Seaside Loft");
        assert_eq!(value["rating"], 5);
        assert!(value.get("realtorId").is_some());
    }

    #[test]
    fn test_moderation_notice_action_wording() {
        let event = NotificationEvent::ModerationNotice {
            user_id: Uuid::new_v4(),
            review_id: Uuid::new_v4(),
            property_title: "Seaside Loft".to_string(),
            action: ModerationAction::MadeVisible,
            business_name: "Coastal Homes".to_string(),
        };

        let value: Value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "moderationNotice");
        assert_eq!(value["action"], "made visible");
        assert_eq!(value["businessName"], "Coastal Homes");

        let hidden = serde_json::to_value(ModerationAction::Hidden).unwrap();
        assert_eq!(hidden, "hidden");
    }

    #[test]
    fn test_deliver_fails_fast_on_unreachable_downstream() {
        // Port 9 (discard) is not listening; the connection is refused well
        // inside the delivery timeout and deliver returns an error that
        // emit() would log and swallow.
        let emitter = NotificationEmitter::new("http://127.0.0.1:9".to_string(), 500);
        let event = NotificationEvent::ReviewResponse {
            author_id: Uuid::new_v4(),
            review_id: Uuid::new_v4(),
            property_title: "Seaside Loft".to_string(),
        };

        let result = tokio_test::block_on(emitter.deliver(&event));
        assert!(result.is_err());
    }
}
