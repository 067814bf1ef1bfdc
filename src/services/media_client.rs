// src/services/media_client.rs
// DOCUMENTATION: Media storage service client
// PURPOSE: Best-effort deletion of review photo blobs

use crate::errors::ReviewsError;
use reqwest::Client;
use std::time::Duration;

/// Media storage client
/// DOCUMENTATION: Photo blobs live in the media service under a public id
/// derived from the delivery URL. Deletion is best-effort; callers log
/// failures and keep going.
#[derive(Clone)]
pub struct MediaClient {
    client: Client,
    base_url: String,
    service_token: String,
    timeout: Duration,
}

impl MediaClient {
    pub fn new(base_url: String, service_token: String, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url,
            service_token,
            timeout,
        }
    }

    /// Extract the storage public id from a delivery URL
    /// DOCUMENTATION: Delivery URLs look like
    /// `https://media.example.com/.../upload/v1712345/folder/name.jpg`;
    /// the public id is the path after `/upload/` with the version segment
    /// and file extension stripped (`folder/name`).
    pub fn extract_public_id(url: &str) -> Option<String> {
        let (_, tail) = url.split_once("/upload/")?;
        let tail = tail.split(['?', '#']).next()?;

        let mut segments: Vec<&str> = tail.split('/').filter(|s| !s.is_empty()).collect();

        // Drop a leading version segment like "v1712345"
        if let Some(first) = segments.first() {
            if first.len() > 1
                && first.starts_with('v')
                && first[1..].chars().all(|c| c.is_ascii_digit())
            {
                segments.remove(0);
            }
        }

        let last = segments.pop()?;
        let stem = last.rsplit_once('.').map(|(s, _)| s).unwrap_or(last);
        if stem.is_empty() {
            return None;
        }
        segments.push(stem);

        Some(segments.join("/"))
    }

    /// Delete one image blob by public id
    pub async fn delete_image(&self, public_id: &str) -> Result<(), ReviewsError> {
        let url = format!("{}/images/{}", self.base_url, public_id);
        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.service_token)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                ReviewsError::ExternalApi(format!("Media delete request failed: {}", e))
            })?;

        // A blob already gone is a success for cleanup purposes
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            log::debug!("Media blob {} already absent", public_id);
            return Ok(());
        }

        if !response.status().is_success() {
            return Err(ReviewsError::ExternalApi(format!(
                "Media delete returned HTTP {}",
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
    fn test_extract_public_id_versioned_url() {
        let url = "https://media.example.com/lodgia/image/upload/v1712345678/reviews/abc123.jpg";
        assert_eq!(
            MediaClient::extract_public_id(url).as_deref(),
            Some("reviews/abc123")
        );
    }

    #[test]
    fn test_extract_public_id_without_version() {
        let url = "https://media.example.com/image/upload/reviews/abc123.png";
        assert_eq!(
            MediaClient::extract_public_id(url).as_deref(),
            Some("reviews/abc123")
        );
    }

    #[test]
    fn test_extract_public_id_without_extension() {
        let url = "https://media.example.com/image/upload/v99/abc123";
        assert_eq!(MediaClient::extract_public_id(url).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_extract_public_id_strips_query_string() {
        let url = "https://media.example.com/image/upload/v12/reviews/abc.jpg?w=800&h=600";
        assert_eq!(
            MediaClient::extract_public_id(url).as_deref(),
            Some("reviews/abc")
        );
    }

    #[test]
    fn test_extract_public_id_rejects_foreign_urls() {
        assert!(MediaClient::extract_public_id("https://example.com/photo.jpg").is_none());
        assert!(MediaClient::extract_public_id("").is_none());
        assert!(MediaClient::extract_public_id("https://media.example.com/upload/").is_none());
    }
}
