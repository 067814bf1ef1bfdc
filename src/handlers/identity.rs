// src/handlers/identity.rs
// DOCUMENTATION: Caller identity extraction
// PURPOSE: Read the authenticated identity forwarded by the API gateway

use crate::errors::ReviewsError;
use actix_web::HttpRequest;
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Platform role of the caller, forwarded by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Guest,
    Realtor,
    Admin,
}

impl UserRole {
    fn from_header(value: &str) -> UserRole {
        match value.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => UserRole::Admin,
            "REALTOR" => UserRole::Realtor,
            _ => UserRole::Guest,
        }
    }
}

/// The authenticated caller of a request
#[derive(Debug, Clone, Copy)]
pub struct Requester {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl Requester {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Extract the authenticated caller from the gateway headers
/// DOCUMENTATION: Authentication itself happens upstream; this service only
/// trusts the forwarded X-User-Id / X-User-Role pair. A missing or
/// malformed user id is 401.
pub fn require_user(req: &HttpRequest) -> Result<Requester, ReviewsError> {
    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
        .ok_or(ReviewsError::Unauthenticated)?;

    let role = req
        .headers()
        .get(USER_ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(UserRole::from_header)
        .unwrap_or(UserRole::Guest);

    Ok(Requester { user_id, role })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_missing_user_header_is_unauthenticated() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(
            require_user(&req),
            Err(ReviewsError::Unauthenticated)
        ));
    }

    #[test]
    fn test_malformed_user_id_is_unauthenticated() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "not-a-uuid"))
            .to_http_request();
        assert!(matches!(
            require_user(&req),
            Err(ReviewsError::Unauthenticated)
        ));
    }

    #[test]
    fn test_valid_identity_with_role() {
        let id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, id.to_string()))
            .insert_header((USER_ROLE_HEADER, "admin"))
            .to_http_request();

        let requester = require_user(&req).unwrap();
        assert_eq!(requester.user_id, id);
        assert!(requester.is_admin());
    }

    #[test]
    fn test_unknown_role_defaults_to_guest() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, Uuid::new_v4().to_string()))
            .insert_header((USER_ROLE_HEADER, "superuser"))
            .to_http_request();

        let requester = require_user(&req).unwrap();
        assert_eq!(requester.role, UserRole::Guest);
        assert!(!requester.is_admin());
    }
}
