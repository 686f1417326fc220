//! Session identity.
//!
//! Authentication itself is owned by an upstream gateway; this service
//! only consumes the established session. The gateway forwards the
//! caller's identity in trusted headers, and every service call receives
//! the identity explicitly instead of reading ambient global state.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::HeaderMap, request::Parts},
};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The authenticated caller, as asserted by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub uid: String,
    pub display_name: String,
    pub role: String,
}

impl SessionUser {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ServiceError> {
        let uid = header_value(headers, USER_ID_HEADER)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                ServiceError::Unauthorized("missing session identity".to_string())
            })?;

        Ok(Self {
            uid,
            display_name: header_value(headers, USER_NAME_HEADER).unwrap_or_default(),
            role: header_value(headers, USER_ROLE_HEADER).unwrap_or_default(),
        })
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        SessionUser::from_headers(&parts.headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_identity_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("u-42"));
        headers.insert(USER_NAME_HEADER, HeaderValue::from_static("Amara Perera"));
        headers.insert(USER_ROLE_HEADER, HeaderValue::from_static("MainDirector"));

        let user = SessionUser::from_headers(&headers).unwrap();
        assert_eq!(user.uid, "u-42");
        assert_eq!(user.display_name, "Amara Perera");
        assert_eq!(user.role, "MainDirector");
    }

    #[test]
    fn missing_uid_is_unauthorized() {
        let headers = HeaderMap::new();
        assert!(matches!(
            SessionUser::from_headers(&headers),
            Err(ServiceError::Unauthorized(_))
        ));
    }
}
