//! Header-based direct client.
//!
//! Authenticates synchronously from data already present in the request: an
//! `Authorization` header containing a configured marker plus identity
//! headers carrying the user id and email. No redirect is ever issued; a
//! request without the headers is simply not this client's to handle.

use async_trait::async_trait;
use tracing::debug;
use webgate_core::{AuthError, AuthResult, Credentials, DirectClient, UserProfile, WebRequest};

pub const USER_ID_ATTRIBUTE: &str = "user_id";
pub const EMAIL_ATTRIBUTE: &str = "email";

/// Direct client driven entirely by request headers.
#[derive(Debug, Clone)]
pub struct HeaderClient {
    name: String,
    /// Substring the `Authorization` header must contain for this client to
    /// consider the request at all.
    auth_marker: String,
    user_id_header: String,
    email_header: String,
}

impl HeaderClient {
    pub fn new(name: impl Into<String>, auth_marker: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            auth_marker: auth_marker.into(),
            user_id_header: "x-user-id".to_string(),
            email_header: "x-user-email".to_string(),
        }
    }

    pub fn with_identity_headers(
        mut self,
        user_id_header: impl Into<String>,
        email_header: impl Into<String>,
    ) -> Self {
        self.user_id_header = user_id_header.into();
        self.email_header = email_header.into();
        self
    }
}

#[async_trait]
impl DirectClient for HeaderClient {
    fn name(&self) -> &str {
        &self.name
    }

    /// Extraction succeeds as soon as the marker matches, even when the
    /// identity headers are missing; authentication then decides whether
    /// the credentials are complete.
    fn extract_credentials(&self, request: &WebRequest) -> Option<Credentials> {
        let auth = request.header("authorization")?;
        if !auth.contains(&self.auth_marker) {
            return None;
        }

        let mut credentials = Credentials::direct(auth);
        if let Credentials::Direct { attributes, .. } = &mut credentials {
            if let Some(user_id) = request.header(&self.user_id_header) {
                attributes.insert(USER_ID_ATTRIBUTE.to_string(), user_id.to_string());
            }
            if let Some(email) = request.header(&self.email_header) {
                attributes.insert(EMAIL_ATTRIBUTE.to_string(), email.to_string());
            }
        }
        Some(credentials)
    }

    async fn authenticate(&self, credentials: Credentials) -> AuthResult<UserProfile> {
        let user_id = credentials.attribute(USER_ID_ATTRIBUTE).ok_or_else(|| {
            AuthError::InvalidCredentials("authorization header without user id".to_string())
        })?;
        let email = credentials.attribute(EMAIL_ATTRIBUTE).ok_or_else(|| {
            AuthError::InvalidCredentials("authorization header without email".to_string())
        })?;

        debug!(client = %self.name, user = user_id, "Authenticated from headers");
        Ok(UserProfile::new(user_id, &self.name)
            .with_attribute(USER_ID_ATTRIBUTE, user_id)
            .with_attribute(EMAIL_ATTRIBUTE, email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderName, HeaderValue, Method};

    fn request_with(headers: &[(&'static str, &str)]) -> WebRequest {
        let mut request = WebRequest::new(Method::GET, "/private");
        for (name, value) in headers {
            request = request.with_header(
                HeaderName::from_static(name),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        request
    }

    #[test]
    fn test_no_authorization_header_extracts_nothing() {
        let client = HeaderClient::new("direct", "ABC");
        assert!(client.extract_credentials(&request_with(&[])).is_none());
    }

    #[test]
    fn test_marker_mismatch_extracts_nothing() {
        let client = HeaderClient::new("direct", "ABC");
        let request = request_with(&[("authorization", "XYZ")]);
        assert!(client.extract_credentials(&request).is_none());
    }

    #[tokio::test]
    async fn test_full_headers_authenticate() {
        let client = HeaderClient::new("direct", "ABC");
        let request = request_with(&[
            ("authorization", "ABC"),
            ("x-user-id", "jle"),
            ("x-user-email", "test@example.com"),
        ]);

        let credentials = client.extract_credentials(&request).unwrap();
        let profile = client.authenticate(credentials).await.unwrap();

        assert_eq!(profile.id, "jle");
        assert_eq!(profile.client_name, "direct");
        assert_eq!(profile.attribute(EMAIL_ATTRIBUTE), Some("test@example.com"));
    }

    #[tokio::test]
    async fn test_missing_identity_headers_fail_authentication() {
        let client = HeaderClient::new("direct", "ABC");
        let request = request_with(&[("authorization", "ABC")]);

        let credentials = client.extract_credentials(&request).unwrap();
        let result = client.authenticate(credentials).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn test_custom_identity_headers() {
        let client =
            HeaderClient::new("direct", "Bearer").with_identity_headers("x-uid", "x-mail");
        let request = request_with(&[
            ("authorization", "Bearer token"),
            ("x-uid", "user1"),
            ("x-mail", "u@example.com"),
        ]);

        let credentials = client.extract_credentials(&request).unwrap();
        let profile = client.authenticate(credentials).await.unwrap();
        assert_eq!(profile.id, "user1");
    }

    #[test]
    fn test_marker_substring_match() {
        let client = HeaderClient::new("direct", "ABC");
        let request = request_with(&[
            ("authorization", "prefix ABC suffix"),
            ("x-user-id", "jle"),
            ("x-user-email", "a@b.c"),
        ]);
        assert!(client.extract_credentials(&request).is_some());
    }
}
