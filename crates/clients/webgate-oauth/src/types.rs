//! OAuth2 wire types.

use serde::{Deserialize, Serialize};
use webgate_core::AccessToken;

/// Token endpoint response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: Option<u64>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

impl From<TokenResponse> for AccessToken {
    fn from(response: TokenResponse) -> Self {
        AccessToken {
            token: response.access_token,
            token_type: response.token_type,
            expires_in: response.expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_deserialize() {
        let json = r#"{
            "access_token": "abc123",
            "token_type": "Bearer",
            "expires_in": 5000
        }"#;

        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "abc123");
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, Some(5000));
        assert_eq!(response.refresh_token, None);

        let token: AccessToken = response.into();
        assert_eq!(token.token, "abc123");
        assert_eq!(token.expires_in, Some(5000));
    }
}
