//! OAuth2 client configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How the token endpoint expects the code exchange.
///
/// Most deployed providers take a POST with form-encoded parameters; some
/// older ones accept the same parameters on a GET query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenRequestMethod {
    PostForm,
    GetQuery,
}

/// Configuration for one OAuth2 indirect client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuth2ClientConfig {
    /// Unique client name; doubles as the `client_name` callback parameter.
    pub name: String,
    pub client_id: String,
    pub client_secret: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub profile_endpoint: String,
    pub scopes: Vec<String>,
    /// Additional parameters to include in the authorization request.
    pub auth_params: HashMap<String, String>,
    pub token_request_method: TokenRequestMethod,
    /// Outbound calls must not hang the request; this bounds both the token
    /// exchange and the profile fetch.
    pub http_timeout_seconds: u64,
}

impl OAuth2ClientConfig {
    pub fn new(
        name: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authorization_endpoint: String::new(),
            token_endpoint: String::new(),
            profile_endpoint: String::new(),
            scopes: Vec::new(),
            auth_params: HashMap::new(),
            token_request_method: TokenRequestMethod::PostForm,
            http_timeout_seconds: 10,
        }
    }

    pub fn with_endpoints(
        mut self,
        authorization: impl Into<String>,
        token: impl Into<String>,
        profile: impl Into<String>,
    ) -> Self {
        self.authorization_endpoint = authorization.into();
        self.token_endpoint = token.into();
        self.profile_endpoint = profile.into();
        self
    }

    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    pub fn with_auth_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth_params.insert(key.into(), value.into());
        self
    }

    pub fn with_token_request_method(mut self, method: TokenRequestMethod) -> Self {
        self.token_request_method = method;
        self
    }

    pub fn with_http_timeout(mut self, seconds: u64) -> Self {
        self.http_timeout_seconds = seconds;
        self
    }
}
