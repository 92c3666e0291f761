//! The OAuth2 indirect client.

use crate::config::{OAuth2ClientConfig, TokenRequestMethod};
use crate::profile::ProfileDefinition;
use crate::types::TokenResponse;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;
use webgate_core::{AccessToken, AuthError, AuthResult, IndirectClient, UserProfile};

/// Indirect client speaking the OAuth2 authorization-code flow.
///
/// The client itself is stateless: the per-flow state token is generated by
/// the security handler and lives in the session store, so two requests of
/// the same flow may be served by different processes.
#[derive(Clone)]
pub struct OAuth2Client {
    config: OAuth2ClientConfig,
    profile_definition: Arc<dyn ProfileDefinition>,
    http_client: reqwest::Client,
}

impl OAuth2Client {
    pub fn new(
        config: OAuth2ClientConfig,
        profile_definition: Arc<dyn ProfileDefinition>,
    ) -> AuthResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()
            .map_err(|e| AuthError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            profile_definition,
            http_client,
        })
    }

    fn token_request(&self, code: &str, redirect_uri: &str) -> reqwest::RequestBuilder {
        let mut params = HashMap::new();
        params.insert("grant_type", "authorization_code");
        params.insert("code", code);
        params.insert("redirect_uri", redirect_uri);
        params.insert("client_id", &self.config.client_id);
        params.insert("client_secret", &self.config.client_secret);

        match self.config.token_request_method {
            TokenRequestMethod::PostForm => self
                .http_client
                .post(&self.config.token_endpoint)
                .form(&params),
            TokenRequestMethod::GetQuery => self
                .http_client
                .get(&self.config.token_endpoint)
                .query(&params),
        }
    }
}

/// A request that never reached the third party (connect failure, timeout)
/// is an upstream outage; everything else the caller can be blamed for.
fn transport_error(what: &str, err: reqwest::Error) -> AuthError {
    AuthError::UpstreamUnreachable(format!("{what}: {err}"))
}

#[async_trait]
impl IndirectClient for OAuth2Client {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn authorization_url(&self, state: &str, redirect_uri: &str) -> AuthResult<String> {
        let mut url = Url::parse(&self.config.authorization_endpoint)?;

        {
            let mut params = url.query_pairs_mut();
            params.append_pair("response_type", "code");
            params.append_pair("client_id", &self.config.client_id);
            params.append_pair("redirect_uri", redirect_uri);
            params.append_pair("state", state);

            if !self.config.scopes.is_empty() {
                params.append_pair("scope", &self.config.scopes.join(" "));
            }

            for (key, value) in &self.config.auth_params {
                params.append_pair(key, value);
            }
        }

        debug!(client = %self.config.name, "Built authorization URL");
        Ok(url.to_string())
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> AuthResult<AccessToken> {
        let response = self
            .token_request(code, redirect_uri)
            .send()
            .await
            .map_err(|e| transport_error("token exchange", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(client = %self.config.name, %status, "Token exchange failed: {body}");
            return Err(AuthError::UpstreamRejected(format!(
                "token endpoint returned {status}"
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidUpstreamResponse(format!("token response: {e}")))?;

        debug!(client = %self.config.name, "Exchanged authorization code for token");
        Ok(token_response.into())
    }

    async fn fetch_profile(&self, token: &AccessToken) -> AuthResult<UserProfile> {
        let response = self
            .http_client
            .get(&self.config.profile_endpoint)
            .bearer_auth(&token.token)
            .send()
            .await
            .map_err(|e| transport_error("profile fetch", e))?;

        if !response.status().is_success() {
            let status = response.status();
            error!(client = %self.config.name, %status, "Profile fetch failed");
            return Err(AuthError::UpstreamRejected(format!(
                "profile endpoint returned {status}"
            )));
        }

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidUpstreamResponse(format!("profile response: {e}")))?;

        let profile = self.profile_definition.convert(&self.config.name, &raw)?;
        debug!(client = %self.config.name, user = %profile.id, "Fetched remote profile");
        Ok(profile)
    }
}
