//! The request gate for protected routes.

use crate::common::callback_url_for;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;
use webgate_core::{
    AuthError, AuthResult, Client, Clients, Outcome, SessionStore, StoredProfile, WebRequest, keys,
    load_profile, save_profile,
};

/// Gates HTTP requests behind authentication.
///
/// Bound to one or more named clients, tried in configured order. A session
/// that already holds a valid profile proceeds without any session mutation.
#[derive(Clone)]
pub struct SecurityHandler {
    clients: Arc<Clients>,
    session_store: Arc<dyn SessionStore>,
    callback_url: String,
}

impl SecurityHandler {
    pub fn new(
        clients: Arc<Clients>,
        session_store: Arc<dyn SessionStore>,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            clients,
            session_store,
            callback_url: callback_url.into(),
        }
    }

    /// Decide what happens to a request for a protected resource. Failures
    /// never escape as errors; they surface as a [`Outcome::Reject`] with
    /// the status from the error taxonomy.
    pub async fn handle(&self, request: &WebRequest, session_id: &str) -> Outcome {
        match self.try_handle(request, session_id).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(session_id, error = %err, "Security handler rejecting request");
                Outcome::Reject(err.status())
            }
        }
    }

    async fn try_handle(&self, request: &WebRequest, session_id: &str) -> AuthResult<Outcome> {
        // An authenticated, non-expired session short-circuits everything.
        // An expired profile is treated as absent; the stale entry gets
        // replaced by the next successful authentication.
        if let Some(stored) = load_profile(self.session_store.as_ref(), session_id).await? {
            if !stored.is_expired() {
                debug!(session_id, client = %stored.profile.client_name, "Session already authenticated");
                return Ok(Outcome::Proceed(stored.profile));
            }
            debug!(session_id, "Stored profile expired, re-authenticating");
        }

        if self.clients.is_empty() {
            return Err(AuthError::NoClientConfigured);
        }

        for client in self.clients.iter() {
            match client {
                Client::Indirect(client) => {
                    return self.start_indirect_flow(client.as_ref(), request, session_id).await;
                }
                Client::Direct(client) => {
                    let Some(credentials) = client.extract_credentials(request) else {
                        continue;
                    };
                    debug!(session_id, client = client.name(), "Authenticating direct credentials");
                    let profile = client.authenticate(credentials).await?;
                    let stored = StoredProfile::new(profile.clone(), None);
                    save_profile(self.session_store.as_ref(), session_id, &stored).await?;
                    return Ok(Outcome::Proceed(profile));
                }
            }
        }

        // Clients are configured but none recognized the request.
        Err(AuthError::MissingCredentials)
    }

    async fn start_indirect_flow(
        &self,
        client: &dyn webgate_core::IndirectClient,
        request: &WebRequest,
        session_id: &str,
    ) -> AuthResult<Outcome> {
        let state = Uuid::new_v4().to_string();
        let redirect_uri = callback_url_for(&self.callback_url, client.name())?;
        let authorization_url = client.authorization_url(&state, &redirect_uri)?;

        self.session_store
            .set(
                session_id,
                &keys::state(client.name()),
                serde_json::Value::String(state),
            )
            .await?;
        self.session_store
            .set(
                session_id,
                keys::REQUESTED_URL,
                serde_json::Value::String(request.uri().to_string()),
            )
            .await?;

        debug!(session_id, client = client.name(), "Redirecting to authorization endpoint");
        Ok(Outcome::Redirect(authorization_url))
    }
}
