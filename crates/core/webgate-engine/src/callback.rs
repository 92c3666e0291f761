//! Completes an indirect authentication flow.

use crate::common::{CLIENT_NAME_PARAM, callback_url_for, constant_time_eq};
use std::sync::Arc;
use tracing::{debug, info, warn};
use webgate_core::{
    AuthError, AuthResult, Client, Clients, Outcome, SessionStore, StoredProfile, WebRequest, keys,
    save_profile,
};

/// Resumes an indirect flow: validates the returned state, exchanges the
/// code for a profile, stores it in the session, and redirects to the
/// originally requested URL.
#[derive(Clone)]
pub struct CallbackHandler {
    clients: Arc<Clients>,
    session_store: Arc<dyn SessionStore>,
    callback_url: String,
    default_url: String,
}

impl CallbackHandler {
    pub fn new(
        clients: Arc<Clients>,
        session_store: Arc<dyn SessionStore>,
        callback_url: impl Into<String>,
        default_url: impl Into<String>,
    ) -> Self {
        Self {
            clients,
            session_store,
            callback_url: callback_url.into(),
            default_url: default_url.into(),
        }
    }

    pub async fn handle(&self, request: &WebRequest, session_id: &str) -> Outcome {
        match self.try_handle(request, session_id).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(session_id, error = %err, "Callback handler rejecting request");
                Outcome::Reject(err.status())
            }
        }
    }

    /// Any failure before the profile is persisted is terminal for this
    /// request; no partial profile ever reaches the session.
    async fn try_handle(&self, request: &WebRequest, session_id: &str) -> AuthResult<Outcome> {
        let client_name = request
            .query_param(CLIENT_NAME_PARAM)
            .ok_or(AuthError::MalformedCallback(CLIENT_NAME_PARAM))?;

        let client = self
            .clients
            .find(client_name)
            .ok_or_else(|| AuthError::UnknownClient(client_name.to_string()))?;

        // Only indirect flows come back through the callback endpoint.
        let Client::Indirect(client) = client else {
            return Err(AuthError::UnknownClient(client_name.to_string()));
        };

        let code = request
            .query_param("code")
            .ok_or(AuthError::MalformedCallback("code"))?;
        let state = request
            .query_param("state")
            .ok_or(AuthError::MalformedCallback("state"))?;

        self.verify_state(session_id, client.name(), state).await?;

        let redirect_uri = callback_url_for(&self.callback_url, client.name())?;
        let token = client.exchange_code(code, &redirect_uri).await?;
        debug!(session_id, client = client.name(), "Exchanged code for access token");

        let profile = client.fetch_profile(&token).await?;
        info!(session_id, client = client.name(), user = %profile.id, "Authenticated via callback");

        let stored = StoredProfile::new(profile, token.expires_in);
        save_profile(self.session_store.as_ref(), session_id, &stored).await?;

        let requested_url = self
            .session_store
            .get(session_id, keys::REQUESTED_URL)
            .await?
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_else(|| self.default_url.clone());

        // The flow is complete; drop the transient state.
        self.session_store
            .remove(session_id, &keys::state(client.name()))
            .await?;
        self.session_store
            .remove(session_id, keys::REQUESTED_URL)
            .await?;

        Ok(Outcome::Redirect(requested_url))
    }

    async fn verify_state(
        &self,
        session_id: &str,
        client_name: &str,
        received: &str,
    ) -> AuthResult<()> {
        let expected = self
            .session_store
            .get(session_id, &keys::state(client_name))
            .await?
            .and_then(|v| v.as_str().map(String::from));

        match expected {
            Some(expected) if constant_time_eq(&expected, received) => Ok(()),
            _ => Err(AuthError::StateMismatch),
        }
    }
}
