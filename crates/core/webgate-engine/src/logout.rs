//! Drops the session's authenticated profile.

use http::StatusCode;
use std::sync::Arc;
use tracing::{debug, warn};
use webgate_core::{Outcome, SessionStore, WebRequest, keys};

/// Clears the stored profile unconditionally; logging out twice is not an
/// error. Redirects to the configured post-logout URL when one is set,
/// otherwise completes with a bare 200.
#[derive(Clone)]
pub struct LogoutHandler {
    session_store: Arc<dyn SessionStore>,
    post_logout_url: Option<String>,
}

impl LogoutHandler {
    pub fn new(session_store: Arc<dyn SessionStore>) -> Self {
        Self {
            session_store,
            post_logout_url: None,
        }
    }

    pub fn with_post_logout_url(mut self, url: impl Into<String>) -> Self {
        self.post_logout_url = Some(url.into());
        self
    }

    pub async fn handle(&self, _request: &WebRequest, session_id: &str) -> Outcome {
        if let Err(err) = self.session_store.remove(session_id, keys::PROFILE).await {
            warn!(session_id, error = %err, "Failed to clear session profile");
            return Outcome::Reject(err.status());
        }

        debug!(session_id, "Session profile cleared");
        match &self.post_logout_url {
            Some(url) => Outcome::Redirect(url.clone()),
            None => Outcome::Completed(StatusCode::OK),
        }
    }
}
