//! Session store adapter and the values webgate keeps in it.

use crate::error::{AuthError, AuthResult};
use crate::profile::UserProfile;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Well-known session keys.
///
/// The state token key is scoped per client so that two indirect clients
/// bound to the same application cannot observe each other's flows.
pub mod keys {
    pub const PROFILE: &str = "webgate.profile";
    pub const REQUESTED_URL: &str = "webgate.requested_url";

    pub fn state(client_name: &str) -> String {
        format!("{client_name}.state")
    }
}

/// A profile at rest in the session, together with its expiry.
///
/// `expires_at` is populated from the producing token's `expires_in` when
/// the client reports one; a profile without an expiry never goes stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredProfile {
    pub profile: UserProfile,
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredProfile {
    pub fn new(profile: UserProfile, ttl_seconds: Option<u64>) -> Self {
        let expires_at = ttl_seconds.map(|ttl| Utc::now() + Duration::seconds(ttl as i64));
        Self {
            profile,
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() > at)
    }
}

/// Key-value persistence scoped to a browser session.
///
/// The core only requires these three operations and does not care about the
/// backing (in-memory, distributed cache, ...). Per-key mutation is
/// last-write-wins; the store, not the core, owns any cross-request
/// coordination.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str, key: &str) -> AuthResult<Option<serde_json::Value>>;

    async fn set(&self, session_id: &str, key: &str, value: serde_json::Value) -> AuthResult<()>;

    /// Removing an absent key is not an error.
    async fn remove(&self, session_id: &str, key: &str) -> AuthResult<()>;
}

/// In-memory implementation of [`SessionStore`] for tests and
/// single-process deployments.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, HashMap<String, serde_json::Value>>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: &str, key: &str) -> AuthResult<Option<serde_json::Value>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(session_id)
            .and_then(|session| session.get(key))
            .cloned())
    }

    async fn set(&self, session_id: &str, key: &str, value: serde_json::Value) -> AuthResult<()> {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, session_id: &str, key: &str) -> AuthResult<()> {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(session_id) {
            session.remove(key);
        }
        Ok(())
    }
}

/// Typed accessors over the raw key-value contract.
///
/// These keep the JSON plumbing for profiles in one place so the handlers
/// read and write `StoredProfile` without repeating serde calls.
pub async fn load_profile(
    store: &dyn SessionStore,
    session_id: &str,
) -> AuthResult<Option<StoredProfile>> {
    match store.get(session_id, keys::PROFILE).await? {
        Some(value) => Ok(Some(
            serde_json::from_value(value).map_err(AuthError::Serialization)?,
        )),
        None => Ok(None),
    }
}

pub async fn save_profile(
    store: &dyn SessionStore,
    session_id: &str,
    stored: &StoredProfile,
) -> AuthResult<()> {
    let value = serde_json::to_value(stored)?;
    store.set(session_id, keys::PROFILE, value).await
}
