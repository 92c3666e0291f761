//! Client capability traits and the fixed direct/indirect dispatch point.

use crate::context::WebRequest;
use crate::credentials::Credentials;
use crate::error::{AuthError, AuthResult};
use crate::profile::UserProfile;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Access token obtained by exchanging an authorization code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    pub token_type: String,
    pub expires_in: Option<u64>,
}

/// A client that authenticates synchronously from data already present in
/// the request (e.g. a header). No redirect is ever issued.
#[async_trait]
pub trait DirectClient: Send + Sync {
    /// Unique client name, used as the authentication-session-scoping key.
    fn name(&self) -> &str;

    /// Pull credentials out of the request; `None` when the request carries
    /// nothing this client recognizes.
    fn extract_credentials(&self, request: &WebRequest) -> Option<Credentials>;

    /// Validate the extracted credentials and build the resulting profile.
    async fn authenticate(&self, credentials: Credentials) -> AuthResult<UserProfile>;
}

/// A client that authenticates by redirecting the user agent to a third
/// party; the flow completes asynchronously when the user agent returns to
/// the callback endpoint carrying a code and a state token.
#[async_trait]
pub trait IndirectClient: Send + Sync {
    /// Unique client name, threaded through the callback via the
    /// `client_name` query parameter.
    fn name(&self) -> &str;

    /// Build the third-party authorization URL for a freshly generated state
    /// token and this application's callback URI.
    fn authorization_url(&self, state: &str, redirect_uri: &str) -> AuthResult<String>;

    /// Exchange the callback's authorization code for an access token.
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> AuthResult<AccessToken>;

    /// Fetch the remote profile with the access token and map it into the
    /// canonical profile shape.
    async fn fetch_profile(&self, token: &AccessToken) -> AuthResult<UserProfile>;
}

/// Tagged client variant, dispatched once at handler-configuration time.
/// The handlers never inspect concrete client types.
#[derive(Clone)]
pub enum Client {
    Direct(Arc<dyn DirectClient>),
    Indirect(Arc<dyn IndirectClient>),
}

impl Client {
    pub fn name(&self) -> &str {
        match self {
            Client::Direct(client) => client.name(),
            Client::Indirect(client) => client.name(),
        }
    }
}

/// The set of clients known to the application, looked up by name on
/// callback and iterated in configured order by the security handler.
#[derive(Clone, Default)]
pub struct Clients {
    clients: Vec<Client>,
}

impl Clients {
    /// Client names must be unique; the name is the session-scoping key for
    /// indirect state tokens.
    pub fn new(clients: Vec<Client>) -> AuthResult<Self> {
        for (i, client) in clients.iter().enumerate() {
            if clients[..i].iter().any(|c| c.name() == client.name()) {
                return Err(AuthError::Config(format!(
                    "Duplicate client name: {}",
                    client.name()
                )));
            }
        }
        Ok(Self { clients })
    }

    pub fn find(&self, name: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Client> {
        self.clients.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
