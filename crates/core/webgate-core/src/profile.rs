//! Canonical authenticated-identity record.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The authenticated identity stored in session after a successful
/// authentication.
///
/// Created once per successful authentication and never mutated afterwards;
/// re-authentication replaces the stored profile wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique identifier for the user, as reported by the producing client.
    pub id: String,

    /// Name of the client that produced this profile.
    pub client_name: String,

    /// Attribute name to value mapping (email, display name, ...).
    pub attributes: HashMap<String, String>,
}

impl UserProfile {
    pub fn new(id: impl Into<String>, client_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            client_name: client_name.into(),
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}
