//! Profile definition strategy.

use serde::{Deserialize, Serialize};
use webgate_core::{AuthError, AuthResult, UserProfile};

/// Translates a provider's raw profile response into the canonical
/// [`UserProfile`] shape. Each provider ships its own definition; the
/// handlers only ever see the canonical profile.
pub trait ProfileDefinition: Send + Sync {
    fn convert(&self, client_name: &str, raw: &serde_json::Value) -> AuthResult<UserProfile>;
}

/// Field-mapping definition: reads the profile id from a configured field
/// and copies every top-level scalar field into the profile attributes.
///
/// Covers providers whose profile endpoint returns a flat JSON object, e.g.
/// `{"userId": "jle", "email": "test@example.com"}` with `id_field` set to
/// `userId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappedProfileDefinition {
    pub id_field: String,
}

impl MappedProfileDefinition {
    pub fn new(id_field: impl Into<String>) -> Self {
        Self {
            id_field: id_field.into(),
        }
    }
}

impl ProfileDefinition for MappedProfileDefinition {
    fn convert(&self, client_name: &str, raw: &serde_json::Value) -> AuthResult<UserProfile> {
        let object = raw.as_object().ok_or_else(|| {
            AuthError::InvalidUpstreamResponse("profile response is not a JSON object".to_string())
        })?;

        // Some providers return numeric user ids; render them the same way
        // attribute values are rendered.
        let id = object
            .get(&self.id_field)
            .and_then(render_scalar)
            .ok_or_else(|| {
                AuthError::InvalidUpstreamResponse(format!(
                    "profile response missing id field '{}'",
                    self.id_field
                ))
            })?;

        let mut profile = UserProfile::new(id, client_name);
        for (key, value) in object {
            if let Some(rendered) = render_scalar(value) {
                profile.attributes.insert(key.clone(), rendered);
            }
        }

        Ok(profile)
    }
}

fn render_scalar(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
