//! Proof-of-identity value types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque proof of identity, one variant per client kind.
///
/// Immutable once extracted; equality is derived over the underlying
/// identity fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Credentials {
    /// Proof extracted directly from the request by a direct client, e.g.
    /// header values. `token` is the raw authorization value; `attributes`
    /// carries any identity fields the extractor pulled alongside it.
    Direct {
        token: String,
        attributes: HashMap<String, String>,
    },
    /// Authorization code and state token returned by a third party to the
    /// callback endpoint of an indirect flow.
    Code { code: String, state: String },
}

impl Credentials {
    pub fn direct(token: impl Into<String>) -> Self {
        Credentials::Direct {
            token: token.into(),
            attributes: HashMap::new(),
        }
    }

    pub fn code(code: impl Into<String>, state: impl Into<String>) -> Self {
        Credentials::Code {
            code: code.into(),
            state: state.into(),
        }
    }

    /// Attribute lookup for direct credentials; `None` for code credentials.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Credentials::Direct { attributes, .. } => attributes.get(name).map(String::as_str),
            Credentials::Code { .. } => None,
        }
    }
}
