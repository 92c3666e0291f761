//! Error taxonomy for the authentication pipeline.

use http::StatusCode;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No credentials present in request")]
    MissingCredentials,

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("State parameter mismatch")]
    StateMismatch,

    #[error("Malformed callback: missing {0} parameter")]
    MalformedCallback(&'static str),

    #[error("Unknown client: {0}")]
    UnknownClient(String),

    #[error("No client configured for this route")]
    NoClientConfigured,

    #[error("Upstream rejected the request: {0}")]
    UpstreamRejected(String),

    #[error("Upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    #[error("Invalid upstream response: {0}")]
    InvalidUpstreamResponse(String),

    #[error("Session store error: {0}")]
    Session(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AuthError {
    /// HTTP status this failure surfaces as.
    ///
    /// Upstream non-2xx responses are attributed to the caller's code/token
    /// and map to 401; a third party we could not reach at all maps to 502.
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials
            | AuthError::InvalidCredentials(_)
            | AuthError::StateMismatch
            | AuthError::UpstreamRejected(_)
            | AuthError::InvalidUpstreamResponse(_) => StatusCode::UNAUTHORIZED,
            AuthError::MalformedCallback(_) | AuthError::UnknownClient(_) => {
                StatusCode::BAD_REQUEST
            }
            AuthError::NoClientConfigured => StatusCode::FORBIDDEN,
            AuthError::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            AuthError::Session(_)
            | AuthError::Config(_)
            | AuthError::Url(_)
            | AuthError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
