//! HTTP boundary types.
//!
//! The handlers consume a [`WebRequest`] and produce an [`Outcome`]; how
//! those map onto a concrete web framework is the adapter's concern (see
//! `webgate-axum`).

use crate::profile::UserProfile;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use std::collections::HashMap;

/// The slice of an incoming HTTP request the authentication pipeline needs:
/// method, requested URI, headers, and parsed query parameters.
#[derive(Debug, Clone)]
pub struct WebRequest {
    method: Method,
    uri: String,
    headers: HeaderMap,
    query: HashMap<String, String>,
}

impl WebRequest {
    /// Build a request from its method and requested URI. Query parameters
    /// are parsed out of the URI; the URI itself is kept verbatim so it can
    /// be restored byte-for-byte after an indirect flow completes.
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let query = uri
            .split_once('?')
            .map(|(_, q)| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();

        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            query,
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The requested URI, verbatim as given at construction.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as a string, `None` when absent or not valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

/// Result of running a request through one of the handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The request may proceed to the protected resource as this profile.
    Proceed(UserProfile),
    /// Redirect the user agent to the given location. Always served as 307
    /// to preserve method semantics across the redirect.
    Redirect(String),
    /// Terminal failure with the given status.
    Reject(StatusCode),
    /// Terminal success with no profile attached (logout without a
    /// post-logout redirect).
    Completed(StatusCode),
}
