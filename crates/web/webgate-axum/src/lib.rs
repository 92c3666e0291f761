//! axum adapter for the webgate authentication pipeline.
//!
//! Bridges the framework-neutral handlers to axum: the session id rides a
//! cookie, protected routes are gated by [`security_middleware`], and the
//! callback/logout endpoints are plain route handlers. On `Proceed` the
//! authenticated [`UserProfile`] is injected as a request extension for the
//! inner handler to consume.

use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use http::{HeaderMap, HeaderValue, StatusCode, header};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use webgate_core::{Clients, Outcome, SessionStore, UserProfile, WebRequest};
use webgate_engine::{CallbackHandler, LogoutHandler, SecurityHandler};

/// Cookie carrying the opaque session identifier.
pub const SESSION_COOKIE: &str = "webgate.session";

/// The three request gates plus everything the adapter needs to run them.
#[derive(Clone)]
pub struct AuthGate {
    security: SecurityHandler,
    callback: CallbackHandler,
    logout: LogoutHandler,
}

impl AuthGate {
    pub fn new(
        clients: Arc<Clients>,
        session_store: Arc<dyn SessionStore>,
        callback_url: impl Into<String>,
        default_url: impl Into<String>,
    ) -> Self {
        let callback_url = callback_url.into();
        Self {
            security: SecurityHandler::new(
                clients.clone(),
                session_store.clone(),
                callback_url.clone(),
            ),
            callback: CallbackHandler::new(clients, session_store.clone(), callback_url, default_url),
            logout: LogoutHandler::new(session_store),
        }
    }

    pub fn with_post_logout_url(mut self, url: impl Into<String>) -> Self {
        self.logout = self.logout.with_post_logout_url(url);
        self
    }

    /// Routes for the callback and logout endpoints. Protected routes are
    /// the application's own, wrapped with [`security_middleware`].
    pub fn routes(self) -> Router {
        Router::new()
            .route("/callback", get(callback_route))
            .route("/logout", get(logout_route))
            .with_state(self)
    }
}

/// Gate for protected routes; apply with
/// `axum::middleware::from_fn_with_state(gate, security_middleware)`.
pub async fn security_middleware(
    State(gate): State<AuthGate>,
    request: Request,
    next: Next,
) -> Response {
    let (session_id, fresh_session) = resolve_session(request.headers());
    let web_request = to_web_request(&request);

    let response = match gate.security.handle(&web_request, &session_id).await {
        Outcome::Proceed(profile) => {
            let mut request = request;
            request.extensions_mut().insert::<UserProfile>(profile);
            next.run(request).await
        }
        outcome => outcome_response(outcome),
    };

    attach_session_cookie(response, &session_id, fresh_session)
}

async fn callback_route(State(gate): State<AuthGate>, request: Request) -> Response {
    let (session_id, fresh_session) = resolve_session(request.headers());
    let web_request = to_web_request(&request);
    let outcome = gate.callback.handle(&web_request, &session_id).await;
    attach_session_cookie(outcome_response(outcome), &session_id, fresh_session)
}

async fn logout_route(State(gate): State<AuthGate>, request: Request) -> Response {
    let (session_id, fresh_session) = resolve_session(request.headers());
    let web_request = to_web_request(&request);
    let outcome = gate.logout.handle(&web_request, &session_id).await;
    attach_session_cookie(outcome_response(outcome), &session_id, fresh_session)
}

/// Session id from the cookie, or a fresh one for first contact.
fn resolve_session(headers: &HeaderMap) -> (String, bool) {
    match session_cookie(headers) {
        Some(id) => (id, false),
        None => (Uuid::new_v4().to_string(), true),
    }
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(&format!("{SESSION_COOKIE}=")[..]))
        .map(ToString::to_string)
}

fn to_web_request(request: &Request) -> WebRequest {
    let uri = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    WebRequest::new(request.method().clone(), uri).with_headers(request.headers().clone())
}

fn outcome_response(outcome: Outcome) -> Response {
    match outcome {
        // Proceed is handled by the middleware before we get here; a bare
        // 200 is only reachable if a route handler is pointed at a security
        // outcome directly.
        Outcome::Proceed(_) => StatusCode::OK.into_response(),
        Outcome::Redirect(location) => match HeaderValue::from_str(&location) {
            Ok(value) => {
                debug!(%location, "Issuing temporary redirect");
                (
                    StatusCode::TEMPORARY_REDIRECT,
                    [(header::LOCATION, value)],
                )
                    .into_response()
            }
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        },
        Outcome::Reject(status) | Outcome::Completed(status) => status.into_response(),
    }
}

fn attach_session_cookie(mut response: Response, session_id: &str, fresh: bool) -> Response {
    if !fresh {
        return response;
    }
    if let Ok(value) =
        HeaderValue::from_str(&format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly"))
    {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
