//! End-to-end tests: a protected axum application behind the gate, with
//! wiremock standing in for the third-party authorization server.

use axum::routing::get;
use axum::{Extension, Json, Router, middleware};
use axum_test::TestServer;
use http::{HeaderName, HeaderValue, StatusCode, header};
use std::sync::Arc;
use url::Url;
use webgate_axum::{AuthGate, SESSION_COOKIE, security_middleware};
use webgate_core::{Client, Clients, InMemorySessionStore, SessionStore, UserProfile};
use webgate_direct::HeaderClient;
use webgate_oauth::{MappedProfileDefinition, OAuth2Client, OAuth2ClientConfig};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CALLBACK_URL: &str = "http://localhost:8080/callback";

async fn secured(Extension(profile): Extension<UserProfile>) -> Json<UserProfile> {
    Json(profile)
}

fn app_with(clients: Vec<Client>) -> TestServer {
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let gate = AuthGate::new(
        Arc::new(Clients::new(clients).unwrap()),
        store,
        CALLBACK_URL,
        "/",
    );

    let app = Router::new()
        .route("/private", get(secured))
        .layer(middleware::from_fn_with_state(
            gate.clone(),
            security_middleware,
        ))
        .merge(gate.routes());

    TestServer::new(app).unwrap()
}

fn session_cookie_of(response: &axum_test::TestResponse) -> String {
    let set_cookie = response
        .header(header::SET_COOKIE)
        .to_str()
        .unwrap()
        .to_string();
    let value = set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix(&format!("{SESSION_COOKIE}=")[..]))
        .expect("session cookie present")
        .to_string();
    format!("{SESSION_COOKIE}={value}")
}

#[tokio::test]
async fn test_direct_client_with_headers_returns_profile() {
    let server = app_with(vec![Client::Direct(Arc::new(HeaderClient::new(
        "direct", "ABC",
    )))]);

    let response = server
        .get("/private")
        .add_header(header::AUTHORIZATION, HeaderValue::from_static("ABC"))
        .add_header(
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_static("jle"),
        )
        .add_header(
            HeaderName::from_static("x-user-email"),
            HeaderValue::from_static("test@example.com"),
        )
        .await;

    response.assert_status_ok();
    let profile: UserProfile = response.json();
    assert_eq!(profile.id, "jle");
    assert_eq!(profile.attribute("email"), Some("test@example.com"));
}

#[tokio::test]
async fn test_direct_client_without_headers_returns_401() {
    let server = app_with(vec![Client::Direct(Arc::new(HeaderClient::new(
        "direct", "ABC",
    )))]);

    let response = server.get("/private").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

fn oauth_client_for(idp: &MockServer) -> OAuth2Client {
    let config = OAuth2ClientConfig::new("testClient", "test_client_id", "test_secret")
        .with_endpoints(
            format!("{}/authorize", idp.uri()),
            format!("{}/authToken", idp.uri()),
            format!("{}/profile", idp.uri()),
        );
    OAuth2Client::new(config, Arc::new(MappedProfileDefinition::new("userId"))).unwrap()
}

async fn mount_idp(idp: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/authToken"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "access_token_1",
            "token_type": "Bearer",
            "expires_in": 5000
        })))
        .mount(idp)
        .await;

    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "userId": "jle",
            "email": "test@example.com"
        })))
        .mount(idp)
        .await;
}

#[tokio::test]
async fn test_indirect_login_flow_end_to_end() {
    let idp = MockServer::start().await;
    mount_idp(&idp).await;

    let server = app_with(vec![Client::Indirect(Arc::new(oauth_client_for(&idp)))]);

    // 1. Unauthenticated request to the protected endpoint: 307 to the
    //    authorization endpoint, with a fresh session cookie.
    let response = server.get("/private").await;
    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    let cookie = session_cookie_of(&response);

    let location = response.header(header::LOCATION).to_str().unwrap().to_string();
    let auth_url = Url::parse(&location).unwrap();
    assert_eq!(auth_url.path(), "/authorize");
    let params: std::collections::HashMap<_, _> = auth_url.query_pairs().into_owned().collect();
    assert_eq!(params.get("response_type").map(String::as_str), Some("code"));
    assert_eq!(
        params.get("client_id").map(String::as_str),
        Some("test_client_id")
    );
    let state = params.get("state").cloned().expect("state parameter");
    let redirect_uri = params.get("redirect_uri").expect("redirect_uri parameter");
    assert!(redirect_uri.contains("client_name=testClient"));

    // 2. The third party bounces the user agent back with code and state.
    let response = server
        .get("/callback")
        .add_query_param("client_name", "testClient")
        .add_query_param("code", "auth_code_1")
        .add_query_param("state", &state)
        .add_header(header::COOKIE, HeaderValue::from_str(&cookie).unwrap())
        .await;

    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.header(header::LOCATION).to_str().unwrap(),
        "/private"
    );

    // 3. The session is authenticated now.
    let response = server
        .get("/private")
        .add_header(header::COOKIE, HeaderValue::from_str(&cookie).unwrap())
        .await;
    response.assert_status_ok();
    let profile: UserProfile = response.json();
    assert_eq!(profile.id, "jle");
    assert_eq!(profile.client_name, "testClient");
}

#[tokio::test]
async fn test_callback_with_forged_state_returns_401() {
    let idp = MockServer::start().await;
    mount_idp(&idp).await;

    let server = app_with(vec![Client::Indirect(Arc::new(oauth_client_for(&idp)))]);

    let response = server.get("/private").await;
    let cookie = session_cookie_of(&response);

    let response = server
        .get("/callback")
        .add_query_param("client_name", "testClient")
        .add_query_param("code", "auth_code_1")
        .add_query_param("state", "forged")
        .add_header(header::COOKIE, HeaderValue::from_str(&cookie).unwrap())
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_returns_session_to_unauthenticated() {
    let idp = MockServer::start().await;
    mount_idp(&idp).await;

    let server = app_with(vec![Client::Indirect(Arc::new(oauth_client_for(&idp)))]);

    // Authenticate
    let response = server.get("/private").await;
    let cookie = session_cookie_of(&response);
    let location = response.header(header::LOCATION).to_str().unwrap().to_string();
    let state = Url::parse(&location)
        .unwrap()
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    server
        .get("/callback")
        .add_query_param("client_name", "testClient")
        .add_query_param("code", "c")
        .add_query_param("state", &state)
        .add_header(header::COOKIE, HeaderValue::from_str(&cookie).unwrap())
        .await;

    // Logout completes with a bare 200
    let response = server
        .get("/logout")
        .add_header(header::COOKIE, HeaderValue::from_str(&cookie).unwrap())
        .await;
    response.assert_status_ok();

    // Protected endpoint behaves like a never-authenticated session again
    let response = server
        .get("/private")
        .add_header(header::COOKIE, HeaderValue::from_str(&cookie).unwrap())
        .await;
    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
}
