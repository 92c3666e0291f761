//! Helpers shared by the handlers.

use url::Url;
use webgate_core::AuthResult;

pub const CLIENT_NAME_PARAM: &str = "client_name";

/// Callback URL with the client name embedded, so the callback handler can
/// thread the response back to the client that started the flow.
pub fn callback_url_for(callback_url: &str, client_name: &str) -> AuthResult<String> {
    let mut url = Url::parse(callback_url)?;
    url.query_pairs_mut()
        .append_pair(CLIENT_NAME_PARAM, client_name);
    Ok(url.to_string())
}

/// State tokens are compared without short-circuiting on the first differing
/// byte; the comparison time must not depend on where the strings diverge.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
