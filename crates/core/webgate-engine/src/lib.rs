//! Request gates for the webgate authentication pipeline.
//!
//! Three stateless handlers, correlated only through the session store:
//!
//! - [`SecurityHandler`] gates a protected route: an authenticated session
//!   proceeds, everything else is delegated to the configured clients
//!   (redirect for indirect, inline authentication for direct).
//! - [`CallbackHandler`] resumes an indirect flow when the user agent comes
//!   back from the third party with a code and a state token.
//! - [`LogoutHandler`] drops the session's profile.
//!
//! The indirect login spans two unrelated HTTP requests; no in-process
//! continuation ties them together, only the state token and the saved
//! requested URL in the session store.

mod callback;
mod common;
mod logout;
mod security;


pub use callback::CallbackHandler;
pub use logout::LogoutHandler;
pub use security::SecurityHandler;
