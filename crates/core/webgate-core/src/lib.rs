//! Core traits and types for the webgate authentication pipeline.
//!
//! This crate defines the model shared by every other webgate crate: the
//! credential and profile value types, the client capability traits with
//! their direct/indirect dispatch enum, the session store adapter, the HTTP
//! boundary types, and the error taxonomy. The actual request gates live in
//! `webgate-engine`; concrete clients live in the `webgate-oauth` and
//! `webgate-direct` crates.

mod client;
mod context;
mod credentials;
mod error;
mod profile;
mod session;

pub use client::{AccessToken, Client, Clients, DirectClient, IndirectClient};
pub use context::{Outcome, WebRequest};
pub use credentials::Credentials;
pub use error::{AuthError, AuthResult};
pub use profile::UserProfile;
pub use session::{
    InMemorySessionStore, SessionStore, StoredProfile, keys, load_profile, save_profile,
};
