//! OAuth2 authorization-code indirect client.
//!
//! Implements the [`webgate_core::IndirectClient`] capability set against a
//! third-party authorization server: authorization URL construction, code
//! for token exchange, and profile retrieval with a pluggable profile
//! definition translating the provider's raw response schema into the
//! canonical profile shape.

mod client;
mod config;
mod profile;
mod types;


pub use client::OAuth2Client;
pub use config::{OAuth2ClientConfig, TokenRequestMethod};
pub use profile::{MappedProfileDefinition, ProfileDefinition};
pub use types::TokenResponse;
