//! Social timeline fetcher: one OAuth1-signed GET against a user-timeline
//! endpoint, returning the text of the most recent post.
//!
//! Submodules provide the RFC 5849 request signing, the typed response
//! model, and the client itself. Credentials are injected by the caller;
//! nothing here reads configuration storage.

pub mod client;
pub mod oauth;
pub mod types;

pub use client::{SocialError, TimelineApi};
pub use oauth::Credentials;
