//! Encyclopedia query client for a MediaWiki-style `api.php` endpoint.
//!
//! Four independent operations, each one GET with `action=query` and
//! `formatversion=2`: title to page-id resolution, page lengths, recent
//! revision ids, and revision content. The API does not guarantee that
//! `query.pages` comes back in request order, so every operation matches
//! response records to its inputs by the echoed title/id rather than by
//! position.

pub mod client;
pub mod extract;
pub mod types;

pub use client::{WikiApi, WikiError};
