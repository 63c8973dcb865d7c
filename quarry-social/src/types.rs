//! Response model for the v1.1 user-timeline endpoint.
//!
//! The endpoint returns an ordered array of posts, newest first. We only
//! keep the fields the miner consults; everything else is ignored.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub created_at: Option<String>,
}
