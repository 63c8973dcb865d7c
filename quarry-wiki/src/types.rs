//! Wire model for `action=query` responses with `formatversion=2`.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub query: Option<Query>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub pages: Vec<Page>,
    /// Title-normalization applied by the API before lookup, e.g.
    /// `albert einstein` -> `Albert Einstein`. Records echo the normalized
    /// title, so input titles must be mapped through this before matching.
    #[serde(default)]
    pub normalized: Vec<Normalization>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Normalization {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub pageid: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    /// Set when the title does not correspond to any page.
    #[serde(default)]
    pub missing: bool,
    /// Set when the title is syntactically invalid.
    #[serde(default)]
    pub invalid: bool,
    #[serde(default)]
    pub length: Option<u64>,
    /// Most-recent-first for `prop=revisions` queries.
    #[serde(default)]
    pub revisions: Vec<Revision>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Revision {
    pub revid: u64,
    #[serde(default)]
    pub content: Option<String>,
}
