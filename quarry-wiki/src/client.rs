//! The query client itself: parameter shaping per operation, one GET each.

use crate::extract;
use crate::types::{Query, QueryResponse};
use quarry_http::{HttpClient, HttpError, RequestOpts};
use std::borrow::Cow;
use std::num::NonZeroUsize;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

#[derive(Debug, Error)]
pub enum WikiError {
    #[error("no page for title {title:?}")]
    TitleNotFound { title: String },
    #[error("no page with id {pageid}")]
    PageNotFound { pageid: u64 },
    #[error("revision {revid} not found")]
    RevisionNotFound { revid: u64 },
    #[error("page {pageid} has {available} revisions, wanted {wanted}")]
    InsufficientRevisions {
        pageid: u64,
        wanted: usize,
        available: usize,
    },
    #[error("response missing expected field {field:?}")]
    MissingField { field: &'static str },
    #[error(transparent)]
    Http(#[from] HttpError),
}

#[derive(Clone)]
pub struct WikiApi {
    http: HttpClient,
}

impl WikiApi {
    pub fn new() -> Result<Self, HttpError> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: &str) -> Result<Self, HttpError> {
        Ok(Self {
            http: HttpClient::new(endpoint)?,
        })
    }

    /// Resolve page titles to page ids, one id per input title.
    ///
    /// Titles are pipe-joined into one request; the bulk count is bounded by
    /// the remote's own limits, not enforced here. Unknown or invalid titles
    /// fail with [`WikiError::TitleNotFound`].
    pub fn resolve_ids(&self, titles: &[&str]) -> Result<Vec<u64>, WikiError> {
        tracing::debug!(count = titles.len(), "wiki.resolve_ids");
        let query = self.query(vec![
            ("prop", "info".into()),
            ("titles", titles.join("|").into()),
        ])?;
        extract::ids_by_title(titles, &query)
    }

    /// Byte length of each page, one per input id.
    pub fn page_lengths(&self, ids: &[u64]) -> Result<Vec<u64>, WikiError> {
        tracing::debug!(count = ids.len(), "wiki.page_lengths");
        let query = self.query(vec![
            ("prop", "info".into()),
            ("pageids", join_ids(ids).into()),
        ])?;
        extract::lengths_by_id(ids, &query)
    }

    /// The `n` most recent revision ids of one page, most recent first.
    ///
    /// Fails with [`WikiError::InsufficientRevisions`] when the page history
    /// is shorter than `n`.
    pub fn recent_revision_ids(
        &self,
        pageid: u64,
        n: NonZeroUsize,
    ) -> Result<Vec<u64>, WikiError> {
        tracing::debug!(pageid, n = n.get(), "wiki.recent_revision_ids");
        let query = self.query(vec![
            ("prop", "revisions".into()),
            ("pageids", pageid.to_string().into()),
            ("rvlimit", n.to_string().into()),
        ])?;
        extract::revision_ids(pageid, n.get(), &query)
    }

    /// Raw wikitext of each requested revision, aligned to the input ids.
    pub fn revision_content(&self, revision_ids: &[u64]) -> Result<Vec<String>, WikiError> {
        tracing::debug!(count = revision_ids.len(), "wiki.revision_content");
        let query = self.query(vec![
            ("prop", "revisions".into()),
            ("revids", join_ids(revision_ids).into()),
            ("rvprop", "content".into()),
        ])?;
        extract::contents_by_revid(revision_ids, &query)
    }

    /// One `action=query` round trip with the shared parameter set.
    fn query(&self, mut params: Vec<(&str, Cow<'_, str>)>) -> Result<Query, WikiError> {
        params.insert(0, ("action", "query".into()));
        params.push(("format", "json".into()));
        params.push(("formatversion", "2".into()));

        let resp: QueryResponse = self.http.get_json(
            "",
            RequestOpts {
                query: Some(params),
                ..Default::default()
            },
        )?;
        resp.query.ok_or(WikiError::MissingField { field: "query" })
    }
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_join_pipe_delimited() {
        assert_eq!(join_ids(&[736, 11867]), "736|11867");
        assert_eq!(join_ids(&[736]), "736");
        assert_eq!(join_ids(&[]), "");
    }
}
