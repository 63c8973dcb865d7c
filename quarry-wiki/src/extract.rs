//! Response matching, separated from transport so it can be fixture-tested.
//!
//! The remote commonly returns `query.pages` sorted by page id, not in the
//! order titles/ids were requested, and it normalizes titles before lookup.
//! Everything here therefore keys on the title or id echoed in each record.

use crate::client::WikiError;
use crate::types::{Page, Query};
use std::collections::HashMap;

/// Map each input title to its page id, honoring `query.normalized`.
pub fn ids_by_title(titles: &[&str], query: &Query) -> Result<Vec<u64>, WikiError> {
    let normalized: HashMap<&str, &str> = query
        .normalized
        .iter()
        .map(|n| (n.from.as_str(), n.to.as_str()))
        .collect();
    let by_title: HashMap<&str, &Page> = query
        .pages
        .iter()
        .filter_map(|p| p.title.as_deref().map(|t| (t, p)))
        .collect();

    titles
        .iter()
        .map(|&title| {
            let effective = normalized.get(title).copied().unwrap_or(title);
            let page = by_title.get(effective).ok_or_else(|| WikiError::TitleNotFound {
                title: title.to_string(),
            })?;
            if page.missing || page.invalid {
                return Err(WikiError::TitleNotFound {
                    title: title.to_string(),
                });
            }
            page.pageid.ok_or(WikiError::MissingField { field: "pageid" })
        })
        .collect()
}

/// Map each input page id to its byte length.
pub fn lengths_by_id(ids: &[u64], query: &Query) -> Result<Vec<u64>, WikiError> {
    let by_id: HashMap<u64, &Page> = query
        .pages
        .iter()
        .filter_map(|p| p.pageid.map(|id| (id, p)))
        .collect();

    ids.iter()
        .map(|&pageid| {
            let page = by_id
                .get(&pageid)
                .filter(|p| !p.missing)
                .ok_or(WikiError::PageNotFound { pageid })?;
            page.length.ok_or(WikiError::MissingField { field: "length" })
        })
        .collect()
}

/// The `wanted` most recent revision ids of one page, API order preserved
/// (most recent first).
pub fn revision_ids(pageid: u64, wanted: usize, query: &Query) -> Result<Vec<u64>, WikiError> {
    let page = query
        .pages
        .iter()
        .find(|p| p.pageid == Some(pageid))
        .filter(|p| !p.missing)
        .ok_or(WikiError::PageNotFound { pageid })?;

    if page.revisions.len() < wanted {
        return Err(WikiError::InsufficientRevisions {
            pageid,
            wanted,
            available: page.revisions.len(),
        });
    }
    Ok(page.revisions.iter().take(wanted).map(|r| r.revid).collect())
}

/// Content per requested revision id, in request order. Revisions may span
/// any number of page objects in the response.
pub fn contents_by_revid(revids: &[u64], query: &Query) -> Result<Vec<String>, WikiError> {
    let mut by_revid: HashMap<u64, &str> = HashMap::new();
    for page in &query.pages {
        for rev in &page.revisions {
            if let Some(content) = rev.content.as_deref() {
                by_revid.insert(rev.revid, content);
            }
        }
    }

    revids
        .iter()
        .map(|&revid| {
            by_revid
                .get(&revid)
                .map(|c| c.to_string())
                .ok_or(WikiError::RevisionNotFound { revid })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QueryResponse;

    fn query_from(value: serde_json::Value) -> Query {
        let resp: QueryResponse = serde_json::from_value(value).unwrap();
        resp.query.unwrap()
    }

    #[test]
    fn resolves_ids_even_when_response_order_differs() {
        // Germany (11867) sorts before Albert Einstein (736) never; flip the
        // order anyway to prove matching is keyed, not positional.
        let query = query_from(serde_json::json!({
            "query": {
                "pages": [
                    { "pageid": 11867, "ns": 0, "title": "Germany", "length": 200123 },
                    { "pageid": 736, "ns": 0, "title": "Albert Einstein", "length": 150456 }
                ]
            }
        }));
        let ids = ids_by_title(&["Albert Einstein", "Germany"], &query).unwrap();
        assert_eq!(ids, vec![736, 11867]);
    }

    #[test]
    fn resolves_through_title_normalization() {
        let query = query_from(serde_json::json!({
            "query": {
                "normalized": [
                    { "from": "albert einstein", "to": "Albert Einstein" }
                ],
                "pages": [
                    { "pageid": 736, "title": "Albert Einstein" }
                ]
            }
        }));
        let ids = ids_by_title(&["albert einstein"], &query).unwrap();
        assert_eq!(ids, vec![736]);
    }

    #[test]
    fn missing_title_is_page_not_found() {
        let query = query_from(serde_json::json!({
            "query": {
                "pages": [
                    { "title": "No Such Article", "missing": true }
                ]
            }
        }));
        let err = ids_by_title(&["No Such Article"], &query).unwrap_err();
        assert!(matches!(err, WikiError::TitleNotFound { ref title } if title == "No Such Article"));
    }

    #[test]
    fn lengths_match_by_id_not_position() {
        let query = query_from(serde_json::json!({
            "query": {
                "pages": [
                    { "pageid": 736, "title": "Albert Einstein", "length": 150456 },
                    { "pageid": 11867, "title": "Germany", "length": 200123 }
                ]
            }
        }));
        // Request order is the reverse of response order.
        let lengths = lengths_by_id(&[11867, 736], &query).unwrap();
        assert_eq!(lengths, vec![200123, 150456]);
    }

    #[test]
    fn unknown_page_id_is_an_error() {
        let query = query_from(serde_json::json!({
            "query": { "pages": [ { "pageid": 736, "length": 1 } ] }
        }));
        let err = lengths_by_id(&[999], &query).unwrap_err();
        assert!(matches!(err, WikiError::PageNotFound { pageid: 999 }));
    }

    #[test]
    fn revision_ids_keep_api_order_and_count() {
        let query = query_from(serde_json::json!({
            "query": {
                "pages": [{
                    "pageid": 736,
                    "title": "Albert Einstein",
                    "revisions": [
                        { "revid": 1003, "parentid": 1002 },
                        { "revid": 1002, "parentid": 1001 },
                        { "revid": 1001, "parentid": 1000 }
                    ]
                }]
            }
        }));
        let ids = revision_ids(736, 3, &query).unwrap();
        assert_eq!(ids, vec![1003, 1002, 1001]);
        // Asking for fewer takes from the most recent end.
        assert_eq!(revision_ids(736, 2, &query).unwrap(), vec![1003, 1002]);
    }

    #[test]
    fn too_few_revisions_is_an_error() {
        let query = query_from(serde_json::json!({
            "query": {
                "pages": [{ "pageid": 736, "revisions": [ { "revid": 1001 } ] }]
            }
        }));
        let err = revision_ids(736, 3, &query).unwrap_err();
        assert!(matches!(
            err,
            WikiError::InsufficientRevisions { pageid: 736, wanted: 3, available: 1 }
        ));
    }

    #[test]
    fn contents_align_across_pages() {
        // Two revisions of one page plus one of another, response grouped by
        // page; the request interleaves them.
        let query = query_from(serde_json::json!({
            "query": {
                "pages": [
                    {
                        "pageid": 736,
                        "revisions": [
                            { "revid": 1003, "content": "einstein v3" },
                            { "revid": 1001, "content": "einstein v1" }
                        ]
                    },
                    {
                        "pageid": 11867,
                        "revisions": [ { "revid": 2001, "content": "germany v1" } ]
                    }
                ]
            }
        }));
        let contents = contents_by_revid(&[1001, 2001, 1003], &query).unwrap();
        assert_eq!(contents, vec!["einstein v1", "germany v1", "einstein v3"]);
    }

    #[test]
    fn missing_revision_is_an_error() {
        let query = query_from(serde_json::json!({
            "query": {
                "pages": [
                    { "pageid": 736, "revisions": [ { "revid": 1001, "content": "x" } ] }
                ]
            }
        }));
        let err = contents_by_revid(&[1001, 4242], &query).unwrap_err();
        assert!(matches!(err, WikiError::RevisionNotFound { revid: 4242 }));
    }
}
