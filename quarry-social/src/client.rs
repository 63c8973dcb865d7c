//! Timeline client: sign one GET, take the first post's text.

use crate::oauth::{self, Credentials, SignError};
use crate::types::Post;
use quarry_http::{AuthHeader, HttpClient, HttpError, RequestOpts};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use thiserror::Error;

const DEFAULT_ENDPOINT: &str = "https://api.twitter.com";
const TIMELINE_PATH: &str = "1.1/statuses/user_timeline.json";

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("timeline is empty")]
    EmptyTimeline,
    #[error("authentication rejected ({status}): {message}")]
    Auth { status: StatusCode, message: String },
    #[error(transparent)]
    Sign(#[from] SignError),
    #[error(transparent)]
    Http(HttpError),
}

impl From<HttpError> for SocialError {
    fn from(err: HttpError) -> Self {
        // The remote rejecting our signature is a distinct failure class from
        // the transport falling over.
        match err {
            HttpError::Api { status, message }
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                SocialError::Auth { status, message }
            }
            other => SocialError::Http(other),
        }
    }
}

#[derive(Clone)]
pub struct TimelineApi {
    http: HttpClient,
    creds: Credentials,
}

impl TimelineApi {
    pub fn new(creds: Credentials) -> Result<Self, HttpError> {
        Self::with_endpoint(creds, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(creds: Credentials, endpoint: &str) -> Result<Self, HttpError> {
        Ok(Self {
            http: HttpClient::new(endpoint)?,
            creds,
        })
    }

    /// Fetch the text of the most recent post on `handle`'s timeline.
    ///
    /// One signed request, no retries. Fails with
    /// [`SocialError::EmptyTimeline`] when the account has no posts and
    /// [`SocialError::Auth`] when the remote rejects the signature.
    pub fn latest_post_text(&self, handle: &str) -> Result<String, SocialError> {
        let url = self.http.resolve(TIMELINE_PATH)?;
        let params = [("screen_name", handle)];
        let header = oauth::authorization_header(&self.creds, "GET", &url, &params)?;
        let value = HeaderValue::from_str(&header)
            .map_err(|e| SignError::Header(e.to_string()))?;

        tracing::debug!(handle, "social.timeline.fetch");

        let posts: Vec<Post> = self.http.get_json(
            TIMELINE_PATH,
            RequestOpts {
                auth: Some(AuthHeader {
                    name: AUTHORIZATION,
                    value,
                }),
                query: Some(vec![("screen_name", handle.into())]),
                ..Default::default()
            },
        )?;

        first_post_text(posts)
    }
}

/// The timeline is newest-first; the answer is the head of the array.
fn first_post_text(posts: Vec<Post>) -> Result<String, SocialError> {
    posts
        .into_iter()
        .next()
        .map(|p| p.text)
        .ok_or(SocialError::EmptyTimeline)
}
