//! Minimal blocking HTTP client shared by the Quarry miners.
//!
//! - Request options: query params, prebuilt auth header, timeout
//! - Redacts sensitive query params and never logs header values
//! - One request per call, no retries: callers decide what a failure means
//!
//! Every operation in this workspace is a single GET returning JSON, so the
//! surface here is deliberately small: anchor a base URL once, then
//! [`HttpClient::get_json`] per call.
//!
//! Observability: structured `tracing` events are emitted for request start
//! (`http.request.start`), the response (`http.response`), JSON decode
//! failures (`http.decode_error`), and non-2xx outcomes (`http.error`).

use reqwest::blocking::Client;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::time::Duration;
use thiserror::Error;

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("client build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}")]
    Api { status: StatusCode, message: String },
}

// ==============================
// Request options
// ==============================

/// A ready-to-send auth header, e.g. an OAuth1 `Authorization` value.
#[derive(Clone, Debug)]
pub struct AuthHeader {
    pub name: HeaderName,
    pub value: HeaderValue,
}

/// Per-request tuning knobs.
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub auth: Option<AuthHeader>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>, // e.g. [("titles", "A|B".into())]
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// The default per-request timeout is a conservative 15 seconds; expiry
    /// surfaces as [`HttpError::Network`] like any other transport failure.
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
        })
    }

    /// Override the default timeout returned by [`HttpClient::new`].
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// Resolve `path` against the base URL. Callers that sign requests need
    /// the exact URL that will go on the wire.
    pub fn resolve(&self, path: &str) -> Result<Url, HttpError> {
        self.base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }

    /// GET JSON with per-request options (query/auth/timeout).
    ///
    /// Exactly one request is sent; there is no retry or fallback. A non-2xx
    /// status becomes [`HttpError::Api`] with a best-effort message pulled
    /// from the body's error envelope.
    pub fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let url = self.resolve(path)?;
        let timeout = opts.timeout.unwrap_or(self.default_timeout);

        let mut rb = self.inner.get(url.clone()).timeout(timeout);

        if let Some(q) = &opts.query {
            let pairs: Vec<(&str, &str)> = q.iter().map(|(k, v)| (*k, v.as_ref())).collect();
            rb = rb.query(&pairs);
        }

        let auth_kind = match &opts.auth {
            Some(_) => "header",
            None => "none",
        };
        if let Some(AuthHeader { name, value }) = &opts.auth {
            rb = rb.header(name.clone(), value.clone());
        }

        tracing::debug!(
            host_path = %format!("{}{}", url.domain().unwrap_or("-"), url.path()),
            query = ?redact_query(opts.query.as_deref()),
            timeout_ms = timeout.as_millis() as u64,
            auth_kind,
            "http.request.start"
        );

        let t0 = std::time::Instant::now();
        let resp = rb.send().map_err(|e| {
            tracing::warn!(message = %e, "http.network_error.send");
            HttpError::Network(e.to_string())
        })?;
        let status = resp.status();
        let bytes = resp.bytes().map_err(|e| {
            tracing::warn!(message = %e, "http.network_error.body");
            HttpError::Network(e.to_string())
        })?;

        tracing::debug!(
            %status,
            duration_ms = t0.elapsed().as_millis() as u64,
            body_len = bytes.len(),
            "http.response"
        );

        let snippet = snip_body(&bytes);

        if status.is_success() {
            return serde_json::from_slice::<T>(&bytes).map_err(|e| {
                tracing::warn!(
                    serde_err = %e,
                    body_snippet = %snippet,
                    "http.decode_error"
                );
                HttpError::Decode(e.to_string(), snippet)
            });
        }

        let message = extract_error_message(&bytes);
        tracing::warn!(%status, message = %message, body_snippet = %snippet, "http.error");
        Err(HttpError::Api { status, message })
    }
}

// ==============================
// Helpers
// ==============================

/// Pull a human-readable message out of the error envelopes our remotes use.
fn extract_error_message(body: &[u8]) -> String {
    // MediaWiki style: {"error":{"code":"...","info":"..."}}
    #[derive(Deserialize)]
    struct MwEnv {
        error: MwDetail,
    }
    #[derive(Deserialize)]
    struct MwDetail {
        #[serde(default)]
        code: String,
        #[serde(default)]
        info: String,
    }

    // Twitter style: {"errors":[{"message":"..."}]}
    #[derive(Deserialize)]
    struct TwErrors {
        errors: Vec<TwErr>,
    }
    #[derive(Deserialize)]
    struct TwErr {
        #[serde(default)]
        message: String,
    }

    // Generic: {"message":"..."} or {"error":"..."}
    #[derive(Deserialize)]
    struct Msg {
        #[serde(default)]
        message: String,
        #[serde(default)]
        error: String,
    }

    if let Ok(env) = serde_json::from_slice::<MwEnv>(body) {
        if !env.error.info.is_empty() {
            return env.error.info;
        }
        if !env.error.code.is_empty() {
            return env.error.code;
        }
    }
    if let Ok(tw) = serde_json::from_slice::<TwErrors>(body) {
        if let Some(first) = tw.errors.into_iter().next() {
            if !first.message.is_empty() {
                return first.message;
            }
        }
    }
    if let Ok(m) = serde_json::from_slice::<Msg>(body) {
        if !m.message.is_empty() {
            return m.message;
        }
        if !m.error.is_empty() {
            return m.error;
        }
    }
    snip_body(body)
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > 500 {
        snip.truncate(500);
        snip.push_str("...");
    }
    snip
}

fn redact_query(query: Option<&[(&str, Cow<'_, str>)]>) -> Vec<(String, String)> {
    query
        .map(|q| {
            q.iter()
                .map(|(k, v)| {
                    let is_secret = matches!(
                        k.to_ascii_lowercase().as_str(),
                        "authorization"
                            | "auth"
                            | "key"
                            | "api_key"
                            | "token"
                            | "secret"
                            | "oauth_token"
                            | "oauth_signature"
                    );
                    (
                        (*k).to_string(),
                        if is_secret {
                            "<redacted>".to_string()
                        } else {
                            v.as_ref().to_string()
                        },
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}
