//! Fetch error kinds surfaced to resolve/load callers.

use thiserror::Error;

/// Failure of a single HEAD/GET, including its redirect chain. Never retried.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-2xx status, no response at all, or a content type outside the allow-list.
    #[error("network import disallowed: {url}{}", diagnostics(.status, .content_type))]
    Disallowed {
        url: String,
        status: Option<u32>,
        content_type: Option<String>,
    },
    /// Redirect chain longer than the configured maximum.
    #[error("too many redirects (max {max}) starting at {url}")]
    TooManyRedirects { url: String, max: u32 },
    /// `Location` header that does not form a valid URL.
    #[error("invalid redirect location {location:?} from {url}")]
    InvalidRedirect { url: String, location: String },
    #[error("request to {url} timed out")]
    Timeout { url: String },
    /// Connection, DNS, TLS or other libcurl-level failure.
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },
    #[error("fetch task failed")]
    Task(#[from] tokio::task::JoinError),
}

impl FetchError {
    pub(crate) fn from_curl(url: &str, e: curl::Error) -> Self {
        if e.is_operation_timedout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source: e,
            }
        }
    }

    /// HTTP status carried by a disallowed-import error, if any.
    pub fn status(&self) -> Option<u32> {
        match self {
            FetchError::Disallowed { status, .. } => *status,
            _ => None,
        }
    }
}

fn diagnostics(status: &Option<u32>, content_type: &Option<String>) -> String {
    match (status, content_type) {
        (Some(s), Some(ct)) => format!(" (HTTP {s}, content-type {ct:?})"),
        (Some(s), None) => format!(" (HTTP {s})"),
        (None, Some(ct)) => format!(" (content-type {ct:?})"),
        (None, None) => String::new(),
    }
}
