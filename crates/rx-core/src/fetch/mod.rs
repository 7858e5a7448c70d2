//! HTTP(S) HEAD/GET for module specifiers.
//!
//! Uses the curl crate (libcurl) with pooled easy handles. Redirects are
//! followed by hand so the hop count is bounded and every hop is logged.
//! GET responses pass an acceptability gate (2xx plus a JavaScript-ish
//! `Content-Type`); HEAD only checks the status and reports the final URL.

mod error;
mod parse;
mod pool;

pub use error::FetchError;

use curl::easy::{Easy, List};
use std::future::Future;
use std::str;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::FetchConfig;
use parse::{content_type_allowed, header, is_redirect, parse_headers};
use pool::HandlePool;

const ACCEPT: &str = "Accept: application/javascript, text/javascript, */*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Head,
    Get,
}

/// Accepted response at the end of the redirect chain.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u32,
    /// Final URL after redirects.
    pub url: String,
    /// Lowercase header names with their values, in arrival order.
    pub headers: Vec<(String, String)>,
    /// Response body; `None` for HEAD.
    pub body: Option<Vec<u8>>,
}

impl FetchResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        header(&self.headers, name)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

/// Network access used by the resolver and the fetch-driven loader.
pub trait Fetch: Send + Sync {
    fn fetch(
        &self,
        url: &Url,
        method: Method,
    ) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send;
}

/// Timeouts, redirect bound and content-type allow-list for a `FetchClient`.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub max_redirects: u32,
    pub allowed_content_types: Vec<String>,
    pub max_idle_handles: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for FetchOptions {
    fn from(cfg: &FetchConfig) -> Self {
        Self {
            request_timeout: Duration::from_secs(cfg.request_timeout_secs),
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            max_redirects: cfg.max_redirects,
            allowed_content_types: cfg.allowed_content_types.clone(),
            max_idle_handles: cfg.max_idle_handles,
        }
    }
}

/// Raw outcome of one request, before the redirect/acceptability decision.
struct Hop {
    status: u32,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

/// libcurl-backed client. Cheap to clone; clones share the handle pool.
#[derive(Clone)]
pub struct FetchClient {
    inner: Arc<Inner>,
}

struct Inner {
    pool: HandlePool,
    opts: FetchOptions,
}

impl FetchClient {
    pub fn new(opts: FetchOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                pool: HandlePool::new(opts.max_idle_handles),
                opts,
            }),
        }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.inner.opts
    }

    /// Performs `method` on `url`, following redirects up to the configured bound.
    ///
    /// Runs in the current thread; call from `spawn_blocking` if used from async code.
    pub fn fetch_blocking(&self, url: Url, method: Method) -> Result<FetchResponse, FetchError> {
        let opts = &self.inner.opts;
        let start = url.to_string();
        let mut current = url;
        let mut hops = 0u32;

        loop {
            tracing::debug!(url = %current, ?method, "request");
            let hop = self.perform(&current, method)?;

            if is_redirect(hop.status) {
                if let Some(location) = header(&hop.headers, "location") {
                    if hops >= opts.max_redirects {
                        return Err(FetchError::TooManyRedirects {
                            url: start,
                            max: opts.max_redirects,
                        });
                    }
                    hops += 1;
                    let next = current
                        .join(location)
                        .map_err(|_| FetchError::InvalidRedirect {
                            url: current.to_string(),
                            location: location.to_string(),
                        })?;
                    tracing::debug!(from = %current, to = %next, status = hop.status, hop = hops, "redirect");
                    current = next;
                    continue;
                }
            }

            return self.accept(current, method, hop);
        }
    }

    fn perform(&self, url: &Url, method: Method) -> Result<Hop, FetchError> {
        let mut easy = self.inner.pool.checkout();
        let result = perform_hop(&mut easy, url, method, &self.inner.opts);
        self.inner.pool.checkin(easy);
        result.map_err(|e| FetchError::from_curl(url.as_str(), e))
    }

    fn accept(&self, url: Url, method: Method, hop: Hop) -> Result<FetchResponse, FetchError> {
        if hop.status == 0 {
            return Err(FetchError::Disallowed {
                url: url.into(),
                status: None,
                content_type: None,
            });
        }
        if !(200..300).contains(&hop.status) {
            return Err(FetchError::Disallowed {
                url: url.into(),
                status: Some(hop.status),
                content_type: header(&hop.headers, "content-type").map(String::from),
            });
        }

        let body = match method {
            Method::Head => None,
            Method::Get => {
                match header(&hop.headers, "content-type") {
                    None => {
                        return Err(FetchError::Disallowed {
                            url: url.into(),
                            status: Some(hop.status),
                            content_type: None,
                        })
                    }
                    Some(ct) if !content_type_allowed(ct, &self.inner.opts.allowed_content_types) => {
                        return Err(FetchError::Disallowed {
                            url: url.into(),
                            status: Some(hop.status),
                            content_type: Some(ct.to_string()),
                        })
                    }
                    Some(_) => {}
                }
                Some(hop.body)
            }
        };

        Ok(FetchResponse {
            status: hop.status,
            url: url.into(),
            headers: hop.headers,
            body,
        })
    }
}

impl Fetch for FetchClient {
    async fn fetch(&self, url: &Url, method: Method) -> Result<FetchResponse, FetchError> {
        let client = self.clone();
        let url = url.clone();
        tokio::task::spawn_blocking(move || client.fetch_blocking(url, method)).await?
    }
}

fn perform_hop(
    easy: &mut Easy,
    url: &Url,
    method: Method,
    opts: &FetchOptions,
) -> Result<Hop, curl::Error> {
    let mut lines: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();

    easy.url(url.as_str())?;
    match method {
        Method::Head => easy.nobody(true)?,
        Method::Get => easy.get(true)?,
    }
    easy.follow_location(false)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.request_timeout)?;

    let mut list = List::new();
    list.append(ACCEPT)?;
    easy.http_headers(list)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                lines.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    Ok(Hop {
        status,
        headers: parse_headers(&lines),
        body,
    })
}
