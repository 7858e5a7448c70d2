//! Scripted `Fetch` implementation for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

use crate::fetch::{Fetch, FetchError, FetchResponse, Method};

#[derive(Clone)]
enum Route {
    Ok {
        status: u32,
        final_url: String,
        content_type: String,
        body: Vec<u8>,
    },
    Fail(u32),
}

/// Answers from a route table keyed by request URL and counts every call.
#[derive(Clone, Default)]
pub(crate) struct MockFetch {
    routes: Arc<Mutex<HashMap<String, Route>>>,
    calls: Arc<AtomicUsize>,
}

impl MockFetch {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// `url` answers 200 as `final_url` (a redirect when they differ).
    pub(crate) fn redirect(&self, url: &str, final_url: &str) -> &Self {
        self.route(url, 200, final_url, "text/javascript", b"")
    }

    pub(crate) fn serve(&self, url: &str, content_type: &str, body: &[u8]) -> &Self {
        self.route(url, 200, url, content_type, body)
    }

    pub(crate) fn route(
        &self,
        url: &str,
        status: u32,
        final_url: &str,
        content_type: &str,
        body: &[u8],
    ) -> &Self {
        self.routes.lock().unwrap().insert(
            url.to_string(),
            Route::Ok {
                status,
                final_url: final_url.to_string(),
                content_type: content_type.to_string(),
                body: body.to_vec(),
            },
        );
        self
    }

    pub(crate) fn fail(&self, url: &str, status: u32) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Route::Fail(status));
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Fetch for MockFetch {
    async fn fetch(&self, url: &Url, method: Method) -> Result<FetchResponse, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let route = self.routes.lock().unwrap().get(url.as_str()).cloned();
        match route {
            Some(Route::Ok {
                status,
                final_url,
                content_type,
                body,
            }) => Ok(FetchResponse {
                status,
                url: final_url,
                headers: vec![("content-type".to_string(), content_type)],
                body: match method {
                    Method::Head => None,
                    Method::Get => Some(body),
                },
            }),
            Some(Route::Fail(status)) => Err(FetchError::Disallowed {
                url: url.to_string(),
                status: Some(status),
                content_type: None,
            }),
            None => Err(FetchError::Disallowed {
                url: url.to_string(),
                status: Some(404),
                content_type: None,
            }),
        }
    }
}
