//! Which URLs count as network URLs.

use url::Url;

/// Secure network scheme; always a network scheme.
pub const SECURE_SCHEME: &str = "https";

/// Scheme policy shared by the resolver (HEAD verification) and the loader
/// (content caching). Everything else resolves and loads as local.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetworkPolicy {
    allow_http: bool,
}

impl NetworkPolicy {
    pub fn new(allow_http: bool) -> Self {
        Self { allow_http }
    }

    /// Only `https:` URLs are network URLs.
    pub fn secure_only() -> Self {
        Self::new(false)
    }

    pub fn is_network(&self, url: &Url) -> bool {
        match url.scheme() {
            SECURE_SCHEME => true,
            "http" => self.allow_http,
            _ => false,
        }
    }
}
