//! Specifier resolution.
//!
//! Order of decisions for `resolve(specifier, context)`:
//! 1. lock-file record for `(parent, specifier)` → done, no network;
//! 2. import-map substitution;
//! 3. built-in → returned verbatim;
//! 4. candidate URL (join against parent, or standalone parse with a
//!    leading-slash retry);
//! 5. non-network URL → returned as is;
//! 6. network URL → canonical URL from the HEAD cache or a HEAD request that
//!    follows redirects; recorded in the HEAD cache and the lock file.
//!
//! Every result short-circuits the host's own resolution.

mod candidate;

use std::sync::Arc;
use thiserror::Error;

use crate::cache::{CacheService, ResolutionCache};
use crate::context::HookContext;
use crate::fetch::{Fetch, FetchError, Method};
use crate::format::ModuleFormat;
use crate::import_map::ImportMap;
use crate::network::NetworkPolicy;
use crate::specifier::{classify, BuiltinModules, SpecifierKind};

use candidate::candidate_url;

/// Resolution result handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub url: String,
    pub format: Option<ModuleFormat>,
    pub short_circuit: bool,
}

impl Resolved {
    fn url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            format: None,
            short_circuit: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    /// Specifier that is not a URL even after the leading-slash retry.
    #[error("invalid module specifier {specifier:?}{}", imported_from(.parent))]
    InvalidSpecifier {
        specifier: String,
        parent: Option<String>,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

fn imported_from(parent: &Option<String>) -> String {
    parent
        .as_deref()
        .map(|p| format!(" imported from {p}"))
        .unwrap_or_default()
}

pub struct SpecifierResolver<F> {
    fetch: F,
    cache: Arc<CacheService>,
    import_map: Arc<ImportMap>,
    builtins: BuiltinModules,
    policy: NetworkPolicy,
}

impl<F: Fetch> SpecifierResolver<F> {
    pub fn new(
        fetch: F,
        cache: Arc<CacheService>,
        import_map: Arc<ImportMap>,
        builtins: BuiltinModules,
        policy: NetworkPolicy,
    ) -> Self {
        Self {
            fetch,
            cache,
            import_map,
            builtins,
            policy,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetch
    }

    pub async fn resolve(
        &self,
        specifier: &str,
        ctx: &HookContext,
    ) -> Result<Resolved, ResolveError> {
        let parent = ctx.parent_url();
        let scope = ResolutionCache::scope_key(parent);
        tracing::debug!(specifier, scope, "resolve");

        let lock = self.cache.lock_file();
        if let Some(url) = lock.get(scope, specifier) {
            tracing::debug!(specifier, %url, "resolved from lock file");
            return Ok(Resolved::url(url));
        }

        let mapped = self.import_map.lookup(specifier, parent);
        if mapped != specifier {
            tracing::debug!(specifier, mapped, "import map");
        }

        let kind = classify(mapped, &self.builtins);
        if kind == SpecifierKind::Builtin {
            tracing::debug!(specifier = mapped, "builtin");
            return Ok(Resolved {
                format: Some(ModuleFormat::Builtin),
                ..Resolved::url(mapped)
            });
        }

        let candidate = candidate_url(mapped, kind.is_path_like(), parent)?;
        if !self.policy.is_network(&candidate) {
            tracing::debug!(specifier, url = %candidate, "resolved locally");
            return Ok(Resolved::url(candidate));
        }

        if let Some(url) = self.cache.heads().get(candidate.as_str()) {
            tracing::debug!(candidate = %candidate, %url, "resolved from HEAD cache");
            lock.set(scope, specifier, &url);
            return Ok(Resolved::url(url));
        }

        let head = self.fetch.fetch(&candidate, Method::Head).await?;
        if head.status != 200 {
            tracing::debug!(candidate = %candidate, status = head.status, "HEAD not 200, not memoized");
            return Ok(Resolved::url(candidate));
        }
        tracing::info!(specifier, candidate = %candidate, url = %head.url, "resolved from network");
        self.cache.heads().insert(candidate.as_str(), head.url.as_str());
        lock.set(scope, specifier, &head.url);
        Ok(Resolved::url(head.url))
    }
}
