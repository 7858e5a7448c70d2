//! Module loading with a write-through content cache.
//!
//! Network URLs are served from the content store when both the content file
//! and its sidecar exist; a hit is final and never revalidated. On a miss the
//! host's default loader produces the source, the format is sniffed, and the
//! result is persisted before it is returned. Anything that is not a network
//! URL goes straight to the default loader.

mod fetch_loader;

pub use fetch_loader::FetchLoader;

use anyhow::{anyhow, Context, Result};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use url::Url;

use crate::cache::{CacheMeta, CacheService};
use crate::context::HookContext;
use crate::format::{FormatDetector, ModuleFormat, SyntaxSniffer};
use crate::network::NetworkPolicy;

/// Load result handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    pub format: Option<ModuleFormat>,
    pub source: Vec<u8>,
    /// Location the host should attribute the module to, when it differs
    /// from the requested URL (CommonJS modules are served from the cache file).
    pub response_url: Option<String>,
    pub short_circuit: bool,
}

/// The host's own loader, called for local URLs and on cache misses.
pub trait DefaultLoad: Send + Sync {
    fn load(&self, url: &str, ctx: &HookContext) -> impl Future<Output = Result<Loaded>> + Send;
}

pub struct ModuleLoader {
    cache: Arc<CacheService>,
    detector: Box<dyn FormatDetector>,
    policy: NetworkPolicy,
}

impl ModuleLoader {
    pub fn new(cache: Arc<CacheService>, policy: NetworkPolicy) -> Self {
        Self::with_detector(cache, policy, Box::new(SyntaxSniffer))
    }

    pub fn with_detector(
        cache: Arc<CacheService>,
        policy: NetworkPolicy,
        detector: Box<dyn FormatDetector>,
    ) -> Self {
        Self {
            cache,
            detector,
            policy,
        }
    }

    pub async fn load<L: DefaultLoad>(
        &self,
        url: &str,
        ctx: &HookContext,
        default_load: &L,
    ) -> Result<Loaded> {
        let parsed = match Url::parse(url) {
            Ok(u) if self.policy.is_network(&u) => u,
            _ => {
                tracing::debug!(url, "local module, default loader");
                return default_load.load(url, ctx).await;
            }
        };

        let store = self.cache.store();
        let entry = store.entry(&parsed);
        if let Some(hit) = store.read(&entry).await? {
            tracing::debug!(url, format = ?hit.meta.format, "content cache hit");
            return Ok(Loaded {
                format: hit.meta.format,
                source: hit.source,
                response_url: hit.meta.response_url,
                short_circuit: true,
            });
        }

        tracing::debug!(url, path = %entry.content.display(), "content cache miss");
        let loaded = default_load
            .load(url, ctx)
            .await
            .with_context(|| format!("default load: {url}"))?;

        let mut format = loaded.format;
        let mut response_url = None;
        let detected = sniffable(format)
            .then(|| self.detector.detect(&loaded.source))
            .flatten();
        if detected == Some(ModuleFormat::Commonjs) {
            tracing::debug!(url, declared = ?format, "no ESM syntax, loading as commonjs");
            format = Some(ModuleFormat::Commonjs);
            response_url = Some(file_url(&entry.content)?);
        }
        if format.is_none() {
            tracing::warn!(url, "could not determine module format");
        }

        let meta = CacheMeta {
            context: ctx.clone(),
            format,
            url: url.to_string(),
            response_url: response_url.clone(),
        };
        store.write(&entry, &loaded.source, &meta).await?;
        tracing::info!(url, format = ?format, bytes = loaded.source.len(), "cached module");

        Ok(Loaded {
            format,
            source: loaded.source,
            response_url,
            short_circuit: false,
        })
    }
}

/// Binary and data formats are never re-sniffed.
fn sniffable(format: Option<ModuleFormat>) -> bool {
    !matches!(format, Some(ModuleFormat::Json | ModuleFormat::Wasm))
}

/// `file:` URL of a cache path, made absolute against the working directory.
fn file_url(path: &Path) -> Result<String> {
    let abs = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("read current directory")?
            .join(path)
    };
    Url::from_file_path(&abs)
        .map(String::from)
        .map_err(|()| anyhow!("not a file URL path: {}", abs.display()))
}
