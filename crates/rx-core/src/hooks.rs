//! Host-facing resolve/load hooks.
//!
//! `NetworkHooks` is built once per process and wires the resolver and the
//! loader to one shared `CacheService`. Hosts call `shutdown()` (or hold the
//! guard from `flush_guard()`) so the lock file is written on exit.

use anyhow::Result;
use std::sync::Arc;

use crate::cache::{CacheService, FlushGuard};
use crate::config::RxConfig;
use crate::context::HookContext;
use crate::fetch::{Fetch, FetchClient, FetchOptions};
use crate::import_map::ImportMap;
use crate::loader::{DefaultLoad, FetchLoader, Loaded, ModuleLoader};
use crate::network::NetworkPolicy;
use crate::resolver::{ResolveError, Resolved, SpecifierResolver};
use crate::specifier::BuiltinModules;

pub struct NetworkHooks<F = FetchClient> {
    cache: Arc<CacheService>,
    resolver: SpecifierResolver<F>,
    loader: ModuleLoader,
}

impl NetworkHooks<FetchClient> {
    /// Hooks backed by libcurl, the configured cache root and import map.
    pub fn from_config(cfg: &RxConfig) -> Self {
        let cache = Arc::new(CacheService::open(cfg.cache_root()));
        let import_map = Arc::new(ImportMap::load(&cfg.import_map_path()));
        Self::new(
            FetchClient::new(FetchOptions::from(&cfg.fetch)),
            cache,
            import_map,
            BuiltinModules::with_extra(cfg.builtin_modules.iter().cloned()),
            NetworkPolicy::new(cfg.allow_http),
        )
    }
}

impl<F: Fetch> NetworkHooks<F> {
    pub fn new(
        fetch: F,
        cache: Arc<CacheService>,
        import_map: Arc<ImportMap>,
        builtins: BuiltinModules,
        policy: NetworkPolicy,
    ) -> Self {
        Self {
            loader: ModuleLoader::new(Arc::clone(&cache), policy),
            resolver: SpecifierResolver::new(
                fetch,
                Arc::clone(&cache),
                import_map,
                builtins,
                policy,
            ),
            cache,
        }
    }

    pub async fn resolve(
        &self,
        specifier: &str,
        ctx: &HookContext,
    ) -> Result<Resolved, ResolveError> {
        self.resolver.resolve(specifier, ctx).await
    }

    pub async fn load<L: DefaultLoad>(
        &self,
        url: &str,
        ctx: &HookContext,
        default_load: &L,
    ) -> Result<Loaded> {
        self.loader.load(url, ctx, default_load).await
    }

    pub fn cache(&self) -> &Arc<CacheService> {
        &self.cache
    }

    pub fn flush_guard(&self) -> FlushGuard {
        self.cache.flush_guard()
    }

    /// Persist the lock file.
    pub fn shutdown(&self) -> Result<()> {
        tracing::debug!(records = self.cache.lock_file().len(), "flushing lock file");
        self.cache.flush()
    }
}

impl<F: Fetch + Clone> NetworkHooks<F> {
    /// Default loader sharing this hook's fetcher.
    pub fn fetch_loader(&self) -> FetchLoader<F> {
        FetchLoader::new(self.resolver.fetcher().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LOCK_FILE_NAME;
    use crate::format::ModuleFormat;
    use crate::test_support::MockFetch;

    const IMPORT_MAP: &[u8] = br#"{"imports":{"dotenv":"https://esm.sh/dotenv"}}"#;

    fn make_hooks(dir: &std::path::Path, fetch: &MockFetch) -> NetworkHooks<MockFetch> {
        NetworkHooks::new(
            fetch.clone(),
            Arc::new(CacheService::open(dir)),
            Arc::new(ImportMap::from_json(IMPORT_MAP).unwrap()),
            BuiltinModules::default(),
            NetworkPolicy::secure_only(),
        )
    }

    #[tokio::test]
    async fn resolve_load_and_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let fetch = MockFetch::new();
        fetch
            .redirect("https://esm.sh/dotenv", "https://esm.sh/dotenv@16.0.3")
            .serve(
                "https://esm.sh/dotenv@16.0.3",
                "application/javascript",
                b"export * from \"/v135/dotenv@16.0.3/es2022/dotenv.mjs\";",
            );
        let hooks = make_hooks(dir.path(), &fetch);
        let ctx = HookContext::from_parent("file:///app/main.mjs");

        let resolved = hooks.resolve("dotenv", &ctx).await.unwrap();
        assert_eq!(resolved.url, "https://esm.sh/dotenv@16.0.3");

        let loader = hooks.fetch_loader();
        let loaded = hooks.load(&resolved.url, &ctx, &loader).await.unwrap();
        assert_eq!(loaded.format, Some(ModuleFormat::Module));
        assert_eq!(fetch.calls(), 2);

        hooks.shutdown().unwrap();
        let raw = std::fs::read(dir.path().join(LOCK_FILE_NAME)).unwrap();
        let lock: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(
            lock["file:///app/main.mjs"]["dotenv"],
            "https://esm.sh/dotenv@16.0.3"
        );
    }

    #[tokio::test]
    async fn restart_needs_no_network() {
        let dir = tempfile::tempdir().unwrap();
        let fetch = MockFetch::new();
        fetch
            .redirect("https://esm.sh/dotenv", "https://esm.sh/dotenv@16.0.3")
            .serve(
                "https://esm.sh/dotenv@16.0.3",
                "text/javascript",
                b"export default {}",
            );
        let ctx = HookContext::default();
        {
            let hooks = make_hooks(dir.path(), &fetch);
            let _guard = hooks.flush_guard();
            let r = hooks.resolve("dotenv", &ctx).await.unwrap();
            hooks.load(&r.url, &ctx, &hooks.fetch_loader()).await.unwrap();
        }
        assert_eq!(fetch.calls(), 2);

        let offline = MockFetch::new();
        let hooks = make_hooks(dir.path(), &offline);
        let r = hooks.resolve("dotenv", &ctx).await.unwrap();
        let loaded = hooks.load(&r.url, &ctx, &hooks.fetch_loader()).await.unwrap();
        assert!(loaded.short_circuit);
        assert_eq!(loaded.source, b"export default {}");
        assert_eq!(offline.calls(), 0);
    }
}
