//! Process-wide cache state.
//!
//! `CacheService` owns everything resolution and loading memoize: the lock
//! file, the in-memory HEAD results and the on-disk content store. It is
//! built once per process and shared by reference (`Arc`) with the resolver
//! and loader. The lock file is only persisted by `flush()`; hosts call it
//! from their shutdown path or hold a `FlushGuard`.

mod head;
mod key;
mod lock_file;
mod store;

pub use head::HeadCache;
pub use key::{origin_dir, path_hash};
pub use lock_file::{LockScopes, ResolutionCache, LOCK_FILE_NAME, NO_PARENT_SCOPE};
pub use store::{meta_path, CacheEntry, CacheMeta, CachedModule, ContentStore, META_SUFFIX};

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct CacheService {
    root: PathBuf,
    lock: ResolutionCache,
    heads: HeadCache,
    store: ContentStore,
}

impl CacheService {
    /// Open the cache rooted at `root`, loading `rx-lock.json` if present.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let lock = ResolutionCache::load(root.join(LOCK_FILE_NAME));
        tracing::debug!(root = %root.display(), records = lock.len(), "opened module cache");
        Self {
            store: ContentStore::new(root.clone()),
            heads: HeadCache::default(),
            lock,
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn lock_file(&self) -> &ResolutionCache {
        &self.lock
    }

    pub fn heads(&self) -> &HeadCache {
        &self.heads
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Persist the lock file.
    pub fn flush(&self) -> Result<()> {
        self.lock.flush()
    }

    /// Guard that flushes when dropped, covering early returns and errors.
    pub fn flush_guard(self: &Arc<Self>) -> FlushGuard {
        FlushGuard {
            cache: Arc::clone(self),
            armed: true,
        }
    }
}

/// Flushes the lock file on drop unless `finish` already did.
pub struct FlushGuard {
    cache: Arc<CacheService>,
    armed: bool,
}

impl FlushGuard {
    /// Flush now and report the result.
    pub fn finish(mut self) -> Result<()> {
        self.armed = false;
        self.cache.flush()
    }
}

impl Drop for FlushGuard {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = self.cache.flush() {
                tracing::warn!("lock file flush on drop failed: {e:#}");
            }
        }
    }
}
