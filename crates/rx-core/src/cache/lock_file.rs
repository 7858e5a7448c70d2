//! Persistent resolution memo (`rx-lock.json`).
//!
//! Maps `scope → specifier → resolved URL`, where the scope is the importing
//! module's URL. Loaded once, mutated in memory, written by an explicit flush.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// File name of the lock file under the cache root.
pub const LOCK_FILE_NAME: &str = "rx-lock.json";

/// Scope recorded for resolutions without an importing module.
pub const NO_PARENT_SCOPE: &str = ".";

/// `scope → specifier → url`, ordered so the file is stable across flushes.
pub type LockScopes = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug)]
pub struct ResolutionCache {
    path: PathBuf,
    scopes: Mutex<LockScopes>,
}

impl ResolutionCache {
    /// Empty cache that will flush to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            scopes: Mutex::new(LockScopes::new()),
        }
    }

    /// Load the lock file at `path`. A missing or malformed file starts empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let scopes = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<LockScopes>(&bytes) {
                Ok(scopes) => scopes,
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "malformed lock file, starting empty");
                    LockScopes::new()
                }
            },
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "read lock file failed, starting empty");
                LockScopes::new()
            }
        };
        Self {
            path,
            scopes: Mutex::new(scopes),
        }
    }

    /// Scope key for an importing module.
    pub fn scope_key(parent_url: Option<&str>) -> &str {
        parent_url.unwrap_or(NO_PARENT_SCOPE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, scope: &str, specifier: &str) -> Option<String> {
        self.lock()
            .get(scope)
            .and_then(|specifiers| specifiers.get(specifier))
            .cloned()
    }

    /// Record a resolution. Last writer wins.
    pub fn set(&self, scope: &str, specifier: &str, url: &str) {
        self.lock()
            .entry(scope.to_string())
            .or_default()
            .insert(specifier.to_string(), url.to_string());
    }

    /// Copy of every record, for inspection.
    pub fn snapshot(&self) -> LockScopes {
        self.lock().clone()
    }

    /// Number of recorded `(scope, specifier)` pairs.
    pub fn len(&self) -> usize {
        self.lock().values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the lock file (creates the parent dir if needed).
    pub fn flush(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&*self.lock()).context("serialize lock file")?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create dir: {}", parent.display()))?;
            }
        }
        std::fs::write(&self.path, json)
            .with_context(|| format!("write lock file: {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), records = self.len(), "flushed lock file");
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LockScopes> {
        self.scopes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
