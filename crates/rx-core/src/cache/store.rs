//! On-disk content store for fetched module sources.
//!
//! Layout: `<root>/<origin dir>/<sha256 of path+query>` holds the raw bytes,
//! with a `<hash>.meta.json` sidecar next to it. An entry counts only when both
//! files are present and the sidecar parses; anything less is a miss and gets
//! rewritten on the next load.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use super::key::{origin_dir, path_hash};
use crate::context::HookContext;
use crate::format::ModuleFormat;

/// Suffix of the metadata sidecar.
pub const META_SUFFIX: &str = ".meta.json";

/// Sidecar contents: the load context plus what the loader determined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMeta {
    #[serde(flatten)]
    pub context: HookContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ModuleFormat>,
    /// Canonical URL the entry was loaded for.
    pub url: String,
    #[serde(rename = "responseURL", default, skip_serializing_if = "Option::is_none")]
    pub response_url: Option<String>,
}

/// Paths of one cache slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub content: PathBuf,
    pub meta: PathBuf,
}

/// A complete cache hit.
#[derive(Debug, Clone)]
pub struct CachedModule {
    pub source: Vec<u8>,
    pub meta: CacheMeta,
}

#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

/// Sidecar path: appends `.meta.json` to the content path.
pub fn meta_path(content: &Path) -> PathBuf {
    let mut o = content.as_os_str().to_owned();
    o.push(META_SUFFIX);
    PathBuf::from(o)
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Slot for `url`.
    pub fn entry(&self, url: &Url) -> CacheEntry {
        let content = self.root.join(origin_dir(url)).join(path_hash(url));
        CacheEntry {
            meta: meta_path(&content),
            content,
        }
    }

    /// Read a slot. `Ok(None)` for a miss, including half-written or corrupt slots.
    pub async fn read(&self, entry: &CacheEntry) -> Result<Option<CachedModule>> {
        let meta_bytes = match read_optional(&entry.meta).await? {
            Some(b) => b,
            None => return Ok(None),
        };
        let meta: CacheMeta = match serde_json::from_slice(&meta_bytes) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(path = %entry.meta.display(), error = %e, "corrupt cache sidecar, treating as miss");
                return Ok(None);
            }
        };
        let source = match read_optional(&entry.content).await? {
            Some(b) => b,
            None => {
                tracing::debug!(path = %entry.content.display(), "sidecar without content, treating as miss");
                return Ok(None);
            }
        };
        Ok(Some(CachedModule { source, meta }))
    }

    /// Persist `source` and `meta` into a slot, creating parent directories.
    /// Content is written before the sidecar so an interrupted write reads as a miss.
    pub async fn write(&self, entry: &CacheEntry, source: &[u8], meta: &CacheMeta) -> Result<()> {
        if let Some(parent) = entry.content.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        tokio::fs::write(&entry.content, source)
            .await
            .with_context(|| format!("write cache content: {}", entry.content.display()))?;
        let json = serde_json::to_vec_pretty(meta).context("serialize cache sidecar")?;
        tokio::fs::write(&entry.meta, json)
            .await
            .with_context(|| format!("write cache sidecar: {}", entry.meta.display()))?;
        Ok(())
    }
}

async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(b) => Ok(Some(b)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("read cache file: {}", path.display())),
    }
}
