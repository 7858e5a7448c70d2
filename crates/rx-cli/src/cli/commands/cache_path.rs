//! `rx cache-path` – locate a URL's content-cache slot.

use anyhow::{Context, Result};
use rx_core::cache::CacheService;
use url::Url;

pub async fn run_cache_path(cache: &CacheService, url: &str) -> Result<()> {
    let parsed = Url::parse(url).with_context(|| format!("invalid URL: {url}"))?;
    let store = cache.store();
    let entry = store.entry(&parsed);
    println!("content  {}", entry.content.display());
    println!("meta     {}", entry.meta.display());
    match store.read(&entry).await? {
        Some(hit) => println!(
            "status   cached ({} bytes, format {})",
            hit.source.len(),
            hit.meta.format.map(|f| f.as_str()).unwrap_or("unknown")
        ),
        None => println!("status   not cached"),
    }
    Ok(())
}
