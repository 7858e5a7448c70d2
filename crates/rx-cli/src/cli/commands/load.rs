//! `rx load` – resolve a specifier and fetch its source through the cache.

use anyhow::{bail, Context, Result};
use rx_core::{HookContext, ModuleFormat, NetworkHooks};
use std::io::Write;
use std::path::Path;

pub async fn run_load(
    hooks: &NetworkHooks,
    specifier: &str,
    parent: Option<String>,
    output: Option<&Path>,
) -> Result<()> {
    let guard = hooks.flush_guard();
    let ctx = HookContext::new(parent);
    let resolved = hooks.resolve(specifier, &ctx).await?;
    if resolved.format == Some(ModuleFormat::Builtin) {
        bail!("{} is a built-in module, nothing to load", resolved.url);
    }

    let loaded = hooks
        .load(&resolved.url, &ctx, &hooks.fetch_loader())
        .await?;
    let format = loaded.format.map(|f| f.as_str()).unwrap_or("unknown");
    eprintln!(
        "{} ({}, {} bytes{})",
        resolved.url,
        format,
        loaded.source.len(),
        if loaded.short_circuit { ", cached" } else { "" }
    );
    if let Some(url) = &loaded.response_url {
        eprintln!("response URL: {url}");
    }

    match output {
        Some(path) => std::fs::write(path, &loaded.source)
            .with_context(|| format!("write {}", path.display()))?,
        None => std::io::stdout()
            .write_all(&loaded.source)
            .context("write source to stdout")?,
    }
    guard.finish()
}
