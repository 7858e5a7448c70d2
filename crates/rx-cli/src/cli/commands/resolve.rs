//! `rx resolve` – print the canonical URL of a specifier.

use anyhow::Result;
use rx_core::{HookContext, NetworkHooks};

pub async fn run_resolve(
    hooks: &NetworkHooks,
    specifier: &str,
    parent: Option<String>,
) -> Result<()> {
    let guard = hooks.flush_guard();
    let resolved = hooks.resolve(specifier, &HookContext::new(parent)).await?;
    match resolved.format {
        Some(format) => println!("{}  ({})", resolved.url, format),
        None => println!("{}", resolved.url),
    }
    guard.finish()
}
