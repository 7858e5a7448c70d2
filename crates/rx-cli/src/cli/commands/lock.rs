//! `rx lock` – list memoized resolutions.

use anyhow::Result;
use rx_core::cache::{CacheService, LockScopes};

pub fn run_lock(cache: &CacheService, scope: Option<&str>) -> Result<()> {
    let scopes = cache.lock_file().snapshot();
    let rows = lock_rows(&scopes, scope);
    if rows.is_empty() {
        println!("No records in {}.", cache.lock_file().path().display());
        return Ok(());
    }
    println!("{:<40} {:<24} {}", "SCOPE", "SPECIFIER", "URL");
    for (scope, specifier, url) in rows {
        println!("{:<40} {:<24} {}", scope, specifier, url);
    }
    Ok(())
}

/// `(scope, specifier, url)` rows, optionally limited to one scope.
pub(crate) fn lock_rows<'a>(
    scopes: &'a LockScopes,
    only: Option<&str>,
) -> Vec<(&'a str, &'a str, &'a str)> {
    scopes
        .iter()
        .filter(|(scope, _)| only.map_or(true, |o| o == scope.as_str()))
        .flat_map(|(scope, records)| {
            records
                .iter()
                .map(move |(spec, url)| (scope.as_str(), spec.as_str(), url.as_str()))
        })
        .collect()
}
