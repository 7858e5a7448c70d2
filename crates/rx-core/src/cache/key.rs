//! Cache location derived from a module URL.
//!
//! Each origin gets its own directory so entries from different origins never
//! collide; inside it, files are named by a SHA-256 of the path and query.

use sha2::{Digest, Sha256};
use url::{Position, Url};

/// Directory name for the URL's origin: `https://unpkg.com` → `https+unpkg.com`.
/// Runs of `@`, `:` and `/` collapse to a single `+`.
pub fn origin_dir(url: &Url) -> String {
    let origin = url.origin().ascii_serialization();
    let mut out = String::with_capacity(origin.len());
    let mut in_run = false;
    for c in origin.chars() {
        if matches!(c, '@' | ':' | '/') {
            if !in_run {
                out.push('+');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Lowercase hex SHA-256 of the URL's path and query (fragment excluded).
pub fn path_hash(url: &Url) -> String {
    let path_and_query = &url[Position::BeforePath..Position::AfterQuery];
    hex::encode(Sha256::digest(path_and_query.as_bytes()))
}
