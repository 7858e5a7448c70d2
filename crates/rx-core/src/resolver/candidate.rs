//! Candidate URL construction for a (mapped) specifier.

use url::{ParseError, Url};

use super::ResolveError;

/// Absolute URL for `specifier` imported from `parent_url`.
///
/// Path-like specifiers join against the parent; anything else must parse as
/// a URL on its own. If that fails, the specifier is retried as `/<specifier>`
/// against the parent, which lets package names resolve under the parent's
/// origin (e.g. a registry CDN).
pub(crate) fn candidate_url(
    specifier: &str,
    path_like: bool,
    parent_url: Option<&str>,
) -> Result<Url, ResolveError> {
    let first = if path_like {
        join_parent(specifier, parent_url)
    } else {
        Url::parse(specifier)
    };
    match first {
        Ok(url) => Ok(url),
        Err(e) => {
            tracing::debug!(specifier, error = %e, "not a URL, retrying with leading slash");
            join_parent(&format!("/{specifier}"), parent_url).map_err(|source| {
                ResolveError::InvalidSpecifier {
                    specifier: specifier.to_string(),
                    parent: parent_url.map(String::from),
                    source,
                }
            })
        }
    }
}

fn join_parent(specifier: &str, parent_url: Option<&str>) -> Result<Url, ParseError> {
    let parent = parent_url.ok_or(ParseError::RelativeUrlWithoutBase)?;
    Url::parse(parent)?.join(specifier)
}
