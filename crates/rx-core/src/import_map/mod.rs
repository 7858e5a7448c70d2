//! Static specifier substitution table (`import_map.json`).
//!
//! Scopes are matched by prefix against the importing module's URL. The
//! longest matching prefix is consulted first; a scope that does not list the
//! specifier defers to the next shorter matching scope, then to the unscoped
//! `imports`, and last to the `""` scope, which matches every importer.

mod parse;

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

use parse::ImportMapFile;

/// Loaded import map. Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct ImportMap {
    imports: HashMap<String, String>,
    /// Non-empty prefixes, sorted by length, longest first.
    scopes: Vec<(String, HashMap<String, String>)>,
    /// The `""` scope; consulted after `imports`.
    fallback: HashMap<String, String>,
}

impl ImportMap {
    /// Parse an import map from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let file: ImportMapFile = serde_json::from_slice(bytes).context("parse import map JSON")?;
        let mut fallback = HashMap::new();
        let mut scopes: Vec<(String, HashMap<String, String>)> = Vec::new();
        for (prefix, map) in file.scopes {
            if prefix.is_empty() {
                fallback = map.into_iter().collect();
            } else {
                scopes.push((prefix, map.into_iter().collect()));
            }
        }
        // Stable on ties: BTreeMap order breaks them deterministically.
        scopes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Ok(Self {
            imports: file.imports.into_iter().collect(),
            scopes,
            fallback,
        })
    }

    /// Read the import map at `path`. Missing or malformed files yield an empty map.
    pub fn load(path: &Path) -> Self {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no import map, using empty map");
                return Self::default();
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "read import map failed, using empty map");
                return Self::default();
            }
        };
        match Self::from_json(&bytes) {
            Ok(map) => {
                tracing::debug!(
                    path = %path.display(),
                    imports = map.imports.len(),
                    scopes = map.scopes.len(),
                    "loaded import map"
                );
                map
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), "malformed import map, using empty map: {e:#}");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.scopes.is_empty() && self.fallback.is_empty()
    }

    /// Mapped value of `specifier` for a module imported from `parent_url`,
    /// or `specifier` itself when nothing maps it.
    pub fn lookup<'a>(&'a self, specifier: &'a str, parent_url: Option<&str>) -> &'a str {
        let parent = parent_url.unwrap_or("");
        self.scopes
            .iter()
            .filter(|(prefix, _)| parent.starts_with(prefix.as_str()))
            .find_map(|(_, map)| map.get(specifier))
            .or_else(|| self.imports.get(specifier))
            .or_else(|| self.fallback.get(specifier))
            .map(String::as_str)
            .unwrap_or(specifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn map(json: &str) -> ImportMap {
        ImportMap::from_json(json.as_bytes()).unwrap()
    }

    #[test]
    fn scope_takes_precedence_over_default() {
        let m = map(r#"{
            "imports": { "a": "X" },
            "scopes": { "https://host/pkg/": { "a": "Y" } }
        }"#);
        assert_eq!(m.lookup("a", Some("https://host/pkg/mod.js")), "Y");
        assert_eq!(m.lookup("a", Some("https://other/mod.js")), "X");
        assert_eq!(m.lookup("a", None), "X");
    }

    #[test]
    fn longest_prefix_wins_for_overlapping_scopes() {
        let m = map(r#"{
            "scopes": {
                "https://host/": { "a": "short" },
                "https://host/pkg/": { "a": "long" }
            }
        }"#);
        assert_eq!(m.lookup("a", Some("https://host/pkg/x.js")), "long");
        assert_eq!(m.lookup("a", Some("https://host/other/x.js")), "short");
    }

    #[test]
    fn specific_scope_without_entry_falls_through() {
        let m = map(r#"{
            "imports": { "c": "default-c" },
            "scopes": {
                "https://host/": { "b": "outer-b" },
                "https://host/pkg/": { "a": "inner-a" }
            }
        }"#);
        let parent = Some("https://host/pkg/x.js");
        assert_eq!(m.lookup("a", parent), "inner-a");
        assert_eq!(m.lookup("b", parent), "outer-b");
        assert_eq!(m.lookup("c", parent), "default-c");
    }

    #[test]
    fn unmapped_specifier_is_unchanged() {
        let m = map(r#"{ "imports": { "a": "X" } }"#);
        assert_eq!(m.lookup("lodash", Some("https://host/x.js")), "lodash");
    }

    #[test]
    fn empty_scope_matches_missing_parent() {
        let m = map(r#"{ "scopes": { "": { "a": "E" } } }"#);
        assert_eq!(m.lookup("a", None), "E");
        assert_eq!(m.lookup("a", Some("file:///app/main.js")), "E");
    }

    #[test]
    fn imports_win_over_empty_scope() {
        let m = map(r#"{ "imports": { "a": "X" }, "scopes": { "": { "a": "E", "b": "EB" } } }"#);
        assert_eq!(m.lookup("a", Some("https://other/mod.js")), "X");
        assert_eq!(m.lookup("a", None), "X");
        assert_eq!(m.lookup("b", Some("https://other/mod.js")), "EB");
    }

    #[test]
    fn specific_scope_wins_over_empty_scope() {
        let m = map(r#"{ "scopes": { "": { "a": "E" }, "https://host/": { "a": "H" } } }"#);
        assert_eq!(m.lookup("a", Some("https://host/x.js")), "H");
        assert_eq!(m.lookup("a", Some("https://elsewhere/x.js")), "E");
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let m = ImportMap::load(&dir.path().join("import_map.json"));
        assert!(m.is_empty());
        assert_eq!(m.lookup("a", None), "a");
    }

    #[test]
    fn load_malformed_file_is_empty() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"{ not json").unwrap();
        f.flush().unwrap();
        assert!(ImportMap::load(f.path()).is_empty());
    }

    #[test]
    fn load_reads_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(br#"{ "imports": { "lodash": "https://unpkg.com/lodash-es/lodash.js" } }"#)
            .unwrap();
        f.flush().unwrap();
        let m = ImportMap::load(f.path());
        assert_eq!(
            m.lookup("lodash", None),
            "https://unpkg.com/lodash-es/lodash.js"
        );
    }
}
