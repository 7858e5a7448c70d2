//! Specifier classification.
//!
//! Every resolution branch is gated on the kind of specifier: built-in names
//! short-circuit, path-like specifiers join against the importing module, and
//! everything else (package names, full URLs) is treated as bare.

mod builtins;

pub use builtins::{BuiltinModules, BUILTIN_PREFIX};

/// Kind of a module specifier as written in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierKind {
    /// `node:` prefixed or listed in the host registry.
    Builtin,
    /// Starts with `/`.
    AbsolutePath,
    /// `.`, `..`, or starts with `./` / `../`.
    RelativePath,
    /// Anything else, including full URLs.
    Bare,
}

impl SpecifierKind {
    pub fn is_path_like(self) -> bool {
        matches!(self, SpecifierKind::AbsolutePath | SpecifierKind::RelativePath)
    }
}

/// Classifies `specifier` against the built-in registry.
pub fn classify(specifier: &str, builtins: &BuiltinModules) -> SpecifierKind {
    if builtins.is_builtin(specifier) {
        SpecifierKind::Builtin
    } else if specifier.starts_with('/') {
        SpecifierKind::AbsolutePath
    } else if is_relative(specifier) {
        SpecifierKind::RelativePath
    } else {
        SpecifierKind::Bare
    }
}

/// True for `/x`, `./x`, `../x`, `.` and `..`. The empty string is not path-like.
pub fn is_path_like(specifier: &str) -> bool {
    specifier.starts_with('/') || is_relative(specifier)
}

fn is_relative(specifier: &str) -> bool {
    let rest = match specifier.strip_prefix('.') {
        Some(rest) => rest,
        None => return false,
    };
    let rest = rest.strip_prefix('.').unwrap_or(rest);
    rest.is_empty() || rest.starts_with('/')
}
