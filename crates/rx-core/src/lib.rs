//! Network module resolution and loading for a JavaScript host.
//!
//! Specifiers are rewritten through an import map, verified against the
//! network with HEAD requests, memoized in a lock file, and their sources
//! cached on disk so that later runs need no network at all.

pub mod cache;
pub mod config;
pub mod context;
pub mod fetch;
pub mod format;
pub mod hooks;
pub mod import_map;
pub mod loader;
pub mod logging;
pub mod network;
pub mod resolver;
pub mod specifier;

#[cfg(test)]
mod test_support;

pub use context::HookContext;
pub use format::ModuleFormat;
pub use hooks::NetworkHooks;
pub use loader::Loaded;
pub use resolver::Resolved;
