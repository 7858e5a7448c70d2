//! Registry of host built-in module names.

use std::collections::HashSet;

/// Prefix that always marks a built-in module.
pub const BUILTIN_PREFIX: &str = "node:";

/// Core module names reported by Node.js `module.builtinModules`.
const NODE_BUILTINS: &[&str] = &[
    "assert",
    "assert/strict",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "dns/promises",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "inspector/promises",
    "module",
    "net",
    "os",
    "path",
    "path/posix",
    "path/win32",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "readline/promises",
    "repl",
    "stream",
    "stream/consumers",
    "stream/promises",
    "stream/web",
    "string_decoder",
    "sys",
    "timers",
    "timers/promises",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "util/types",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Set of names the host resolves itself.
#[derive(Debug, Clone)]
pub struct BuiltinModules {
    names: HashSet<String>,
}

impl Default for BuiltinModules {
    fn default() -> Self {
        Self {
            names: NODE_BUILTINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl BuiltinModules {
    /// Registry with no names; only the `node:` prefix marks a builtin.
    pub fn empty() -> Self {
        Self {
            names: HashSet::new(),
        }
    }

    /// Default registry plus `extra` names (e.g. from config).
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut reg = Self::default();
        reg.names.extend(extra.into_iter().map(Into::into));
        reg
    }

    pub fn is_builtin(&self, specifier: &str) -> bool {
        specifier.starts_with(BUILTIN_PREFIX) || self.names.contains(specifier)
    }
}
