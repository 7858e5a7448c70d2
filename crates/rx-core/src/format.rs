//! Module format and source sniffing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Module format as reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    Module,
    Commonjs,
    Json,
    Wasm,
    Builtin,
}

impl ModuleFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ModuleFormat::Module => "module",
            ModuleFormat::Commonjs => "commonjs",
            ModuleFormat::Json => "json",
            ModuleFormat::Wasm => "wasm",
            ModuleFormat::Builtin => "builtin",
        }
    }
}

impl fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides a module's format from its source text.
///
/// `None` means "no opinion": the loader keeps the declared format.
pub trait FormatDetector: Send + Sync {
    fn detect(&self, source: &[u8]) -> Option<ModuleFormat>;
}

/// Substrings whose presence means the source uses ES module syntax.
const ESM_MARKERS: &[&[u8]] = &[b"export ", b"export{", b"import "];

/// Heuristic detector: sources without any visible `import`/`export`
/// syntax are CommonJS; anything else keeps its declared format.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxSniffer;

impl FormatDetector for SyntaxSniffer {
    fn detect(&self, source: &[u8]) -> Option<ModuleFormat> {
        if has_esm_syntax(source) {
            None
        } else {
            Some(ModuleFormat::Commonjs)
        }
    }
}

fn has_esm_syntax(source: &[u8]) -> bool {
    ESM_MARKERS
        .iter()
        .any(|marker| source.windows(marker.len()).any(|w| w == *marker))
}
