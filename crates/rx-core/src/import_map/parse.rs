//! Serde model of `import_map.json`.

use serde::Deserialize;
use std::collections::BTreeMap;

/// `{ "imports": {..}, "scopes": { prefix: {..} } }`; both sections optional.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ImportMapFile {
    #[serde(default)]
    pub imports: BTreeMap<String, String>,
    #[serde(default)]
    pub scopes: BTreeMap<String, BTreeMap<String, String>>,
}
