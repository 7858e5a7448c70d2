//! Per-call context supplied by the host.

use serde::{Deserialize, Serialize};

/// Importing module and active export conditions for one resolve/load call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookContext {
    /// Canonical URL of the importing module; `None` for entry points.
    #[serde(rename = "parentURL", default, skip_serializing_if = "Option::is_none")]
    pub parent_url: Option<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
}

impl HookContext {
    pub fn new(parent_url: Option<String>) -> Self {
        Self {
            parent_url,
            conditions: Vec::new(),
        }
    }

    /// Context for a module imported from `parent_url`.
    pub fn from_parent(parent_url: impl Into<String>) -> Self {
        Self::new(Some(parent_url.into()))
    }

    pub fn with_conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions = conditions.into_iter().map(Into::into).collect();
        self
    }

    pub fn parent_url(&self) -> Option<&str> {
        self.parent_url.as_deref()
    }
}
