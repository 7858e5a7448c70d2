//! In-memory record of HEAD verifications for this process.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Candidate URL → canonical URL discovered by a successful HEAD.
#[derive(Debug, Default)]
pub struct HeadCache {
    entries: Mutex<HashMap<String, String>>,
}

impl HeadCache {
    pub fn get(&self, url: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
    }

    pub fn insert(&self, url: impl Into<String>, canonical: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), canonical.into());
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
