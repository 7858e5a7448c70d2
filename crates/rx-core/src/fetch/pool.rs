//! Reusable libcurl easy handles.
//!
//! An easy handle keeps its connection cache, DNS cache and TLS sessions
//! across `reset()`, so returning handles here gives keep-alive reuse.

use curl::easy::Easy;
use std::sync::Mutex;

pub(crate) struct HandlePool {
    idle: Mutex<Vec<Easy>>,
    max_idle: usize,
}

impl HandlePool {
    pub(crate) fn new(max_idle: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::with_capacity(max_idle)),
            max_idle,
        }
    }

    /// Take an idle handle or create a fresh one.
    pub(crate) fn checkout(&self) -> Easy {
        self.idle
            .lock()
            .ok()
            .and_then(|mut idle| idle.pop())
            .unwrap_or_else(Easy::new)
    }

    /// Reset and park `easy` for reuse; dropped when the pool is full.
    pub(crate) fn checkin(&self, mut easy: Easy) {
        easy.reset();
        if let Ok(mut idle) = self.idle.lock() {
            if idle.len() < self.max_idle {
                idle.push(easy);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn idle_len(&self) -> usize {
        self.idle.lock().map(|i| i.len()).unwrap_or(0)
    }
}
