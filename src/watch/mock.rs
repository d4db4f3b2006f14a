// src/watch/mock.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::backend::WatchBackend;

/// Spy backend: records every subscription request.
///
/// Clones share state, so a test can keep one handle while the stalker owns
/// the other.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    calls: Arc<Mutex<Vec<PathBuf>>>,
    failing: Arc<Mutex<HashSet<PathBuf>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future `watch` on `path` fail.
    pub fn fail_on(&self, path: impl Into<PathBuf>) {
        self.failing.lock().unwrap().insert(path.into());
    }

    /// Let `path` be watched again.
    pub fn heal(&self, path: &Path) {
        self.failing.lock().unwrap().remove(path);
    }

    /// Every `watch` call so far, in order, including failed ones.
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_for(&self, path: &Path) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_path() == path)
            .count()
    }
}

impl WatchBackend for MockBackend {
    fn watch(&mut self, path: &Path) -> notify::Result<()> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        if self.failing.lock().unwrap().contains(path) {
            return Err(notify::Error::path_not_found().add_path(path.to_path_buf()));
        }
        Ok(())
    }
}
