// src/watch/registry.rs

//! Bookkeeping of which paths are watched, and why.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Absolute path -> "was this requested by the caller?".
///
/// Requested entries are eligible to be reported; the rest are ancestor
/// directories held only so a target survives being deleted and recreated.
///
/// Invariant: every requested target's ancestor chain, up to but excluding
/// the filesystem root, is present. Entries are never removed.
#[derive(Debug, Default, Clone)]
pub struct WatchRegistry {
    entries: HashMap<PathBuf, bool>,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `target` as requested and add its missing ancestors.
    ///
    /// Returns the paths that are new to the registry, target first and then
    /// upward, i.e. exactly the paths that still need an OS subscription.
    /// The walk stops at the first directory already present, or before the
    /// filesystem root.
    pub fn register_target(&mut self, target: &Path) -> Vec<PathBuf> {
        let mut fresh = Vec::new();

        match self.entries.get_mut(target) {
            // Already subscribed, possibly as someone's ancestor.
            Some(requested) => *requested = true,
            None => {
                self.entries.insert(target.to_path_buf(), true);
                fresh.push(target.to_path_buf());
            }
        }

        let mut current = target.parent();
        while let Some(dir) = current {
            if dir.parent().is_none() || dir.as_os_str().is_empty() {
                break;
            }
            if self.entries.contains_key(dir) {
                break;
            }
            self.entries.insert(dir.to_path_buf(), false);
            fresh.push(dir.to_path_buf());
            current = dir.parent();
        }

        fresh
    }

    /// `Some(requested)` for a registered path, `None` for noise.
    pub fn lookup(&self, path: &Path) -> Option<bool> {
        self.entries.get(path).copied()
    }

    pub fn is_requested(&self, path: &Path) -> bool {
        self.lookup(path).unwrap_or(false)
    }

    /// Number of OS subscriptions the registry stands for.
    pub fn subscription_count(&self) -> usize {
        self.entries.len()
    }

    /// Requested targets, sorted.
    pub fn targets(&self) -> Vec<&Path> {
        self.sorted(true)
    }

    /// Ancestor-only directories, sorted.
    pub fn ancestors(&self) -> Vec<&Path> {
        self.sorted(false)
    }

    fn sorted(&self, requested: bool) -> Vec<&Path> {
        let mut out: Vec<&Path> = self
            .entries
            .iter()
            .filter(|(_, r)| **r == requested)
            .map(|(p, _)| p.as_path())
            .collect();
        out.sort();
        out
    }
}
