// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// In-memory filesystem for resolution tests.
///
/// Paths are absolute. Directories can be aliased to model symlinks
/// (e.g. `/tmp` -> `/private/tmp` on macOS).
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    cwd: PathBuf,
    entries: Arc<Mutex<HashSet<PathBuf>>>,
    aliases: Arc<Mutex<HashMap<PathBuf, PathBuf>>>,
}

impl MockFileSystem {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        let fs = Self {
            cwd: cwd.into(),
            entries: Arc::new(Mutex::new(HashSet::new())),
            aliases: Arc::new(Mutex::new(HashMap::new())),
        };
        let cwd = fs.cwd.clone();
        fs.add_dir(cwd);
        fs
    }

    /// Add a file; parent directories exist implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut entries = self.entries.lock().unwrap();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            entries.insert(ancestor.to_path_buf());
        }
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.add_file(path);
    }

    /// Make `link` resolve to `target` when canonicalized.
    pub fn add_alias(&self, link: impl Into<PathBuf>, target: impl Into<PathBuf>) {
        let target = target.into();
        self.add_dir(&target);
        self.aliases.lock().unwrap().insert(link.into(), target);
    }
}

impl FileSystem for MockFileSystem {
    fn current_dir(&self) -> Result<PathBuf> {
        Ok(self.cwd.clone())
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        let aliases = self.aliases.lock().unwrap();
        for (link, target) in aliases.iter() {
            if let Ok(rest) = path.strip_prefix(link) {
                return Ok(target.join(rest));
            }
        }
        drop(aliases);

        if self.exists(path) {
            Ok(path.to_path_buf())
        } else {
            Err(anyhow!("No such file or directory: {:?}", path))
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.entries.lock().unwrap().contains(path)
    }
}
