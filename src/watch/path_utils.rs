// src/watch/path_utils.rs

//! Turning caller-supplied file names into watch targets.

use std::path::{Component, Path, PathBuf};

use crate::errors::WatchSetupError;
use crate::fs::FileSystem;

/// Resolve a target to the absolute form the OS will report in events.
///
/// - Relative paths are joined onto the current directory.
/// - `.` and `..` are removed lexically, so the target itself need not exist.
/// - The parent directory is canonicalized when it exists. Notification
///   backends report paths under the directory that was watched, so symlinked
///   prefixes (macOS `/var` -> `/private/var`) must be resolved up front. The
///   file name is kept as given; a symlinked target stays the link.
pub fn resolve_target(fs: &dyn FileSystem, path: &Path) -> Result<PathBuf, WatchSetupError> {
    if path.as_os_str().is_empty() {
        return Err(WatchSetupError::Resolve {
            path: path.to_path_buf(),
            reason: "empty path".to_string(),
        });
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = fs.current_dir().map_err(|e| WatchSetupError::Resolve {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        })?;
        cwd.join(path)
    };

    let normalized = normalize_lexically(&absolute);

    let (Some(parent), Some(name)) = (normalized.parent(), normalized.file_name()) else {
        return Err(WatchSetupError::Resolve {
            path: path.to_path_buf(),
            reason: "path has no file name".to_string(),
        });
    };

    match fs.canonicalize(parent) {
        Ok(parent) => Ok(parent.join(name)),
        Err(_) => Ok(normalized),
    }
}

/// Drop `.` components and fold `..` into its parent without touching disk.
///
/// `..` at the root stays at the root.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if out.file_name().is_some() {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
