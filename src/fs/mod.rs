// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// The slice of the filesystem needed to resolve watch targets.
pub trait FileSystem: Send + Sync + Debug {
    fn current_dir(&self) -> Result<PathBuf>;
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;
    fn exists(&self, path: &Path) -> bool;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn current_dir(&self) -> Result<PathBuf> {
        std::env::current_dir().context("reading current directory")
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).with_context(|| format!("canonicalizing {:?}", path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
