// src/config/mod.rs

//! Configuration loading and validation for livefire.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and merge CLI overrides (`loader.rs`).
//! - Validate capacities and the watch list (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_for_cli, load_from_path};
pub use model::{ConfigFile, CoordinatorSection, RawConfigFile, WatchSection};
