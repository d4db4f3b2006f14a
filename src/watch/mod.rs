// src/watch/mod.rs

//! The path stalker.
//!
//! Watches a fixed set of files so that editors saving by "write a new file,
//! rename it over the old one" keep being noticed:
//! - every target's ancestor directories are subscribed too, so a replaced
//!   file is still seen through its parent;
//! - a registered path that reappears is re-subscribed;
//! - only paths the caller asked for come out of the [`ChangeStream`].
//!
//! It knows nothing about timestamps or waiters; see [`crate::engine`].

pub mod backend;
pub mod event;
pub mod mock;
pub mod path_utils;
pub mod registry;
pub mod stalker;

pub use backend::{NotifyBackend, RawEvent, WatchBackend};
pub use event::{ChangeEvent, ChangeKind};
pub use registry::WatchRegistry;
pub use stalker::{
    resolve_targets, spawn_stalker, start_watching, ChangeStream, StalkerCore, StalkerOptions,
};
