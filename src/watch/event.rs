// src/watch/event.rs

use std::path::PathBuf;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};

/// What happened at a path, reduced to the cases the stalker acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Modified,
    Created,
    Removed,
    /// Something was renamed *into* this path.
    Renamed,
}

impl ChangeKind {
    /// A new file identity now lives at the path, so a subscription on the
    /// old one no longer covers it.
    pub fn replaces_identity(self) -> bool {
        matches!(self, ChangeKind::Created | ChangeKind::Renamed)
    }
}

/// One low-level change at one absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Split a `notify` event into per-path changes.
    ///
    /// Access events are dropped. A two-path rename is reported as the old
    /// path going away and the new one being renamed into.
    pub fn from_notify(event: &Event) -> Vec<ChangeEvent> {
        let kind = match event.kind {
            EventKind::Access(_) => return Vec::new(),
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Removed,
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => ChangeKind::Removed,
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if event.paths.len() == 2 => {
                return vec![
                    ChangeEvent::new(event.paths[0].clone(), ChangeKind::Removed),
                    ChangeEvent::new(event.paths[1].clone(), ChangeKind::Renamed),
                ];
            }
            EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Renamed,
            EventKind::Modify(_) | EventKind::Any | EventKind::Other => ChangeKind::Modified,
        };

        event
            .paths
            .iter()
            .map(|p| ChangeEvent::new(p.clone(), kind))
            .collect()
    }
}
