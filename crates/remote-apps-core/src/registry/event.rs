//! Filesystem notifications consumed by the registry.

use std::path::{Path, PathBuf};

use crate::config::ShortcutConfig;

/// A change to a descriptor file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutEvent {
    Created(PathBuf),
    Modified(PathBuf),
    Removed(PathBuf),
}

impl ShortcutEvent {
    /// Path of the changed file.
    pub fn path(&self) -> &Path {
        match self {
            ShortcutEvent::Created(path)
            | ShortcutEvent::Modified(path)
            | ShortcutEvent::Removed(path) => path,
        }
    }

    /// Short label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            ShortcutEvent::Created(_) => "CREATE",
            ShortcutEvent::Modified(_) => "CHANGED",
            ShortcutEvent::Removed(_) => "REMOVE",
        }
    }
}

/// Whether a path names a `.desktop` descriptor.
pub fn is_descriptor_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == ShortcutConfig::EXTENSION)
}
