//! In-memory index of the shortcuts currently on disk.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, error, info, warn};

use super::event::{is_descriptor_path, ShortcutEvent};
use crate::error::{RemoteAppsError, Result};
use crate::shortcut::{home_dir, prepare_exec, Shortcut, ShortcutParser};

/// Everything needed to serve a start request for one shortcut.
#[derive(Debug, Clone)]
pub struct Route {
    pub name: String,
    /// Shell command with field codes expanded.
    pub command: String,
    pub shortcut: Arc<Shortcut>,
}

/// Both indices, always mutated together under one lock.
///
/// `by_name[n].path == p` exactly when `by_path[p] == n`.
#[derive(Debug, Default)]
struct RegistryState {
    by_name: HashMap<String, Arc<Shortcut>>,
    by_path: HashMap<PathBuf, String>,
}

/// Registry of shortcuts keyed by display name and by source path.
///
/// Lookups and serving go through the name index; change and removal events
/// correlate through the path index. A shortcut whose name collides with one
/// from another file supersedes it (last writer wins).
#[derive(Debug, Default)]
pub struct ShortcutRegistry {
    parser: ShortcutParser,
    state: RwLock<RegistryState>,
}

impl ShortcutRegistry {
    /// Create a new empty registry using the given parser.
    pub fn new(parser: ShortcutParser) -> Self {
        Self {
            parser,
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Get the parser used for file events.
    pub fn parser(&self) -> &ShortcutParser {
        &self.parser
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace a shortcut.
    pub fn upsert(&self, shortcut: Shortcut) {
        let name = shortcut.name().to_string();
        let path = shortcut.path.clone();
        let mut state = self.write();

        // The file may have been renamed inside, so drop its previous name.
        if let Some(old_name) = state.by_path.remove(&path) {
            state.by_name.remove(&old_name);
            if old_name != name {
                debug!("Shortcut {:?} renamed from {} to {}", path, old_name, name);
            }
        }

        if let Some(previous) = state.by_name.insert(name.clone(), Arc::new(shortcut)) {
            if previous.path != path {
                state.by_path.remove(&previous.path);
                info!(
                    "Shortcut {} from {:?} supersedes {:?}",
                    name, path, previous.path
                );
            }
        }
        state.by_path.insert(path, name);
    }

    /// Remove the shortcut parsed from `path`, if any.
    pub fn remove(&self, path: &Path) -> Option<Arc<Shortcut>> {
        let mut state = self.write();
        let name = state.by_path.remove(path)?;
        state.by_name.remove(&name)
    }

    /// All shortcuts, sorted by display name.
    pub fn list(&self) -> Vec<Arc<Shortcut>> {
        let mut shortcuts: Vec<_> = self.read().by_name.values().cloned().collect();
        shortcuts.sort_by(|a, b| a.name().cmp(b.name()));
        shortcuts
    }

    /// Shortcut registered under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<Shortcut>> {
        self.read().by_name.get(name).cloned()
    }

    /// Name of the shortcut currently registered for `path`.
    pub fn name_for_path(&self, path: &Path) -> Option<String> {
        self.read().by_path.get(path).cloned()
    }

    /// Resolve a display name to its launch route.
    pub fn route_for(&self, name: &str) -> Result<Route> {
        let shortcut = self
            .get(name)
            .ok_or_else(|| RemoteAppsError::ShortcutNotFound {
                name: name.to_string(),
            })?;

        let command = prepare_exec(shortcut.exec().unwrap_or_default(), &home_dir());
        Ok(Route {
            name: name.to_string(),
            command,
            shortcut,
        })
    }

    /// Number of registered shortcuts.
    pub fn len(&self) -> usize {
        self.read().by_name.len()
    }

    /// Whether no shortcuts are registered.
    pub fn is_empty(&self) -> bool {
        self.read().by_name.is_empty()
    }

    /// Apply one filesystem notification.
    ///
    /// Parse failures are logged and leave the registry untouched for that
    /// path. Paths that are not descriptors are ignored.
    pub fn handle_event(&self, event: &ShortcutEvent) {
        let path = event.path();
        if !is_descriptor_path(path) {
            return;
        }

        match event {
            ShortcutEvent::Created(_) | ShortcutEvent::Modified(_) => {
                match self.parser.parse_file(path) {
                    Ok(shortcut) => {
                        let name = shortcut.name().to_string();
                        self.upsert(shortcut);
                        info!("[{}]: Loaded desktop shortcut: {}: {:?}", event.kind(), name, path);
                    }
                    Err(e) => log_load_failure(event.kind(), &e),
                }
            }
            ShortcutEvent::Removed(_) => {
                if let Some(removed) = self.remove(path) {
                    info!(
                        "[{}]: removed desktop file: {}: {:?}",
                        event.kind(),
                        removed.name(),
                        path
                    );
                }
            }
        }
    }

    /// Load every descriptor directly inside `dir`.
    ///
    /// Returns how many were loaded. Unparseable files are skipped.
    pub fn load_dir(&self, dir: &Path) -> Result<usize> {
        let entries = fs::read_dir(dir).map_err(|e| RemoteAppsError::io_with_path(e, dir))?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| is_descriptor_path(path) && path.is_file())
            .collect();
        paths.sort();

        let mut names = Vec::new();
        for path in paths {
            match self.parser.parse_file(&path) {
                Ok(shortcut) => {
                    names.push(shortcut.name().to_string());
                    self.upsert(shortcut);
                }
                Err(e) => log_load_failure("SCAN", &e),
            }
        }

        info!(
            "Found {} desktop shortcuts in {}: {:?}",
            names.len(),
            dir.display(),
            names
        );
        Ok(names.len())
    }
}

/// Log a failed load: descriptor and icon errors as warnings, anything else
/// as an error.
fn log_load_failure(kind: &str, err: &RemoteAppsError) {
    if err.is_contained() {
        warn!("[{}]: error parsing desktop file: {}", kind, err);
    } else {
        error!("[{}]: error reading desktop file: {}", kind, err);
    }
}
