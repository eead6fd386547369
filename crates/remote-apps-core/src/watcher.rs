//! File system watcher for descriptor directories.
//!
//! Watches one or more directories (non-recursively) and forwards create,
//! modify and remove notifications for `.desktop` files, one at a time and in
//! arrival order, from a single listener thread.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use notify::event::{AccessKind, AccessMode, ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info};

use crate::error::{RemoteAppsError, Result};
use crate::registry::{is_descriptor_path, ShortcutEvent, ShortcutRegistry};

/// Callback invoked for every descriptor event.
pub type EventCallback = Box<dyn Fn(ShortcutEvent) + Send + 'static>;

/// Watches descriptor directories.
pub struct DirectoryWatcher {
    watcher: Option<RecommendedWatcher>,
    listener: Option<JoinHandle<()>>,
    dirs: Vec<PathBuf>,
}

impl DirectoryWatcher {
    /// Start watching `dirs`, feeding every event into `registry`.
    pub fn watch_registry(dirs: &[PathBuf], registry: Arc<ShortcutRegistry>) -> Result<Self> {
        Self::start(
            dirs,
            Box::new(move |event| registry.handle_event(&event)),
        )
    }

    /// Start watching `dirs`, invoking `on_event` on the listener thread.
    pub fn start(dirs: &[PathBuf], on_event: EventCallback) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(event_tx)?;

        let listener = thread::Builder::new()
            .name("shortcut-watcher".to_string())
            .spawn(move || {
                // Ends once the watcher is dropped and the sender goes with it.
                for result in event_rx {
                    match result {
                        Ok(event) => {
                            for shortcut_event in translate_event(&event) {
                                debug!("Watcher event: {:?}", shortcut_event);
                                on_event(shortcut_event);
                            }
                        }
                        Err(e) => error!("notify error: {}", e),
                    }
                }
                debug!("Watcher listener stopping");
            })
            .map_err(|e| RemoteAppsError::Watch {
                message: format!("spawn listener thread: {}", e),
            })?;

        for dir in dirs {
            watcher
                .watch(dir, RecursiveMode::NonRecursive)
                .map_err(|e| RemoteAppsError::Watch {
                    message: format!("watch {}: {}", dir.display(), e),
                })?;
            info!("Watching for changes in: {}", dir.display());
        }

        Ok(Self {
            watcher: Some(watcher),
            listener: Some(listener),
            dirs: dirs.to_vec(),
        })
    }

    /// Directories being watched.
    pub fn watched_dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Stop watching and wait for the listener to drain.
    pub fn stop(mut self) {
        self.watcher.take();
        if let Some(listener) = self.listener.take() {
            if listener.join().is_err() {
                error!("Watcher listener panicked");
            }
        }
    }
}

/// Map a raw notification to descriptor events.
///
/// Renames are split into a remove of the old path and a create of the new
/// one, so a moved file never leaves a stale route behind.
pub fn translate_event(event: &Event) -> Vec<ShortcutEvent> {
    let paths = &event.paths;
    let events: Vec<ShortcutEvent> = match &event.kind {
        EventKind::Create(_) => paths.iter().cloned().map(ShortcutEvent::Created).collect(),
        EventKind::Remove(_) => paths.iter().cloned().map(ShortcutEvent::Removed).collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            paths.iter().cloned().map(ShortcutEvent::Removed).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            paths.iter().cloned().map(ShortcutEvent::Created).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => match paths.as_slice() {
            [from, to] => vec![
                ShortcutEvent::Removed(from.clone()),
                ShortcutEvent::Created(to.clone()),
            ],
            _ => Vec::new(),
        },
        EventKind::Modify(ModifyKind::Name(_)) => paths.iter().map(|p| renamed(p)).collect(),
        EventKind::Modify(ModifyKind::Metadata(_)) => Vec::new(),
        EventKind::Modify(_) | EventKind::Access(AccessKind::Close(AccessMode::Write)) => {
            paths.iter().cloned().map(ShortcutEvent::Modified).collect()
        }
        _ => Vec::new(),
    };

    events
        .into_iter()
        .filter(|e| is_descriptor_path(e.path()))
        .collect()
}

/// Rename of unknown direction: the path either appeared or went away.
fn renamed(path: &Path) -> ShortcutEvent {
    if path.exists() {
        ShortcutEvent::Created(path.to_path_buf())
    } else {
        ShortcutEvent::Removed(path.to_path_buf())
    }
}
