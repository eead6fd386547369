//! Live registry of shortcuts kept in sync with descriptor directories.

mod event;
mod shortcut_registry;

pub use event::{is_descriptor_path, ShortcutEvent};
pub use shortcut_registry::{Route, ShortcutRegistry};
