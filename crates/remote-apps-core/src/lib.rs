//! Remote Apps Core - Headless library for serving desktop shortcuts as
//! remotely launchable apps.
//!
//! This crate keeps a live registry of XDG `.desktop` shortcuts found in
//! watched directories and launches them by name. It has no HTTP layer; see
//! the `remote-apps-server` crate for that.
//!
//! # Example
//!
//! ```rust,no_run
//! use remote_apps_core::{DirectoryWatcher, Launcher, ShortcutRegistry};
//! use std::collections::HashMap;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> remote_apps_core::Result<()> {
//!     let dir = PathBuf::from("/etc/skel/Desktop");
//!     let registry = Arc::new(ShortcutRegistry::default());
//!     registry.load_dir(&dir)?;
//!     let _watcher = DirectoryWatcher::watch_registry(&[dir], registry.clone())?;
//!
//!     for shortcut in registry.list() {
//!         println!("{}", shortcut.name());
//!     }
//!
//!     let route = registry.route_for("Editor")?;
//!     let outcome = Launcher::default().launch(&route.command, &HashMap::new()).await?;
//!     println!("Started {} as {}", route.name, outcome.pid);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod platform;
pub mod process;
pub mod registry;
pub mod shortcut;
pub mod watcher;

// Re-exports for convenience
pub use error::{RemoteAppsError, Result};
pub use process::{LaunchOptions, LaunchOutcome, Launcher};
pub use registry::{Route, ShortcutEvent, ShortcutRegistry};
pub use shortcut::{IconResolver, Shortcut, ShortcutParser};
pub use watcher::DirectoryWatcher;
