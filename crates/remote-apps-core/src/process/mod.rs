//! Process launching.
//!
//! Commands run through a shell, so the process we spawn is not the
//! application itself. The launcher polls the process table for the shell's
//! child for a bounded time:
//! 1. **Spawn** - `sh -c <command>`; failing to start the shell is an error
//! 2. **Discover** - a dedicated thread scans for the shell's child every
//!    millisecond, up to one second
//! 3. **Hand off** - the PID (or 0 on timeout) is sent through a one-shot
//!    channel the request awaits
//!
//! Launched applications are never supervised afterwards.
//!
//! # Example
//!
//! ```rust,no_run
//! use remote_apps_core::process::Launcher;
//! use std::collections::HashMap;
//!
//! #[tokio::main]
//! async fn main() -> remote_apps_core::Result<()> {
//!     let outcome = Launcher::default().launch("xterm", &HashMap::new()).await?;
//!     println!("PID: {}", outcome.pid);
//!     Ok(())
//! }
//! ```

mod discovery;
mod launcher;

pub use discovery::{find_child_pid, ChildScanner};
pub use launcher::{LaunchOptions, LaunchOutcome, Launcher, PendingLaunch};
