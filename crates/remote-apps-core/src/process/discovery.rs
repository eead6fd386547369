//! Child process discovery through the process table.
//!
//! A launched shell gets no handle on the application it starts, so the only
//! way to learn the application's PID is to look for processes whose parent
//! is the shell.

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// Reusable process table scanner.
pub struct ChildScanner {
    system: System,
}

impl Default for ChildScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ChildScanner {
    /// Create a new scanner with an empty process table.
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }

    /// Refresh the process table and return the first child of `parent`.
    pub fn find_child(&mut self, parent: u32) -> Option<u32> {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::new(),
        );

        let parent = Pid::from_u32(parent);
        self.system
            .processes()
            .iter()
            .filter(|(_, process)| process.thread_kind().is_none())
            .find(|(_, process)| process.parent() == Some(parent))
            .map(|(pid, _)| pid.as_u32())
    }
}

/// One-off scan for a child of `parent`.
pub fn find_child_pid(parent: u32) -> Option<u32> {
    ChildScanner::new().find_child(parent)
}
