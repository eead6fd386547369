//! Shell launching with best-effort PID discovery.

use std::collections::HashMap;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::discovery::ChildScanner;
use crate::config::LaunchConfig;
use crate::error::{RemoteAppsError, Result};

/// Options for launching commands.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Interpreter invoked as `<shell> -c <command>`.
    pub shell: String,
    /// How long to look for the shell's child.
    pub discovery_timeout: Duration,
    /// Pause between process table scans.
    pub poll_interval: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            shell: LaunchConfig::SHELL.to_string(),
            discovery_timeout: LaunchConfig::DISCOVERY_TIMEOUT,
            poll_interval: LaunchConfig::POLL_INTERVAL,
        }
    }
}

impl LaunchOptions {
    /// Set the shell interpreter.
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Set how long to look for the shell's child.
    pub fn with_discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = timeout;
        self
    }

    /// Set the pause between process table scans.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Result of a launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchOutcome {
    /// PID of the intermediate shell.
    pub shell_pid: u32,
    /// PID of the application, 0 when discovery timed out.
    pub pid: u32,
}

impl LaunchOutcome {
    /// Whether discovery gave up without finding the child.
    pub fn timed_out(&self) -> bool {
        self.pid == 0
    }
}

/// A spawned shell whose child PID is still being looked up.
#[derive(Debug)]
pub struct PendingLaunch {
    shell_pid: u32,
    pid_rx: oneshot::Receiver<u32>,
    wait_limit: Duration,
}

impl PendingLaunch {
    /// PID of the intermediate shell.
    pub fn shell_pid(&self) -> u32 {
        self.shell_pid
    }

    /// Wait for the discovered PID, never longer than the discovery window
    /// plus a small handoff slack.
    pub async fn wait(self) -> LaunchOutcome {
        let pid = match tokio::time::timeout(self.wait_limit, self.pid_rx).await {
            Ok(Ok(pid)) => pid,
            Ok(Err(_)) => {
                warn!("PID discovery for shell {} ended without a result", self.shell_pid);
                0
            }
            Err(_) => {
                warn!("PID handoff for shell {} timed out", self.shell_pid);
                0
            }
        };

        LaunchOutcome {
            shell_pid: self.shell_pid,
            pid,
        }
    }
}

/// Launches shell commands and reports the PID of the started application.
#[derive(Debug, Clone, Default)]
pub struct Launcher {
    options: LaunchOptions,
    /// Environment applied to every launch, before per-launch overrides.
    base_env: HashMap<String, String>,
}

impl Launcher {
    /// Create a new launcher with the given options.
    pub fn new(options: LaunchOptions) -> Self {
        Self {
            options,
            base_env: HashMap::new(),
        }
    }

    /// Add an environment variable passed to every launch.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.base_env.insert(key.into(), value.into());
        self
    }

    /// Get the launch options.
    pub fn options(&self) -> &LaunchOptions {
        &self.options
    }

    /// Start `command` and wait for its PID.
    ///
    /// Only a failure to start the shell is an error. If no child appears
    /// within the discovery window the outcome carries PID 0.
    pub async fn launch(
        &self,
        command: &str,
        extra_env: &HashMap<String, String>,
    ) -> Result<LaunchOutcome> {
        let pending = self.spawn(command, extra_env)?;
        let outcome = pending.wait().await;
        info!("Started process with pid: {}", outcome.pid);
        Ok(outcome)
    }

    /// Start `command` through the shell and begin PID discovery on a
    /// dedicated thread.
    pub fn spawn(
        &self,
        command: &str,
        extra_env: &HashMap<String, String>,
    ) -> Result<PendingLaunch> {
        let mut cmd = Command::new(&self.options.shell);
        cmd.arg("-c").arg(command);
        cmd.envs(&self.base_env);
        cmd.envs(extra_env);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());

        let shell = cmd.spawn().map_err(|e| RemoteAppsError::Spawn {
            command: command.to_string(),
            source: e,
        })?;
        let shell_pid = shell.id();
        debug!("Spawned shell {} for `{}`", shell_pid, command);

        let (pid_tx, pid_rx) = oneshot::channel();
        let options = self.options.clone();
        thread::Builder::new()
            .name(format!("pid-discovery-{}", shell_pid))
            .spawn(move || discover_and_reap(shell, &options, pid_tx))
            .map_err(|e| RemoteAppsError::Other(format!("spawn discovery thread: {}", e)))?;

        Ok(PendingLaunch {
            shell_pid,
            pid_rx,
            wait_limit: self.options.discovery_timeout + LaunchConfig::HANDOFF_SLACK,
        })
    }
}

/// Poll for the shell's child, hand the PID over, then reap the shell.
fn discover_and_reap(mut shell: Child, options: &LaunchOptions, pid_tx: oneshot::Sender<u32>) {
    let shell_pid = shell.id();
    let mut scanner = ChildScanner::new();
    let start = Instant::now();

    let pid = loop {
        if let Some(pid) = scanner.find_child(shell_pid) {
            debug!("Found child PID {} in {} ms", pid, start.elapsed().as_millis());
            break pid;
        }
        if start.elapsed() >= options.discovery_timeout {
            warn!(
                "failed to find child PID in {}ms",
                options.discovery_timeout.as_millis()
            );
            break 0;
        }
        thread::sleep(options.poll_interval);
    };

    // The requester may already have given up.
    let _ = pid_tx.send(pid);

    match shell.wait() {
        Ok(status) => debug!("Shell {} exited: {}", shell_pid, status),
        Err(e) => debug!("waiting on shell {} failed: {}", shell_pid, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn quick() -> Launcher {
        Launcher::new(LaunchOptions::default().with_discovery_timeout(Duration::from_millis(300)))
    }

    #[tokio::test]
    async fn test_child_pid_is_discovered() {
        let outcome = quick().launch("sleep 1; true", &HashMap::new()).await.unwrap();

        assert!(!outcome.timed_out());
        assert_ne!(outcome.pid, outcome.shell_pid);
    }

    #[tokio::test]
    async fn test_exec_without_child_times_out_to_zero() {
        let start = Instant::now();
        let outcome = quick().launch("exec sleep 1", &HashMap::new()).await.unwrap();

        assert_eq!(outcome.pid, 0);
        assert!(outcome.timed_out());
        assert!(start.elapsed() < Duration::from_millis(300) + LaunchConfig::HANDOFF_SLACK * 2);
    }

    #[tokio::test]
    async fn test_missing_shell_is_spawn_error() {
        let launcher = Launcher::new(LaunchOptions::default().with_shell("/nonexistent/shell"));
        let err = launcher.launch("true", &HashMap::new()).await.unwrap_err();

        assert!(matches!(err, RemoteAppsError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_environment_overrides_reach_command() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("env.txt");
        let launcher = quick().with_env("REMOTE_APPS_BASE", "base");
        let mut extra = HashMap::new();
        extra.insert("REMOTE_APPS_BASE".to_string(), "override".to_string());
        extra.insert("REMOTE_APPS_EXTRA".to_string(), "extra".to_string());

        let command = format!(
            "echo \"$REMOTE_APPS_BASE $REMOTE_APPS_EXTRA\" > {}",
            out.display()
        );
        launcher.launch(&command, &extra).await.unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while !out.exists() && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(fs::read_to_string(&out).unwrap().trim(), "override extra");
    }
}
