//! Integration tests for the registry and launcher public interface.
//!
//! These tests load descriptors from real directories and drive them the same
//! way the HTTP server does.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use remote_apps_core::config::LaunchConfig;
use remote_apps_core::{
    IconResolver, LaunchOptions, Launcher, RemoteAppsError, ShortcutEvent, ShortcutParser,
    ShortcutRegistry,
};
use tempfile::TempDir;

fn write_descriptor(dir: &Path, file: &str, name: &str, exec: &str) {
    fs::write(
        dir.join(file),
        format!("[Desktop Entry]\nType=Application\nName={}\nExec={}\n", name, exec),
    )
    .unwrap();
}

/// Registry whose icon lookups stay inside the test directory.
fn isolated_registry(temp_dir: &TempDir) -> ShortcutRegistry {
    let icons = temp_dir.path().join("icons");
    fs::create_dir_all(&icons).unwrap();
    ShortcutRegistry::new(ShortcutParser::new(IconResolver::new(icons)))
}

#[tokio::test]
async fn test_scan_then_launch() {
    let temp_dir = TempDir::new().unwrap();
    let desktop = temp_dir.path().join("Desktop");
    fs::create_dir_all(&desktop).unwrap();
    write_descriptor(&desktop, "app.desktop", "Editor", "/bin/true");

    let registry = isolated_registry(&temp_dir);
    assert_eq!(registry.load_dir(&desktop).unwrap(), 1);

    let names: Vec<String> = registry.list().iter().map(|s| s.name().to_string()).collect();
    assert!(names.contains(&"Editor".to_string()));

    let route = registry.route_for("Editor").unwrap();
    assert_eq!(route.command, "/bin/true");

    let start = Instant::now();
    let outcome = Launcher::default()
        .launch(&route.command, &HashMap::new())
        .await
        .unwrap();
    assert!(start.elapsed() <= LaunchConfig::DISCOVERY_TIMEOUT + LaunchConfig::HANDOFF_SLACK * 2);
    // `/bin/true` usually exits before it can be seen; either outcome is fine.
    assert!(outcome.shell_pid > 0);
}

#[test]
fn test_name_collision_survives_removal_of_superseded_file() {
    let temp_dir = TempDir::new().unwrap();
    let a = temp_dir.path().join("a.desktop");
    let b = temp_dir.path().join("b.desktop");
    write_descriptor(temp_dir.path(), "a.desktop", "X", "first");
    write_descriptor(temp_dir.path(), "b.desktop", "X", "second");

    let registry = isolated_registry(&temp_dir);
    registry.handle_event(&ShortcutEvent::Created(a.clone()));
    registry.handle_event(&ShortcutEvent::Created(b.clone()));
    registry.handle_event(&ShortcutEvent::Removed(a.clone()));

    let route = registry.route_for("X").unwrap();
    assert_eq!(route.shortcut.path, b);
    assert_eq!(route.command, "second");
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_empty_descriptor_is_never_registered() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("empty.desktop"), "[Desktop Entry]\n").unwrap();
    write_descriptor(temp_dir.path(), "ok.desktop", "Terminal", "xterm");

    let registry = isolated_registry(&temp_dir);
    assert_eq!(registry.load_dir(temp_dir.path()).unwrap(), 1);
    assert!(registry.get("Terminal").is_some());
    assert!(registry.get("").is_none());
}

#[test]
fn test_unknown_name_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let registry = isolated_registry(&temp_dir);

    let err = registry.route_for("Missing").unwrap_err();
    assert!(matches!(err, RemoteAppsError::ShortcutNotFound { .. }));
    assert_eq!(err.http_status(), 404);
}

#[test]
fn test_load_dir_missing_directory_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let registry = isolated_registry(&temp_dir);

    assert!(registry.load_dir(&temp_dir.path().join("nope")).is_err());
}

#[tokio::test]
async fn test_launch_never_blocks_past_bound() {
    let timeout = Duration::from_millis(200);
    let launcher = Launcher::new(LaunchOptions::default().with_discovery_timeout(timeout));

    let start = Instant::now();
    let outcome = launcher.launch("exec sleep 2", &HashMap::new()).await.unwrap();

    assert_eq!(outcome.pid, 0);
    assert!(start.elapsed() < timeout + LaunchConfig::HANDOFF_SLACK * 2);
}
