//! Integration tests for the remote-apps-server binary.
//!
//! These tests start the real binary against a temporary shortcut directory
//! and exercise the HTTP routes, including live directory updates.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::AsyncBufReadExt;

fn write_descriptor(dir: &Path, file: &str, name: &str, exec: &str) {
    std::fs::write(
        dir.join(file),
        format!(
            "[Desktop Entry]\nType=Application\nName={}\nComment={} app\nExec={}\n",
            name, name, exec
        ),
    )
    .unwrap();
}

/// Create a temporary shortcut directory and an empty icon theme root.
fn create_test_env() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::create_dir_all(temp_dir.path().join("Desktop")).unwrap();
    std::fs::create_dir_all(temp_dir.path().join("icons")).unwrap();
    write_descriptor(&temp_dir.path().join("Desktop"), "app.desktop", "Editor", "/bin/true");
    temp_dir
}

async fn get_json(port: u16, path: &str) -> Result<(u16, Value), String> {
    let response = reqwest::Client::new()
        .get(format!("http://127.0.0.1:{}{}", port, path))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    let status = response.status().as_u16();
    let json = response.json::<Value>().await.map_err(|e| e.to_string())?;
    Ok((status, json))
}

async fn post_json(port: u16, path: &str) -> Result<(u16, Value), String> {
    let response = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{}{}", port, path))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    let status = response.status().as_u16();
    let json = response.json::<Value>().await.map_err(|e| e.to_string())?;
    Ok((status, json))
}

async fn app_names(port: u16) -> Vec<String> {
    match get_json(port, "/").await {
        Ok((_, json)) => json["apps"]
            .as_array()
            .map(|apps| {
                apps.iter()
                    .filter_map(|app| app["name"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default(),
        Err(_) => Vec::new(),
    }
}

/// Wait for server to be ready.
async fn wait_for_server(port: u16, timeout_secs: u64) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < Duration::from_secs(timeout_secs) {
        if let Ok((200, _)) = get_json(port, "/healthz").await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    false
}

struct ServerHandle {
    child: tokio::process::Child,
    port: u16,
    stdout_drain: Option<tokio::task::JoinHandle<()>>,
}

impl ServerHandle {
    async fn stop(mut self) {
        if let Some(drain) = self.stdout_drain.take() {
            drain.abort();
        }
        let _ = self.child.kill().await;
        let _ = self.child.wait().await;
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(drain) = self.stdout_drain.take() {
            drain.abort();
        }
        let _ = self.child.start_kill();
    }
}

/// Start the server binary and wait until `/healthz` is ready.
async fn start_server(root: &Path) -> Result<ServerHandle, String> {
    let binary = PathBuf::from(env!("CARGO_BIN_EXE_remote-apps-server"));

    let mut child = tokio::process::Command::new(&binary)
        .arg("--host")
        .arg("127.0.0.1")
        .arg("--port")
        .arg("0")
        .arg("--watch")
        .arg(root.join("Desktop"))
        .arg("--icon-root")
        .arg(root.join("icons"))
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| format!("failed to spawn remote-apps-server: {e}"))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| "failed to capture stdout".to_string())?;
    let mut lines = tokio::io::BufReader::new(stdout).lines();

    let mut discovered_port: Option<u16> = None;
    let deadline = tokio::time::Instant::now() + Duration::from_secs(20);
    while tokio::time::Instant::now() < deadline {
        match tokio::time::timeout(Duration::from_millis(250), lines.next_line()).await {
            Ok(Ok(Some(line))) => {
                if let Some(value) = line.strip_prefix("REMOTE_APPS_PORT=") {
                    let parsed = value
                        .trim()
                        .parse::<u16>()
                        .map_err(|e| format!("invalid REMOTE_APPS_PORT value '{value}': {e}"))?;
                    discovered_port = Some(parsed);
                    break;
                }
            }
            Ok(Ok(None)) => break,
            Ok(Err(err)) => return Err(format!("failed to read server stdout: {err}")),
            Err(_) => continue,
        }
    }

    let port = discovered_port
        .ok_or_else(|| "REMOTE_APPS_PORT line not emitted by remote-apps-server".to_string())?;
    if !wait_for_server(port, 15).await {
        return Err(format!("remote-apps-server failed health check on port {port}"));
    }

    let stdout_drain =
        tokio::spawn(async move { while let Ok(Some(_)) = lines.next_line().await {} });

    Ok(ServerHandle {
        child,
        port,
        stdout_drain: Some(stdout_drain),
    })
}

#[tokio::test]
async fn test_health_and_listing() {
    let env = create_test_env();
    let server = start_server(env.path()).await.unwrap();

    let (status, health) = get_json(server.port, "/healthz").await.unwrap();
    assert_eq!(status, 200);
    assert_eq!(health["status"], "OK");

    let (status, listing) = get_json(server.port, "/").await.unwrap();
    assert_eq!(status, 200);
    let apps = listing["apps"].as_array().unwrap();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0]["name"], "Editor");
    assert_eq!(apps[0]["description"], "Editor app");

    server.stop().await;
}

#[tokio::test]
async fn test_start_routes() {
    let env = create_test_env();
    let server = start_server(env.path()).await.unwrap();

    let (status, body) = post_json(server.port, "/start/Editor").await.unwrap();
    assert_eq!(status, 202);
    assert_eq!(body["status"], "Starting app: Editor");
    assert!(body["data"]["pid"].as_str().unwrap().parse::<u32>().is_ok());

    let (status, body) = post_json(server.port, "/start/Missing").await.unwrap();
    assert_eq!(status, 404);
    assert_eq!(body["status"], "app not found: Missing");

    let (status, _) = get_json(server.port, "/start/Editor").await.unwrap();
    assert_eq!(status, 400);

    server.stop().await;
}

#[tokio::test]
async fn test_directory_changes_are_served() {
    let env = create_test_env();
    let desktop = env.path().join("Desktop");
    let server = start_server(env.path()).await.unwrap();

    write_descriptor(&desktop, "term.desktop", "Terminal", "xterm");
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !app_names(server.port).await.contains(&"Terminal".to_string())
        && tokio::time::Instant::now() < deadline
    {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(app_names(server.port).await, vec!["Editor", "Terminal"]);

    std::fs::remove_file(desktop.join("term.desktop")).unwrap();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while app_names(server.port).await.len() != 1 && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(app_names(server.port).await, vec!["Editor"]);

    let (status, _) = post_json(server.port, "/start/Terminal").await.unwrap();
    assert_eq!(status, 404);

    server.stop().await;
}
