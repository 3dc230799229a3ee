use std::io::Write;
use std::net::TcpListener;
use std::time::Duration;

use reqwest::Client;
use tempfile::{NamedTempFile, TempDir};
use tokio::time::{sleep, timeout};

/// Find an available port
fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn serve_config(port: u16, output_dir: &std::path::Path) -> String {
    format!(
        r#"
[build]
output_dir = "{}"

[server]
host = "127.0.0.1"
port = {}
"#,
        output_dir.display(),
        port
    )
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

async fn spawn_server(config_path: &std::path::Path) -> tokio::process::Child {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_iconchunk"))
        .arg("serve")
        .env("ICONCHUNK_CONFIG", config_path)
        .env("RUST_LOG", "error")
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server")
}

async fn wait_for_server(port: u16, max_attempts: u32) -> bool {
    let client = Client::new();
    for _ in 0..max_attempts {
        if client
            .get(format!("http://127.0.0.1:{}/health", port))
            .send()
            .await
            .is_ok()
        {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn test_serve_health_and_icons() {
    let port = get_available_port();
    let output = TempDir::new().unwrap();
    std::fs::create_dir_all(output.path().join("solid")).unwrap();
    std::fs::write(output.path().join("solid").join("faStar.js"), "export default 1;").unwrap();
    let config = write_config(&serve_config(port, output.path()));

    let mut server = spawn_server(config.path()).await;
    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    let client = Client::new();
    let health: serde_json::Value = client
        .get(format!("http://127.0.0.1:{}/health", port))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(health["status"], "ok");

    let icon = client
        .get(format!("http://127.0.0.1:{}/icons/solid/faStar.js", port))
        .send()
        .await
        .expect("Failed to send request");
    assert!(icon.status().is_success());
    assert_eq!(
        icon.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/javascript")
    );
    assert_eq!(icon.text().await.unwrap(), "export default 1;");

    server.kill().await.ok();
}

#[tokio::test]
async fn test_port_flag_overrides_config() {
    let port = get_available_port();
    let output = TempDir::new().unwrap();
    // Config points at a port nobody listens on; the flag wins.
    let config = write_config(&serve_config(1, output.path()));

    let mut server = tokio::process::Command::new(env!("CARGO_BIN_EXE_iconchunk"))
        .args(["serve", "--port", &port.to_string()])
        .arg("--config")
        .arg(config.path())
        .env("RUST_LOG", "error")
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server");

    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    server.kill().await.ok();
}

#[tokio::test]
async fn test_missing_config_file_exits_with_error() {
    let result = timeout(
        Duration::from_secs(5),
        tokio::process::Command::new(env!("CARGO_BIN_EXE_iconchunk"))
            .arg("serve")
            .env("ICONCHUNK_CONFIG", "/nonexistent/iconchunk.toml")
            .env("RUST_LOG", "error")
            .output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command");

    assert!(!result.status.success());
}

#[tokio::test]
async fn test_invalid_port_exits_with_error() {
    let output = TempDir::new().unwrap();
    let config = write_config(&serve_config(0, output.path()));

    let result = timeout(
        Duration::from_secs(5),
        tokio::process::Command::new(env!("CARGO_BIN_EXE_iconchunk"))
            .arg("serve")
            .env("ICONCHUNK_CONFIG", config.path())
            .env("RUST_LOG", "error")
            .output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command");

    assert!(!result.status.success());
}
