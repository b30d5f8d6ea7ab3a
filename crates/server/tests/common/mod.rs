//! Shared helpers for server integration tests.

use std::io::Write;
use std::net::TcpListener;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::{NamedTempFile, TempDir};
use tokio::time::sleep;

/// Find an available port
pub fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn config_with_db(port: u16, db_path: &str) -> String {
    format!(
        r#"
[auth]
method = "none"

[server]
host = "127.0.0.1"
port = {}

[database]
path = "{}"
"#,
        port, db_path
    )
}

async fn spawn_server(config_path: &std::path::Path) -> tokio::process::Child {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_dispatchd"))
        .env("DISPATCHD_CONFIG", config_path)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server")
}

async fn wait_for_server(port: u16, max_attempts: u32) -> bool {
    let client = Client::new();
    for _ in 0..max_attempts {
        if client
            .get(format!("http://127.0.0.1:{}/api/v1/health", port))
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

/// Start a server for testing. The config file must outlive the child.
pub async fn start_test_server() -> (u16, tokio::process::Child, TempDir, NamedTempFile) {
    let port = get_available_port();
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let config_content = config_with_db(port, db_path.to_str().unwrap());

    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let server = spawn_server(temp_file.path()).await;

    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    // Give a moment for initialization
    sleep(Duration::from_millis(100)).await;

    (port, server, temp_dir, temp_file)
}

pub fn base_url(port: u16) -> String {
    format!("http://127.0.0.1:{}/api/v1", port)
}

/// Create an emergency ticket with every required field filled in and
/// return its JSON representation.
pub async fn create_complete_emergency(client: &Client, port: u16) -> Value {
    let response = client
        .post(format!("{}/tickets", base_url(port)))
        .json(&json!({
            "ticket_type": "emergency",
            "organization_id": "org-1",
            "fields": {
                "description": "water main burst in lobby",
                "category": "plumbing",
                "priority_level": 5,
                "emergency_level": "critical",
                "safety_measures_taken": true
            }
        }))
        .send()
        .await
        .expect("Failed to create ticket");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse JSON")
}

/// Create a staff member and return its id.
pub async fn create_staff(client: &Client, port: u16, name: &str) -> String {
    let response = client
        .post(format!("{}/staff", base_url(port)))
        .json(&json!({
            "organization_id": "org-1",
            "name": name,
            "skills": [
                { "category": "plumbing", "level": "expert" }
            ]
        }))
        .send()
        .await
        .expect("Failed to create staff");

    assert_eq!(response.status(), 201);
    let json: Value = response.json().await.unwrap();
    json["id"].as_str().unwrap().to_string()
}
