//! Session controller behavior against a stub capture child, and the HTTP
//! surface end to end. Unix only: the stop path signals by pid.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use shotlog::error::ShotlogError;
use shotlog::server::manager::{SessionManager, SessionStatus, StartParams};

/// A stand-in for the capture binary: accepts the forwarded flags, then
/// sleeps until a signal arrives.
fn stub_capture_program(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("fake-capture.sh");
    std::fs::write(&path, "#!/bin/sh\nexec sleep 30\n").unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

fn params() -> StartParams {
    StartParams {
        rate: 1,
        duration: 5,
        output: "out".into(),
        name: None,
    }
}

#[tokio::test]
async fn start_makes_the_session_active() {
    let dir = TempDir::new().unwrap();
    let manager = SessionManager::with_program(stub_capture_program(&dir));

    manager.start(&params()).await.unwrap();
    assert_eq!(manager.status().await, SessionStatus::Active);

    manager.stop().await.unwrap();
}

#[tokio::test]
async fn a_second_start_is_rejected_while_running() {
    let dir = TempDir::new().unwrap();
    let manager = SessionManager::with_program(stub_capture_program(&dir));

    manager.start(&params()).await.unwrap();
    let err = manager.start(&params()).await.unwrap_err();
    assert!(matches!(err, ShotlogError::AlreadyRunning));
    // The running session is untouched by the rejected start.
    assert_eq!(manager.status().await, SessionStatus::Active);

    manager.stop().await.unwrap();
}

#[tokio::test]
async fn stop_reaps_the_child_within_the_grace_period() {
    let dir = TempDir::new().unwrap();
    let manager = SessionManager::with_program(stub_capture_program(&dir));

    manager.start(&params()).await.unwrap();
    manager.stop().await.unwrap();
    assert_eq!(manager.status().await, SessionStatus::Inactive);
}

#[tokio::test]
async fn stop_without_a_session_is_rejected() {
    let dir = TempDir::new().unwrap();
    let manager = SessionManager::with_program(stub_capture_program(&dir));

    let err = manager.stop().await.unwrap_err();
    assert!(matches!(err, ShotlogError::NotRunning));
}

#[tokio::test]
async fn the_slot_clears_when_the_child_exits_on_its_own() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("instant-exit.sh");
    std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();

    let manager = SessionManager::with_program(path);
    manager.start(&params()).await.unwrap();

    // The observer reaps the child in the background; give it a moment.
    let mut cleared = false;
    for _ in 0..50 {
        if manager.status().await == SessionStatus::Inactive {
            cleared = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(cleared, "observer never cleared the finished session");

    // And the slot is free for the next run.
    manager.start(&params()).await.unwrap();
}

#[tokio::test]
async fn http_surface_round_trip() {
    let dir = TempDir::new().unwrap();
    let manager = Arc::new(SessionManager::with_program(stub_capture_program(&dir)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = shotlog::server::router(Arc::clone(&manager));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::new();
    let base = format!("http://{addr}");

    let status: serde_json::Value = client
        .get(format!("{base}/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["status"], "inactive");

    let started: serde_json::Value = client
        .post(format!("{base}/start_capture"))
        .json(&serde_json::json!({"rate": 1, "duration": 5}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(started["success"], true);
    assert_eq!(started["params"]["rate"], 1);
    // Omitted fields echo back as their defaults.
    assert_eq!(started["params"]["output"], "myPDFs");

    let duplicate: serde_json::Value = client
        .post(format!("{base}/start_capture"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(duplicate["success"], false);
    assert!(
        duplicate["message"]
            .as_str()
            .unwrap()
            .contains("already in progress")
    );

    let status: serde_json::Value = client
        .get(format!("{base}/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["status"], "active");

    let stopped: serde_json::Value = client
        .post(format!("{base}/stop_capture"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stopped["success"], true);

    let status: serde_json::Value = client
        .get(format!("{base}/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["status"], "inactive");

    let idle_stop: serde_json::Value = client
        .post(format!("{base}/stop_capture"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(idle_stop["success"], false);
}

#[tokio::test]
async fn malformed_start_body_yields_a_structured_failure() {
    let dir = TempDir::new().unwrap();
    let manager = Arc::new(SessionManager::with_program(stub_capture_program(&dir)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = shotlog::server::router(Arc::clone(&manager));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/start_capture"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("invalid request body"));
    // Nothing was started.
    assert_eq!(manager.status().await, SessionStatus::Inactive);
}
