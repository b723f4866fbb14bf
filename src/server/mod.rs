//! # Session Controller
//!
//! Local HTTP control surface for capture sessions. Three JSON endpoints:
//!
//! - `POST /start_capture` — launch a capture child (rejected while one runs)
//! - `POST /stop_capture` — graceful stop with terminate/kill escalation
//! - `GET /status` — `active` or `inactive`
//!
//! Every response is a structured success/message pair; a malformed request
//! body comes back as `success: false`, never as a framework error page.
//! CORS is wide open so a browser extension on another origin can drive the
//! surface.

pub mod manager;
pub mod sys;

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::{DEFAULT_DURATION_SECS, DEFAULT_OUTPUT_DIR, DEFAULT_RATE_SECS};
use crate::error::Result;
use self::manager::{SessionManager, SessionStatus, StartParams};

/// Body of `POST /start_capture`; every field falls back to the CLI default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StartRequest {
    pub rate: u32,
    pub duration: u32,
    pub output: String,
    pub name: Option<String>,
}

impl Default for StartRequest {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE_SECS,
            duration: DEFAULT_DURATION_SECS,
            output: DEFAULT_OUTPUT_DIR.to_string(),
            name: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<StartParams>,
}

#[derive(Debug, Serialize)]
pub struct StopResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: &'static str,
}

pub fn router(manager: Arc<SessionManager>) -> Router {
    Router::new()
        .route("/start_capture", post(start_capture))
        .route("/stop_capture", post(stop_capture))
        .route("/status", get(status))
        .layer(CorsLayer::permissive())
        .with_state(manager)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: &str, manager: Arc<SessionManager>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "control surface listening");
    axum::serve(listener, router(manager)).await?;
    Ok(())
}

async fn start_capture(
    State(manager): State<Arc<SessionManager>>,
    body: Bytes,
) -> Json<StartResponse> {
    let request: StartRequest = if body.is_empty() {
        StartRequest::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(e) => return Json(failure(format!("invalid request body: {e}"))),
        }
    };

    if request.rate == 0 || request.duration == 0 {
        return Json(failure(
            "rate and duration must be greater than zero".to_string(),
        ));
    }

    let params = StartParams {
        rate: request.rate,
        duration: request.duration,
        output: request.output,
        name: request.name,
    };
    match manager.start(&params).await {
        Ok(()) => Json(StartResponse {
            success: true,
            message: "Screenshot capture started".to_string(),
            params: Some(params),
        }),
        Err(e) => Json(failure(e.to_string())),
    }
}

fn failure(message: String) -> StartResponse {
    StartResponse {
        success: false,
        message,
        params: None,
    }
}

async fn stop_capture(State(manager): State<Arc<SessionManager>>) -> Json<StopResponse> {
    match manager.stop().await {
        Ok(()) => Json(StopResponse {
            success: true,
            message: "Screenshot capture stopped and PDF saved successfully".to_string(),
        }),
        Err(e) => Json(StopResponse {
            success: false,
            message: e.to_string(),
        }),
    }
}

async fn status(State(manager): State<Arc<SessionManager>>) -> Json<StatusResponse> {
    match manager.status().await {
        SessionStatus::Active => Json(StatusResponse {
            status: "active",
            message: "Screenshot capture is in progress",
        }),
        SessionStatus::Inactive => Json(StatusResponse {
            status: "inactive",
            message: "No screenshot capture in progress",
        }),
    }
}
