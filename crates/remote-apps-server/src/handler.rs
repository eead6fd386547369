//! HTTP request handlers.

use crate::server::AppState;
use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::Engine;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};

/// Envelope used by every non-listing response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub code: u16,
    pub status: String,
    pub data: Option<Value>,
}

impl StatusResponse {
    /// Create a new response with the given status and message.
    pub fn new(code: StatusCode, status: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            code: code.as_u16(),
            status: status.into(),
            data,
        }
    }
}

impl IntoResponse for StatusResponse {
    fn into_response(self) -> Response {
        let code = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (code, Json(self)).into_response()
    }
}

/// One entry of the app listing.
#[derive(Debug, Serialize)]
pub struct AppInfo {
    pub name: String,
    pub description: String,
    /// Base64 of the 48x48 PNG icon.
    pub icon: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AppList {
    pub apps: Vec<AppInfo>,
}

/// Health check endpoint.
pub async fn handle_health() -> StatusResponse {
    StatusResponse::new(StatusCode::OK, "OK", None)
}

/// List every registered shortcut, sorted by name.
pub async fn handle_list(State(state): State<Arc<AppState>>) -> Json<AppList> {
    let engine = base64::engine::general_purpose::STANDARD;
    let apps = state
        .registry
        .list()
        .iter()
        .map(|shortcut| AppInfo {
            name: shortcut.name().to_string(),
            description: shortcut.comment().unwrap_or_default().to_string(),
            icon: shortcut.icon_png().map(|png| engine.encode(png)),
        })
        .collect();

    Json(AppList { apps })
}

/// Start the shortcut registered under `name`.
pub async fn handle_start(
    State(state): State<Arc<AppState>>,
    method: Method,
    Path(name): Path<String>,
) -> StatusResponse {
    if method != Method::POST {
        return StatusResponse::new(
            StatusCode::BAD_REQUEST,
            "invalid request method, only POST is supported.",
            None,
        );
    }

    let route = match state.registry.route_for(&name) {
        Ok(route) => route,
        Err(e) => {
            debug!("Start request rejected: {}", e);
            return StatusResponse::new(status_for(&e), e.to_string(), None);
        }
    };

    match state.launcher.launch(&route.command, &HashMap::new()).await {
        Ok(outcome) => StatusResponse::new(
            StatusCode::ACCEPTED,
            format!("Starting app: {}", route.name),
            Some(json!({ "pid": outcome.pid.to_string() })),
        ),
        Err(e) => {
            error!("error starting app {}: {}", route.name, e);
            StatusResponse::new(status_for(&e), "error starting remote app", None)
        }
    }
}

fn status_for(err: &remote_apps_core::RemoteAppsError) -> StatusCode {
    StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
