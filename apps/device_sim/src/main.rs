use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod device;

use device::DeviceState;

/// Stand-in for the controller receiver, for trying the remote without hardware.
#[derive(Parser, Debug)]
#[command(name = "device-sim", version)]
struct Cli {
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,
}

#[derive(Clone, Default)]
struct AppState {
    device: Arc<Mutex<DeviceState>>,
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Controller receiver</title></head>
<body>
<h1>Controller receiver</h1>
<p>POST /controller with a JSON body:</p>
<pre>
{
  "buttons": {"A": false, "B": false, "X": false, "Y": false},
  "lstick": {"x": 0, "y": 0},
  "rstick": {"x": 0, "y": 0},
  "shoulder": {"L": false, "R": false, "ZL": false, "ZR": false},
  "system": {"plus": false, "minus": false, "home": false}
}
</pre>
<p>Sticks: x,y range -100 to 100</p>
<p>GET /state shows the current simulated state.</p>
</body>
</html>
"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let app = build_router(AppState::default());
    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    info!(addr = %listener.local_addr()?, "device simulator listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/controller", post(controller))
        .route("/state", get(current_state))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn controller(State(state): State<AppState>, body: Bytes) -> (StatusCode, Json<Value>) {
    if body.is_empty() {
        warn!("controller request without body");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No JSON body" })),
        );
    }
    let doc: Value = match serde_json::from_slice(&body) {
        Ok(doc) => doc,
        Err(error) => {
            warn!(%error, "rejecting controller request");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid JSON" })),
            );
        }
    };

    let mut device = state.device.lock().await;
    match device.apply(&doc) {
        Some(input) => info!(input, updates = device.updates, "controller input"),
        None => debug!(updates = device.updates, "controller idle frame"),
    }
    (StatusCode::OK, Json(json!({ "status": "OK" })))
}

async fn current_state(State(state): State<AppState>) -> Json<DeviceState> {
    Json(state.device.lock().await.clone())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
