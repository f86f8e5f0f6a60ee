use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::health::{HealthCheckResult, HealthChecker};
use crate::storage::DiskUsageReader;

#[derive(Clone)]
pub struct ApiState {
    pub checker: HealthChecker,
    pub disks: Arc<dyn DiskUsageReader>,
    pub data_dir: PathBuf,
    /// Parent scope for every probe; cancelled on shutdown.
    pub shutdown: CancellationToken,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/disk", get(disk_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn health_handler(
    State(state): State<ApiState>,
) -> (StatusCode, Json<HealthCheckResult>) {
    let result = state.checker.check(&state.shutdown).await;
    (result.status().status_code(), Json(result))
}

pub async fn disk_handler(State(state): State<ApiState>) -> Response {
    let reader = state.disks.clone();
    let dir = state.data_dir.clone();

    // sysinfo walks the mount table synchronously
    let usage = tokio::task::spawn_blocking(move || reader.disk_usage(&dir)).await;

    match usage {
        Ok(Ok(usage)) => (StatusCode::OK, Json(usage)).into_response(),
        Ok(Err(e)) => {
            tracing::warn!(dir = %state.data_dir.display(), error = %e, "disk usage unavailable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "disk usage task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
