// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Integration tests for the health check sidecar.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use fullnode_operator::api::{router, ApiState};
use fullnode_operator::prelude::*;
use fullnode_operator::storage::{DiskUsage, DiskUsageReader};

const TEST_RPC: &str = "http://my-rpc:25567";

struct FixedDisk;

impl DiskUsageReader for FixedDisk {
    fn disk_usage(&self, dir: &Path) -> fullnode_operator::Result<DiskUsage> {
        Ok(DiskUsage {
            dir: dir.to_string_lossy().to_string(),
            all_bytes: 500,
            free_bytes: 120,
        })
    }
}

struct NoDisk;

impl DiskUsageReader for NoDisk {
    fn disk_usage(&self, _dir: &Path) -> fullnode_operator::Result<DiskUsage> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no disk").into())
    }
}

fn state_with(client: Arc<dyn StatusClient>, timeout: Duration) -> ApiState {
    ApiState {
        checker: HealthChecker::new(client, TEST_RPC, timeout),
        disks: Arc::new(FixedDisk),
        data_dir: PathBuf::from("/home/operator/cosmos"),
        shutdown: CancellationToken::new(),
    }
}

async fn get(state: ApiState, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

fn catching_up(value: bool) -> CometStatus {
    let mut status = CometStatus::default();
    status.sync_info.catching_up = value;
    status
}

#[tokio::test]
async fn test_happy_path() {
    let client = FnStatus::new(|_scope, address: String| async move {
        assert_eq!(address, TEST_RPC);
        Ok(catching_up(false))
    });

    let (status, body) = get(state_with(Arc::new(client), Duration::from_secs(10)), "/").await;

    assert_eq!(status, StatusCode::OK);
    let got: HealthCheckResult = serde_json::from_value(body).unwrap();
    assert_eq!(
        got,
        HealthCheckResult {
            address: TEST_RPC.to_string(),
            in_sync: true,
            error: None,
        }
    );
}

#[tokio::test]
async fn test_still_catching_up() {
    let client = FnStatus::new(|_scope, _address| async { Ok(catching_up(true)) });

    let (status, body) = get(state_with(Arc::new(client), Duration::from_secs(10)), "/").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        serde_json::json!({ "address": TEST_RPC, "in_sync": false })
    );
}

#[tokio::test]
async fn test_status_error() {
    let client = FnStatus::new(|_scope, _address| async { Err(Error::Rpc("boom".to_string())) });

    let (status, body) = get(state_with(Arc::new(client), Duration::from_secs(10)), "/").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body,
        serde_json::json!({ "address": TEST_RPC, "in_sync": false, "error": "boom" })
    );
}

#[tokio::test]
async fn test_times_out() {
    let seen: Arc<Mutex<Option<CancellationToken>>> = Arc::new(Mutex::new(None));
    let capture = seen.clone();
    let client = FnStatus::new(move |scope: CancellationToken, _address| {
        *capture.lock().unwrap() = Some(scope);
        async { Ok(catching_up(false)) }
    });

    let _ = get(state_with(Arc::new(client), Duration::from_nanos(1)), "/").await;

    let scope = seen
        .lock()
        .unwrap()
        .clone()
        .expect("client was never called");
    tokio::time::timeout(Duration::from_secs(3), scope.cancelled())
        .await
        .expect("scope did not time out");
}

#[tokio::test]
async fn test_slow_node_reports_unavailable() {
    let client = FnStatus::new(|scope: CancellationToken, _address| async move {
        scope.cancelled().await;
        Err(Error::Cancelled)
    });

    let (status, body) = get(state_with(Arc::new(client), Duration::from_millis(10)), "/").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["in_sync"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_shutdown_fails_probes_without_querying() {
    let client = FnStatus::new(|_scope, _address| async {
        Err(Error::Rpc("client called after shutdown".to_string()))
    });
    let state = state_with(Arc::new(client), Duration::from_secs(10));
    state.shutdown.cancel();

    let (status, body) = get(state, "/").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "status query cancelled");
}

#[tokio::test]
async fn test_disk_usage() {
    let client = FnStatus::new(|_scope, _address| async { Ok(catching_up(false)) });

    let (status, body) = get(state_with(Arc::new(client), Duration::from_secs(1)), "/disk").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({
            "dir": "/home/operator/cosmos",
            "all_bytes": 500,
            "free_bytes": 120,
        })
    );
}

#[tokio::test]
async fn test_disk_usage_error() {
    let client = FnStatus::new(|_scope, _address| async { Ok(catching_up(false)) });
    let mut state = state_with(Arc::new(client), Duration::from_secs(1));
    state.disks = Arc::new(NoDisk);

    let (status, body) = get(state, "/disk").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "no disk");
}
