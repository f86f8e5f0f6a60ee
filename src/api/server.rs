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

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::api::handlers::{router, ApiState};
use crate::common::config::HealthCheckConfig;
use crate::error::Result;
use crate::health::HealthChecker;
use crate::network::CometClient;
use crate::storage::LocalDiskReader;

/// Run the health sidecar until `shutdown` is cancelled.
pub async fn run_healthcheck(config: &HealthCheckConfig, shutdown: CancellationToken) -> Result<()> {
    let client = CometClient::new()?;
    let checker = HealthChecker::new(Arc::new(client), config.rpc_host.clone(), config.timeout);
    let state = ApiState {
        checker: checker.clone(),
        disks: Arc::new(LocalDiskReader::new()),
        data_dir: config.data_dir.clone(),
        shutdown: shutdown.clone(),
    };
    let app = router(state);

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .inspect_err(|e| tracing::error!("Failed to bind TCP listener on port {}: {e}", config.port))?;

    tracing::info!(
        rpc_host = %checker.address(),
        timeout = ?checker.timeout(),
        data_dir = %config.data_dir.display(),
        "Health check server listening on {}",
        listener
            .local_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Health check server stopped");
    Ok(())
}
