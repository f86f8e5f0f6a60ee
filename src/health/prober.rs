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

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{CometStatus, StatusClient};
use crate::error::{Error, Result};

/// Outcome of a single probe, as returned to whoever asked for it.
///
/// `error` is set exactly when the probe failed to complete, and `in_sync`
/// is only ever true for a completed probe of a node that is not catching up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub address: String,
    pub in_sync: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Tri-state classification of a [`HealthCheckResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthStatus {
    Healthy,
    NotReady,
    Unavailable,
}

impl HealthStatus {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Healthy => StatusCode::OK,
            Self::NotReady => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::NotReady => write!(f, "not-ready"),
            Self::Unavailable => write!(f, "unavailable"),
        }
    }
}

impl HealthCheckResult {
    fn from_outcome(address: &str, outcome: Result<CometStatus>) -> Self {
        match outcome {
            Ok(status) => Self {
                address: address.to_string(),
                in_sync: !status.catching_up(),
                error: None,
            },
            Err(e) => Self {
                address: address.to_string(),
                in_sync: false,
                error: Some(e.to_string()),
            },
        }
    }

    pub fn status(&self) -> HealthStatus {
        match (&self.error, self.in_sync) {
            (Some(_), _) => HealthStatus::Unavailable,
            (None, true) => HealthStatus::Healthy,
            (None, false) => HealthStatus::NotReady,
        }
    }
}

/// Probe `address` once, giving up after `timeout`.
///
/// The client sees a child of `parent` that is cancelled when the deadline
/// passes and again when this function returns, so no query outlives its
/// probe. A `parent` that is already cancelled short-circuits to a failed
/// result without touching the client.
pub async fn check<C>(
    client: &C,
    parent: &CancellationToken,
    address: &str,
    timeout: Duration,
) -> HealthCheckResult
where
    C: StatusClient + ?Sized,
{
    let outcome = probe(client, parent, address, timeout).await;

    match &outcome {
        Ok(status) => tracing::debug!(
            address,
            catching_up = status.catching_up(),
            height = status.latest_block_height(),
            network = %status.node_info.network,
            "status query completed"
        ),
        Err(e) => tracing::warn!(address, error = %e, "status query failed"),
    }

    HealthCheckResult::from_outcome(address, outcome)
}

async fn probe<C>(
    client: &C,
    parent: &CancellationToken,
    address: &str,
    timeout: Duration,
) -> Result<CometStatus>
where
    C: StatusClient + ?Sized,
{
    if parent.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let scope = parent.child_token();
    let _guard = scope.clone().drop_guard();

    tokio::select! {
        biased;
        _ = scope.cancelled() => Err(Error::Cancelled),
        _ = tokio::time::sleep(timeout) => {
            scope.cancel();
            Err(Error::Timeout(timeout))
        }
        result = client.status(&scope, address) => result,
    }
}

/// A probe bound to one node, suitable for sharing across request handlers.
#[derive(Clone)]
pub struct HealthChecker {
    client: Arc<dyn StatusClient>,
    address: String,
    timeout: Duration,
}

impl HealthChecker {
    pub fn new(client: Arc<dyn StatusClient>, address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            address: address.into(),
            timeout,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn check(&self, parent: &CancellationToken) -> HealthCheckResult {
        check(self.client.as_ref(), parent, &self.address, self.timeout).await
    }
}
