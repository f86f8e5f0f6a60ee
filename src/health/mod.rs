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

//! Node sync health classification.
//!
//! A probe asks one node for its CometBFT status under a hard deadline and
//! folds the answer into a [`HealthCheckResult`]:
//!
//! ```text
//! Idle ──▶ Probing ──┬──▶ Healthy     (catching_up = false)  200
//!                    ├──▶ NotReady    (catching_up = true)   422
//!                    └──▶ Unavailable (error / timeout)      503
//! ```

mod comet;
mod prober;

pub use comet::{CometStatus, NodeInfo, SyncInfo};
pub use prober::{check, HealthCheckResult, HealthChecker, HealthStatus};

use std::future::Future;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// Capability to ask a node for its sync status.
///
/// `scope` is cancelled when the probe's deadline passes or its caller goes
/// away; implementations should stop work as soon as it fires.
#[async_trait]
pub trait StatusClient: Send + Sync {
    async fn status(&self, scope: &CancellationToken, address: &str) -> Result<CometStatus>;
}

/// Adapts a closure into a [`StatusClient`].
///
/// ```rust
/// use fullnode_operator::health::{CometStatus, FnStatus};
///
/// let client = FnStatus::new(|_scope, _address| async { Ok(CometStatus::default()) });
/// # let _ = client;
/// ```
pub struct FnStatus<F>(pub F);

impl<F, Fut> FnStatus<F>
where
    F: Fn(CancellationToken, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CometStatus>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> StatusClient for FnStatus<F>
where
    F: Fn(CancellationToken, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CometStatus>> + Send + 'static,
{
    async fn status(&self, scope: &CancellationToken, address: &str) -> Result<CometStatus> {
        (self.0)(scope.clone(), address.to_string()).await
    }
}
