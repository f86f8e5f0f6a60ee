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

//! One-shot health probes across a list of nodes.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::common::config::EnvConfig;
use crate::error::Result;
use crate::health::{self, HealthCheckResult, HealthStatus, StatusClient};

/// Parses a hostfile: one address per line, `#` starts a comment.
pub fn parse_hosts(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub async fn load_hosts_from_file(path: &Path) -> Result<Vec<String>> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(parse_hosts(&text))
}

/// Probes every host concurrently and returns the results sorted by address.
///
/// Each host gets its own bounded probe; a slow node only ever costs its own
/// timeout.
pub async fn probe_hosts(
    client: Arc<dyn StatusClient>,
    hosts: &[String],
    timeout: Duration,
    parent: &CancellationToken,
) -> Vec<HealthCheckResult> {
    let semaphore = Arc::new(Semaphore::new(EnvConfig::max_concurrent_probes(
        hosts.len(),
    )));
    let mut probes = FuturesUnordered::new();

    for host in hosts {
        let client = client.clone();
        let semaphore = semaphore.clone();
        let parent = parent.clone();
        let host = host.clone();

        probes.push(async move {
            // The semaphore is never closed, so acquire only fails if it is.
            let _permit = semaphore.acquire_owned().await.ok();
            health::check(client.as_ref(), &parent, &host, timeout).await
        });
    }

    let mut results = Vec::with_capacity(hosts.len());
    while let Some(result) = probes.next().await {
        results.push(result);
    }
    results.sort_by(|a, b| a.address.cmp(&b.address));
    results
}

/// Process exit code for a sweep: 0 when every node is healthy, 2 when the
/// worst node is still catching up, 1 when any node is unreachable.
pub fn exit_code(results: &[HealthCheckResult]) -> i32 {
    let statuses: Vec<HealthStatus> = results.iter().map(HealthCheckResult::status).collect();
    if statuses.contains(&HealthStatus::Unavailable) {
        1
    } else if statuses.contains(&HealthStatus::NotReady) {
        2
    } else {
        0
    }
}
