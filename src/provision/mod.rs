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

//! Snapshot-sourced volume claims.
//!
//! Turns a job's volume settings plus a finished `VolumeSnapshot` into the
//! claims a storage backend needs to restore the job's data. Derivation is
//! pure: the same inputs always give the same claims, so the orchestrator can
//! repeat it after a restart without creating anything twice.

mod types;

pub use types::{
    AccessMode, SnapshotDescriptor, SnapshotMeta, SnapshotStatus, VolumeClaimRequest,
    VolumeJobSpec, SNAPSHOT_API_GROUP, SNAPSHOT_KIND,
};

use std::path::Path;

use crate::error::{Error, Result};
use crate::kube;

/// Name shared by every resource created for `job`.
pub fn resource_name(job: &VolumeJobSpec) -> String {
    kube::to_name(&job.owner_name)
}

/// Derives the claims needed to restore `job` from `snapshot`.
///
/// Fails with [`Error::SnapshotNotReady`] until the snapshot reports a
/// non-zero restore size; nothing else can fail.
pub fn build_volume_claims(
    job: &VolumeJobSpec,
    snapshot: &SnapshotDescriptor,
) -> Result<Vec<VolumeClaimRequest>> {
    let size = snapshot
        .restore_size()
        .ok_or_else(|| Error::SnapshotNotReady {
            snapshot: snapshot.name().to_string(),
        })?;

    Ok(vec![VolumeClaimRequest {
        name: resource_name(job),
        namespace: job.namespace.clone(),
        storage_class_name: job.storage_class_name.clone(),
        access_modes: job.access_modes.clone(),
        requested_size: size,
        source_snapshot_name: snapshot.name().to_string(),
        labels: kube::ownership_labels(kube::STATEFUL_JOB_COMPONENT),
    }])
}

/// Reads a job spec and a snapshot from JSON files and renders the claims
/// that restore the job as `PersistentVolumeClaim` manifests.
pub async fn manifests_from_files(job: &Path, snapshot: &Path) -> Result<Vec<serde_json::Value>> {
    let job: VolumeJobSpec = serde_json::from_str(&tokio::fs::read_to_string(job).await?)?;
    let snapshot: SnapshotDescriptor =
        serde_json::from_str(&tokio::fs::read_to_string(snapshot).await?)?;

    let claims = build_volume_claims(&job, &snapshot)?;
    tracing::info!(
        owner = %job.owner_name,
        snapshot = %snapshot.name(),
        claims = claims.len(),
        "derived volume claims"
    );
    Ok(claims.iter().map(VolumeClaimRequest::to_manifest).collect())
}
