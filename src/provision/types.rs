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

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::utils::quantity::Quantity;

pub const SNAPSHOT_API_GROUP: &str = "snapshot.storage.k8s.io";
pub const SNAPSHOT_KIND: &str = "VolumeSnapshot";

/// Kubernetes persistent volume access mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AccessMode {
    ReadWriteOnce,
    ReadOnlyMany,
    ReadWriteMany,
    ReadWriteOncePod,
}

/// Volume settings taken from a stateful job definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeJobSpec {
    pub owner_name: String,
    pub namespace: String,
    pub storage_class_name: String,
    pub access_modes: Vec<AccessMode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotStatus {
    /// Filled in by the snapshot controller once the size is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore_size: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_to_use: Option<bool>,
}

/// The parts of a CSI `VolumeSnapshot` the provisioner reads.
///
/// Decodes straight from the object's JSON; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDescriptor {
    #[serde(default)]
    pub metadata: SnapshotMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SnapshotStatus>,
}

impl SnapshotDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: SnapshotMeta { name: name.into() },
            status: None,
        }
    }

    pub fn with_restore_size(mut self, size: Quantity) -> Self {
        self.status.get_or_insert_with(SnapshotStatus::default).restore_size = Some(size);
        self
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Restore size, if the snapshot controller has published a non-zero one.
    pub fn restore_size(&self) -> Option<Quantity> {
        self.status
            .as_ref()
            .and_then(|status| status.restore_size)
            .filter(|size| !size.is_zero())
    }
}

/// A request for one snapshot-sourced volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeClaimRequest {
    pub name: String,
    pub namespace: String,
    pub storage_class_name: String,
    pub access_modes: Vec<AccessMode>,
    pub requested_size: Quantity,
    pub source_snapshot_name: String,
    pub labels: BTreeMap<String, String>,
}

impl VolumeClaimRequest {
    /// Renders the request as a `PersistentVolumeClaim` manifest.
    pub fn to_manifest(&self) -> serde_json::Value {
        json!({
            "apiVersion": "v1",
            "kind": "PersistentVolumeClaim",
            "metadata": {
                "name": self.name,
                "namespace": self.namespace,
                "labels": self.labels,
            },
            "spec": {
                "storageClassName": self.storage_class_name,
                "accessModes": self.access_modes,
                "resources": {
                    "requests": { "storage": self.requested_size },
                },
                "dataSource": {
                    "apiGroup": SNAPSHOT_API_GROUP,
                    "kind": SNAPSHOT_KIND,
                    "name": self.source_snapshot_name,
                },
            },
        })
    }
}
