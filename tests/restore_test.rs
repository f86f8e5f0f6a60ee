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

//! Integration tests for snapshot-sourced volume claims.

use std::io::Write;

use tempfile::NamedTempFile;

use fullnode_operator::prelude::*;
use fullnode_operator::provision::manifests_from_files;

fn json_file(value: serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{value}").unwrap();
    file
}

fn fast_job() -> VolumeJobSpec {
    VolumeJobSpec {
        owner_name: "node-a".to_string(),
        namespace: "fleet".to_string(),
        storage_class_name: "fast".to_string(),
        access_modes: vec![AccessMode::ReadWriteOncePod],
    }
}

#[test]
fn test_ready_snapshot_yields_one_claim() {
    let snapshot = SnapshotDescriptor::new("snap-1").with_restore_size("10Gi".parse().unwrap());

    let claims = build_volume_claims(&fast_job(), &snapshot).unwrap();

    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].requested_size, Quantity::from_bytes(10 << 30));
    assert_eq!(claims[0].source_snapshot_name, "snap-1");
    assert_eq!(claims[0].storage_class_name, "fast");
    assert_eq!(claims[0].namespace, "fleet");
}

#[test]
fn test_requested_size_matches_restore_size_exactly() {
    for bytes in [1, 4096, 1_000_000_007, 3 << 40] {
        let snapshot = SnapshotDescriptor::new("snap").with_restore_size(Quantity::from_bytes(bytes));
        let claims = build_volume_claims(&fast_job(), &snapshot).unwrap();
        assert_eq!(claims[0].requested_size.bytes(), bytes);
    }
}

#[test]
fn test_unready_snapshot_yields_nothing() {
    let snapshot: SnapshotDescriptor =
        serde_json::from_value(serde_json::json!({"metadata": {"name": "snap-2"}})).unwrap();
    let err = build_volume_claims(&fast_job(), &snapshot).unwrap_err();
    assert!(matches!(err, Error::SnapshotNotReady { ref snapshot } if snapshot == "snap-2"));

    let snapshot: SnapshotDescriptor = serde_json::from_value(serde_json::json!({
        "metadata": {"name": "snap-2"},
        "status": {"readyToUse": false}
    }))
    .unwrap();
    assert!(build_volume_claims(&fast_job(), &snapshot).is_err());
}

#[tokio::test]
async fn test_manifests_from_files() {
    let job = json_file(serde_json::json!({
        "ownerName": "Osmosis Archive",
        "namespace": "fleet",
        "storageClassName": "premium-rwo",
        "accessModes": ["ReadWriteOnce"]
    }));
    let snapshot = json_file(serde_json::json!({
        "apiVersion": "snapshot.storage.k8s.io/v1",
        "kind": "VolumeSnapshot",
        "metadata": {"name": "osmosis-20261014"},
        "status": {"readyToUse": true, "restoreSize": 536870912000u64}
    }));

    let manifests = manifests_from_files(job.path(), snapshot.path()).await.unwrap();

    assert_eq!(manifests.len(), 1);
    let pvc = &manifests[0];
    assert_eq!(pvc["metadata"]["name"], "osmosis-archive");
    assert_eq!(pvc["metadata"]["namespace"], "fleet");
    assert_eq!(pvc["spec"]["resources"]["requests"]["storage"], "500Gi");
    assert_eq!(pvc["spec"]["dataSource"]["name"], "osmosis-20261014");
    assert_eq!(pvc["spec"]["storageClassName"], "premium-rwo");
}

#[tokio::test]
async fn test_manifests_from_files_not_ready() {
    let job = json_file(serde_json::to_value(fast_job()).unwrap());
    let snapshot = json_file(serde_json::json!({"metadata": {"name": "pending"}, "status": {}}));

    let err = manifests_from_files(job.path(), snapshot.path()).await.unwrap_err();
    assert!(err.is_not_ready());
}

#[tokio::test]
async fn test_manifests_from_files_bad_json() {
    let job = json_file(serde_json::json!({"ownerName": 7}));
    let snapshot = json_file(serde_json::json!({}));

    let err = manifests_from_files(job.path(), snapshot.path()).await.unwrap_err();
    assert!(matches!(err, Error::Json(_)));
    assert!(!err.is_not_ready());
}
