use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Capacity of the disk backing a node's data directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DiskUsage {
    pub dir: String,
    pub all_bytes: u64,
    pub free_bytes: u64,
}

/// One mounted filesystem, as seen by a disk reader.
#[derive(Debug, Clone)]
pub struct MountInfo {
    pub mount_point: PathBuf,
    pub total_bytes: u64,
    pub available_bytes: u64,
}

/// Picks the mount that `dir` lives on: the one with the longest mount point
/// that is a path prefix of `dir`.
pub fn usage_for(dir: &Path, mounts: &[MountInfo]) -> Option<DiskUsage> {
    mounts
        .iter()
        .filter(|m| dir.starts_with(&m.mount_point))
        .max_by_key(|m| m.mount_point.components().count())
        .map(|m| DiskUsage {
            dir: dir.to_string_lossy().to_string(),
            all_bytes: m.total_bytes,
            free_bytes: m.available_bytes,
        })
}
