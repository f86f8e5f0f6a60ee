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

//! Disk usage reader trait and implementations.
//!
//! This module provides the [`DiskUsageReader`] trait and a
//! [`LocalDiskReader`] implementation using `sysinfo::Disks`.

use std::io;
use std::path::Path;

use sysinfo::Disks;

use crate::error::Result;
use crate::storage::info::{usage_for, DiskUsage, MountInfo};

/// Trait for reading the capacity of the disk behind a directory.
///
/// Implementations must be thread-safe (`Send + Sync`) so one reader can be
/// shared by every request handler.
pub trait DiskUsageReader: Send + Sync {
    fn disk_usage(&self, dir: &Path) -> Result<DiskUsage>;
}

/// Reads mounted filesystems from the local system via `sysinfo`.
#[derive(Debug, Default)]
pub struct LocalDiskReader;

impl LocalDiskReader {
    pub fn new() -> Self {
        Self
    }
}

impl DiskUsageReader for LocalDiskReader {
    fn disk_usage(&self, dir: &Path) -> Result<DiskUsage> {
        let disks = Disks::new_with_refreshed_list();
        let mounts: Vec<MountInfo> = disks
            .iter()
            .map(|disk| MountInfo {
                mount_point: disk.mount_point().to_path_buf(),
                total_bytes: disk.total_space(),
                available_bytes: disk.available_space(),
            })
            .collect();

        // Resolve symlinks so the prefix match sees the real mount path.
        let resolved = std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
        let mut usage = usage_for(&resolved, &mounts).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no mounted filesystem contains {}", dir.display()),
            )
        })?;
        usage.dir = dir.to_string_lossy().to_string();

        tracing::debug!(
            dir = %usage.dir,
            all_bytes = usage.all_bytes,
            free_bytes = usage.free_bytes,
            "read disk usage"
        );
        Ok(usage)
    }
}
