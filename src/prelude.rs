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

//! The fullnode-operator prelude.
//!
//! ```rust
//! use fullnode_operator::prelude::*;
//! ```
//!
//! # Example
//!
//! ```rust
//! use fullnode_operator::prelude::*;
//!
//! let job = VolumeJobSpec {
//!     owner_name: "osmosis-archive".to_string(),
//!     namespace: "fleet".to_string(),
//!     storage_class_name: "fast".to_string(),
//!     access_modes: vec![AccessMode::ReadWriteOncePod],
//! };
//! let snapshot = SnapshotDescriptor::new("snap-1")
//!     .with_restore_size("10Gi".parse().unwrap());
//!
//! let claims = build_volume_claims(&job, &snapshot).unwrap();
//! assert_eq!(claims[0].requested_size.to_string(), "10Gi");
//! ```

// Health probing
pub use crate::health::{
    check, CometStatus, FnStatus, HealthCheckResult, HealthChecker, HealthStatus, StatusClient,
};
pub use crate::network::CometClient;

// Volume provisioning
pub use crate::provision::{
    build_volume_claims, AccessMode, SnapshotDescriptor, VolumeClaimRequest, VolumeJobSpec,
};
pub use crate::utils::quantity::Quantity;

// Error types
pub use crate::error::{Error, Result};

pub use tokio_util::sync::CancellationToken;
