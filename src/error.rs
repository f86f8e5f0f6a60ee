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

//! Unified error types for the fullnode-operator library.
//!
//! Every fallible operation in the crate returns [`Result`]. None of these
//! errors is fatal to the process: health probe failures are folded into a
//! [`crate::health::HealthCheckResult`], and snapshot readiness failures are
//! handed back to the orchestrator so it can re-check on its next cycle.
//!
//! # Example
//!
//! ```rust
//! use fullnode_operator::Error;
//!
//! let err = Error::SnapshotNotReady { snapshot: "snap-1".to_string() };
//! assert!(err.is_not_ready());
//! ```

use std::time::Duration;

use thiserror::Error;

/// The main error type for fullnode-operator operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The remote node answered, but not with a usable status.
    ///
    /// Covers non-2xx HTTP responses and bodies that do not decode into
    /// a CometBFT status document.
    #[error("{0}")]
    Rpc(String),

    /// Transport-level failure talking to the remote node.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The probe deadline elapsed before the remote node answered.
    #[error("status query timed out after {0:?}")]
    Timeout(Duration),

    /// The caller's scope was cancelled before the probe completed.
    #[error("status query cancelled")]
    Cancelled,

    /// The snapshot has no computed restore size yet.
    ///
    /// This is the signal for the orchestrator to defer a restore and look
    /// again later; it is not a failure of the snapshot itself.
    #[error("snapshot {snapshot:?} is not ready: missing restore size")]
    SnapshotNotReady { snapshot: String },

    /// A resource quantity string could not be parsed.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// A node address could not be turned into a status URL.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A JSON document could not be read or written.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True when the error only means "try again later".
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::SnapshotNotReady { .. })
    }
}

/// A specialized Result type for fullnode-operator operations.
pub type Result<T> = std::result::Result<T, Error>;
