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

use serde::{Deserialize, Serialize};

/// The `result` object of a CometBFT `/status` response.
///
/// Only the fields the operator looks at are modelled; everything else in
/// the document is ignored on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CometStatus {
    #[serde(default)]
    pub node_info: NodeInfo,
    #[serde(default)]
    pub sync_info: SyncInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub moniker: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncInfo {
    /// CometBFT encodes heights as decimal strings.
    #[serde(default)]
    pub latest_block_height: String,
    #[serde(default)]
    pub catching_up: bool,
}

impl CometStatus {
    /// True while the node has not yet reached the chain head.
    pub fn catching_up(&self) -> bool {
        self.sync_info.catching_up
    }

    pub fn latest_block_height(&self) -> Option<u64> {
        self.sync_info.latest_block_height.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_status_result() {
        let body = r#"{
            "node_info": {"network": "cosmoshub-4", "moniker": "node-a", "version": "0.37.2"},
            "sync_info": {"latest_block_height": "18123456", "catching_up": true},
            "validator_info": {"voting_power": "0"}
        }"#;
        let status: CometStatus = serde_json::from_str(body).unwrap();
        assert!(status.catching_up());
        assert_eq!(status.latest_block_height(), Some(18_123_456));
        assert_eq!(status.node_info.network, "cosmoshub-4");
        assert_eq!(status.node_info.moniker, "node-a");
    }

    #[test]
    fn test_missing_fields_default() {
        let status: CometStatus = serde_json::from_str("{}").unwrap();
        assert!(!status.catching_up());
        assert_eq!(status.latest_block_height(), None);
    }
}
