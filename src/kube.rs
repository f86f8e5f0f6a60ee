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

//! Resource naming and ownership labels.
//!
//! Everything here is a pure function of its arguments. Callers that need
//! idempotent output (the volume provisioner in particular) rely on that.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

pub const CONTROLLER_LABEL: &str = "app.kubernetes.io/created-by";
pub const COMPONENT_LABEL: &str = "app.kubernetes.io/component";

/// Value of [`CONTROLLER_LABEL`] on everything this operator creates.
pub const CONTROLLER_NAME: &str = "fullnode-operator";

/// Component kind for resources restored on behalf of a stateful job.
pub const STATEFUL_JOB_COMPONENT: &str = "StatefulJob";

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_VALUE_LEN: usize = 63;

static INVALID_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9.\-]+").expect("name regex is valid"));

fn sanitize(value: &str, max_len: usize) -> String {
    let lowered = value.to_lowercase();
    let replaced = INVALID_NAME_CHARS.replace_all(&lowered, "-");
    let trimmed = replaced.trim_matches(|c: char| !c.is_ascii_alphanumeric());
    // Only ASCII survives the regex, so byte truncation is char-safe.
    let truncated = &trimmed[..trimmed.len().min(max_len)];
    truncated
        .trim_end_matches(|c: char| !c.is_ascii_alphanumeric())
        .to_string()
}

/// Converts an arbitrary identity into a valid DNS-1123 subdomain name.
pub fn to_name(value: &str) -> String {
    sanitize(value, MAX_NAME_LEN)
}

/// Like [`to_name`], but bounded to the 63 characters allowed in a label value.
pub fn to_label_value(value: &str) -> String {
    sanitize(value, MAX_LABEL_VALUE_LEN)
}

/// Label set that marks a resource as owned by this operator.
pub fn ownership_labels(component: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (CONTROLLER_LABEL.to_string(), CONTROLLER_NAME.to_string()),
        (COMPONENT_LABEL.to_string(), component.to_string()),
    ])
}
