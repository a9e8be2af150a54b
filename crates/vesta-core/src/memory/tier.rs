// Copyright 2025 eraflo
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

//! Coarse classification of the host's physical memory.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One mebibyte, in bytes.
pub const MIB: u64 = 1024 * 1024;

/// Default boundary between the constrained and the standard tier, in MiB.
///
/// Constrained devices report roughly 62-64 MiB of usable RAM and standard
/// ones roughly 120-128 MiB; 80 sits between the two populations with room
/// for firmware overhead on either side.
pub const DEFAULT_LOW_TIER_THRESHOLD_MIB: u64 = 80;

/// The memory class a process runs in. Decided once at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryTier {
    /// Constrained tier (~64 MB class devices).
    Low,
    /// Standard tier (~128 MB class devices and anything larger).
    High,
}

impl MemoryTier {
    /// Classifies a reported total physical memory size.
    ///
    /// Anything strictly below `threshold_bytes` is [`MemoryTier::Low`]; a
    /// value exactly on the threshold lands on [`MemoryTier::High`].
    pub fn classify(total_bytes: u64, threshold_bytes: u64) -> Self {
        if total_bytes < threshold_bytes {
            MemoryTier::Low
        } else {
            MemoryTier::High
        }
    }

    /// Returns `true` for the constrained tier.
    pub fn is_constrained(self) -> bool {
        matches!(self, MemoryTier::Low)
    }

    /// A short human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            MemoryTier::Low => "constrained",
            MemoryTier::High => "standard",
        }
    }
}

impl fmt::Display for MemoryTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
