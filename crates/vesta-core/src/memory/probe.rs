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

//! The host capability used to size the render memory tier.

use crate::memory::tier::MIB;

/// Reports the total physical memory of the host.
///
/// Concrete implementations live in `vesta-infra`. The probe is queried a
/// single time, during tier detection.
pub trait PhysicalMemoryProbe: Send + Sync {
    /// Total physical memory in bytes, or `None` when the host cannot tell.
    fn total_physical_bytes(&self) -> Option<u64>;
}

/// A probe that reports a fixed value.
///
/// Used to run both tiers inside one binary and to pin the tier in tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedMemoryProbe {
    total_bytes: Option<u64>,
}

impl FixedMemoryProbe {
    /// A probe reporting `total_bytes`.
    pub fn new(total_bytes: u64) -> Self {
        Self {
            total_bytes: Some(total_bytes),
        }
    }

    /// A probe reporting `mib` mebibytes.
    pub fn from_mib(mib: u64) -> Self {
        Self::new(mib.saturating_mul(MIB))
    }

    /// A probe whose host query always fails.
    pub fn unavailable() -> Self {
        Self { total_bytes: None }
    }
}

impl PhysicalMemoryProbe for FixedMemoryProbe {
    fn total_physical_bytes(&self) -> Option<u64> {
        self.total_bytes
    }
}
