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

//! sysinfo-based implementation of the PhysicalMemoryProbe trait.

use sysinfo::System;
use vesta_core::memory::PhysicalMemoryProbe;

/// A physical memory probe backed by the `sysinfo` crate.
#[derive(Debug, Clone, Copy)]
pub struct SysinfoMemoryProbe {
    respect_cgroup_limits: bool,
}

impl SysinfoMemoryProbe {
    /// Creates a probe that reports the smaller of the machine's RAM and the
    /// process's cgroup memory limit, when one is set.
    pub fn new() -> Self {
        Self {
            respect_cgroup_limits: true,
        }
    }

    /// Creates a probe that ignores cgroup limits and reports machine RAM.
    pub fn machine_only() -> Self {
        Self {
            respect_cgroup_limits: false,
        }
    }
}

impl PhysicalMemoryProbe for SysinfoMemoryProbe {
    fn total_physical_bytes(&self) -> Option<u64> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            log::debug!("sysinfo does not support this host, physical memory unknown");
            return None;
        }

        let mut system = System::new();
        system.refresh_memory();

        let machine = system.total_memory();
        if machine == 0 {
            return None;
        }

        let limited = if self.respect_cgroup_limits {
            system
                .cgroup_limits()
                .map(|limits| limits.total_memory)
                .filter(|&limit| limit > 0 && limit < machine)
        } else {
            None
        };

        match limited {
            Some(limit) => {
                log::debug!("Physical memory {machine} bytes, cgroup limit {limit} bytes");
                Some(limit)
            }
            None => Some(machine),
        }
    }
}

impl Default for SysinfoMemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}
