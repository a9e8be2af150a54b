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

//! Provides traits and data structures for active resource monitoring.
//!
//! A monitor polls one resource (here, memory held by textures) and reports a
//! snapshot in a shape every consumer understands, independent of how the
//! numbers were collected.

use std::borrow::Cow;
use std::fmt::Debug;

/// The core trait for a resource monitor.
///
/// Implementations live in `vesta-infra`.
pub trait ResourceMonitor: Send + Sync + Debug + 'static {
    /// Returns a unique, human-readable identifier for this monitor instance.
    fn monitor_id(&self) -> Cow<'static, str>;

    /// Returns the general type of resource being monitored.
    fn resource_type(&self) -> MonitoredResourceType;

    /// Returns a snapshot of the current usage data for the monitored resource.
    fn get_usage_report(&self) -> ResourceUsageReport;

    /// Allows downcasting to a concrete `ResourceMonitor` type.
    fn as_any(&self) -> &dyn std::any::Any;

    /// Triggers the monitor to refresh its internal state.
    /// Monitors that read live counters keep the default no-op.
    fn update(&self) {}
}

/// An enumeration of the types of resources that can be monitored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitoredResourceType {
    /// Memory held by textures, retained source copies included.
    TextureMemory,
}

/// A generic, unified report of resource usage, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceUsageReport {
    /// The number of bytes currently in use.
    pub current_bytes: u64,
    /// The peak number of bytes ever in use simultaneously, if tracked.
    pub peak_bytes: Option<u64>,
    /// The total capacity of the resource in bytes, if known.
    pub total_capacity_bytes: Option<u64>,
}

impl ResourceUsageReport {
    /// Fraction of the capacity in use, when the capacity is known and non-zero.
    pub fn utilization(&self) -> Option<f64> {
        match self.total_capacity_bytes {
            Some(capacity) if capacity > 0 => Some(self.current_bytes as f64 / capacity as f64),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn utilization_needs_a_capacity() {
        let report = ResourceUsageReport {
            current_bytes: 16,
            peak_bytes: None,
            total_capacity_bytes: Some(64),
        };
        assert_relative_eq!(report.utilization().unwrap(), 0.25);
        assert!(ResourceUsageReport::default().utilization().is_none());
    }
}
