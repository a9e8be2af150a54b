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

//! Texture Memory Resource Monitor
//!
//! Reports the memory held by textures, as accounted in a shared
//! [`TextureMemoryLedger`], through the ResourceMonitor interface.

use std::borrow::Cow;
use std::sync::{Arc, Mutex};

use vesta_core::memory::{TextureMemoryLedger, TextureMemorySnapshot};
use vesta_core::telemetry::{MonitoredResourceType, ResourceMonitor, ResourceUsageReport};

/// Texture memory resource monitor.
///
/// Reads live counters on every report; `update` additionally stores a
/// snapshot for consumers that want the last sampled state.
#[derive(Debug)]
pub struct TextureMemoryMonitor {
    id: String,
    ledger: Arc<TextureMemoryLedger>,
    capacity_bytes: Option<u64>,
    last_snapshot: Mutex<Option<TextureMemorySnapshot>>,
    sample_count: Mutex<u64>,
}

impl TextureMemoryMonitor {
    /// Creates a monitor over `ledger`. `capacity_bytes` is the host's
    /// physical memory, when known.
    pub fn new(id: String, ledger: Arc<TextureMemoryLedger>, capacity_bytes: Option<u64>) -> Self {
        Self {
            id,
            ledger,
            capacity_bytes,
            last_snapshot: Mutex::new(None),
            sample_count: Mutex::new(0),
        }
    }

    /// Returns the snapshot taken by the last `update`.
    pub fn last_snapshot(&self) -> Option<TextureMemorySnapshot> {
        self.last_snapshot.lock().ok().and_then(|guard| *guard)
    }

    /// Returns how many times `update` has sampled the ledger.
    pub fn sample_count(&self) -> u64 {
        self.sample_count.lock().map(|count| *count).unwrap_or(0)
    }
}

impl ResourceMonitor for TextureMemoryMonitor {
    fn monitor_id(&self) -> Cow<'static, str> {
        Cow::Owned(self.id.clone())
    }

    fn resource_type(&self) -> MonitoredResourceType {
        MonitoredResourceType::TextureMemory
    }

    fn get_usage_report(&self) -> ResourceUsageReport {
        let snapshot = self.ledger.snapshot();
        ResourceUsageReport {
            current_bytes: snapshot.resident_bytes,
            peak_bytes: Some(snapshot.peak_resident_bytes),
            total_capacity_bytes: self.capacity_bytes,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn update(&self) {
        let snapshot = self.ledger.snapshot();
        if let Ok(mut last) = self.last_snapshot.lock() {
            *last = Some(snapshot);
        }
        if let Ok(mut count) = self.sample_count.lock() {
            *count += 1;
        }
        log::trace!(
            "Texture memory: {:.2} MB resident across {} textures",
            snapshot.resident_mb(),
            snapshot.live_textures
        );
    }
}
