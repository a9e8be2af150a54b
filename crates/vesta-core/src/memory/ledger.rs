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

//! Thread-safe accounting of texture memory.
//!
//! The ledger is a set of atomic counters shared between the texture
//! registry, which writes them, and any number of readers such as the
//! texture memory monitor. It is owned, not global: each renderer context
//! creates its own and hands out `Arc` clones.

use crate::renderer::budget::TextureMemoryEstimate;
use std::sync::atomic::{AtomicU64, Ordering};

/// Running totals of texture memory.
#[derive(Debug, Default)]
pub struct TextureMemoryLedger {
    resident_bytes: AtomicU64,
    peak_resident_bytes: AtomicU64,
    retained_bytes: AtomicU64,
    live_textures: AtomicU64,
    released_textures: AtomicU64,
}

/// A point-in-time copy of a [`TextureMemoryLedger`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextureMemorySnapshot {
    /// Bytes currently accounted to textures, retained copies included.
    pub resident_bytes: u64,
    /// Highest value `resident_bytes` ever reached.
    pub peak_resident_bytes: u64,
    /// Portion of `resident_bytes` held by retained source pixels.
    pub retained_bytes: u64,
    /// Number of textures currently accounted.
    pub live_textures: u64,
    /// Number of textures released since the ledger was created.
    pub released_textures: u64,
}

impl TextureMemorySnapshot {
    /// Resident texture memory in megabytes (MB).
    pub fn resident_mb(&self) -> f64 {
        self.resident_bytes as f64 / (1024.0 * 1024.0)
    }
}

impl TextureMemoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts a newly created texture.
    pub fn record_texture(&self) {
        self.live_textures.fetch_add(1, Ordering::Relaxed);
    }

    /// Accounts the memory of a processed texture.
    pub fn record_upload(&self, estimate: &TextureMemoryEstimate) {
        let total = estimate.total_bytes();
        let resident = self.resident_bytes.fetch_add(total, Ordering::Relaxed) + total;
        self.peak_resident_bytes
            .fetch_max(resident, Ordering::Relaxed);
        self.retained_bytes
            .fetch_add(estimate.retained_bytes, Ordering::Relaxed);
    }

    /// Swaps the memory recorded for a texture that was processed again.
    pub fn record_replace(
        &self,
        previous: &TextureMemoryEstimate,
        current: &TextureMemoryEstimate,
    ) {
        saturating_sub(&self.resident_bytes, previous.total_bytes());
        saturating_sub(&self.retained_bytes, previous.retained_bytes);
        self.record_upload(current);
    }

    /// Removes a texture and the memory previously recorded for it.
    pub fn record_release(&self, estimate: &TextureMemoryEstimate) {
        saturating_sub(&self.resident_bytes, estimate.total_bytes());
        saturating_sub(&self.retained_bytes, estimate.retained_bytes);
        saturating_sub(&self.live_textures, 1);
        self.released_textures.fetch_add(1, Ordering::Relaxed);
    }

    /// Resident bytes right now.
    pub fn resident_bytes(&self) -> u64 {
        self.resident_bytes.load(Ordering::Relaxed)
    }

    /// Reads every counter.
    pub fn snapshot(&self) -> TextureMemorySnapshot {
        TextureMemorySnapshot {
            resident_bytes: self.resident_bytes.load(Ordering::Relaxed),
            peak_resident_bytes: self.peak_resident_bytes.load(Ordering::Relaxed),
            retained_bytes: self.retained_bytes.load(Ordering::Relaxed),
            live_textures: self.live_textures.load(Ordering::Relaxed),
            released_textures: self.released_textures.load(Ordering::Relaxed),
        }
    }
}

fn saturating_sub(counter: &AtomicU64, amount: u64) {
    // The closure never returns `None`, so the update cannot fail.
    let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |value| {
        Some(value.saturating_sub(amount))
    });
}
