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

//! The immutable render memory profile handed to the texture and lightmap code.
//!
//! A [`RenderMemoryProfile`] is built exactly once at start-up, either from
//! [`RenderMemoryProfile::detect`] or from an explicit tier, and is then
//! shared read-only (typically behind an `Arc`). Every tier-dependent
//! decision in the renderer reads it instead of a process-wide flag, so code
//! that needs a tier cannot run before one has been chosen.

use crate::config::MemoryPolicyConfig;
use crate::memory::detection::{detect_memory_tier, DetectionSource, TierDetection};
use crate::memory::probe::PhysicalMemoryProbe;
use crate::memory::tier::MemoryTier;
use crate::renderer::lightmap::optimal_lightmap_block_size;
use serde::Serialize;

/// Largest edge of a world or model texture on the constrained tier.
pub const LOW_TIER_WORLD_TEXTURE_CAP: u32 = 256;
/// Largest edge of a UI texture on the constrained tier.
pub const LOW_TIER_UI_TEXTURE_CAP: u32 = 512;
/// Mip level ceiling on the constrained tier.
pub const LOW_TIER_MIP_CEILING: u32 = 4;
/// Mip level ceiling on the standard tier.
pub const STANDARD_MIP_CEILING: u32 = 16;
/// Texture table capacity on the constrained tier.
pub const LOW_TIER_MAX_TEXTURES: usize = 2048;
/// Texture table capacity on the standard tier.
pub const STANDARD_MAX_TEXTURES: usize = 4096;

/// Tier-derived limits for texture and lightmap setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderMemoryProfile {
    tier: MemoryTier,
    reported_memory_bytes: Option<u64>,
    world_texture_cap: Option<u32>,
    ui_texture_cap: Option<u32>,
    mip_level_ceiling: u32,
    retains_original_pixel_data: bool,
    lightmap_block_size: u32,
    max_textures: usize,
    evicts_unused_textures: bool,
    unused_texture_frames: u64,
}

impl RenderMemoryProfile {
    /// Runs tier detection against `probe` and derives the profile.
    pub fn detect(probe: &dyn PhysicalMemoryProbe, config: &MemoryPolicyConfig) -> Self {
        Self::from_detection(detect_memory_tier(probe, config), config)
    }

    /// Derives the profile from an already performed detection.
    pub fn from_detection(detection: TierDetection, config: &MemoryPolicyConfig) -> Self {
        let mut profile = Self::for_tier(detection.tier, config);
        if detection.source == DetectionSource::Probe {
            profile.reported_memory_bytes = detection.reported_bytes;
        }
        profile
    }

    /// Builds the profile of `tier` without querying the host.
    pub fn for_tier(tier: MemoryTier, config: &MemoryPolicyConfig) -> Self {
        match tier {
            MemoryTier::Low => Self {
                tier,
                reported_memory_bytes: None,
                world_texture_cap: Some(LOW_TIER_WORLD_TEXTURE_CAP),
                ui_texture_cap: Some(if config.reduce_ui_textures {
                    LOW_TIER_WORLD_TEXTURE_CAP
                } else {
                    LOW_TIER_UI_TEXTURE_CAP
                }),
                mip_level_ceiling: LOW_TIER_MIP_CEILING,
                retains_original_pixel_data: false,
                lightmap_block_size: optimal_lightmap_block_size(tier),
                max_textures: LOW_TIER_MAX_TEXTURES,
                evicts_unused_textures: true,
                unused_texture_frames: config.unused_texture_frames,
            },
            MemoryTier::High => Self {
                tier,
                reported_memory_bytes: None,
                world_texture_cap: None,
                ui_texture_cap: None,
                mip_level_ceiling: STANDARD_MIP_CEILING,
                retains_original_pixel_data: true,
                lightmap_block_size: optimal_lightmap_block_size(tier),
                max_textures: STANDARD_MAX_TEXTURES,
                evicts_unused_textures: false,
                unused_texture_frames: config.unused_texture_frames,
            },
        }
    }

    /// The standard-tier profile with default settings.
    pub fn standard() -> Self {
        Self::for_tier(MemoryTier::High, &MemoryPolicyConfig::default())
    }

    /// The constrained-tier profile with default settings.
    pub fn constrained() -> Self {
        Self::for_tier(MemoryTier::Low, &MemoryPolicyConfig::default())
    }

    /// The tier this profile was built for.
    pub fn tier(&self) -> MemoryTier {
        self.tier
    }

    /// Returns `true` when running on the constrained tier.
    pub fn is_constrained_tier(&self) -> bool {
        self.tier.is_constrained()
    }

    /// The physical memory reported by the host at detection, if it was probed.
    pub fn reported_memory_bytes(&self) -> Option<u64> {
        self.reported_memory_bytes
    }

    /// The tier cap on a texture edge, or `None` when the tier adds no cap.
    pub fn texture_size_cap(&self, ui_texture: bool) -> Option<u32> {
        if ui_texture {
            self.ui_texture_cap
        } else {
            self.world_texture_cap
        }
    }

    /// The maximum number of mip levels a texture may have.
    pub fn mip_level_ceiling(&self) -> u32 {
        self.mip_level_ceiling
    }

    /// Whether textures flagged to keep their source pixels actually keep them.
    ///
    /// When this is `false`, every feature reading retained source pixels
    /// (re-export, reprocessing) is unavailable.
    pub fn retains_original_pixel_data(&self) -> bool {
        self.retains_original_pixel_data
    }

    /// Edge length of every lightmap page for the life of the process.
    pub fn lightmap_block_size(&self) -> u32 {
        self.lightmap_block_size
    }

    /// Capacity of the texture table.
    pub fn max_textures(&self) -> usize {
        self.max_textures
    }

    /// Whether idle textures are flushed.
    pub fn evicts_unused_textures(&self) -> bool {
        self.evicts_unused_textures
    }

    /// Idle frames after which a texture may be flushed.
    pub fn unused_texture_frames(&self) -> u64 {
        self.unused_texture_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::probe::FixedMemoryProbe;
    use std::sync::Arc;

    #[test]
    fn constrained_profile_limits() {
        let profile = RenderMemoryProfile::constrained();
        assert!(profile.is_constrained_tier());
        assert_eq!(profile.texture_size_cap(false), Some(256));
        assert_eq!(profile.texture_size_cap(true), Some(512));
        assert_eq!(profile.mip_level_ceiling(), 4);
        assert!(!profile.retains_original_pixel_data());
        assert_eq!(profile.lightmap_block_size(), 64);
        assert_eq!(profile.max_textures(), 2048);
        assert!(profile.evicts_unused_textures());
    }

    #[test]
    fn standard_profile_limits() {
        let profile = RenderMemoryProfile::standard();
        assert!(!profile.is_constrained_tier());
        assert_eq!(profile.texture_size_cap(false), None);
        assert_eq!(profile.texture_size_cap(true), None);
        assert_eq!(profile.mip_level_ceiling(), 16);
        assert!(profile.retains_original_pixel_data());
        assert_eq!(profile.lightmap_block_size(), 128);
        assert_eq!(profile.max_textures(), 4096);
        assert!(!profile.evicts_unused_textures());
    }

    #[test]
    fn reduced_ui_textures_share_the_world_cap() {
        let config = MemoryPolicyConfig {
            reduce_ui_textures: true,
            ..Default::default()
        };
        let profile = RenderMemoryProfile::for_tier(MemoryTier::Low, &config);
        assert_eq!(profile.texture_size_cap(true), Some(256));

        let standard = RenderMemoryProfile::for_tier(MemoryTier::High, &config);
        assert_eq!(standard.texture_size_cap(true), None);
    }

    #[test]
    fn detect_records_reported_memory() {
        let profile = RenderMemoryProfile::detect(
            &FixedMemoryProbe::from_mib(64),
            &MemoryPolicyConfig::default(),
        );
        assert_eq!(profile.tier(), MemoryTier::Low);
        assert_eq!(profile.reported_memory_bytes(), Some(64 * 1024 * 1024));
    }

    #[test]
    fn accessor_is_stable_under_concurrent_reads() {
        let profile = Arc::new(RenderMemoryProfile::detect(
            &FixedMemoryProbe::from_mib(64),
            &MemoryPolicyConfig::default(),
        ));

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let profile = Arc::clone(&profile);
                scope.spawn(move || {
                    for _ in 0..1_000 {
                        assert!(profile.is_constrained_tier());
                        assert_eq!(profile.lightmap_block_size(), 64);
                    }
                });
            }
        });
    }
}
