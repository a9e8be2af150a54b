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

//! Start-up of the render memory policy.
//!
//! [`bootstrap`] is the single place where the memory tier is detected. It
//! must run during renderer initialisation, before any texture or lightmap
//! is created; everything it returns shares the same profile.

use std::sync::Arc;
use vesta_core::config::MemoryPolicyConfig;
use vesta_core::memory::{PhysicalMemoryProbe, RenderMemoryProfile, TextureMemoryLedger};
use vesta_core::renderer::DeviceTextureLimits;
use vesta_infra::{SysinfoMemoryProbe, TextureMemoryMonitor};
use vesta_lanes::{LightmapPagePool, TextureRegistry, TextureSetupLane};

/// Identifier of the texture memory monitor created by [`bootstrap`].
pub const TEXTURE_MONITOR_ID: &str = "RenderTextures";

/// The memory-policy side of an initialised renderer.
#[derive(Debug)]
pub struct RenderMemoryContext {
    /// The profile every component below was built from.
    pub profile: Arc<RenderMemoryProfile>,
    /// Sizes and processes textures.
    pub texture_lane: TextureSetupLane,
    /// The texture table.
    pub textures: TextureRegistry,
    /// Lightmap pages, at the profile's block size.
    pub lightmaps: LightmapPagePool,
    /// Reports texture memory.
    pub texture_monitor: Arc<TextureMemoryMonitor>,
}

/// Detects the memory tier through `probe` and builds the renderer context.
pub fn bootstrap(
    config: &MemoryPolicyConfig,
    probe: &dyn PhysicalMemoryProbe,
    limits: DeviceTextureLimits,
) -> RenderMemoryContext {
    let profile = Arc::new(RenderMemoryProfile::detect(probe, config));
    let ledger = Arc::new(TextureMemoryLedger::new());

    let context = RenderMemoryContext {
        texture_lane: TextureSetupLane::new(Arc::clone(&profile), limits),
        textures: TextureRegistry::new(Arc::clone(&profile), Arc::clone(&ledger)),
        lightmaps: LightmapPagePool::new(&profile),
        texture_monitor: Arc::new(TextureMemoryMonitor::new(
            TEXTURE_MONITOR_ID.to_string(),
            ledger,
            profile.reported_memory_bytes(),
        )),
        profile,
    };

    if !context.profile.retains_original_pixel_data() {
        log::info!("Render memory: source pixel retention disabled, texture re-export unavailable");
    }
    context
}

/// [`bootstrap`] against the host's physical memory.
pub fn bootstrap_host(config: &MemoryPolicyConfig, limits: DeviceTextureLimits) -> RenderMemoryContext {
    bootstrap(config, &SysinfoMemoryProbe::new(), limits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesta_core::config::TieringMode;
    use vesta_core::memory::{FixedMemoryProbe, MemoryTier};

    #[test]
    fn components_share_one_profile() {
        let context = bootstrap(
            &MemoryPolicyConfig::default(),
            &FixedMemoryProbe::from_mib(64),
            DeviceTextureLimits::default(),
        );
        assert_eq!(context.profile.tier(), MemoryTier::Low);
        assert_eq!(context.texture_lane.profile(), context.profile.as_ref());
        assert_eq!(context.textures.capacity(), 2048);
        assert_eq!(context.lightmaps.block_size(), 64);
    }

    #[test]
    fn host_bootstrap_respects_forced_standard_tier() {
        let config = MemoryPolicyConfig {
            tiering: TieringMode::Standard,
            ..Default::default()
        };
        let context = bootstrap_host(&config, DeviceTextureLimits::default());
        assert_eq!(context.profile.tier(), MemoryTier::High);
        assert_eq!(context.lightmaps.block_size(), 128);
    }
}
