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

//! Lightmap page sizing.

use crate::memory::tier::MemoryTier;

/// Historical lightmap block edge, used on the standard tier.
pub const BLOCK_SIZE_DEFAULT: u32 = 128;
/// Largest lightmap block edge the atlas code accepts.
pub const BLOCK_SIZE_MAX: u32 = 1024;
/// Lightmap block edge on the constrained tier.
pub const BLOCK_SIZE_CONSTRAINED: u32 = 64;
/// Maximum number of lightmap pages alive at once.
pub const MAX_LIGHTMAP_PAGES: usize = 256;
/// Bytes per lightmap texel (RGBA8).
pub const LIGHTMAP_BYTES_PER_TEXEL: u64 = 4;

/// The lightmap block edge length for `tier`.
pub fn optimal_lightmap_block_size(tier: MemoryTier) -> u32 {
    match tier {
        MemoryTier::Low => BLOCK_SIZE_CONSTRAINED,
        MemoryTier::High => BLOCK_SIZE_DEFAULT,
    }
}

/// An opaque handle to a lightmap page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightmapPageId(pub usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_size_per_tier() {
        assert_eq!(optimal_lightmap_block_size(MemoryTier::Low), 64);
        assert_eq!(optimal_lightmap_block_size(MemoryTier::High), 128);
        assert!(optimal_lightmap_block_size(MemoryTier::High) <= BLOCK_SIZE_MAX);
    }
}
