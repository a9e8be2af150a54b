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

//! Pure, tier-dependent sizing and retention rules.
//!
//! Every function here is a deterministic function of its arguments and the
//! [`RenderMemoryProfile`]; none of them touch shared state, so they can be
//! called from any number of texture-processing threads at once.

use crate::memory::profile::RenderMemoryProfile;
use crate::renderer::texture::{PixelImage, TextureFlags};

/// The largest edge a texture may have once the tier cap is applied.
///
/// `base` is the device cap for the texture's target; `ui_texture` marks
/// textures without a mip chain (UI and HUD art).
pub fn effective_max_dimension(base: u32, ui_texture: bool, profile: &RenderMemoryProfile) -> u32 {
    match profile.texture_size_cap(ui_texture) {
        Some(cap) => base.min(cap),
        None => base,
    }
}

/// The number of mip levels of a `width` x `height` texture, capped at `ceiling`.
///
/// Level `n` measures `max(1, width >> n)` by `max(1, height >> n)`; the
/// natural count stops at the first level where both edges reach 1. A
/// ceiling below the natural count truncates the chain before 1x1.
pub fn mip_level_count(width: u32, height: u32, ceiling: u32) -> u32 {
    let ceiling = ceiling.max(1);
    let (mut w, mut h) = (width.max(1), height.max(1));
    let mut levels = 1;
    while (w > 1 || h > 1) && levels < ceiling {
        w = (w >> 1).max(1);
        h = (h >> 1).max(1);
        levels += 1;
    }
    levels
}

/// Whether a texture with `flags` keeps a copy of its source pixels.
///
/// Retention is only considered before the first upload and when the texture
/// asks for it, and the profile must allow it.
pub fn should_retain_original(flags: TextureFlags, profile: &RenderMemoryProfile) -> bool {
    !flags.contains(TextureFlags::IMG_UPLOADED)
        && flags.contains(TextureFlags::KEEP_SOURCE)
        && profile.retains_original_pixel_data()
}

/// The retained copy of `image` for a texture with `flags`, if any.
///
/// The copy owns its own buffer; later edits to `image` do not reach it.
pub fn retain_original(
    image: &PixelImage,
    flags: TextureFlags,
    profile: &RenderMemoryProfile,
) -> Option<PixelImage> {
    should_retain_original(flags, profile).then(|| image.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constrained_tier_caps_world_and_ui_textures() {
        let low = RenderMemoryProfile::constrained();
        assert_eq!(effective_max_dimension(2048, false, &low), 256);
        assert_eq!(effective_max_dimension(2048, true, &low), 512);
        assert_eq!(effective_max_dimension(128, false, &low), 128);
        assert_eq!(effective_max_dimension(300, true, &low), 300);
    }

    #[test]
    fn standard_tier_keeps_base_cap() {
        let high = RenderMemoryProfile::standard();
        assert_eq!(effective_max_dimension(2048, false, &high), 2048);
        assert_eq!(effective_max_dimension(2048, true, &high), 2048);
    }

    #[test]
    fn mip_chain_lengths() {
        assert_eq!(mip_level_count(256, 256, 16), 9);
        assert_eq!(mip_level_count(256, 256, 4), 4);
        assert_eq!(mip_level_count(1, 1, 16), 1);
        assert_eq!(mip_level_count(1, 1, 4), 1);
        assert_eq!(mip_level_count(4, 1, 16), 3);
        assert_eq!(mip_level_count(1, 8, 16), 4);
        assert_eq!(mip_level_count(2, 2, 4), 2);
    }

    #[test]
    fn mip_chain_respects_standard_ceiling() {
        assert_eq!(mip_level_count(1 << 20, 1, 16), 16);
        assert_eq!(mip_level_count(u32::MAX, u32::MAX, 16), 16);
        assert_eq!(mip_level_count(64, 64, 0), 1);
    }

    #[test]
    fn retention_follows_flags_and_tier() {
        let high = RenderMemoryProfile::standard();
        let low = RenderMemoryProfile::constrained();
        let keep = TextureFlags::KEEP_SOURCE;

        assert!(should_retain_original(keep, &high));
        assert!(!should_retain_original(keep, &low));
        assert!(!should_retain_original(TextureFlags::EMPTY, &high));
        assert!(!should_retain_original(
            keep | TextureFlags::IMG_UPLOADED,
            &high
        ));
    }

    #[test]
    fn retained_copy_is_independent() {
        let high = RenderMemoryProfile::standard();
        let mut working = PixelImage::rgba8(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();

        let retained = retain_original(&working, TextureFlags::KEEP_SOURCE, &high).unwrap();
        assert_eq!(retained, working);

        working.pixels_mut()[0] = 255;
        assert_eq!(retained.pixels()[0], 1);

        let low = RenderMemoryProfile::constrained();
        assert!(retain_original(&working, TextureFlags::KEEP_SOURCE, &low).is_none());
    }
}
