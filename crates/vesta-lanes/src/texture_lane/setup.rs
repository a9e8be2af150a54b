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

//! The lane that sizes a texture and prepares its pixels for upload.

use super::error::ImageProcessError;
use super::resample::resample;
use std::sync::Arc;
use vesta_core::memory::RenderMemoryProfile;
use vesta_core::renderer::{
    effective_max_dimension, mip_level_count, retain_original, DeviceTextureLimits, ImageFlags,
    PixelImage, TextureEntry, TextureError, TextureFlags, TextureTarget,
};

/// Applies the render memory profile to textures as they are created.
///
/// The lane is stateless beyond its configuration and can be shared between
/// loader threads.
#[derive(Debug, Clone)]
pub struct TextureSetupLane {
    profile: Arc<RenderMemoryProfile>,
    limits: DeviceTextureLimits,
}

impl TextureSetupLane {
    /// Creates a lane for a device with `limits`.
    pub fn new(profile: Arc<RenderMemoryProfile>, limits: DeviceTextureLimits) -> Self {
        Self { profile, limits }
    }

    /// The profile the lane applies.
    pub fn profile(&self) -> &RenderMemoryProfile {
        &self.profile
    }

    /// The device limits the lane clamps against.
    pub fn limits(&self) -> &DeviceTextureLimits {
        &self.limits
    }

    /// The largest edge `entry` may have on this device and tier.
    pub fn max_dimension(&self, entry: &TextureEntry) -> u32 {
        let base = self.limits.base_caps(entry.target).size;
        effective_max_dimension(base, entry.is_ui_texture(), &self.profile).max(1)
    }

    /// Records the requested size of `entry` and stores its clamped size.
    ///
    /// Oversized textures are halved until they fit: 1D textures along their
    /// width, 3D textures along all three axes, everything else along width
    /// and height together. Array layer counts are clamped, never halved.
    pub fn set_dimensions(&self, entry: &mut TextureEntry, width: u32, height: u32, depth: u32) {
        let max_size = self.max_dimension(entry);
        let max_depth = self.limits.base_caps(entry.target).depth.max(1);

        entry.src_width = width;
        entry.src_height = height;

        let (mut w, mut h, mut d) = (width.max(1), height.max(1), depth.max(1));
        match entry.target {
            TextureTarget::D1 => {
                while w > max_size {
                    w >>= 1;
                }
                h = 1;
                d = 1;
            }
            TextureTarget::D3 => {
                while w > max_size || h > max_size || d > max_depth {
                    w = (w >> 1).max(1);
                    h = (h >> 1).max(1);
                    d = (d >> 1).max(1);
                }
            }
            TextureTarget::D2Array => {
                while w > max_size || h > max_size {
                    w = (w >> 1).max(1);
                    h = (h >> 1).max(1);
                }
                d = d.min(max_depth);
            }
            TextureTarget::D2 | TextureTarget::Rectangle | TextureTarget::Cube => {
                while w > max_size || h > max_size {
                    w = (w >> 1).max(1);
                    h = (h >> 1).max(1);
                }
                // A cube image stores its faces as layers.
                d = if entry.target == TextureTarget::Cube {
                    d.min(entry.target.faces() as u32)
                } else {
                    1
                };
            }
        }

        entry.width = w.max(1);
        entry.height = h.max(1);
        entry.depth = d.max(1);

        if (entry.width, entry.height) != (width.max(1), height.max(1)) {
            log::debug!(
                "Texture '{}' clamped from {}x{} to {}x{} (limit {})",
                entry.name,
                width,
                height,
                entry.width,
                entry.height,
                max_size
            );
        }
    }

    /// The number of mip levels to upload for `entry`.
    ///
    /// A texture gets a single level when no pixel buffer is present, when
    /// its target is volumetric or when it is flagged `NO_MIPMAP`.
    pub fn mipmap_count(&self, entry: &TextureEntry, have_buffer: bool) -> u32 {
        if !have_buffer
            || !entry.target.allows_mipmaps()
            || entry.flags.contains(TextureFlags::NO_MIPMAP)
        {
            return 1;
        }
        mip_level_count(entry.width, entry.height, self.profile.mip_level_ceiling())
    }

    /// Applies the flags an image implies for its texture.
    ///
    /// A compressed image without a mip chain makes the texture `NO_MIPMAP`,
    /// which also selects the UI size cap, so this must run before
    /// [`set_dimensions`](Self::set_dimensions). Compressed sources are never
    /// kept.
    pub fn apply_image_flags(&self, entry: &mut TextureEntry, image: &PixelImage) {
        if image.flags().contains(ImageFlags::HAS_ALPHA) {
            entry.flags.insert(TextureFlags::HAS_ALPHA);
        }
        if image.format().is_compressed() {
            if image.mip_levels() == 0 {
                entry.flags.insert(TextureFlags::NO_MIPMAP);
            }
            entry.flags.remove(TextureFlags::KEEP_SOURCE);
        }
    }

    /// Prepares `image` as the pixel data of `entry` and returns the working
    /// buffer ready for upload.
    ///
    /// `set_dimensions` must have run on `entry` first. On the constrained
    /// tier no source copy is kept even when `KEEP_SOURCE` is set. On error
    /// `entry` is left as it was.
    pub fn process_image(
        &self,
        entry: &mut TextureEntry,
        image: PixelImage,
    ) -> Result<PixelImage, ImageProcessError> {
        self.staged(entry, |staged| {
            self.apply_image_flags(staged, &image);
            self.process_sized(staged, image)
        })
    }

    /// Sizes `entry` from `image` and processes it in one step.
    ///
    /// On error `entry` is left as it was.
    pub fn prepare(
        &self,
        entry: &mut TextureEntry,
        image: PixelImage,
    ) -> Result<PixelImage, ImageProcessError> {
        self.staged(entry, |staged| {
            self.apply_image_flags(staged, &image);
            self.set_dimensions(staged, image.width(), image.height(), image.depth());
            self.process_sized(staged, image)
        })
    }

    /// Runs `step` on a copy of `entry` and writes the copy back on success.
    fn staged<F>(&self, entry: &mut TextureEntry, step: F) -> Result<PixelImage, ImageProcessError>
    where
        F: FnOnce(&mut TextureEntry) -> Result<PixelImage, ImageProcessError>,
    {
        // The retained source can be large; move it aside instead of cloning it.
        let previous_original = entry.original.take();
        let mut staged = entry.clone();
        match step(&mut staged) {
            Ok(image) => {
                if staged.original.is_none() {
                    staged.original = previous_original;
                }
                *entry = staged;
                Ok(image)
            }
            Err(err) => {
                entry.original = previous_original;
                Err(err)
            }
        }
    }

    fn process_sized(
        &self,
        entry: &mut TextureEntry,
        mut image: PixelImage,
    ) -> Result<PixelImage, ImageProcessError> {
        if entry.flags.contains(TextureFlags::FORCE_COLOR) {
            image.flags_mut().insert(ImageFlags::HAS_COLOR);
        }

        let mut prebuilt_levels = None;
        if image.format().is_compressed() {
            if image.mip_levels() > 0 {
                prebuilt_levels = Some(image.mip_levels());
            }
            if image.width() > entry.width || image.height() > entry.height {
                return Err(TextureError::CompressedExceedsLimit {
                    name: entry.name.clone(),
                    format: image.format(),
                    width: image.width(),
                    height: image.height(),
                    limit: self.max_dimension(entry),
                }
                .into());
            }
        } else {
            match retain_original(&image, entry.flags, &self.profile) {
                Some(copy) => entry.original = Some(copy),
                None if entry.flags.contains(TextureFlags::KEEP_SOURCE)
                    && !entry.flags.contains(TextureFlags::IMG_UPLOADED) =>
                {
                    log::debug!(
                        "Texture '{}': source pixels not kept on the {} tier",
                        entry.name,
                        self.profile.tier()
                    );
                }
                None => {}
            }

            if (image.width(), image.height(), image.depth())
                != (entry.width, entry.height, entry.depth)
            {
                image = resample(&entry.name, &image, entry.width, entry.height, entry.depth)?;
            }
        }

        entry.format = image.format();
        entry.mip_count = self.mipmap_count(entry, true);
        if let Some(levels) = prebuilt_levels {
            entry.mip_count = entry.mip_count.min(levels);
        }
        entry.flags.insert(TextureFlags::IMG_UPLOADED);

        log::trace!(
            "Texture '{}' prepared: {}x{}x{}, {} mip levels",
            entry.name,
            entry.width,
            entry.height,
            entry.depth,
            entry.mip_count
        );
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesta_core::renderer::PixelFormat;

    fn lane(profile: RenderMemoryProfile) -> TextureSetupLane {
        TextureSetupLane::new(Arc::new(profile), DeviceTextureLimits::default())
    }

    fn entry(target: TextureTarget, flags: TextureFlags) -> TextureEntry {
        TextureEntry::new("test", target, flags)
    }

    #[test]
    fn world_texture_is_halved_to_the_constrained_cap() {
        let lane = lane(RenderMemoryProfile::constrained());
        let mut tex = entry(TextureTarget::D2, TextureFlags::EMPTY);
        lane.set_dimensions(&mut tex, 1024, 512, 1);
        assert_eq!((tex.width, tex.height), (256, 128));
        assert_eq!((tex.src_width, tex.src_height), (1024, 512));
    }

    #[test]
    fn ui_texture_keeps_up_to_512() {
        let lane = lane(RenderMemoryProfile::constrained());
        let mut tex = entry(TextureTarget::D2, TextureFlags::NO_MIPMAP);
        lane.set_dimensions(&mut tex, 512, 512, 1);
        assert_eq!((tex.width, tex.height), (512, 512));

        lane.set_dimensions(&mut tex, 2048, 1024, 1);
        assert_eq!((tex.width, tex.height), (512, 256));
    }

    #[test]
    fn standard_tier_only_applies_device_limits() {
        let lane = lane(RenderMemoryProfile::standard());
        let mut tex = entry(TextureTarget::D2, TextureFlags::EMPTY);
        lane.set_dimensions(&mut tex, 2048, 2048, 1);
        assert_eq!((tex.width, tex.height), (2048, 2048));

        lane.set_dimensions(&mut tex, 8192, 8192, 1);
        assert_eq!((tex.width, tex.height), (4096, 4096));
    }

    #[test]
    fn volumes_halve_on_every_axis() {
        let lane = lane(RenderMemoryProfile::standard());
        let mut tex = entry(TextureTarget::D3, TextureFlags::EMPTY);
        lane.set_dimensions(&mut tex, 1024, 1024, 1024);
        assert_eq!((tex.width, tex.height, tex.depth), (512, 512, 512));
    }

    #[test]
    fn array_layers_are_clamped_not_halved() {
        let lane = lane(RenderMemoryProfile::constrained());
        let mut tex = entry(TextureTarget::D2Array, TextureFlags::EMPTY);
        lane.set_dimensions(&mut tex, 512, 512, 300);
        assert_eq!((tex.width, tex.height, tex.depth), (256, 256, 256));
    }

    #[test]
    fn cube_faces_survive_clamping() {
        let lane = lane(RenderMemoryProfile::constrained());
        let mut tex = entry(TextureTarget::Cube, TextureFlags::EMPTY);
        lane.set_dimensions(&mut tex, 1024, 1024, 6);
        assert_eq!((tex.width, tex.height, tex.depth), (256, 256, 6));
    }

    #[test]
    fn one_dimensional_textures_shrink_along_width() {
        let lane = lane(RenderMemoryProfile::constrained());
        let mut tex = entry(TextureTarget::D1, TextureFlags::EMPTY);
        lane.set_dimensions(&mut tex, 1000, 1, 1);
        assert_eq!((tex.width, tex.height), (250, 1));
    }

    #[test]
    fn mip_counts_per_tier() {
        let low = lane(RenderMemoryProfile::constrained());
        let high = lane(RenderMemoryProfile::standard());
        let mut tex = entry(TextureTarget::D2, TextureFlags::EMPTY);
        tex.width = 256;
        tex.height = 256;

        assert_eq!(high.mipmap_count(&tex, true), 9);
        assert_eq!(low.mipmap_count(&tex, true), 4);
        assert_eq!(high.mipmap_count(&tex, false), 1);

        tex.width = 1;
        tex.height = 1;
        assert_eq!(high.mipmap_count(&tex, true), 1);
        assert_eq!(low.mipmap_count(&tex, true), 1);
    }

    #[test]
    fn volumes_and_ui_textures_have_one_level() {
        let high = lane(RenderMemoryProfile::standard());
        let mut volume = entry(TextureTarget::D3, TextureFlags::EMPTY);
        volume.width = 64;
        volume.height = 64;
        assert_eq!(high.mipmap_count(&volume, true), 1);

        let mut hud = entry(TextureTarget::D2, TextureFlags::NO_MIPMAP);
        hud.width = 64;
        hud.height = 64;
        assert_eq!(high.mipmap_count(&hud, true), 1);
    }

    #[test]
    fn alpha_and_force_color_flags_propagate() {
        let high = lane(RenderMemoryProfile::standard());
        let mut tex = entry(TextureTarget::D2, TextureFlags::FORCE_COLOR);
        let image = PixelImage::rgba8(1, 1, vec![0, 0, 0, 128])
            .unwrap()
            .with_flags(ImageFlags::HAS_ALPHA);

        let out = high.prepare(&mut tex, image).unwrap();
        assert!(out.flags().contains(ImageFlags::HAS_COLOR));
        assert!(tex.flags.contains(TextureFlags::HAS_ALPHA | TextureFlags::IMG_UPLOADED));
    }

    #[test]
    fn compressed_images_drop_keep_source() {
        let high = lane(RenderMemoryProfile::standard());
        let mut tex = entry(TextureTarget::D2, TextureFlags::KEEP_SOURCE);
        let image = PixelImage::new(8, 8, 1, PixelFormat::Dxt5, 0, vec![0; 64]).unwrap();

        high.prepare(&mut tex, image).unwrap();
        assert!(!tex.flags.contains(TextureFlags::KEEP_SOURCE));
        assert!(tex.flags.contains(TextureFlags::NO_MIPMAP));
        assert!(tex.original.is_none());
        assert_eq!(tex.mip_count, 1);
        assert_eq!(tex.format, PixelFormat::Dxt5);
    }

    #[test]
    fn compressed_mip_chain_bounds_the_level_count() {
        let high = lane(RenderMemoryProfile::standard());
        let mut tex = entry(TextureTarget::D2, TextureFlags::EMPTY);
        let bytes = PixelFormat::Dxt1.chain_bytes(16, 16, 2) as usize;
        let image = PixelImage::new(16, 16, 1, PixelFormat::Dxt1, 2, vec![0; bytes]).unwrap();

        high.prepare(&mut tex, image).unwrap();
        assert_eq!(tex.mip_count, 2);
    }

    #[test]
    fn oversized_compressed_images_fail() {
        let low = lane(RenderMemoryProfile::constrained());
        let mut tex = entry(TextureTarget::D2, TextureFlags::EMPTY);
        let bytes = PixelFormat::Dxt1.surface_bytes(512, 512) as usize;
        let image = PixelImage::new(512, 512, 1, PixelFormat::Dxt1, 1, vec![0; bytes]).unwrap();

        let err = low.prepare(&mut tex, image).unwrap_err();
        assert!(matches!(
            err,
            ImageProcessError::Texture(TextureError::CompressedExceedsLimit { limit: 256, .. })
        ));
    }

    #[test]
    fn mipless_compressed_image_gets_the_ui_cap() {
        let low = lane(RenderMemoryProfile::constrained());
        let mut tex = entry(TextureTarget::D2, TextureFlags::EMPTY);
        let bytes = PixelFormat::Dxt1.surface_bytes(512, 512) as usize;
        let image = PixelImage::new(512, 512, 1, PixelFormat::Dxt1, 0, vec![0; bytes]).unwrap();

        let out = low.prepare(&mut tex, image).unwrap();
        assert_eq!((tex.width, tex.height), (512, 512));
        assert_eq!((out.width(), out.height()), (512, 512));
        assert!(tex.flags.contains(TextureFlags::NO_MIPMAP | TextureFlags::IMG_UPLOADED));
        assert_eq!(tex.mip_count, 1);
    }

    #[test]
    fn oversized_mipless_compressed_image_reports_the_ui_cap() {
        let low = lane(RenderMemoryProfile::constrained());
        let mut tex = entry(TextureTarget::D2, TextureFlags::EMPTY);
        let bytes = PixelFormat::Dxt1.surface_bytes(1024, 1024) as usize;
        let image = PixelImage::new(1024, 1024, 1, PixelFormat::Dxt1, 0, vec![0; bytes]).unwrap();

        let err = low.prepare(&mut tex, image).unwrap_err();
        assert!(matches!(
            err,
            ImageProcessError::Texture(TextureError::CompressedExceedsLimit { limit: 512, .. })
        ));
    }

    #[test]
    fn failed_prepare_leaves_the_entry_unchanged() {
        let low = lane(RenderMemoryProfile::constrained());
        let mut tex = entry(TextureTarget::D2, TextureFlags::KEEP_SOURCE);
        low.prepare(&mut tex, PixelImage::rgba8(64, 64, vec![7; 64 * 64 * 4]).unwrap())
            .unwrap();
        let flags_before = tex.flags;

        let bytes = PixelFormat::Dxt1.surface_bytes(1024, 1024) as usize;
        let image = PixelImage::new(1024, 1024, 1, PixelFormat::Dxt1, 0, vec![0; bytes]).unwrap();
        assert!(low.prepare(&mut tex, image).is_err());

        assert_eq!(tex.flags, flags_before);
        assert_eq!((tex.width, tex.height), (64, 64));
        assert_eq!((tex.src_width, tex.src_height), (64, 64));
        assert_eq!(tex.format, PixelFormat::Rgba8);
        assert_eq!(tex.mip_count, 4);
    }

    #[test]
    fn failed_prepare_keeps_the_retained_source() {
        let limits = DeviceTextureLimits {
            max_2d_size: 16,
            ..DeviceTextureLimits::default()
        };
        let high = TextureSetupLane::new(Arc::new(RenderMemoryProfile::standard()), limits);
        let mut tex = entry(TextureTarget::D2, TextureFlags::KEEP_SOURCE);
        let source = PixelImage::rgba8(4, 4, vec![9; 64]).unwrap();
        high.prepare(&mut tex, source.clone()).unwrap();

        let bytes = PixelFormat::Dxt5.surface_bytes(32, 32) as usize;
        let image = PixelImage::new(32, 32, 1, PixelFormat::Dxt5, 1, vec![0; bytes]).unwrap();
        assert!(high.prepare(&mut tex, image).is_err());

        assert_eq!(tex.original_pixels().unwrap(), &source);
        assert!(tex.flags.contains(TextureFlags::KEEP_SOURCE));
    }

    #[test]
    fn process_image_uploads_into_presized_entry() {
        let low = lane(RenderMemoryProfile::constrained());
        let mut tex = entry(TextureTarget::D2, TextureFlags::EMPTY);
        low.set_dimensions(&mut tex, 32, 32, 1);

        let out = low
            .process_image(&mut tex, PixelImage::rgba8(64, 64, vec![1; 64 * 64 * 4]).unwrap())
            .unwrap();
        assert_eq!((out.width(), out.height()), (32, 32));
        assert!(tex.flags.contains(TextureFlags::IMG_UPLOADED));

        let bytes = PixelFormat::Dxt5.surface_bytes(64, 64) as usize;
        let image = PixelImage::new(64, 64, 1, PixelFormat::Dxt5, 1, vec![0; bytes]).unwrap();
        assert!(low.process_image(&mut tex, image).is_err());
        assert_eq!(tex.format, PixelFormat::Rgba8);
    }
}
