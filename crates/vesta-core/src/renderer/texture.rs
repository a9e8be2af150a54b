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

//! Texture descriptions consumed by the memory policy.
//!
//! These types describe a texture as the upload pipeline sees it before any
//! GPU work happens: its target kind, its state flags, its clamped size and,
//! optionally, a retained copy of its source pixels.

use crate::renderer::error::TextureError;
use crate::vesta_flags;

/// The kind of a texture, which selects its device size limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    /// A one-dimensional texture.
    D1,
    /// A two-dimensional texture.
    D2,
    /// An array of two-dimensional layers.
    D2Array,
    /// A non-normalized rectangle texture.
    Rectangle,
    /// A cube map (six square faces).
    Cube,
    /// A volumetric texture.
    D3,
}

impl TextureTarget {
    /// Volumetric textures never carry a mip chain.
    pub fn allows_mipmaps(self) -> bool {
        !matches!(self, TextureTarget::D3)
    }

    /// Number of faces a texture of this kind stores.
    pub fn faces(self) -> u64 {
        match self {
            TextureTarget::Cube => 6,
            _ => 1,
        }
    }
}

vesta_flags! {
    /// State and requests attached to a texture.
    pub struct TextureFlags: u32 {
        /// No mip chain. Set on UI and HUD textures.
        const NO_MIPMAP = 1 << 0;
        /// Keep a copy of the source pixels after processing.
        const KEEP_SOURCE = 1 << 1;
        /// Pixel data has already gone through processing and upload.
        const IMG_UPLOADED = 1 << 2;
        /// The texture has an alpha channel.
        const HAS_ALPHA = 1 << 3;
        /// Always upload as a colour texture.
        const FORCE_COLOR = 1 << 4;
    }
}

vesta_flags! {
    /// Properties of a decoded image.
    pub struct ImageFlags: u32 {
        /// The image carries meaningful alpha.
        const HAS_ALPHA = 1 << 0;
        /// The image carries colour (not greyscale).
        const HAS_COLOR = 1 << 1;
    }
}

/// Pixel layout of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit RGBA.
    Rgba8,
    /// 8-bit RGB.
    Rgb8,
    /// BC1 block compression, 8 bytes per 4x4 block.
    Dxt1,
    /// BC3 block compression, 16 bytes per 4x4 block.
    Dxt5,
}

impl PixelFormat {
    /// Returns `true` for block-compressed formats.
    pub fn is_compressed(self) -> bool {
        matches!(self, PixelFormat::Dxt1 | PixelFormat::Dxt5)
    }

    /// Size in bytes of one `width` x `height` surface, saturating at
    /// `u64::MAX`.
    pub fn surface_bytes(self, width: u32, height: u32) -> u64 {
        let (w, h) = (u64::from(width.max(1)), u64::from(height.max(1)));
        let (columns, rows, unit) = match self {
            PixelFormat::Rgba8 => (w, h, 4),
            PixelFormat::Rgb8 => (w, h, 3),
            PixelFormat::Dxt1 => (w.div_ceil(4), h.div_ceil(4), 8),
            PixelFormat::Dxt5 => (w.div_ceil(4), h.div_ceil(4), 16),
        };
        columns.saturating_mul(rows).saturating_mul(unit)
    }

    /// Size in bytes of `levels` mip levels starting at `width` x `height`.
    pub fn chain_bytes(self, width: u32, height: u32, levels: u32) -> u64 {
        (0..levels.max(1))
            .map(|level| {
                self.surface_bytes(
                    width.checked_shr(level).unwrap_or(0),
                    height.checked_shr(level).unwrap_or(0),
                )
            })
            .fold(0u64, u64::saturating_add)
    }
}

/// Per-target size limits reported by the graphics device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceTextureLimits {
    /// Largest edge of a 1D or 2D texture.
    pub max_2d_size: u32,
    /// Largest layer count of a 2D array.
    pub max_2d_layers: u32,
    /// Largest edge of a rectangle texture.
    pub max_rectangle_size: u32,
    /// Largest edge of a cube map face.
    pub max_cubemap_size: u32,
    /// Largest edge (and depth) of a 3D texture.
    pub max_3d_size: u32,
}

impl Default for DeviceTextureLimits {
    fn default() -> Self {
        Self {
            max_2d_size: 4096,
            max_2d_layers: 256,
            max_rectangle_size: 4096,
            max_cubemap_size: 2048,
            max_3d_size: 512,
        }
    }
}

/// The device caps that apply to one texture target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureCaps {
    /// Largest allowed width and height.
    pub size: u32,
    /// Largest allowed depth or layer count.
    pub depth: u32,
}

impl DeviceTextureLimits {
    /// The device caps for `target`, before any memory tier is applied.
    pub fn base_caps(&self, target: TextureTarget) -> TextureCaps {
        match target {
            TextureTarget::D1 | TextureTarget::D2 => TextureCaps {
                size: self.max_2d_size,
                depth: 1,
            },
            TextureTarget::D2Array => TextureCaps {
                size: self.max_2d_size,
                depth: self.max_2d_layers,
            },
            TextureTarget::Rectangle => TextureCaps {
                size: self.max_rectangle_size,
                depth: 1,
            },
            TextureTarget::Cube => TextureCaps {
                size: self.max_cubemap_size,
                depth: 1,
            },
            TextureTarget::D3 => TextureCaps {
                size: self.max_3d_size,
                depth: self.max_3d_size,
            },
        }
    }
}

/// A decoded image on its way to the GPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelImage {
    width: u32,
    height: u32,
    depth: u32,
    format: PixelFormat,
    flags: ImageFlags,
    mip_levels: u32,
    pixels: Vec<u8>,
}

impl PixelImage {
    /// Wraps a pixel buffer, checking its length against the described layout.
    ///
    /// `mip_levels` counts the levels stored in `pixels`; zero means the image
    /// has no prebuilt chain and is stored like a single level.
    pub fn new(
        width: u32,
        height: u32,
        depth: u32,
        format: PixelFormat,
        mip_levels: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, TextureError> {
        let expected = format
            .chain_bytes(width, height, mip_levels)
            .saturating_mul(u64::from(depth.max(1)));
        if pixels.len() as u64 != expected {
            return Err(TextureError::PixelBufferMismatch {
                expected,
                actual: pixels.len() as u64,
            });
        }
        Ok(Self {
            width: width.max(1),
            height: height.max(1),
            depth: depth.max(1),
            format,
            flags: ImageFlags::EMPTY,
            mip_levels,
            pixels,
        })
    }

    /// Wraps a single-level RGBA8 buffer.
    pub fn rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, TextureError> {
        Self::new(width, height, 1, PixelFormat::Rgba8, 1, pixels)
    }

    /// Replaces the image flags.
    #[must_use]
    pub fn with_flags(mut self, flags: ImageFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Width in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Depth or layer count.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Pixel layout.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Image properties.
    pub fn flags(&self) -> ImageFlags {
        self.flags
    }

    /// Mutable access to the image properties.
    pub fn flags_mut(&mut self) -> &mut ImageFlags {
        &mut self.flags
    }

    /// Number of prebuilt mip levels; zero when none were supplied.
    pub fn mip_levels(&self) -> u32 {
        self.mip_levels
    }

    /// The raw pixel bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable access to the raw pixel bytes.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Consumes the image and returns its pixel bytes.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Length of the pixel buffer in bytes.
    pub fn byte_len(&self) -> u64 {
        self.pixels.len() as u64
    }
}

/// A handle to an entry of the texture table.
///
/// Slots are recycled once a texture is released; the generation is bumped on
/// every release so a handle to the old texture no longer resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId {
    /// Slot of the texture in the table.
    pub index: usize,
    /// Generation of the slot when the handle was issued.
    pub generation: u32,
}

/// The renderer-side record of one texture.
#[derive(Debug, Clone)]
pub struct TextureEntry {
    /// Name the texture was requested under.
    pub name: String,
    /// Kind of texture.
    pub target: TextureTarget,
    /// State and requests.
    pub flags: TextureFlags,
    /// Width after clamping.
    pub width: u32,
    /// Height after clamping.
    pub height: u32,
    /// Depth or layer count after clamping.
    pub depth: u32,
    /// Width requested before clamping.
    pub src_width: u32,
    /// Height requested before clamping.
    pub src_height: u32,
    /// Number of mip levels to upload.
    pub mip_count: u32,
    /// Pixel layout of the uploaded data.
    pub format: PixelFormat,
    /// Untouched copy of the source pixels, when retained.
    pub original: Option<PixelImage>,
}

impl TextureEntry {
    /// Creates an empty 1x1 entry.
    pub fn new(name: impl Into<String>, target: TextureTarget, flags: TextureFlags) -> Self {
        Self {
            name: name.into(),
            target,
            flags,
            width: 1,
            height: 1,
            depth: 1,
            src_width: 1,
            src_height: 1,
            mip_count: 1,
            format: PixelFormat::Rgba8,
            original: None,
        }
    }

    /// UI and HUD textures are the ones without a mip chain.
    pub fn is_ui_texture(&self) -> bool {
        self.flags.contains(TextureFlags::NO_MIPMAP)
    }

    /// The retained source pixels.
    ///
    /// Fails with [`TextureError::OriginalDataUnavailable`] when nothing was
    /// retained, which is always the case on the constrained tier.
    pub fn original_pixels(&self) -> Result<&PixelImage, TextureError> {
        self.original
            .as_ref()
            .ok_or_else(|| TextureError::OriginalDataUnavailable {
                name: self.name.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compressed_sizes_round_up_to_blocks() {
        assert_eq!(PixelFormat::Dxt1.surface_bytes(1, 1), 8);
        assert_eq!(PixelFormat::Dxt1.surface_bytes(8, 8), 32);
        assert_eq!(PixelFormat::Dxt5.surface_bytes(6, 4), 32);
        assert_eq!(PixelFormat::Rgba8.surface_bytes(4, 4), 64);
    }

    #[test]
    fn chain_bytes_sums_levels() {
        // 4x4 + 2x2 + 1x1 RGBA
        assert_eq!(PixelFormat::Rgba8.chain_bytes(4, 4, 3), 64 + 16 + 4);
        assert_eq!(PixelFormat::Rgba8.chain_bytes(4, 4, 0), 64);
    }

    #[test]
    fn oversized_layouts_saturate_instead_of_overflowing() {
        assert_eq!(PixelFormat::Rgba8.surface_bytes(u32::MAX, u32::MAX), u64::MAX);
        assert_eq!(PixelFormat::Rgba8.chain_bytes(u32::MAX, u32::MAX, 3), u64::MAX);

        let err = PixelImage::rgba8(u32::MAX, u32::MAX, vec![0; 4]).unwrap_err();
        assert_eq!(
            err,
            TextureError::PixelBufferMismatch {
                expected: u64::MAX,
                actual: 4
            }
        );

        let layers = PixelImage::new(65_536, 65_536, u32::MAX, PixelFormat::Rgba8, 1, vec![0; 4]);
        assert!(matches!(
            layers,
            Err(TextureError::PixelBufferMismatch { actual: 4, .. })
        ));
    }

    #[test]
    fn base_caps_follow_target() {
        let limits = DeviceTextureLimits {
            max_2d_size: 8192,
            max_2d_layers: 64,
            max_rectangle_size: 4096,
            max_cubemap_size: 2048,
            max_3d_size: 256,
        };
        assert_eq!(limits.base_caps(TextureTarget::D2).size, 8192);
        assert_eq!(limits.base_caps(TextureTarget::D1).depth, 1);
        assert_eq!(limits.base_caps(TextureTarget::D2Array).depth, 64);
        assert_eq!(limits.base_caps(TextureTarget::Rectangle).size, 4096);
        assert_eq!(limits.base_caps(TextureTarget::Cube).size, 2048);
        assert_eq!(
            limits.base_caps(TextureTarget::D3),
            TextureCaps {
                size: 256,
                depth: 256
            }
        );
    }

    #[test]
    fn pixel_image_checks_buffer_length() {
        assert!(PixelImage::rgba8(2, 2, vec![0; 16]).is_ok());
        let err = PixelImage::rgba8(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            TextureError::PixelBufferMismatch {
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn missing_original_is_reported() {
        let entry = TextureEntry::new("gfx/hud/crosshair", TextureTarget::D2, TextureFlags::KEEP_SOURCE);
        assert!(matches!(
            entry.original_pixels(),
            Err(TextureError::OriginalDataUnavailable { .. })
        ));
    }
}
