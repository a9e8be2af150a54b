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

//! Resampling of uncompressed working buffers to a texture's clamped size.

use super::error::ImageProcessError;
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Pixel, Rgb, Rgba};
use vesta_core::renderer::{PixelFormat, PixelImage};

/// Resamples `image` to `width` x `height` x `depth`.
///
/// Only the top mip level of each layer is kept. Layers are picked by nearest
/// index when the depth shrinks; each kept layer is filtered in 2D.
pub(crate) fn resample(
    name: &str,
    image: &PixelImage,
    width: u32,
    height: u32,
    depth: u32,
) -> Result<PixelImage, ImageProcessError> {
    match image.format() {
        PixelFormat::Rgba8 => resample_layers::<Rgba<u8>>(name, image, width, height, depth),
        PixelFormat::Rgb8 => resample_layers::<Rgb<u8>>(name, image, width, height, depth),
        format => Err(ImageProcessError::Resample {
            name: name.to_string(),
            reason: format!("{format:?} data cannot be resampled"),
        }),
    }
}

fn resample_layers<P>(
    name: &str,
    image: &PixelImage,
    width: u32,
    height: u32,
    depth: u32,
) -> Result<PixelImage, ImageProcessError>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let (src_w, src_h, src_d) = (image.width(), image.height(), image.depth());
    let format = image.format();
    let level0 = format.surface_bytes(src_w, src_h) as usize;
    let stride = format.chain_bytes(src_w, src_h, image.mip_levels()) as usize;
    let depth = depth.max(1);

    let mut pixels = Vec::with_capacity(format.surface_bytes(width, height) as usize * depth as usize);
    for layer in 0..depth {
        let src_layer = (u64::from(layer) * u64::from(src_d) / u64::from(depth)) as usize;
        let start = src_layer * stride;
        let bytes = image
            .pixels()
            .get(start..start + level0)
            .ok_or_else(|| ImageProcessError::Resample {
                name: name.to_string(),
                reason: format!("layer {src_layer} is out of range"),
            })?;

        let buffer: ImageBuffer<P, Vec<u8>> = ImageBuffer::from_raw(src_w, src_h, bytes.to_vec())
            .ok_or_else(|| ImageProcessError::Resample {
                name: name.to_string(),
                reason: format!("layer {src_layer} does not hold {src_w}x{src_h} texels"),
            })?;

        let resized = if (src_w, src_h) == (width, height) {
            buffer
        } else {
            imageops::resize(&buffer, width, height, FilterType::Triangle)
        };
        pixels.extend_from_slice(resized.as_raw());
    }

    Ok(PixelImage::new(width, height, depth, format, 1, pixels)?.with_flags(image.flags()))
}
