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

//! Error types for texture and lightmap setup.

use crate::renderer::texture::{PixelFormat, TextureId};
use std::fmt;

/// An error raised while setting up or querying a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    /// The texture kept no copy of its source pixels.
    OriginalDataUnavailable {
        /// Name of the texture.
        name: String,
    },
    /// The texture table already holds its maximum number of entries.
    TableFull {
        /// Capacity of the table.
        capacity: usize,
    },
    /// The handle does not refer to a live texture.
    UnknownTexture {
        /// The stale or invalid handle.
        id: TextureId,
    },
    /// A block-compressed image is larger than its texture's clamped size and
    /// cannot be resampled.
    CompressedExceedsLimit {
        /// Name of the texture.
        name: String,
        /// Format of the image.
        format: PixelFormat,
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
        /// Largest edge the texture accepts.
        limit: u32,
    },
    /// A pixel buffer's length does not match its described layout.
    PixelBufferMismatch {
        /// Bytes required by the layout.
        expected: u64,
        /// Bytes supplied.
        actual: u64,
    },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::OriginalDataUnavailable { name } => {
                write!(f, "Texture '{name}' has no retained source pixels")
            }
            TextureError::TableFull { capacity } => {
                write!(f, "Texture table is full ({capacity} entries)")
            }
            TextureError::UnknownTexture { id } => {
                write!(f, "No live texture for {id:?}")
            }
            TextureError::CompressedExceedsLimit {
                name,
                format,
                width,
                height,
                limit,
            } => write!(
                f,
                "Compressed texture '{name}' ({format:?}, {width}x{height}) exceeds the {limit} texel limit"
            ),
            TextureError::PixelBufferMismatch { expected, actual } => write!(
                f,
                "Pixel buffer holds {actual} bytes but its layout requires {expected}"
            ),
        }
    }
}

impl std::error::Error for TextureError {}

/// An error raised by lightmap page allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LightmapError {
    /// Every lightmap page slot is in use.
    PoolExhausted {
        /// Maximum number of pages.
        capacity: usize,
    },
}

impl fmt::Display for LightmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightmapError::PoolExhausted { capacity } => {
                write!(f, "Lightmap page pool exhausted ({capacity} pages)")
            }
        }
    }
}

impl std::error::Error for LightmapError {}
