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

//! Backend-agnostic texture and lightmap contracts shaped by the memory tier.
//!
//! This module defines the 'what': texture records, pixel images, device
//! limits, lightmap sizing and the pure policy functions. The 'how' (the
//! lanes that walk a texture through setup and the lightmap page pool) lives
//! in `vesta-lanes`.

pub mod budget;
pub mod error;
pub mod lightmap;
pub mod policy;
pub mod texture;

pub use self::budget::TextureMemoryEstimate;
pub use self::error::{LightmapError, TextureError};
pub use self::lightmap::{
    optimal_lightmap_block_size, LightmapPageId, BLOCK_SIZE_DEFAULT, BLOCK_SIZE_MAX,
    MAX_LIGHTMAP_PAGES,
};
pub use self::policy::{
    effective_max_dimension, mip_level_count, retain_original, should_retain_original,
};
pub use self::texture::{
    DeviceTextureLimits, ImageFlags, PixelFormat, PixelImage, TextureCaps, TextureEntry,
    TextureFlags, TextureId, TextureTarget,
};
