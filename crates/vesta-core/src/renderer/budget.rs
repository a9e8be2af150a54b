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

//! Estimates of the memory a texture occupies.

use crate::renderer::texture::TextureEntry;

/// Memory accounted to one texture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextureMemoryEstimate {
    /// Bytes of the uploaded mip chain over every face and layer. Cube maps
    /// always count six faces.
    pub gpu_bytes: u64,
    /// Bytes of the retained source copy.
    pub retained_bytes: u64,
}

impl TextureMemoryEstimate {
    /// Estimates the memory of a processed texture entry.
    pub fn for_texture(entry: &TextureEntry) -> Self {
        let chain = entry
            .format
            .chain_bytes(entry.width, entry.height, entry.mip_count);
        Self {
            gpu_bytes: chain.saturating_mul(u64::from(entry.depth.max(1)).max(entry.target.faces())),
            retained_bytes: entry.original.as_ref().map_or(0, |image| image.byte_len()),
        }
    }

    /// Sum of GPU and retained bytes.
    pub fn total_bytes(&self) -> u64 {
        self.gpu_bytes.saturating_add(self.retained_bytes)
    }
}
