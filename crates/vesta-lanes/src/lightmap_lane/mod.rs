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

//! Lightmap page allocation at a block size fixed for the process lifetime.
//!
//! The pool reads the block size from the profile once, at construction, and
//! offers no way to change it. Atlas packing inside a page is the caller's
//! business; the pool only hands out zeroed pages of the right size.

use vesta_core::memory::RenderMemoryProfile;
use vesta_core::renderer::lightmap::LIGHTMAP_BYTES_PER_TEXEL;
use vesta_core::renderer::{LightmapError, LightmapPageId, MAX_LIGHTMAP_PAGES};

/// One square lightmap page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightmapPage {
    id: LightmapPageId,
    block_size: u32,
    texels: Vec<u8>,
}

impl LightmapPage {
    /// The page handle.
    pub fn id(&self) -> LightmapPageId {
        self.id
    }

    /// Edge length in texels.
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// RGBA8 texel data, row-major.
    pub fn texels(&self) -> &[u8] {
        &self.texels
    }

    /// Mutable RGBA8 texel data, row-major.
    pub fn texels_mut(&mut self) -> &mut [u8] {
        &mut self.texels
    }
}

/// Allocates lightmap pages for the loaded world.
#[derive(Debug)]
pub struct LightmapPagePool {
    block_size: u32,
    pages: Vec<Option<LightmapPage>>,
}

impl LightmapPagePool {
    /// Creates an empty pool using the profile's block size.
    pub fn new(profile: &RenderMemoryProfile) -> Self {
        let block_size = profile.lightmap_block_size();
        log::info!(
            "Lightmap block size: {block_size} ({} tier)",
            profile.tier()
        );
        Self {
            block_size,
            pages: Vec::new(),
        }
    }

    /// Edge length of every page in this pool.
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Size in bytes of one page.
    pub fn bytes_per_page(&self) -> u64 {
        u64::from(self.block_size) * u64::from(self.block_size) * LIGHTMAP_BYTES_PER_TEXEL
    }

    /// Number of live pages.
    pub fn page_count(&self) -> usize {
        self.pages.iter().filter(|page| page.is_some()).count()
    }

    /// Bytes held by live pages.
    pub fn total_bytes(&self) -> u64 {
        self.page_count() as u64 * self.bytes_per_page()
    }

    /// Allocates a zeroed page.
    pub fn allocate_page(&mut self) -> Result<LightmapPageId, LightmapError> {
        let index = match self.pages.iter().position(Option::is_none) {
            Some(index) => index,
            None if self.pages.len() < MAX_LIGHTMAP_PAGES => {
                self.pages.push(None);
                self.pages.len() - 1
            }
            None => {
                return Err(LightmapError::PoolExhausted {
                    capacity: MAX_LIGHTMAP_PAGES,
                })
            }
        };

        let id = LightmapPageId(index);
        self.pages[index] = Some(LightmapPage {
            id,
            block_size: self.block_size,
            texels: vec![0; self.bytes_per_page() as usize],
        });
        Ok(id)
    }

    /// The page behind `id`.
    pub fn page(&self, id: LightmapPageId) -> Option<&LightmapPage> {
        self.pages.get(id.0).and_then(Option::as_ref)
    }

    /// Mutable access to the page behind `id`.
    pub fn page_mut(&mut self, id: LightmapPageId) -> Option<&mut LightmapPage> {
        self.pages.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Frees one page. Returns `false` if it was not live.
    pub fn release_page(&mut self, id: LightmapPageId) -> bool {
        self.pages
            .get_mut(id.0)
            .and_then(Option::take)
            .is_some()
    }

    /// Frees every page, typically when a new map loads. The block size is kept.
    pub fn clear(&mut self) {
        self.pages.clear();
    }
}
