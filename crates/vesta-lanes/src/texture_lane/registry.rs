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

//! The texture table: bounded by the profile, with idle-texture flushing on
//! the constrained tier.

use super::error::ImageProcessError;
use super::setup::TextureSetupLane;
use ahash::AHashMap;
use std::sync::Arc;
use vesta_core::memory::{RenderMemoryProfile, TextureMemoryLedger};
use vesta_core::renderer::{
    PixelImage, TextureEntry, TextureError, TextureFlags, TextureId, TextureMemoryEstimate,
    TextureTarget,
};

#[derive(Debug)]
struct Slot {
    entry: TextureEntry,
    last_used_frame: u64,
    estimate: TextureMemoryEstimate,
}

/// Owns every live [`TextureEntry`] and accounts their memory.
#[derive(Debug)]
pub struct TextureRegistry {
    profile: Arc<RenderMemoryProfile>,
    ledger: Arc<TextureMemoryLedger>,
    slots: Vec<Option<Slot>>,
    generations: Vec<u32>,
    free_slots: Vec<usize>,
    by_name: AHashMap<String, TextureId>,
}

impl TextureRegistry {
    /// Creates an empty table sized by `profile`.
    pub fn new(profile: Arc<RenderMemoryProfile>, ledger: Arc<TextureMemoryLedger>) -> Self {
        Self {
            profile,
            ledger,
            slots: Vec::new(),
            generations: Vec::new(),
            free_slots: Vec::new(),
            by_name: AHashMap::new(),
        }
    }

    /// Maximum number of live textures.
    pub fn capacity(&self) -> usize {
        self.profile.max_textures()
    }

    /// Number of live textures.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` when no texture is live.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// The ledger this table reports into.
    pub fn ledger(&self) -> &Arc<TextureMemoryLedger> {
        &self.ledger
    }

    /// Returns the texture called `name`, creating it if needed.
    ///
    /// An existing texture is returned as is and marked used at `frame`.
    pub fn create(
        &mut self,
        name: &str,
        target: TextureTarget,
        flags: TextureFlags,
        frame: u64,
    ) -> Result<TextureId, TextureError> {
        if let Some(&id) = self.by_name.get(name) {
            self.touch(id, frame)?;
            return Ok(id);
        }

        if self.len() >= self.capacity() {
            log::warn!(
                "Texture table full ({} entries), cannot create '{name}'",
                self.capacity()
            );
            return Err(TextureError::TableFull {
                capacity: self.capacity(),
            });
        }

        let slot = Slot {
            entry: TextureEntry::new(name, target, flags),
            last_used_frame: frame,
            estimate: TextureMemoryEstimate::default(),
        };
        let index = match self.free_slots.pop() {
            Some(index) => {
                self.slots[index] = Some(slot);
                index
            }
            None => {
                self.slots.push(Some(slot));
                self.generations.push(0);
                self.slots.len() - 1
            }
        };

        let id = TextureId {
            index,
            generation: self.generations[index],
        };
        self.by_name.insert(name.to_string(), id);
        self.ledger.record_texture();
        Ok(id)
    }

    /// Looks a texture up by name.
    pub fn find(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// The entry behind `id`.
    pub fn get(&self, id: TextureId) -> Result<&TextureEntry, TextureError> {
        self.slot(id).map(|slot| &slot.entry)
    }

    /// Marks `id` as used at `frame`.
    pub fn touch(&mut self, id: TextureId, frame: u64) -> Result<(), TextureError> {
        let slot = self.slot_mut(id)?;
        slot.last_used_frame = slot.last_used_frame.max(frame);
        Ok(())
    }

    /// Runs `image` through `lane` as the pixel data of `id` and accounts the
    /// resulting memory. Returns the working buffer ready for upload.
    ///
    /// A failed upload leaves the texture and the ledger untouched.
    pub fn upload(
        &mut self,
        id: TextureId,
        lane: &TextureSetupLane,
        image: PixelImage,
        frame: u64,
    ) -> Result<PixelImage, ImageProcessError> {
        let ledger = Arc::clone(&self.ledger);
        let slot = self.slot_mut(id)?;

        let prepared = lane.prepare(&mut slot.entry, image)?;
        let estimate = TextureMemoryEstimate::for_texture(&slot.entry);
        ledger.record_replace(&slot.estimate, &estimate);
        slot.estimate = estimate;
        slot.last_used_frame = slot.last_used_frame.max(frame);
        Ok(prepared)
    }

    /// Removes `id` from the table and returns its entry.
    pub fn release(&mut self, id: TextureId) -> Result<TextureEntry, TextureError> {
        self.slot(id)?;
        let slot = self.slots[id.index]
            .take()
            .ok_or(TextureError::UnknownTexture { id })?;

        self.generations[id.index] = self.generations[id.index].wrapping_add(1);
        self.by_name.remove(&slot.entry.name);
        self.free_slots.push(id.index);
        self.ledger.record_release(&slot.estimate);
        Ok(slot.entry)
    }

    /// Releases every texture idle for longer than the profile allows.
    ///
    /// Only the constrained tier flushes; on the standard tier this returns
    /// an empty list.
    pub fn flush_unused(&mut self, current_frame: u64) -> Vec<TextureId> {
        if !self.profile.evicts_unused_textures() {
            return Vec::new();
        }

        let idle_limit = self.profile.unused_texture_frames();
        let stale: Vec<TextureId> = self
            .slots
            .iter()
            .zip(&self.generations)
            .enumerate()
            .filter_map(|(index, (slot, &generation))| {
                slot.as_ref()
                    .filter(|slot| current_frame.saturating_sub(slot.last_used_frame) > idle_limit)
                    .map(|_| TextureId { index, generation })
            })
            .collect();

        for &id in &stale {
            // Every id was read from a live slot above.
            let _ = self.release(id);
        }

        if !stale.is_empty() {
            log::debug!(
                "Flushed {} textures idle for more than {idle_limit} frames",
                stale.len()
            );
        }
        stale
    }

    fn is_current(&self, id: TextureId) -> bool {
        self.generations.get(id.index) == Some(&id.generation)
    }

    fn slot(&self, id: TextureId) -> Result<&Slot, TextureError> {
        self.slots
            .get(id.index)
            .and_then(Option::as_ref)
            .filter(|_| self.is_current(id))
            .ok_or(TextureError::UnknownTexture { id })
    }

    fn slot_mut(&mut self, id: TextureId) -> Result<&mut Slot, TextureError> {
        if !self.is_current(id) {
            return Err(TextureError::UnknownTexture { id });
        }
        self.slots
            .get_mut(id.index)
            .and_then(Option::as_mut)
            .ok_or(TextureError::UnknownTexture { id })
    }
}
