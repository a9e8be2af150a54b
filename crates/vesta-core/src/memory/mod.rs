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

//! Render memory tiering: host classification, the derived profile and
//! texture memory accounting.
//!
//! The flow is linear. A [`PhysicalMemoryProbe`] is asked for the host's
//! physical memory once, [`detect_memory_tier`] turns the answer into a
//! [`MemoryTier`], and [`RenderMemoryProfile`] turns the tier into the
//! concrete limits the texture and lightmap code consume.

pub mod detection;
pub mod ledger;
pub mod probe;
pub mod profile;
pub mod tier;

pub use self::detection::{detect_memory_tier, DetectionSource, TierDetection};
pub use self::ledger::{TextureMemoryLedger, TextureMemorySnapshot};
pub use self::probe::{FixedMemoryProbe, PhysicalMemoryProbe};
pub use self::profile::RenderMemoryProfile;
pub use self::tier::{MemoryTier, DEFAULT_LOW_TIER_THRESHOLD_MIB, MIB};
