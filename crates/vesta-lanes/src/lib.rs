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

//! # Vesta Lanes
//!
//! Hot-path texture and lightmap setup. Every lane here is built from a
//! shared `RenderMemoryProfile` and applies it without further host queries.

pub mod lightmap_lane;
pub mod texture_lane;

pub use lightmap_lane::{LightmapPage, LightmapPagePool};
pub use texture_lane::{ImageProcessError, TextureRegistry, TextureSetupLane};
