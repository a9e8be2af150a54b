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

//! Errors raised while walking a texture through setup.

use thiserror::Error;
use vesta_core::renderer::TextureError;

/// An error raised by the texture setup lane.
#[derive(Debug, Error)]
pub enum ImageProcessError {
    /// A texture-level rule rejected the image.
    #[error(transparent)]
    Texture(#[from] TextureError),
    /// The working buffer could not be resampled to the clamped size.
    #[error("failed to resample '{name}': {reason}")]
    Resample {
        /// Name of the texture.
        name: String,
        /// What went wrong.
        reason: String,
    },
}
