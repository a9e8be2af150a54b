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

//! User-facing configuration of the render memory policy.

use crate::memory::tier::{DEFAULT_LOW_TIER_THRESHOLD_MIB, MIB};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the memory tier is chosen at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieringMode {
    /// Query the host and classify its physical memory.
    #[default]
    Detect,
    /// Always run on the standard tier. Hosts outside the constrained
    /// device family use this.
    Standard,
    /// Always run on the constrained tier.
    Constrained,
}

/// Tunables for the render memory policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemoryPolicyConfig {
    /// How the tier is chosen.
    pub tiering: TieringMode,
    /// Hosts reporting less than this many MiB are classified as constrained.
    pub low_tier_threshold_mib: u64,
    /// On the constrained tier, cap UI textures at the world texture size
    /// instead of the larger UI size.
    pub reduce_ui_textures: bool,
    /// On the constrained tier, textures untouched for more than this many
    /// frames are flushed.
    pub unused_texture_frames: u64,
}

impl Default for MemoryPolicyConfig {
    fn default() -> Self {
        Self {
            tiering: TieringMode::Detect,
            low_tier_threshold_mib: DEFAULT_LOW_TIER_THRESHOLD_MIB,
            reduce_ui_textures: false,
            unused_texture_frames: 300,
        }
    }
}

impl MemoryPolicyConfig {
    /// The classification threshold in bytes.
    pub fn low_tier_threshold_bytes(&self) -> u64 {
        self.low_tier_threshold_mib.saturating_mul(MIB)
    }

    /// Parses and validates a JSON document.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.low_tier_threshold_mib == 0 {
            return Err(ConfigError::InvalidValue {
                field: "low_tier_threshold_mib",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.unused_texture_frames == 0 {
            return Err(ConfigError::InvalidValue {
                field: "unused_texture_frames",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// An error raised while reading a [`MemoryPolicyConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The document could not be parsed.
    Parse(String),
    /// A field holds a value outside its accepted range.
    InvalidValue {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(details) => {
                write!(f, "Failed to parse memory policy config: {details}")
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{field}': {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_detect_with_80_mib_threshold() {
        let config = MemoryPolicyConfig::default();
        assert_eq!(config.tiering, TieringMode::Detect);
        assert_eq!(config.low_tier_threshold_bytes(), 80 * 1024 * 1024);
        assert!(!config.reduce_ui_textures);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            MemoryPolicyConfig::from_json(r#"{ "tiering": "constrained", "reduce_ui_textures": true }"#)
                .unwrap();
        assert_eq!(config.tiering, TieringMode::Constrained);
        assert!(config.reduce_ui_textures);
        assert_eq!(config.low_tier_threshold_mib, 80);
        assert_eq!(config.unused_texture_frames, 300);
    }

    #[test]
    fn rejects_zero_threshold() {
        let err = MemoryPolicyConfig::from_json(r#"{ "low_tier_threshold_mib": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "low_tier_threshold_mib",
                ..
            }
        ));
    }

    #[test]
    fn rejects_unknown_fields_and_bad_modes() {
        assert!(matches!(
            MemoryPolicyConfig::from_json(r#"{ "threshold": 64 }"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            MemoryPolicyConfig::from_json(r#"{ "tiering": "medium" }"#),
            Err(ConfigError::Parse(_))
        ));
    }
}
