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

//! Loading the memory policy configuration from disk.

use anyhow::{bail, Context, Result};
use std::path::Path;
use vesta_core::config::MemoryPolicyConfig;

/// Reads a [`MemoryPolicyConfig`] from `path`, or returns the defaults when
/// no path is given.
///
/// The format is chosen by extension: `.toml` or `.json`.
pub fn load_config(path: Option<&Path>) -> Result<MemoryPolicyConfig> {
    let Some(path) = path else {
        return Ok(MemoryPolicyConfig::default());
    };

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => {
            let config: MemoryPolicyConfig = toml::from_str(&source)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            config
                .validate()
                .with_context(|| format!("Invalid config in {}", path.display()))?;
            config
        }
        Some("json") => MemoryPolicyConfig::from_json(&source)
            .with_context(|| format!("Invalid config in {}", path.display()))?,
        _ => bail!(
            "Unsupported config format for {} (expected .toml or .json)",
            path.display()
        ),
    };

    log::debug!("Loaded memory policy config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use vesta_core::config::TieringMode;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(load_config(None).unwrap(), MemoryPolicyConfig::default());
    }

    #[test]
    fn reads_toml() {
        let file = write_temp(
            ".toml",
            "tiering = \"standard\"\nlow_tier_threshold_mib = 96\n",
        );
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.tiering, TieringMode::Standard);
        assert_eq!(config.low_tier_threshold_mib, 96);
    }

    #[test]
    fn reads_json() {
        let file = write_temp(".json", r#"{ "reduce_ui_textures": true }"#);
        assert!(load_config(Some(file.path())).unwrap().reduce_ui_textures);
    }

    #[test]
    fn rejects_invalid_values_and_unknown_formats() {
        let file = write_temp(".toml", "unused_texture_frames = 0\n");
        assert!(load_config(Some(file.path())).is_err());

        let file = write_temp(".yaml", "tiering: detect\n");
        assert!(load_config(Some(file.path())).is_err());
    }
}
