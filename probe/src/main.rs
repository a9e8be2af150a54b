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

// Reports the render memory tier this host would run on.
// Run with: cargo run -p vesta-probe -- [--config <file>] [--memory-mib <N>] [--json]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use vesta_core::memory::FixedMemoryProbe;
use vesta_core::renderer::DeviceTextureLimits;
use vesta_sdk::{bootstrap, bootstrap_host, init_logging, load_config, RenderMemoryContext};

#[derive(Debug, Parser)]
#[command(version, about = "Report the render memory tier and its limits")]
struct Args {
    /// Memory policy config file (.toml or .json).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretend the host has this many MiB of physical memory.
    #[arg(long, value_name = "N")]
    memory_mib: Option<u64>,

    /// Print the profile as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let config = load_config(args.config.as_deref())?;
    let limits = DeviceTextureLimits::default();
    let context = match args.memory_mib {
        Some(mib) => bootstrap(&config, &FixedMemoryProbe::from_mib(mib), limits),
        None => bootstrap_host(&config, limits),
    };

    if args.json {
        let json = serde_json::to_string_pretty(context.profile.as_ref())
            .context("Failed to serialize the render memory profile")?;
        println!("{json}");
    } else {
        print_summary(&context);
    }
    Ok(())
}

fn print_summary(context: &RenderMemoryContext) {
    let profile = &context.profile;
    let cap = |ui: bool| match profile.texture_size_cap(ui) {
        Some(cap) => cap.to_string(),
        None => "device limit".to_string(),
    };

    println!("Tier:                  {}", profile.tier());
    match profile.reported_memory_bytes() {
        Some(bytes) => println!("Reported memory:       {} MiB", bytes / (1024 * 1024)),
        None => println!("Reported memory:       not probed"),
    }
    println!("World texture cap:     {}", cap(false));
    println!("UI texture cap:        {}", cap(true));
    println!("Mip level ceiling:     {}", profile.mip_level_ceiling());
    println!("Keeps source pixels:   {}", profile.retains_original_pixel_data());
    println!("Lightmap block size:   {}", context.lightmaps.block_size());
    println!("Texture table size:    {}", context.textures.capacity());
    println!("Flushes idle textures: {}", profile.evicts_unused_textures());
}
