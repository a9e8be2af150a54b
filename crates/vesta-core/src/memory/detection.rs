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

//! One-shot detection of the render memory tier.

use crate::config::{MemoryPolicyConfig, TieringMode};
use crate::memory::probe::PhysicalMemoryProbe;
use crate::memory::tier::{MemoryTier, MIB};

/// Where a detected tier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionSource {
    /// The host reported its physical memory.
    Probe,
    /// The host could not report its memory; the standard tier was assumed.
    ProbeUnavailable,
    /// The configuration pinned the tier.
    Configured,
}

/// The outcome of [`detect_memory_tier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierDetection {
    /// The chosen tier.
    pub tier: MemoryTier,
    /// The total physical memory reported by the host, if it was queried and answered.
    pub reported_bytes: Option<u64>,
    /// How the tier was chosen.
    pub source: DetectionSource,
}

/// Classifies the host according to `config` and announces the result.
///
/// The probe is queried at most once. A host that cannot report its memory
/// runs on the standard tier.
pub fn detect_memory_tier(
    probe: &dyn PhysicalMemoryProbe,
    config: &MemoryPolicyConfig,
) -> TierDetection {
    let detection = match config.tiering {
        TieringMode::Standard => TierDetection {
            tier: MemoryTier::High,
            reported_bytes: None,
            source: DetectionSource::Configured,
        },
        TieringMode::Constrained => TierDetection {
            tier: MemoryTier::Low,
            reported_bytes: None,
            source: DetectionSource::Configured,
        },
        TieringMode::Detect => match probe.total_physical_bytes() {
            Some(total) => TierDetection {
                tier: MemoryTier::classify(total, config.low_tier_threshold_bytes()),
                reported_bytes: Some(total),
                source: DetectionSource::Probe,
            },
            None => TierDetection {
                tier: MemoryTier::High,
                reported_bytes: None,
                source: DetectionSource::ProbeUnavailable,
            },
        },
    };

    announce(&detection);
    detection
}

fn announce(detection: &TierDetection) {
    match (detection.source, detection.tier) {
        (DetectionSource::Probe, MemoryTier::Low) => log::info!(
            "Render memory: constrained tier detected ({} MiB) - enabling texture optimizations",
            detection.reported_bytes.unwrap_or(0) / MIB
        ),
        (DetectionSource::Probe, MemoryTier::High) => log::info!(
            "Render memory: standard tier detected ({} MiB) - using standard texture quality",
            detection.reported_bytes.unwrap_or(0) / MIB
        ),
        (DetectionSource::ProbeUnavailable, tier) => log::warn!(
            "Render memory: host did not report physical memory, assuming {tier} tier"
        ),
        (DetectionSource::Configured, tier) => {
            log::info!("Render memory: {tier} tier selected by configuration")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::probe::FixedMemoryProbe;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProbe {
        total: u64,
        calls: AtomicUsize,
    }

    impl PhysicalMemoryProbe for CountingProbe {
        fn total_physical_bytes(&self) -> Option<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(self.total)
        }
    }

    #[test]
    fn detects_from_probe() {
        let config = MemoryPolicyConfig::default();
        let low = detect_memory_tier(&FixedMemoryProbe::from_mib(64), &config);
        assert_eq!(low.tier, MemoryTier::Low);
        assert_eq!(low.source, DetectionSource::Probe);
        assert_eq!(low.reported_bytes, Some(64 * MIB));

        let high = detect_memory_tier(&FixedMemoryProbe::from_mib(128), &config);
        assert_eq!(high.tier, MemoryTier::High);
    }

    #[test]
    fn exact_threshold_is_standard() {
        let config = MemoryPolicyConfig::default();
        let detection = detect_memory_tier(&FixedMemoryProbe::from_mib(80), &config);
        assert_eq!(detection.tier, MemoryTier::High);
    }

    #[test]
    fn threshold_is_configurable() {
        let config = MemoryPolicyConfig {
            low_tier_threshold_mib: 160,
            ..Default::default()
        };
        let detection = detect_memory_tier(&FixedMemoryProbe::from_mib(128), &config);
        assert_eq!(detection.tier, MemoryTier::Low);
    }

    #[test]
    fn unavailable_probe_defaults_to_standard() {
        let detection =
            detect_memory_tier(&FixedMemoryProbe::unavailable(), &MemoryPolicyConfig::default());
        assert_eq!(detection.tier, MemoryTier::High);
        assert_eq!(detection.source, DetectionSource::ProbeUnavailable);
        assert_eq!(detection.reported_bytes, None);
    }

    #[test]
    fn configured_modes_skip_the_probe() {
        let probe = CountingProbe {
            total: 32 * MIB,
            calls: AtomicUsize::new(0),
        };
        let standard = MemoryPolicyConfig {
            tiering: TieringMode::Standard,
            ..Default::default()
        };
        assert_eq!(detect_memory_tier(&probe, &standard).tier, MemoryTier::High);

        let constrained = MemoryPolicyConfig {
            tiering: TieringMode::Constrained,
            ..Default::default()
        };
        let detection = detect_memory_tier(&probe, &constrained);
        assert_eq!(detection.tier, MemoryTier::Low);
        assert_eq!(detection.source, DetectionSource::Configured);
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn probe_is_queried_once() {
        let probe = CountingProbe {
            total: 64 * MIB,
            calls: AtomicUsize::new(0),
        };
        detect_memory_tier(&probe, &MemoryPolicyConfig::default());
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
    }
}
