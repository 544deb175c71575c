//! # Entropy Estimator
//!
//! Converts each fingerprint signal into bits of distinguishing information.
//!
//! - Hardware render probes (canvas, WebGL, audio) use fixed baselines.
//! - Everything else is a rarity lookup: `bits = -log2(population share)`.
//! - A blocked or spoofed probe contributes exactly zero bits.
//!
//! The aggregate is always `round(Σ component bits, 1)`.

mod report;

pub use report::{
    compare_to_average, compare_to_reference, generate_entropy_report, AverageBucket,
    AverageComparison, EntropyReport, EntropyTier,
};

use crate::config::{numeric_key, EntropyTables};
use crate::math::round_to;
use crate::population::BrowserFamily;
use crate::snapshot::FingerprintSnapshot;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Bits of information carried by an event with probability `p`.
///
/// Degenerate probabilities (`p <= 0`, `p >= 1`, NaN) carry no information.
pub fn entropy_bits(p: f64) -> f64 {
    if p.is_nan() || p <= 0.0 || p >= 1.0 {
        return 0.0;
    }
    -p.log2()
}

/// Fingerprint signal scored by the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Canvas,
    WebGl,
    Audio,
    ScreenResolution,
    PixelRatio,
    CpuCores,
    DeviceMemory,
    TouchPoints,
    Platform,
    Timezone,
    Language,
    UserAgent,
    Fonts,
    Plugins,
    DoNotTrack,
    Connection,
}

impl Signal {
    pub const ALL: [Signal; 16] = [
        Signal::Canvas,
        Signal::WebGl,
        Signal::Audio,
        Signal::ScreenResolution,
        Signal::PixelRatio,
        Signal::CpuCores,
        Signal::DeviceMemory,
        Signal::TouchPoints,
        Signal::Platform,
        Signal::Timezone,
        Signal::Language,
        Signal::UserAgent,
        Signal::Fonts,
        Signal::Plugins,
        Signal::DoNotTrack,
        Signal::Connection,
    ];

    pub fn display(&self) -> &'static str {
        match self {
            Signal::Canvas => "Canvas",
            Signal::WebGl => "WebGL",
            Signal::Audio => "Audio",
            Signal::ScreenResolution => "Screen Resolution",
            Signal::PixelRatio => "Pixel Ratio",
            Signal::CpuCores => "CPU Cores",
            Signal::DeviceMemory => "Device Memory",
            Signal::TouchPoints => "Touch Points",
            Signal::Platform => "Platform",
            Signal::Timezone => "Timezone",
            Signal::Language => "Language",
            Signal::UserAgent => "User Agent",
            Signal::Fonts => "Fonts",
            Signal::Plugins => "Plugins",
            Signal::DoNotTrack => "Do Not Track",
            Signal::Connection => "Connection",
        }
    }
}

/// Qualitative rarity of a signal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    VeryCommon,
    Common,
    Uncommon,
    Rare,
    VeryRare,
}

impl Rarity {
    /// Label for a single component.
    pub fn for_component(bits: f64) -> Self {
        if bits < 1.0 {
            Rarity::VeryCommon
        } else if bits < 3.0 {
            Rarity::Common
        } else if bits < 6.0 {
            Rarity::Uncommon
        } else if bits < 10.0 {
            Rarity::Rare
        } else {
            Rarity::VeryRare
        }
    }

    /// Label for a whole fingerprint; cut points follow the entropy tiers.
    pub fn for_total(bits: f64) -> Self {
        if bits < 20.0 {
            Rarity::VeryCommon
        } else if bits < 30.0 {
            Rarity::Common
        } else if bits < 40.0 {
            Rarity::Uncommon
        } else if bits < 50.0 {
            Rarity::Rare
        } else {
            Rarity::VeryRare
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentEntropy {
    pub signal: Signal,
    pub bits: f64,
    pub rarity: Rarity,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateEntropy {
    pub bits: f64,
    pub rarity: Rarity,
}

/// Per-signal bits plus their rounded sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyBreakdown {
    /// One entry per [`Signal`], in [`Signal::ALL`] order
    pub components: Vec<ComponentEntropy>,
    pub total: AggregateEntropy,
}

impl EntropyBreakdown {
    pub fn from_components(components: Vec<ComponentEntropy>) -> Self {
        let sum: f64 = components.iter().map(|c| c.bits).sum();
        let bits = round_to(sum, 1);
        Self {
            components,
            total: AggregateEntropy {
                bits,
                rarity: Rarity::for_total(bits),
            },
        }
    }

    pub fn bits_for(&self, signal: Signal) -> f64 {
        self.components
            .iter()
            .find(|c| c.signal == signal)
            .map(|c| c.bits)
            .unwrap_or(0.0)
    }

    /// Components sorted by contribution, largest first.
    pub fn top_contributors(&self, n: usize) -> Vec<ComponentEntropy> {
        let mut sorted = self.components.clone();
        sorted.sort_by(|a, b| b.bits.total_cmp(&a.bits));
        sorted.truncate(n);
        sorted
    }
}

fn signal_bits(snapshot: &FingerprintSnapshot, tables: &EntropyTables, signal: Signal) -> f64 {
    let hw = &snapshot.hardware;
    let sw = &snapshot.software;

    match signal {
        Signal::Canvas => {
            if hw.canvas.exposes_hash() {
                tables.canvas_bits
            } else {
                0.0
            }
        }
        Signal::WebGl => {
            if !hw.webgl.exposes_hash() {
                0.0
            } else if hw.webgl.exposes_renderer() {
                tables.webgl_bits + tables.webgl_renderer_bits
            } else {
                tables.webgl_bits
            }
        }
        Signal::Audio => {
            if hw.audio.exposes_hash() {
                tables.audio_bits
            } else {
                0.0
            }
        }
        Signal::ScreenResolution => hw
            .screen
            .resolution_key()
            .map(|key| entropy_bits(tables.screen_resolution.share(&key)))
            .unwrap_or(0.0),
        Signal::PixelRatio => {
            if hw.screen.pixel_ratio > 0.0 {
                entropy_bits(tables.pixel_ratio.share(&numeric_key(hw.screen.pixel_ratio)))
            } else {
                0.0
            }
        }
        Signal::CpuCores => match hw.cpu_cores {
            Some(cores) if cores > 0 => entropy_bits(tables.cpu_cores.share(&cores.to_string())),
            _ => 0.0,
        },
        Signal::DeviceMemory => match hw.device_memory_gb {
            Some(gb) if gb > 0.0 => entropy_bits(tables.device_memory.share(&numeric_key(gb))),
            _ => 0.0,
        },
        Signal::TouchPoints => {
            entropy_bits(tables.touch_points.share(&hw.touch_points.to_string()))
        }
        Signal::Platform => non_empty(&sw.platform)
            .map(|p| entropy_bits(tables.platform.share(p)))
            .unwrap_or(0.0),
        Signal::Timezone => non_empty(&sw.timezone)
            .map(|tz| entropy_bits(tables.timezone.share(tz)))
            .unwrap_or(0.0),
        Signal::Language => snapshot
            .primary_language()
            .map(|lang| entropy_bits(tables.language.share(lang)))
            .unwrap_or(0.0),
        Signal::UserAgent => non_empty(&sw.user_agent)
            .map(|ua| {
                let family = BrowserFamily::from_user_agent(ua);
                entropy_bits(tables.user_agent_family.share(family.as_str()))
            })
            .unwrap_or(0.0),
        Signal::Fonts => tables.font_bits.value_at_most(snapshot.font_count() as f64),
        Signal::Plugins => {
            (sw.plugins.len() as f64 * tables.plugin_bits_each).min(tables.plugin_bits_cap)
        }
        Signal::DoNotTrack => {
            let key = if sw.do_not_track { "enabled" } else { "disabled" };
            entropy_bits(tables.do_not_track.share(key))
        }
        Signal::Connection => snapshot
            .network
            .as_ref()
            .and_then(|n| n.effective_type.as_deref())
            .and_then(non_empty)
            .map(|t| entropy_bits(tables.effective_type.share(t)))
            .unwrap_or(0.0),
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Score every signal of `snapshot` against the reference tables.
pub fn calculate_entropy_breakdown(
    snapshot: &FingerprintSnapshot,
    tables: &EntropyTables,
) -> EntropyBreakdown {
    let components: Vec<ComponentEntropy> = Signal::ALL
        .iter()
        .map(|&signal| {
            let bits = round_to(signal_bits(snapshot, tables, signal).max(0.0), 2);
            ComponentEntropy {
                signal,
                bits,
                rarity: Rarity::for_component(bits),
            }
        })
        .collect();

    let breakdown = EntropyBreakdown::from_components(components);
    debug!(
        total_bits = breakdown.total.bits,
        "entropy breakdown computed"
    );
    breakdown
}
