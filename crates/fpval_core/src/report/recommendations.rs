//! Priority-sorted recommendations for the final report.
//!
//! Every entry is gated on its protection still being missing, the same rule
//! the defense analyzer applies to its own short list.

use super::Trackability;
use crate::defense::{DefenseGap, DefenseStatus, ProtectionLevel};
use crate::entropy::{EntropyReport, Rarity, Signal};
use serde::{Deserialize, Serialize};

/// Rarity at which a passive signal earns its own advice.
const SIGNAL_ADVICE_MIN_RARITY: Rarity = Rarity::Rare;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendationSource {
    Defense { gap: DefenseGap },
    Signal { signal: Signal },
    Browser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub source: RecommendationSource,
    pub title: String,
    pub description: String,
}

fn gap_priority(gap: DefenseGap, trackability: Trackability) -> Priority {
    match gap {
        DefenseGap::AdBlocker if trackability >= Trackability::High => Priority::Critical,
        DefenseGap::AdBlocker | DefenseGap::CanvasProtection | DefenseGap::WebGlProtection => {
            Priority::High
        }
        DefenseGap::AudioProtection
        | DefenseGap::GlobalPrivacyControl
        | DefenseGap::NetworkPrivacy => Priority::Medium,
        DefenseGap::DoNotTrack | DefenseGap::FontLimiting | DefenseGap::ApiSurface => Priority::Low,
    }
}

fn signal_advice(signal: Signal) -> Option<(&'static str, &'static str)> {
    match signal {
        Signal::Timezone => Some((
            "Your timezone narrows you down",
            "An uncommon timezone splits you from most users; a VPN alone does not hide it.",
        )),
        Signal::Language => Some((
            "Your language settings are uncommon",
            "Keep a single widely used language in your browser preferences.",
        )),
        Signal::ScreenResolution => Some((
            "Your screen resolution is rare",
            "Browsers with letterboxing report a rounded window size instead.",
        )),
        Signal::UserAgent => Some((
            "Your browser is uncommon",
            "Less common browsers stand out; their user agent alone identifies a small group.",
        )),
        _ => None,
    }
}

/// Defense gaps, a browser switch for highly trackable users, and advice for
/// strongly identifying passive signals, stable-sorted by priority.
pub fn build_recommendations(
    entropy: &EntropyReport,
    defenses: &DefenseStatus,
    trackability: Trackability,
) -> Vec<Recommendation> {
    let mut out: Vec<Recommendation> = Vec::new();

    if trackability >= Trackability::High
        && defenses.fingerprint_protection.level < ProtectionLevel::Maximum
    {
        out.push(Recommendation {
            priority: Priority::Critical,
            source: RecommendationSource::Browser,
            title: "Switch to a fingerprint-resistant browser".to_string(),
            description: "Tor Browser, Mullvad Browser or Brave make every user look alike."
                .to_string(),
        });
    }

    out.extend(defenses.gaps().into_iter().map(|gap| Recommendation {
        priority: gap_priority(gap, trackability),
        source: RecommendationSource::Defense { gap },
        title: gap.title().to_string(),
        description: gap.description().to_string(),
    }));

    out.extend(
        entropy
            .breakdown
            .components
            .iter()
            .filter(|c| c.rarity >= SIGNAL_ADVICE_MIN_RARITY)
            .filter_map(|c| {
                signal_advice(c.signal).map(|(title, description)| Recommendation {
                    priority: Priority::Low,
                    source: RecommendationSource::Signal { signal: c.signal },
                    title: title.to_string(),
                    description: description.to_string(),
                })
            }),
    );

    out.sort_by_key(|r| r.priority);
    out
}
