//! # Defense Analyzer
//!
//! Scores how well a browser resists fingerprinting and tracking.
//!
//! ## Score (0-100, clamped)
//!
//! | Signal | Points |
//! |--------|--------|
//! | canvas / WebGL / audio protected | 10 / 10 / 8 |
//! | font list limited | 7 |
//! | Do-Not-Track / GPC | 5 / 10 |
//! | ad blocker | 20 |
//! | Tor (else VPN) | 30 (15) |
//! | sensitive APIs hidden | up to 10 |
//!
//! The tier uses its own point scale over protection level, ad blocker,
//! privacy headers and network privacy. Both scales only ever add points for
//! a protective signal.

mod hardening;

pub use hardening::{generate_hardening_guide, HardeningGuide, HardeningStep};

use crate::math::round_to;
use crate::snapshot::{capability, ExternalHints, FingerprintSnapshot};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// Weights
// ============================================================================

pub const CANVAS_POINTS: f64 = 10.0;
pub const WEBGL_POINTS: f64 = 10.0;
pub const AUDIO_POINTS: f64 = 8.0;
pub const FONTS_LIMITED_POINTS: f64 = 7.0;
pub const DNT_POINTS: f64 = 5.0;
pub const GPC_POINTS: f64 = 10.0;
pub const AD_BLOCKER_POINTS: f64 = 20.0;
pub const TOR_POINTS: f64 = 30.0;
pub const VPN_POINTS: f64 = 15.0;
pub const API_SURFACE_MAX_POINTS: f64 = 10.0;

/// Font lists at or below this size count as limited.
pub const LOW_FONT_COUNT: u32 = 10;

pub const MAX_RECOMMENDATIONS: usize = 5;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionLevel {
    None,
    Basic,
    Enhanced,
    Maximum,
}

impl ProtectionLevel {
    /// From the number of active fingerprint protections (0-4).
    pub fn from_active(active: usize) -> Self {
        match active {
            0 => ProtectionLevel::None,
            1 => ProtectionLevel::Basic,
            2 | 3 => ProtectionLevel::Enhanced,
            _ => ProtectionLevel::Maximum,
        }
    }

    pub fn tier_points(&self) -> u8 {
        match self {
            ProtectionLevel::None => 0,
            ProtectionLevel::Basic => 1,
            ProtectionLevel::Enhanced => 2,
            ProtectionLevel::Maximum => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseTier {
    Exposed,
    Basic,
    Protected,
    Hardened,
    Fortress,
}

impl DefenseTier {
    /// Tier points run 0-7.
    pub fn from_points(points: u8) -> Self {
        match points {
            0 => DefenseTier::Exposed,
            1 | 2 => DefenseTier::Basic,
            3 | 4 => DefenseTier::Protected,
            5 | 6 => DefenseTier::Hardened,
            _ => DefenseTier::Fortress,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DefenseTier::Exposed => "exposed",
            DefenseTier::Basic => "basic",
            DefenseTier::Protected => "protected",
            DefenseTier::Hardened => "hardened",
            DefenseTier::Fortress => "fortress",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyHeaders {
    pub do_not_track: bool,
    pub global_privacy_control: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintProtection {
    pub canvas: bool,
    pub webgl: bool,
    pub audio: bool,
    pub fonts_limited: bool,
    pub level: ProtectionLevel,
}

impl FingerprintProtection {
    pub fn active_count(&self) -> usize {
        [self.canvas, self.webgl, self.audio, self.fonts_limited]
            .iter()
            .filter(|on| **on)
            .count()
    }
}

/// Tor wins when both hints are asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkPrivacy {
    pub vpn: bool,
    pub tor: bool,
}

impl NetworkPrivacy {
    pub fn score_points(&self) -> f64 {
        if self.tor {
            TOR_POINTS
        } else if self.vpn {
            VPN_POINTS
        } else {
            0.0
        }
    }

    pub fn tier_points(&self) -> u8 {
        if self.tor {
            2
        } else if self.vpn {
            1
        } else {
            0
        }
    }

    pub fn any(&self) -> bool {
        self.vpn || self.tor
    }
}

/// A protection the browser is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseGap {
    AdBlocker,
    CanvasProtection,
    WebGlProtection,
    AudioProtection,
    GlobalPrivacyControl,
    DoNotTrack,
    NetworkPrivacy,
    FontLimiting,
    ApiSurface,
}

impl DefenseGap {
    /// Recommendation order, most valuable first.
    pub const PRIORITY: [DefenseGap; 9] = [
        DefenseGap::AdBlocker,
        DefenseGap::CanvasProtection,
        DefenseGap::WebGlProtection,
        DefenseGap::AudioProtection,
        DefenseGap::GlobalPrivacyControl,
        DefenseGap::DoNotTrack,
        DefenseGap::NetworkPrivacy,
        DefenseGap::FontLimiting,
        DefenseGap::ApiSurface,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            DefenseGap::AdBlocker => "Install an ad and tracker blocker",
            DefenseGap::CanvasProtection => "Block or randomize canvas fingerprinting",
            DefenseGap::WebGlProtection => "Hide your WebGL renderer",
            DefenseGap::AudioProtection => "Block audio fingerprinting",
            DefenseGap::GlobalPrivacyControl => "Enable Global Privacy Control",
            DefenseGap::DoNotTrack => "Turn on Do-Not-Track",
            DefenseGap::NetworkPrivacy => "Route traffic through a VPN or Tor",
            DefenseGap::FontLimiting => "Limit the fonts websites can see",
            DefenseGap::ApiSurface => "Restrict sensitive device APIs",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DefenseGap::AdBlocker => {
                "Blocking third-party scripts stops most fingerprinting code from ever running."
            }
            DefenseGap::CanvasProtection => {
                "Your canvas rendering produces a stable hash that identifies your GPU and drivers."
            }
            DefenseGap::WebGlProtection => {
                "Sites can read your exact graphics card model through WebGL."
            }
            DefenseGap::AudioProtection => {
                "Audio processing differences give your device a repeatable signature."
            }
            DefenseGap::GlobalPrivacyControl => {
                "GPC is a legally recognized opt-out of data sale in several jurisdictions."
            }
            DefenseGap::DoNotTrack => {
                "Most sites ignore it, but it costs nothing and some honour it."
            }
            DefenseGap::NetworkPrivacy => {
                "Your IP address ties every fingerprint back to your location."
            }
            DefenseGap::FontLimiting => {
                "A long list of installed fonts is one of the most identifying signals."
            }
            DefenseGap::ApiSurface => {
                "Bluetooth, USB, battery and similar APIs expose extra hardware detail."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseRecommendation {
    pub gap: DefenseGap,
    pub title: String,
    pub description: String,
    /// Score points gained by closing the gap
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseStatus {
    pub ad_blocker: bool,
    pub privacy_headers: PrivacyHeaders,
    pub fingerprint_protection: FingerprintProtection,
    pub network_privacy: NetworkPrivacy,
    /// Sensitive capabilities the snapshot exposes
    pub exposed_sensitive_apis: usize,
    pub api_surface_bonus: f64,
    pub overall_tier: DefenseTier,
    /// 0 - 100
    pub score: f64,
    pub recommendations: Vec<DefenseRecommendation>,
}

impl DefenseStatus {
    /// Missing protections, most valuable first.
    pub fn gaps(&self) -> Vec<DefenseGap> {
        DefenseGap::PRIORITY
            .into_iter()
            .filter(|gap| !self.is_satisfied(*gap))
            .collect()
    }

    pub fn is_satisfied(&self, gap: DefenseGap) -> bool {
        let fp = &self.fingerprint_protection;
        match gap {
            DefenseGap::AdBlocker => self.ad_blocker,
            DefenseGap::CanvasProtection => fp.canvas,
            DefenseGap::WebGlProtection => fp.webgl,
            DefenseGap::AudioProtection => fp.audio,
            DefenseGap::GlobalPrivacyControl => self.privacy_headers.global_privacy_control,
            DefenseGap::DoNotTrack => self.privacy_headers.do_not_track,
            DefenseGap::NetworkPrivacy => self.network_privacy.any(),
            DefenseGap::FontLimiting => fp.fonts_limited,
            DefenseGap::ApiSurface => self.exposed_sensitive_apis == 0,
        }
    }

    /// Score points closing `gap` would add.
    pub fn gap_points(&self, gap: DefenseGap) -> f64 {
        if self.is_satisfied(gap) {
            return 0.0;
        }
        match gap {
            DefenseGap::AdBlocker => AD_BLOCKER_POINTS,
            DefenseGap::CanvasProtection => CANVAS_POINTS,
            DefenseGap::WebGlProtection => WEBGL_POINTS,
            DefenseGap::AudioProtection => AUDIO_POINTS,
            DefenseGap::GlobalPrivacyControl => GPC_POINTS,
            DefenseGap::DoNotTrack => DNT_POINTS,
            DefenseGap::NetworkPrivacy => VPN_POINTS,
            DefenseGap::FontLimiting => FONTS_LIMITED_POINTS,
            DefenseGap::ApiSurface => round_to(API_SURFACE_MAX_POINTS - self.api_surface_bonus, 2),
        }
    }
}

// ============================================================================
// Analysis
// ============================================================================

/// Boolean inputs of the analysis, extracted once from snapshot and hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DefenseSignals {
    pub canvas: bool,
    pub webgl: bool,
    pub audio: bool,
    pub fonts_limited: bool,
    pub do_not_track: bool,
    pub global_privacy_control: bool,
    pub ad_blocker: bool,
    pub vpn: bool,
    pub tor: bool,
    /// 0..=8
    pub exposed_sensitive_apis: usize,
}

impl DefenseSignals {
    pub fn collect(snapshot: &FingerprintSnapshot, hints: &ExternalHints) -> Self {
        let hw = &snapshot.hardware;
        Self {
            canvas: hw.canvas.is_protected(),
            webgl: hw.webgl.is_protected(),
            audio: hw.audio.is_protected(),
            fonts_limited: snapshot.font_count() <= LOW_FONT_COUNT,
            do_not_track: snapshot.software.do_not_track,
            global_privacy_control: snapshot.software.global_privacy_control,
            ad_blocker: hints.ad_blocker,
            vpn: hints.vpn,
            tor: hints.tor,
            exposed_sensitive_apis: capability::SENSITIVE
                .iter()
                .filter(|name| snapshot.capability(name))
                .count(),
        }
    }
}

/// Share of sensitive APIs hidden, scaled to the bonus cap.
pub fn api_surface_bonus(exposed: usize) -> f64 {
    let total = capability::SENSITIVE.len();
    let hidden = total.saturating_sub(exposed);
    round_to(API_SURFACE_MAX_POINTS * hidden as f64 / total as f64, 2)
}

/// Score and tier a set of defense signals.
pub fn evaluate_defenses(signals: &DefenseSignals) -> DefenseStatus {
    let mut fingerprint_protection = FingerprintProtection {
        canvas: signals.canvas,
        webgl: signals.webgl,
        audio: signals.audio,
        fonts_limited: signals.fonts_limited,
        level: ProtectionLevel::None,
    };
    fingerprint_protection.level = ProtectionLevel::from_active(fingerprint_protection.active_count());

    let privacy_headers = PrivacyHeaders {
        do_not_track: signals.do_not_track,
        global_privacy_control: signals.global_privacy_control,
    };
    let network_privacy = NetworkPrivacy {
        vpn: signals.vpn,
        tor: signals.tor,
    };
    let api_bonus = api_surface_bonus(signals.exposed_sensitive_apis);

    let flag = |on: bool, points: f64| if on { points } else { 0.0 };
    let raw = flag(signals.canvas, CANVAS_POINTS)
        + flag(signals.webgl, WEBGL_POINTS)
        + flag(signals.audio, AUDIO_POINTS)
        + flag(signals.fonts_limited, FONTS_LIMITED_POINTS)
        + flag(signals.do_not_track, DNT_POINTS)
        + flag(signals.global_privacy_control, GPC_POINTS)
        + flag(signals.ad_blocker, AD_BLOCKER_POINTS)
        + network_privacy.score_points()
        + api_bonus;
    let score = round_to(raw.clamp(0.0, 100.0), 2);

    let tier_points = fingerprint_protection.level.tier_points()
        + u8::from(signals.ad_blocker)
        + u8::from(signals.do_not_track || signals.global_privacy_control)
        + network_privacy.tier_points();
    let overall_tier = DefenseTier::from_points(tier_points);

    let mut status = DefenseStatus {
        ad_blocker: signals.ad_blocker,
        privacy_headers,
        fingerprint_protection,
        network_privacy,
        exposed_sensitive_apis: signals.exposed_sensitive_apis,
        api_surface_bonus: api_bonus,
        overall_tier,
        score,
        recommendations: Vec::new(),
    };
    let recommendations = status
        .gaps()
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|gap| DefenseRecommendation {
            gap,
            title: gap.title().to_string(),
            description: gap.description().to_string(),
            points: status.gap_points(gap),
        })
        .collect();
    status.recommendations = recommendations;
    status
}

pub fn analyze_defenses(snapshot: &FingerprintSnapshot, hints: &ExternalHints) -> DefenseStatus {
    let status = evaluate_defenses(&DefenseSignals::collect(snapshot, hints));
    debug!(
        score = status.score,
        tier = status.overall_tier.as_str(),
        recommendations = status.recommendations.len(),
        "defenses analyzed"
    );
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{canonical_desktop, hardened_desktop};
    use proptest::prelude::*;

    /// Every boolean combination, with 0..=8 exposed APIs.
    fn all_signal_sets() -> Vec<DefenseSignals> {
        let mut out = Vec::new();
        for bits in 0u16..(1 << 9) {
            let on = |i: u16| bits & (1 << i) != 0;
            for exposed in 0..=capability::SENSITIVE.len() {
                out.push(DefenseSignals {
                    canvas: on(0),
                    webgl: on(1),
                    audio: on(2),
                    fonts_limited: on(3),
                    do_not_track: on(4),
                    global_privacy_control: on(5),
                    ad_blocker: on(6),
                    vpn: on(7),
                    tor: on(8),
                    exposed_sensitive_apis: exposed,
                });
            }
        }
        out
    }

    /// Every single-signal strengthening of `s`.
    fn strengthened(s: &DefenseSignals) -> Vec<DefenseSignals> {
        let flips: [(bool, fn(&mut DefenseSignals)); 10] = [
            (!s.canvas, |n| n.canvas = true),
            (!s.webgl, |n| n.webgl = true),
            (!s.audio, |n| n.audio = true),
            (!s.fonts_limited, |n| n.fonts_limited = true),
            (!s.do_not_track, |n| n.do_not_track = true),
            (!s.global_privacy_control, |n| n.global_privacy_control = true),
            (!s.ad_blocker, |n| n.ad_blocker = true),
            (!s.vpn, |n| n.vpn = true),
            (!s.tor, |n| n.tor = true),
            (s.exposed_sensitive_apis > 0, |n| n.exposed_sensitive_apis -= 1),
        ];
        flips
            .into_iter()
            .filter(|(applies, _)| *applies)
            .map(|(_, flip)| {
                let mut next = *s;
                flip(&mut next);
                next
            })
            .collect()
    }

    #[test]
    fn test_monotone_over_entire_input_space() {
        for signals in all_signal_sets() {
            let base = evaluate_defenses(&signals);
            for next in strengthened(&signals) {
                let better = evaluate_defenses(&next);
                assert!(
                    better.score >= base.score,
                    "score dropped: {:?} -> {:?}",
                    signals,
                    next
                );
                assert!(
                    better.overall_tier >= base.overall_tier,
                    "tier dropped: {:?} -> {:?}",
                    signals,
                    next
                );
            }
        }
    }

    #[test]
    fn test_score_bounds_and_recommendations_everywhere() {
        for signals in all_signal_sets() {
            let status = evaluate_defenses(&signals);
            assert!((0.0..=100.0).contains(&status.score));
            assert!(status.recommendations.len() <= MAX_RECOMMENDATIONS);
            for rec in &status.recommendations {
                assert!(!status.is_satisfied(rec.gap), "{:?} already satisfied", rec.gap);
                assert!(rec.points > 0.0);
            }
        }
    }

    #[test]
    fn test_tor_dominates_vpn() {
        let both = DefenseSignals {
            vpn: true,
            tor: true,
            ..DefenseSignals::default()
        };
        let tor_only = DefenseSignals {
            tor: true,
            ..DefenseSignals::default()
        };
        assert_eq!(evaluate_defenses(&both).score, evaluate_defenses(&tor_only).score);
    }

    #[test]
    fn test_canonical_desktop_is_exposed() {
        let status = analyze_defenses(&canonical_desktop(), &ExternalHints::default());
        assert_eq!(status.overall_tier, DefenseTier::Exposed);
        assert_eq!(status.fingerprint_protection.level, ProtectionLevel::None);
        assert_eq!(status.api_surface_bonus, 0.0);
        assert_eq!(status.score, 0.0);
        assert_eq!(status.recommendations.len(), 5);
        assert_eq!(status.recommendations[0].gap, DefenseGap::AdBlocker);
    }

    #[test]
    fn test_no_ad_blocker_suggestion_when_detected() {
        let hints = ExternalHints {
            ad_blocker: true,
            ..ExternalHints::default()
        };
        let status = analyze_defenses(&canonical_desktop(), &hints);
        assert!(status
            .recommendations
            .iter()
            .all(|r| r.gap != DefenseGap::AdBlocker));
        assert_eq!(status.score, AD_BLOCKER_POINTS);
        assert_eq!(status.overall_tier, DefenseTier::Basic);
    }

    #[test]
    fn test_hardened_desktop_levels() {
        let status = analyze_defenses(&hardened_desktop(), &ExternalHints::default());
        assert_eq!(status.fingerprint_protection.level, ProtectionLevel::Maximum);
        assert_eq!(status.overall_tier, DefenseTier::Protected);
        assert_eq!(status.score, 35.0);
    }

    #[test]
    fn test_fortress_needs_everything() {
        let signals = DefenseSignals {
            canvas: true,
            webgl: true,
            audio: true,
            fonts_limited: true,
            do_not_track: true,
            global_privacy_control: true,
            ad_blocker: true,
            vpn: false,
            tor: true,
            exposed_sensitive_apis: 0,
        };
        let status = evaluate_defenses(&signals);
        assert_eq!(status.overall_tier, DefenseTier::Fortress);
        assert_eq!(status.score, 100.0);
        assert!(status.recommendations.is_empty());
    }

    #[test]
    fn test_api_surface_bonus_scale() {
        assert_eq!(api_surface_bonus(0), 10.0);
        assert_eq!(api_surface_bonus(8), 0.0);
        assert_eq!(api_surface_bonus(4), 5.0);
        assert_eq!(api_surface_bonus(20), 0.0);
    }

    proptest! {
        #[test]
        fn prop_snapshot_hints_never_out_of_range(
            canvas in any::<bool>(),
            dnt in any::<bool>(),
            fonts in 0usize..80,
            ad in any::<bool>(),
            vpn in any::<bool>(),
            tor in any::<bool>(),
        ) {
            let mut snap = canonical_desktop();
            snap.hardware.canvas.spoofed = canvas;
            snap.software.do_not_track = dnt;
            snap.software.fonts = (0..fonts).map(|i| format!("f{i}")).collect();
            let hints = ExternalHints { ad_blocker: ad, vpn, tor };
            let status = analyze_defenses(&snap, &hints);
            prop_assert!((0.0..=100.0).contains(&status.score));
            prop_assert!(status.recommendations.len() <= MAX_RECOMMENDATIONS);
        }
    }
}
