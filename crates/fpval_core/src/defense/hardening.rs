//! Browser-specific hardening steps for the protections a status is missing.

use super::{DefenseGap, DefenseStatus};
use crate::math::round_to;
use crate::population::BrowserFamily;
use crate::snapshot::FingerprintSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardeningStep {
    pub gap: DefenseGap,
    pub title: String,
    pub instructions: String,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardeningGuide {
    pub browser: BrowserFamily,
    pub current_score: f64,
    /// `min(100, current + Σ step points)`
    pub potential_score: f64,
    pub steps: Vec<HardeningStep>,
}

fn instructions(browser: BrowserFamily, gap: DefenseGap) -> &'static str {
    use BrowserFamily::*;
    use DefenseGap::*;

    match (gap, browser) {
        (AdBlocker, Firefox) => "Install uBlock Origin from addons.mozilla.org.",
        (AdBlocker, Chrome) | (AdBlocker, Edge) => {
            "Install uBlock Origin Lite from your browser's extension store."
        }
        (AdBlocker, Safari) => "Install a content blocker such as AdGuard from the App Store.",
        (AdBlocker, Opera) => "Turn on Block ads and Block trackers under Settings > Privacy protection.",
        (AdBlocker, Other) => "Install a reputable content blocker such as uBlock Origin.",

        (CanvasProtection, Firefox) | (WebGlProtection, Firefox) | (AudioProtection, Firefox) => {
            "Set privacy.resistFingerprinting to true in about:config."
        }
        (CanvasProtection, Safari) | (WebGlProtection, Safari) | (AudioProtection, Safari) => {
            "Enable Advanced Tracking and Fingerprinting Protection for all browsing in Settings > Advanced."
        }
        (CanvasProtection, Edge) | (WebGlProtection, Edge) | (AudioProtection, Edge) => {
            "Set Tracking prevention to Strict in edge://settings/privacy and add a fingerprint-randomizing extension."
        }
        (CanvasProtection, _) | (AudioProtection, _) => {
            "Install a fingerprint-randomizing extension such as CanvasBlocker, or switch to Brave."
        }
        (WebGlProtection, _) => {
            "Disable WebGL or install an extension that masks the unmasked renderer string."
        }

        (GlobalPrivacyControl, Firefox) => {
            "Enable 'Tell websites not to sell or share my data' under Settings > Privacy & Security."
        }
        (GlobalPrivacyControl, _) => {
            "Install an extension that sends the Sec-GPC header, such as Privacy Badger."
        }

        (DoNotTrack, Firefox) => "Enable 'Send a Do Not Track request' under Settings > Privacy & Security.",
        (DoNotTrack, Chrome) => "Turn on 'Send a Do Not Track request' in chrome://settings/cookies.",
        (DoNotTrack, Edge) => "Turn on 'Send Do Not Track requests' in edge://settings/privacy.",
        (DoNotTrack, Safari) => "Safari no longer sends Do-Not-Track; rely on GPC and tracking protection instead.",
        (DoNotTrack, _) => "Enable the Do-Not-Track option in your browser's privacy settings.",

        (NetworkPrivacy, Opera) => "Enable the built-in VPN under Settings > Features.",
        (NetworkPrivacy, _) => "Use a trustworthy VPN, or Tor Browser for the strongest network privacy.",

        (FontLimiting, Firefox) => {
            "Set layout.css.font-visibility.standard to 1 in about:config to expose only system fonts."
        }
        (FontLimiting, _) => "Uninstall fonts you do not need, or use a browser that restricts font enumeration.",

        (ApiSurface, Firefox) => {
            "Set media.peerconnection.enabled and dom.battery.enabled to false in about:config."
        }
        (ApiSurface, Chrome) | (ApiSurface, Edge) | (ApiSurface, Opera) => {
            "Block location, notifications, USB and Bluetooth under Site settings, and disable WebRTC IP leaks."
        }
        (ApiSurface, _) => "Deny location, notification and device permissions by default.",
    }
}

/// Steps for every protection `status` is missing, tailored to the browser
/// parsed from the snapshot's user agent.
pub fn generate_hardening_guide(
    snapshot: &FingerprintSnapshot,
    status: &DefenseStatus,
) -> HardeningGuide {
    let browser = BrowserFamily::from_user_agent(&snapshot.software.user_agent);

    let steps: Vec<HardeningStep> = status
        .gaps()
        .into_iter()
        .map(|gap| HardeningStep {
            gap,
            title: gap.title().to_string(),
            instructions: instructions(browser, gap).to_string(),
            points: status.gap_points(gap),
        })
        .collect();

    let gained: f64 = steps.iter().map(|s| s.points).sum();
    let potential_score = round_to((status.score + gained).min(100.0), 2).max(status.score);

    HardeningGuide {
        browser,
        current_score: status.score,
        potential_score,
        steps,
    }
}
