//! # Population Comparator
//!
//! Places a snapshot against canned market-share tables.
//!
//! - Browser / OS families are parsed from user-agent substrings.
//! - `percentile = round((1 - share) * 100)`: rarer values rank higher.
//! - Overall uniqueness is a pure function of total entropy bits.

use crate::config::{PopulationTables, UniquenessBucket, UniquenessTier};
use crate::math::{population_bucket, round_to, safe_div};
use crate::snapshot::FingerprintSnapshot;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Browser family parsed from a user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserFamily {
    Firefox,
    Safari,
    Edge,
    Chrome,
    Opera,
    Other,
}

const CHROMIUM_MARKERS: [&str; 6] = ["Chrome/", "Chromium/", "CriOS", "Edg", "OPR/", "Opera"];

impl BrowserFamily {
    /// Precedence: Firefox, Safari, Edge, Chrome, Opera.
    ///
    /// Chromium browsers all advertise "Safari/", so Safari requires the
    /// absence of every Chromium marker, and Chrome the absence of the Opera one.
    pub fn from_user_agent(ua: &str) -> Self {
        if ua.contains("Firefox/") || ua.contains("FxiOS") {
            BrowserFamily::Firefox
        } else if ua.contains("Safari/") && !CHROMIUM_MARKERS.iter().any(|m| ua.contains(m)) {
            BrowserFamily::Safari
        } else if ua.contains("Edg/") || ua.contains("Edge/") || ua.contains("EdgA/") || ua.contains("EdgiOS") {
            BrowserFamily::Edge
        } else if (ua.contains("Chrome/") || ua.contains("CriOS")) && !ua.contains("OPR/") {
            BrowserFamily::Chrome
        } else if ua.contains("OPR/") || ua.contains("Opera") {
            BrowserFamily::Opera
        } else {
            BrowserFamily::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserFamily::Firefox => "Firefox",
            BrowserFamily::Safari => "Safari",
            BrowserFamily::Edge => "Edge",
            BrowserFamily::Chrome => "Chrome",
            BrowserFamily::Opera => "Opera",
            BrowserFamily::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsFamily {
    Windows,
    Ios,
    Android,
    ChromeOs,
    MacOs,
    Linux,
    Other,
}

impl OsFamily {
    /// iOS before macOS (iPad UAs claim "Mac OS X"), Android before Linux.
    pub fn from_user_agent(ua: &str) -> Self {
        if ua.contains("Windows") {
            OsFamily::Windows
        } else if ua.contains("iPhone") || ua.contains("iPad") || ua.contains("iPod") {
            OsFamily::Ios
        } else if ua.contains("Android") {
            OsFamily::Android
        } else if ua.contains("CrOS") {
            OsFamily::ChromeOs
        } else if ua.contains("Mac OS X") || ua.contains("Macintosh") {
            OsFamily::MacOs
        } else if ua.contains("Linux") {
            OsFamily::Linux
        } else {
            OsFamily::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OsFamily::Windows => "Windows",
            OsFamily::Ios => "iOS",
            OsFamily::Android => "Android",
            OsFamily::ChromeOs => "ChromeOS",
            OsFamily::MacOs => "macOS",
            OsFamily::Linux => "Linux",
            OsFamily::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Browser,
    OperatingSystem,
    ScreenResolution,
    DeviceType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionComparison {
    pub dimension: Dimension,
    pub value: String,
    pub population_share: f64,
    pub percentile: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyTool {
    DoNotTrack,
    GlobalPrivacyControl,
    FingerprintBlocking,
}

impl PrivacyTool {
    fn weight(&self) -> u32 {
        match self {
            PrivacyTool::DoNotTrack => 20,
            PrivacyTool::GlobalPrivacyControl => 30,
            PrivacyTool::FingerprintBlocking => 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivacyPosture {
    pub tools: Vec<PrivacyTool>,
    /// 0..=100
    pub score: u8,
    pub percentile: u8,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallUniqueness {
    pub percentile: u8,
    pub tier: UniquenessTier,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationComparison {
    pub dimensions: Vec<DimensionComparison>,
    pub privacy: PrivacyPosture,
    /// Mean of the dimension percentiles, 0 when there are none
    pub average_percentile: f64,
    pub overall: OverallUniqueness,
    pub similar_devices: u64,
    pub one_in: u64,
}

/// `round((1 - share) * 100)`, clamped to 0..=100.
pub fn percentile_for_share(share: f64) -> u8 {
    ((1.0 - share.clamp(0.0, 1.0)) * 100.0).round() as u8
}

fn dimension(share: f64, dimension: Dimension, value: impl Into<String>) -> DimensionComparison {
    DimensionComparison {
        dimension,
        value: value.into(),
        population_share: share,
        percentile: percentile_for_share(share),
    }
}

pub fn assess_privacy_posture(snapshot: &FingerprintSnapshot, tables: &PopulationTables) -> PrivacyPosture {
    let mut tools = Vec::new();
    if snapshot.software.do_not_track {
        tools.push(PrivacyTool::DoNotTrack);
    }
    if snapshot.software.global_privacy_control {
        tools.push(PrivacyTool::GlobalPrivacyControl);
    }
    if snapshot.any_fingerprint_blocking() {
        tools.push(PrivacyTool::FingerprintBlocking);
    }

    let score = tools.iter().map(|t| t.weight()).sum::<u32>().min(100) as u8;
    let percentile = tables.privacy_posture.value_at_most(score as f64).clamp(0.0, 100.0) as u8;

    PrivacyPosture {
        summary: format!("More private than {}% of users", percentile),
        tools,
        score,
        percentile,
    }
}

/// Uniqueness bucket for `bits`; tables without buckets yield a neutral answer.
pub fn overall_uniqueness(bits: f64, buckets: &[UniquenessBucket]) -> OverallUniqueness {
    buckets
        .iter()
        .find(|b| b.below_bits.map_or(true, |limit| bits < limit))
        .or_else(|| buckets.last())
        .map(|b| OverallUniqueness {
            percentile: b.percentile,
            tier: b.tier,
            description: b.description.clone(),
        })
        .unwrap_or_else(|| OverallUniqueness {
            percentile: 50,
            tier: UniquenessTier::Distinctive,
            description: "No reference population available".to_string(),
        })
}

pub fn compare_to_population(
    snapshot: &FingerprintSnapshot,
    total_bits: f64,
    tables: &PopulationTables,
) -> PopulationComparison {
    let ua = snapshot.software.user_agent.as_str();
    let browser = BrowserFamily::from_user_agent(ua);
    let os = OsFamily::from_user_agent(ua);
    let resolution = snapshot
        .hardware
        .screen
        .resolution_key()
        .filter(|key| tables.resolution.contains(key))
        .unwrap_or_else(|| "Other".to_string());
    let device = snapshot.device_class();

    let dimensions = vec![
        dimension(tables.browser.share(browser.as_str()), Dimension::Browser, browser.as_str()),
        dimension(tables.os.share(os.as_str()), Dimension::OperatingSystem, os.as_str()),
        dimension(tables.resolution.share(&resolution), Dimension::ScreenResolution, resolution),
        dimension(tables.device_type.share(device.as_str()), Dimension::DeviceType, device.as_str()),
    ];

    let average_percentile = round_to(
        safe_div(
            dimensions.iter().map(|d| d.percentile as f64).sum(),
            dimensions.len() as f64,
        ),
        1,
    );

    let similar = population_bucket(tables.global_users, total_bits);
    let similar_devices = similar.floor() as u64;
    let one_in = safe_div(tables.global_users, similar).round() as u64;

    debug!(
        browser = browser.as_str(),
        os = os.as_str(),
        similar_devices,
        "population comparison computed"
    );

    PopulationComparison {
        dimensions,
        privacy: assess_privacy_posture(snapshot, tables),
        average_percentile,
        overall: overall_uniqueness(total_bits, &tables.uniqueness),
        similar_devices,
        one_in,
    }
}
