//! Persona rules and bidder profiles
//!
//! Both catalogs are plain data. The persona matcher and the auction read them
//! through `ValuationConfig`, so tests can swap in a smaller catalog.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Persona rules
// ============================================================================

/// Snapshot field a persona condition inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalField {
    DeviceMemory,
    CpuCores,
    ScreenWidth,
    PixelRatio,
    TouchPoints,
    WebGl2,
    WebAssembly,
    ServiceWorker,
    DoNotTrack,
    GlobalPrivacyControl,
}

impl SignalField {
    /// Every field the matcher understands.
    pub const ALL: [SignalField; 10] = [
        SignalField::DeviceMemory,
        SignalField::CpuCores,
        SignalField::ScreenWidth,
        SignalField::PixelRatio,
        SignalField::TouchPoints,
        SignalField::WebGl2,
        SignalField::WebAssembly,
        SignalField::ServiceWorker,
        SignalField::DoNotTrack,
        SignalField::GlobalPrivacyControl,
    ];
}

/// Range-or-boolean test over one field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConditionTest {
    /// Inclusive bounds; an absent bound is unconstrained
    Range { min: Option<f64>, max: Option<f64> },
    Flag { expected: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: SignalField,
    pub test: ConditionTest,
}

impl Condition {
    pub fn at_least(field: SignalField, min: f64) -> Self {
        Self {
            field,
            test: ConditionTest::Range {
                min: Some(min),
                max: None,
            },
        }
    }

    pub fn at_most(field: SignalField, max: f64) -> Self {
        Self {
            field,
            test: ConditionTest::Range {
                min: None,
                max: Some(max),
            },
        }
    }

    pub fn between(field: SignalField, min: f64, max: f64) -> Self {
        Self {
            field,
            test: ConditionTest::Range {
                min: Some(min),
                max: Some(max),
            },
        }
    }

    pub fn flag(field: SignalField, expected: bool) -> Self {
        Self {
            field,
            test: ConditionTest::Flag { expected },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaRule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub value_multiplier: f64,
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaCatalog {
    /// Declaration order breaks confidence ties
    pub rules: Vec<PersonaRule>,
    pub fallback_id: String,
    pub fallback_name: String,
    pub fallback_description: String,
}

impl Default for PersonaCatalog {
    fn default() -> Self {
        use SignalField::*;

        let rule = |id: &str, name: &str, description: &str, multiplier: f64, conditions| {
            PersonaRule {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                value_multiplier: multiplier,
                conditions,
            }
        };

        Self {
            rules: vec![
                rule(
                    "affluent_professional",
                    "Affluent Professional",
                    "High-end hardware suggests above-average disposable income",
                    1.8,
                    vec![
                        Condition::at_least(DeviceMemory, 16.0),
                        Condition::at_least(CpuCores, 8.0),
                        Condition::at_least(PixelRatio, 2.0),
                    ],
                ),
                rule(
                    "gamer",
                    "Gamer",
                    "Powerful GPU-capable desktop with a large display",
                    1.4,
                    vec![
                        Condition::at_least(CpuCores, 8.0),
                        Condition::flag(WebGl2, true),
                        Condition::at_least(ScreenWidth, 1920.0),
                        Condition::at_most(TouchPoints, 0.0),
                    ],
                ),
                rule(
                    "tech_enthusiast",
                    "Tech Enthusiast",
                    "Modern browser platform features and capable hardware",
                    1.3,
                    vec![
                        Condition::flag(WebAssembly, true),
                        Condition::flag(ServiceWorker, true),
                        Condition::at_least(CpuCores, 4.0),
                        Condition::at_least(DeviceMemory, 8.0),
                    ],
                ),
                rule(
                    "mobile_first",
                    "Mobile-First User",
                    "Touch device with a compact screen",
                    1.1,
                    vec![
                        Condition::at_least(TouchPoints, 1.0),
                        Condition::at_most(ScreenWidth, 1024.0),
                    ],
                ),
                rule(
                    "budget_conscious",
                    "Budget Conscious",
                    "Entry-level hardware, typically price-sensitive shoppers",
                    0.7,
                    vec![
                        Condition::at_most(DeviceMemory, 4.0),
                        Condition::at_most(CpuCores, 4.0),
                    ],
                ),
                rule(
                    "privacy_conscious",
                    "Privacy Conscious",
                    "Sends explicit opt-out signals to every site",
                    0.6,
                    vec![
                        Condition::flag(DoNotTrack, true),
                        Condition::flag(GlobalPrivacyControl, true),
                    ],
                ),
            ],
            fallback_id: "general".to_string(),
            fallback_name: "General Audience".to_string(),
            fallback_description: "No distinctive segment detected".to_string(),
        }
    }
}

// ============================================================================
// Bidder profiles
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformMultipliers {
    pub desktop: f64,
    pub mobile: f64,
    pub tablet: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionMultipliers {
    /// IANA timezone -> factor
    pub by_timezone: BTreeMap<String, f64>,
    pub default: f64,
}

impl RegionMultipliers {
    pub fn new(entries: &[(&str, f64)], default: f64) -> Self {
        Self {
            by_timezone: entries
                .iter()
                .map(|(tz, f)| ((*tz).to_string(), *f))
                .collect(),
            default,
        }
    }

    pub fn factor(&self, timezone: &str) -> f64 {
        self.by_timezone
            .get(timezone)
            .copied()
            .unwrap_or(self.default)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidderProfile {
    pub id: String,
    pub name: String,
    pub baseline_cpm: f64,
    pub target_personas: Vec<String>,
    pub platform_multiplier: PlatformMultipliers,
    pub region_multiplier: RegionMultipliers,
}

/// Bidder catalog plus the auction's pricing curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionTables {
    pub bidders: Vec<BidderProfile>,
    pub variance_min: f64,
    pub variance_max: f64,
    /// Total bits -> price multiplier (exclusive upper bounds)
    pub entropy_multiplier: super::tables::StepTable,
    pub annual_page_views: f64,
}

impl Default for AuctionTables {
    fn default() -> Self {
        let platform = |desktop, mobile, tablet| PlatformMultipliers {
            desktop,
            mobile,
            tablet,
        };
        let bidder = |id: &str,
                      name: &str,
                      baseline_cpm: f64,
                      targets: &[&str],
                      platform_multiplier,
                      region_multiplier| BidderProfile {
            id: id.to_string(),
            name: name.to_string(),
            baseline_cpm,
            target_personas: targets.iter().map(|t| t.to_string()).collect(),
            platform_multiplier,
            region_multiplier,
        };

        Self {
            bidders: vec![
                bidder(
                    "google_ads",
                    "Google Ads",
                    2.80,
                    &["affluent_professional", "tech_enthusiast"],
                    platform(1.0, 0.9, 0.95),
                    RegionMultipliers::new(
                        &[
                            ("America/New_York", 1.4),
                            ("America/Los_Angeles", 1.35),
                            ("America/Chicago", 1.25),
                            ("Europe/London", 1.2),
                            ("Europe/Berlin", 1.1),
                            ("Asia/Tokyo", 1.15),
                        ],
                        0.75,
                    ),
                ),
                bidder(
                    "meta_audience",
                    "Meta Audience Network",
                    2.20,
                    &["mobile_first", "gamer"],
                    platform(0.85, 1.2, 1.0),
                    RegionMultipliers::new(
                        &[
                            ("America/New_York", 1.35),
                            ("America/Los_Angeles", 1.3),
                            ("Europe/London", 1.15),
                        ],
                        0.7,
                    ),
                ),
                bidder(
                    "amazon_dsp",
                    "Amazon DSP",
                    3.10,
                    &["affluent_professional"],
                    platform(1.0, 0.95, 1.05),
                    RegionMultipliers::new(
                        &[
                            ("America/New_York", 1.4),
                            ("America/Los_Angeles", 1.3),
                            ("Europe/London", 1.15),
                        ],
                        0.7,
                    ),
                ),
                bidder(
                    "trade_desk",
                    "The Trade Desk",
                    2.50,
                    &["tech_enthusiast", "gamer"],
                    platform(1.05, 0.9, 0.95),
                    RegionMultipliers::new(
                        &[
                            ("America/New_York", 1.3),
                            ("America/Chicago", 1.2),
                            ("America/Toronto", 1.15),
                        ],
                        0.75,
                    ),
                ),
                bidder(
                    "criteo",
                    "Criteo",
                    1.60,
                    &["budget_conscious", "mobile_first"],
                    platform(1.0, 1.05, 1.0),
                    RegionMultipliers::new(
                        &[
                            ("Europe/Paris", 1.25),
                            ("America/New_York", 1.2),
                            ("Europe/London", 1.15),
                        ],
                        0.8,
                    ),
                ),
                bidder(
                    "data_broker",
                    "Data Broker Exchange",
                    0.90,
                    &["privacy_conscious"],
                    platform(1.0, 1.0, 1.0),
                    RegionMultipliers::new(&[("America/New_York", 1.25)], 0.9),
                ),
            ],
            variance_min: 0.9,
            variance_max: 1.1,
            entropy_multiplier: super::tables::StepTable::new(
                &[(15.0, 0.6), (25.0, 0.8), (35.0, 1.0), (45.0, 1.25)],
                1.5,
            ),
            annual_page_views: 4000.0,
        }
    }
}
