//! Population share tables
//!
//! Fixed reference data: the share of the browsing population that exhibits a
//! given attribute value. Nothing here is learned; tables can be replaced
//! wholesale through a config file.

use serde::{Deserialize, Serialize};

/// A lookup of attribute value -> population share in (0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareTable {
    pub entries: Vec<ShareEntry>,
    /// Share assumed for values not listed
    pub fallback: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareEntry {
    pub key: String,
    pub share: f64,
}

impl ShareTable {
    pub fn new(entries: &[(&str, f64)], fallback: f64) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(key, share)| ShareEntry {
                    key: (*key).to_string(),
                    share: *share,
                })
                .collect(),
            fallback,
        }
    }

    /// Case-insensitive exact match.
    pub fn lookup(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.key.eq_ignore_ascii_case(key))
            .map(|e| e.share)
    }

    pub fn share(&self, key: &str) -> f64 {
        self.lookup(key).unwrap_or(self.fallback)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }
}

/// Canonical table key for a numeric attribute (`16.0` -> "16", `1.25` -> "1.25").
pub fn numeric_key(value: f64) -> String {
    format!("{}", value)
}

/// Step bucket: values up to and including `max` map to `value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub max: f64,
    pub value: f64,
}

/// Ascending step function with a ceiling value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepTable {
    pub steps: Vec<Step>,
    /// Value above the last step
    pub above: f64,
}

impl StepTable {
    pub fn new(steps: &[(f64, f64)], above: f64) -> Self {
        Self {
            steps: steps
                .iter()
                .map(|&(max, value)| Step { max, value })
                .collect(),
            above,
        }
    }

    /// First step whose bound is not exceeded (inclusive upper bound).
    pub fn value_at_most(&self, x: f64) -> f64 {
        self.steps
            .iter()
            .find(|s| x <= s.max)
            .map(|s| s.value)
            .unwrap_or(self.above)
    }

    /// First step whose bound is strictly greater (exclusive upper bound).
    pub fn value_below(&self, x: f64) -> f64 {
        self.steps
            .iter()
            .find(|s| x < s.max)
            .map(|s| s.value)
            .unwrap_or(self.above)
    }
}

/// Reference data for the entropy estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntropyTables {
    /// Fixed contribution of an exposed canvas hash
    pub canvas_bits: f64,
    /// Fixed contribution of an exposed WebGL hash
    pub webgl_bits: f64,
    /// Extra bits when the WebGL renderer string leaks
    pub webgl_renderer_bits: f64,
    /// Fixed contribution of an exposed audio hash
    pub audio_bits: f64,
    /// Font count -> bits (inclusive upper bounds)
    pub font_bits: StepTable,
    pub plugin_bits_each: f64,
    pub plugin_bits_cap: f64,
    pub screen_resolution: ShareTable,
    pub pixel_ratio: ShareTable,
    pub platform: ShareTable,
    pub timezone: ShareTable,
    pub language: ShareTable,
    pub cpu_cores: ShareTable,
    pub device_memory: ShareTable,
    pub touch_points: ShareTable,
    /// Share of the browser family + major version in circulation
    pub user_agent_family: ShareTable,
    /// Keys "enabled" / "disabled"
    pub do_not_track: ShareTable,
    pub effective_type: ShareTable,
    /// Size of the population the bucket estimate divides
    pub assumed_total_users: f64,
    /// Mean total bits of a typical browser
    pub reference_average_bits: f64,
}

impl Default for EntropyTables {
    fn default() -> Self {
        Self {
            canvas_bits: 8.0,
            webgl_bits: 6.0,
            webgl_renderer_bits: 4.0,
            audio_bits: 5.0,
            font_bits: StepTable::new(&[(0.0, 0.0), (10.0, 3.0), (30.0, 5.0), (60.0, 7.0)], 9.0),
            plugin_bits_each: 0.5,
            plugin_bits_cap: 4.0,
            screen_resolution: ShareTable::new(
                &[
                    ("1920x1080", 0.23),
                    ("1366x768", 0.10),
                    ("1536x864", 0.08),
                    ("390x844", 0.05),
                    ("360x800", 0.06),
                    ("1440x900", 0.05),
                    ("414x896", 0.04),
                    ("1280x720", 0.04),
                    ("2560x1440", 0.03),
                    ("3840x2160", 0.02),
                ],
                0.005,
            ),
            pixel_ratio: ShareTable::new(
                &[("1", 0.45), ("2", 0.25), ("3", 0.12), ("1.25", 0.08), ("1.5", 0.06)],
                0.02,
            ),
            platform: ShareTable::new(
                &[
                    ("Win32", 0.62),
                    ("MacIntel", 0.16),
                    ("iPhone", 0.08),
                    ("Linux armv8l", 0.05),
                    ("Linux x86_64", 0.03),
                    ("iPad", 0.02),
                ],
                0.01,
            ),
            timezone: ShareTable::new(
                &[
                    ("America/New_York", 0.08),
                    ("America/Chicago", 0.05),
                    ("America/Los_Angeles", 0.05),
                    ("Europe/London", 0.04),
                    ("Europe/Berlin", 0.03),
                    ("Europe/Paris", 0.03),
                    ("Asia/Kolkata", 0.09),
                    ("Asia/Shanghai", 0.10),
                    ("Asia/Tokyo", 0.03),
                    ("America/Sao_Paulo", 0.03),
                    ("UTC", 0.01),
                ],
                0.005,
            ),
            language: ShareTable::new(
                &[
                    ("en-US", 0.38),
                    ("en-GB", 0.05),
                    ("zh-CN", 0.10),
                    ("es-ES", 0.04),
                    ("es", 0.04),
                    ("de-DE", 0.04),
                    ("fr-FR", 0.03),
                    ("ja-JP", 0.03),
                    ("pt-BR", 0.03),
                    ("en", 0.05),
                ],
                0.01,
            ),
            cpu_cores: ShareTable::new(
                &[
                    ("2", 0.08),
                    ("4", 0.30),
                    ("6", 0.12),
                    ("8", 0.28),
                    ("12", 0.08),
                    ("16", 0.06),
                ],
                0.02,
            ),
            device_memory: ShareTable::new(
                &[
                    ("2", 0.06),
                    ("4", 0.22),
                    ("8", 0.45),
                    ("16", 0.12),
                    ("32", 0.03),
                ],
                0.02,
            ),
            touch_points: ShareTable::new(&[("0", 0.55), ("5", 0.25), ("10", 0.12)], 0.03),
            user_agent_family: ShareTable::new(
                &[
                    ("Chrome", 0.25),
                    ("Safari", 0.10),
                    ("Edge", 0.03),
                    ("Firefox", 0.015),
                    ("Opera", 0.01),
                ],
                0.005,
            ),
            do_not_track: ShareTable::new(&[("enabled", 0.12), ("disabled", 0.88)], 0.5),
            effective_type: ShareTable::new(
                &[("4g", 0.85), ("3g", 0.10), ("2g", 0.03), ("slow-2g", 0.01)],
                0.01,
            ),
            assumed_total_users: 5_000_000_000.0,
            reference_average_bits: 27.3,
        }
    }
}

/// Five-way uniqueness classification used by the comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniquenessTier {
    HighlyPrivate,
    Common,
    Distinctive,
    HighlyDistinctive,
    Beacon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniquenessBucket {
    /// Exclusive upper bound on total bits (`None` = open-ended)
    pub below_bits: Option<f64>,
    pub tier: UniquenessTier,
    pub percentile: u8,
    pub description: String,
}

/// Reference data for the population comparator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationTables {
    pub browser: ShareTable,
    pub os: ShareTable,
    /// Ten canned resolution buckets; the fallback is the "Other" bucket
    pub resolution: ShareTable,
    pub device_type: ShareTable,
    /// Privacy posture score -> "better than" percentage (inclusive bounds)
    pub privacy_posture: StepTable,
    /// Ordered by ascending bound; the last bucket is open-ended
    pub uniqueness: Vec<UniquenessBucket>,
    pub global_users: f64,
}

impl Default for PopulationTables {
    fn default() -> Self {
        Self {
            browser: ShareTable::new(
                &[
                    ("Chrome", 0.65),
                    ("Safari", 0.19),
                    ("Edge", 0.05),
                    ("Firefox", 0.03),
                    ("Opera", 0.02),
                ],
                0.06,
            ),
            os: ShareTable::new(
                &[
                    ("Android", 0.42),
                    ("Windows", 0.28),
                    ("iOS", 0.17),
                    ("macOS", 0.06),
                    ("Linux", 0.015),
                    ("ChromeOS", 0.01),
                ],
                0.045,
            ),
            resolution: ShareTable::new(
                &[
                    ("1920x1080", 0.23),
                    ("1366x768", 0.10),
                    ("1536x864", 0.08),
                    ("360x800", 0.06),
                    ("390x844", 0.05),
                    ("1440x900", 0.05),
                    ("414x896", 0.04),
                    ("1280x720", 0.04),
                    ("2560x1440", 0.03),
                    ("3840x2160", 0.02),
                ],
                0.30,
            ),
            device_type: ShareTable::new(
                &[("desktop", 0.55), ("mobile", 0.42), ("tablet", 0.03)],
                0.03,
            ),
            privacy_posture: StepTable::new(
                &[(0.0, 20.0), (20.0, 45.0), (50.0, 70.0), (80.0, 88.0)],
                97.0,
            ),
            uniqueness: vec![
                UniquenessBucket {
                    below_bits: Some(15.0),
                    tier: UniquenessTier::HighlyPrivate,
                    percentile: 90,
                    description: "Highly private: you blend into a very large crowd".into(),
                },
                UniquenessBucket {
                    below_bits: Some(25.0),
                    tier: UniquenessTier::Common,
                    percentile: 70,
                    description: "Common configuration shared by many devices".into(),
                },
                UniquenessBucket {
                    below_bits: Some(35.0),
                    tier: UniquenessTier::Distinctive,
                    percentile: 45,
                    description: "Distinctive: a small group of devices looks like yours".into(),
                },
                UniquenessBucket {
                    below_bits: Some(45.0),
                    tier: UniquenessTier::HighlyDistinctive,
                    percentile: 20,
                    description: "Highly distinctive: few devices share this fingerprint".into(),
                },
                UniquenessBucket {
                    below_bits: None,
                    tier: UniquenessTier::Beacon,
                    percentile: 5,
                    description: "Beacon-like: this device is trivially re-identified".into(),
                },
            ],
            global_users: 5_000_000_000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_lookup_case_insensitive() {
        let table = ShareTable::new(&[("Chrome", 0.65)], 0.06);
        assert_eq!(table.share("chrome"), 0.65);
        assert_eq!(table.share("Lynx"), 0.06);
        assert!(!table.contains("Lynx"));
    }

    #[test]
    fn test_numeric_key_formatting() {
        assert_eq!(numeric_key(16.0), "16");
        assert_eq!(numeric_key(1.25), "1.25");
    }

    #[test]
    fn test_step_table_bounds() {
        let steps = StepTable::new(&[(10.0, 1.0), (20.0, 2.0)], 3.0);
        assert_eq!(steps.value_at_most(10.0), 1.0);
        assert_eq!(steps.value_below(10.0), 2.0);
        assert_eq!(steps.value_at_most(25.0), 3.0);
    }

    #[test]
    fn test_default_shares_are_probabilities() {
        let entropy = EntropyTables::default();
        for table in [
            &entropy.screen_resolution,
            &entropy.pixel_ratio,
            &entropy.timezone,
            &entropy.cpu_cores,
            &entropy.device_memory,
        ] {
            assert!(table.entries.iter().all(|e| e.share > 0.0 && e.share < 1.0));
            assert!(table.fallback > 0.0 && table.fallback < 1.0);
        }
        let population = PopulationTables::default();
        assert_eq!(population.resolution.entries.len(), 10);
        assert!(population.uniqueness.last().unwrap().below_bits.is_none());
    }
}
