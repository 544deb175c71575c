//! # Report Synthesizer
//!
//! Runs every analyzer against one snapshot and assembles the
//! [`ValuationReport`].
//!
//! ## Pipeline
//! ```text
//! snapshot ─┬─ entropy ──────────┬─ auction (personas, bits) ─┐
//!           ├─ personas ─────────┘                             │
//!           ├─ defenses (+ hints) ── hardening guide           ├─ summary / card / recommendations
//!           └─ population (bits) ──────────────────────────────┘
//! ```
//!
//! The only non-determinism is the injected variance source plus the report
//! id and timestamps.

mod card;
mod recommendations;
mod verification;

pub use card::{
    build_report_card, crowd_score, entropy_bucket_score, grade_for, tier_bonus, CardComponents,
    Grade, ReportCard,
};
pub use recommendations::{build_recommendations, Priority, Recommendation, RecommendationSource};
pub use verification::{compute_verification, verify_report, VERIFICATION_HEX_LEN};

use crate::auction::{
    annual_value_with, explain_cpm, format_cpm, simulate_rtb_auction, AnnualValue, AuctionResult,
    CpmExplanation, SeededVariance, VarianceSource,
};
use crate::config::ValuationConfig;
use crate::defense::{analyze_defenses, generate_hardening_guide, DefenseStatus, HardeningGuide};
use crate::entropy::{generate_entropy_report, EntropyReport};
use crate::persona::detect_personas;
use crate::population::{compare_to_population, PopulationComparison};
use crate::snapshot::{ExternalHints, FingerprintSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

// ============================================================================
// Report types
// ============================================================================

/// How easily the fingerprint follows the user across sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trackability {
    Hidden,
    Low,
    Medium,
    High,
    Beacon,
}

impl Trackability {
    pub fn from_bits(bits: f64) -> Self {
        if bits < 15.0 {
            Trackability::Hidden
        } else if bits < 25.0 {
            Trackability::Low
        } else if bits < 35.0 {
            Trackability::Medium
        } else if bits < 50.0 {
            Trackability::High
        } else {
            Trackability::Beacon
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trackability::Hidden => "hidden",
            Trackability::Low => "low",
            Trackability::Medium => "medium",
            Trackability::High => "high",
            Trackability::Beacon => "beacon",
        }
    }

    fn phrase(&self) -> &'static str {
        match self {
            Trackability::Hidden => "nearly invisible to trackers",
            Trackability::Low => "hard to track",
            Trackability::Medium => "moderately easy to track",
            Trackability::High => "easy to track",
            Trackability::Beacon => "a tracking beacon",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl From<Trackability> for RiskLevel {
    fn from(t: Trackability) -> Self {
        match t {
            Trackability::Hidden | Trackability::Low => RiskLevel::Low,
            Trackability::Medium => RiskLevel::Moderate,
            Trackability::High => RiskLevel::High,
            Trackability::Beacon => RiskLevel::Critical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub engine_version: String,
    /// Digest over report id, total bits, defense score and average CPM only
    pub verification: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketValuation {
    pub auction: AuctionResult,
    pub trackability: Trackability,
    pub annual: AnnualValue,
    pub cpm_display: String,
    pub cpm_explanation: CpmExplanation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub headline: String,
    pub risk_level: RiskLevel,
    pub action_required: bool,
    pub key_findings: Vec<String>,
}

/// Root aggregate. Plain data, serializable, never mutated after assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationReport {
    pub meta: ReportMeta,
    pub entropy: EntropyReport,
    pub valuation: MarketValuation,
    pub defenses: DefenseStatus,
    pub hardening: HardeningGuide,
    pub comparison: PopulationComparison,
    pub summary: ExecutiveSummary,
    pub report_card: ReportCard,
    pub recommendations: Vec<Recommendation>,
}

// ============================================================================
// Engine
// ============================================================================

/// Owns the reference tables and produces reports.
#[derive(Debug, Clone, Default)]
pub struct ValuationEngine {
    config: ValuationConfig,
}

impl ValuationEngine {
    pub fn new(config: ValuationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValuationConfig {
        &self.config
    }

    /// Seeded variance when `seed` is given, OS entropy otherwise.
    pub fn generate_report_seeded(
        &self,
        snapshot: &FingerprintSnapshot,
        hints: &ExternalHints,
        seed: Option<u64>,
    ) -> ValuationReport {
        let mut variance = match seed {
            Some(seed) => SeededVariance::from_seed(seed),
            None => SeededVariance::from_entropy(),
        };
        self.generate_report(snapshot, hints, &mut variance)
    }

    pub fn generate_report(
        &self,
        snapshot: &FingerprintSnapshot,
        hints: &ExternalHints,
        variance: &mut dyn VarianceSource,
    ) -> ValuationReport {
        let config = &self.config;

        let entropy = generate_entropy_report(snapshot, &config.entropy);
        let total_bits = entropy.total_bits;

        let personas = detect_personas(snapshot, &config.personas);
        let auction = simulate_rtb_auction(snapshot, &personas, total_bits, &config.auction, variance);
        let defenses = analyze_defenses(snapshot, hints);
        let hardening = generate_hardening_guide(snapshot, &defenses);
        let comparison = compare_to_population(snapshot, total_bits, &config.population);

        let trackability = Trackability::from_bits(total_bits);
        let average_cpm = auction.average_cpm;
        let valuation = MarketValuation {
            trackability,
            annual: annual_value_with(average_cpm, config.auction.annual_page_views),
            cpm_display: format_cpm(average_cpm),
            cpm_explanation: explain_cpm(average_cpm),
            auction,
        };

        let summary = executive_summary(&entropy, &valuation, &defenses, &comparison);
        let report_card = build_report_card(total_bits, comparison.similar_devices, &defenses);
        let recommendations = build_recommendations(&entropy, &defenses, trackability);

        let report_id = Uuid::new_v4();
        let meta = ReportMeta {
            report_id,
            generated_at: Utc::now(),
            engine_version: crate::VERSION.to_string(),
            verification: compute_verification(&report_id, total_bits, defenses.score, average_cpm),
        };

        info!(
            report_id = %report_id,
            total_bits,
            trackability = trackability.as_str(),
            defense_score = defenses.score,
            grade = report_card.grade.as_str(),
            "valuation report generated"
        );

        ValuationReport {
            meta,
            entropy,
            valuation,
            defenses,
            hardening,
            comparison,
            summary,
            report_card,
            recommendations,
        }
    }
}

fn executive_summary(
    entropy: &EntropyReport,
    valuation: &MarketValuation,
    defenses: &DefenseStatus,
    comparison: &PopulationComparison,
) -> ExecutiveSummary {
    let trackability = valuation.trackability;
    let headline = format!(
        "Advertisers would pay {} for you, and your browser is {}",
        valuation.cpm_display,
        trackability.phrase()
    );

    let mut key_findings = vec![
        format!(
            "{:.1} bits of identifying information: about one in {} people share your fingerprint",
            entropy.total_bits, comparison.one_in
        ),
        format!(
            "Defense score {:.0}/100 ({})",
            defenses.score,
            defenses.overall_tier.as_str()
        ),
    ];
    if let Some(top) = entropy.breakdown.top_contributors(1).first() {
        if top.bits > 0.0 {
            key_findings.push(format!(
                "Your most identifying signal is {} ({:.1} bits)",
                top.signal.display(),
                top.bits
            ));
        }
    }
    if let Some(winner) = &valuation.auction.winner {
        key_findings.push(format!(
            "{} placed the winning bid at {}",
            winner.bidder_name,
            format_cpm(winner.amount)
        ));
    }

    ExecutiveSummary {
        headline,
        risk_level: RiskLevel::from(trackability),
        action_required: trackability >= Trackability::Medium,
        key_findings,
    }
}
