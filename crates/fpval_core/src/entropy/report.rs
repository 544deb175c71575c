use super::{calculate_entropy_breakdown, EntropyBreakdown};
use crate::config::EntropyTables;
use crate::math::{population_bucket, round_to};
use crate::snapshot::FingerprintSnapshot;
use serde::{Deserialize, Serialize};

/// Reference mean used by [`compare_to_average`].
pub const REFERENCE_AVERAGE_BITS: f64 = 27.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntropyTier {
    Low,
    Medium,
    High,
    VeryHigh,
    Unique,
}

impl EntropyTier {
    pub fn from_bits(bits: f64) -> Self {
        if bits < 20.0 {
            EntropyTier::Low
        } else if bits < 30.0 {
            EntropyTier::Medium
        } else if bits < 40.0 {
            EntropyTier::High
        } else if bits < 50.0 {
            EntropyTier::VeryHigh
        } else {
            EntropyTier::Unique
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AverageBucket {
    BelowAverage,
    Average,
    AboveAverage,
    Exceptional,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AverageComparison {
    pub bucket: AverageBucket,
    pub percentile: u8,
    pub reference_bits: f64,
    /// Positive when more identifying than the reference
    pub difference_bits: f64,
}

/// Bucket `bits` against the built-in reference average.
pub fn compare_to_average(bits: f64) -> AverageComparison {
    compare_to_reference(bits, REFERENCE_AVERAGE_BITS)
}

/// Cut points are fixed; only the reported difference depends on `reference`.
pub fn compare_to_reference(bits: f64, reference: f64) -> AverageComparison {
    let (bucket, percentile) = if bits < 20.0 {
        (AverageBucket::BelowAverage, 25)
    } else if bits < 33.0 {
        (AverageBucket::Average, 50)
    } else if bits < 45.0 {
        (AverageBucket::AboveAverage, 75)
    } else {
        (AverageBucket::Exceptional, 95)
    };

    AverageComparison {
        bucket,
        percentile,
        reference_bits: reference,
        difference_bits: round_to(bits - reference, 1),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyReport {
    pub breakdown: EntropyBreakdown,
    pub total_bits: f64,
    pub tier: EntropyTier,
    /// How close the fingerprint gets to singling out one user, 0..=100
    pub uniqueness_pct: f64,
    /// Users expected to share this exact fingerprint
    pub population_bucket: u64,
    pub comparison: AverageComparison,
}

/// Breakdown plus tiering and population estimates.
pub fn generate_entropy_report(
    snapshot: &FingerprintSnapshot,
    tables: &EntropyTables,
) -> EntropyReport {
    let breakdown = calculate_entropy_breakdown(snapshot, tables);
    let total_bits = breakdown.total.bits;

    // log2(population) bits are enough to single out one person
    let identifying_bits = tables.assumed_total_users.max(2.0).log2();
    let uniqueness_pct = round_to((total_bits / identifying_bits * 100.0).min(100.0), 1);
    let bucket = population_bucket(tables.assumed_total_users, total_bits);

    EntropyReport {
        total_bits,
        tier: EntropyTier::from_bits(total_bits),
        uniqueness_pct,
        population_bucket: bucket.floor() as u64,
        comparison: compare_to_reference(total_bits, tables.reference_average_bits),
        breakdown,
    }
}
