//! Letter-grade report card.
//!
//! ```text
//! composite = 0.4 × defense score
//!           + 0.3 × entropy bucket score   (fewer bits score higher)
//!           + 0.2 × crowd score            (more look-alike devices score higher)
//!           + 0.1 × tier bonus
//! ```

use crate::defense::{DefenseStatus, DefenseTier};
use crate::math::round_to;
use serde::{Deserialize, Serialize};

pub const DEFENSE_WEIGHT: f64 = 0.4;
pub const ENTROPY_WEIGHT: f64 = 0.3;
pub const CROWD_WEIGHT: f64 = 0.2;
pub const TIER_WEIGHT: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "F")]
    F,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardComponents {
    pub defense_score: f64,
    pub entropy_score: f64,
    pub crowd_score: f64,
    pub tier_bonus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportCard {
    pub grade: Grade,
    /// 0 - 100
    pub composite: f64,
    pub components: CardComponents,
}

pub fn entropy_bucket_score(total_bits: f64) -> f64 {
    if total_bits < 15.0 {
        100.0
    } else if total_bits < 25.0 {
        75.0
    } else if total_bits < 35.0 {
        50.0
    } else if total_bits < 45.0 {
        25.0
    } else {
        0.0
    }
}

/// Hiding in a large crowd is the goal.
pub fn crowd_score(similar_devices: u64) -> f64 {
    match similar_devices {
        n if n >= 1_000_000 => 100.0,
        n if n >= 10_000 => 75.0,
        n if n >= 100 => 50.0,
        n if n >= 10 => 25.0,
        _ => 0.0,
    }
}

pub fn tier_bonus(tier: DefenseTier) -> f64 {
    match tier {
        DefenseTier::Exposed => 0.0,
        DefenseTier::Basic => 25.0,
        DefenseTier::Protected => 50.0,
        DefenseTier::Hardened => 75.0,
        DefenseTier::Fortress => 100.0,
    }
}

pub fn grade_for(composite: f64) -> Grade {
    const CUTS: [(f64, Grade); 10] = [
        (95.0, Grade::APlus),
        (90.0, Grade::A),
        (85.0, Grade::AMinus),
        (80.0, Grade::BPlus),
        (75.0, Grade::B),
        (70.0, Grade::BMinus),
        (65.0, Grade::CPlus),
        (60.0, Grade::C),
        (55.0, Grade::CMinus),
        (50.0, Grade::D),
    ];
    CUTS.iter()
        .find(|(min, _)| composite >= *min)
        .map_or(Grade::F, |(_, grade)| *grade)
}

pub fn build_report_card(
    total_bits: f64,
    similar_devices: u64,
    defenses: &DefenseStatus,
) -> ReportCard {
    let components = CardComponents {
        defense_score: defenses.score,
        entropy_score: entropy_bucket_score(total_bits),
        crowd_score: crowd_score(similar_devices),
        tier_bonus: tier_bonus(defenses.overall_tier),
    };
    let composite = round_to(
        (components.defense_score * DEFENSE_WEIGHT
            + components.entropy_score * ENTROPY_WEIGHT
            + components.crowd_score * CROWD_WEIGHT
            + components.tier_bonus * TIER_WEIGHT)
            .clamp(0.0, 100.0),
        1,
    );

    ReportCard {
        grade: grade_for(composite),
        composite,
        components,
    }
}
