//! CPM display and annualization helpers.

use crate::math::round_to;
use serde::{Deserialize, Serialize};

/// Page views per year assumed by [`calculate_annual_value`].
pub const DEFAULT_ANNUAL_PAGE_VIEWS: f64 = 4000.0;

/// `$X.XX CPM`
pub fn format_cpm(cpm: f64) -> String {
    format!("${:.2} CPM", cpm)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpmTier {
    LowValue,
    Moderate,
    Valuable,
    HighlySought,
    ExtremelyValuable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpmExplanation {
    pub tier: CpmTier,
    pub headline: String,
    pub detail: String,
}

pub fn explain_cpm(cpm: f64) -> CpmExplanation {
    let (tier, headline, detail) = if cpm < 1.0 {
        (
            CpmTier::LowValue,
            "Low-value profile",
            "Advertisers see little targeting signal in your browser.",
        )
    } else if cpm < 3.0 {
        (
            CpmTier::Moderate,
            "Moderately valuable profile",
            "You are priced like a typical anonymous visitor.",
        )
    } else if cpm < 6.0 {
        (
            CpmTier::Valuable,
            "Valuable profile",
            "Your fingerprint supports targeted campaigns at a premium.",
        )
    } else if cpm <= 10.0 {
        (
            CpmTier::HighlySought,
            "Highly sought-after profile",
            "Bidders compete aggressively for your impressions.",
        )
    } else {
        (
            CpmTier::ExtremelyValuable,
            "Extremely valuable profile",
            "You sit in the most expensive audience segments on the market.",
        )
    };

    CpmExplanation {
        tier,
        headline: headline.to_string(),
        detail: detail.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualValue {
    pub cpm: f64,
    pub annual_page_views: f64,
    pub annual_value: f64,
}

/// `cpm * page_views / 1000` with the default page-view assumption.
pub fn calculate_annual_value(cpm: f64) -> AnnualValue {
    annual_value_with(cpm, DEFAULT_ANNUAL_PAGE_VIEWS)
}

pub fn annual_value_with(cpm: f64, annual_page_views: f64) -> AnnualValue {
    AnnualValue {
        cpm,
        annual_page_views,
        annual_value: round_to(cpm * annual_page_views / 1000.0, 2),
    }
}
