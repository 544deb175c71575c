//! # Auction Simulator
//!
//! Prices one snapshot against every bidder profile, the way a real-time
//! bidding exchange would:
//!
//! ```text
//! amount = baseline_cpm
//!        × platform_multiplier(device class)
//!        × region_multiplier(timezone)
//!        × max(1.0, best targeted persona multiplier)
//!        × entropy_multiplier(total bits)
//!        × variance
//! ```
//!
//! `variance` is drawn from an injected [`VarianceSource`].

mod pricing;
mod variance;

pub use pricing::{
    annual_value_with, calculate_annual_value, explain_cpm, format_cpm, AnnualValue, CpmExplanation,
    CpmTier, DEFAULT_ANNUAL_PAGE_VIEWS,
};
pub use variance::{FixedVariance, SeededVariance, VarianceSource};

use crate::config::{AuctionTables, BidderProfile, PlatformMultipliers};
use crate::math::{round_to, safe_div};
use crate::persona::Persona;
use crate::snapshot::{DeviceClass, FingerprintSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidInterest {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub bidder_id: String,
    pub bidder_name: String,
    /// CPM in dollars, always > 0
    pub amount: f64,
    pub interest: BidInterest,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionResult {
    /// Highest first
    pub bids: Vec<Bid>,
    pub winner: Option<Bid>,
    pub total_value: f64,
    pub average_cpm: f64,
    pub entropy_multiplier: f64,
    pub platform: DeviceClass,
    pub personas: Vec<Persona>,
    pub timestamp: DateTime<Utc>,
}

/// Step price multiplier: more unique fingerprints fetch more.
pub fn entropy_multiplier(total_bits: f64, tables: &AuctionTables) -> f64 {
    tables.entropy_multiplier.value_below(total_bits)
}

fn platform_factor(multipliers: &PlatformMultipliers, platform: DeviceClass) -> f64 {
    match platform {
        DeviceClass::Desktop => multipliers.desktop,
        DeviceClass::Mobile => multipliers.mobile,
        DeviceClass::Tablet => multipliers.tablet,
    }
}

/// Best persona among those the bidder targets.
fn best_targeted<'a>(bidder: &BidderProfile, personas: &'a [Persona]) -> Option<&'a Persona> {
    personas
        .iter()
        .filter(|p| bidder.target_personas.iter().any(|t| t == &p.id))
        .max_by(|a, b| a.value_multiplier.total_cmp(&b.value_multiplier))
}

struct PricingContext<'a> {
    platform: DeviceClass,
    timezone: &'a str,
    personas: &'a [Persona],
    entropy_multiplier: f64,
    timestamp: DateTime<Utc>,
}

fn price_bid(
    bidder: &BidderProfile,
    ctx: &PricingContext<'_>,
    tables: &AuctionTables,
    variance: &mut dyn VarianceSource,
) -> Option<Bid> {
    let targeted = best_targeted(bidder, ctx.personas);
    let persona_factor = targeted.map_or(1.0, |p| p.value_multiplier).max(1.0);

    let amount = bidder.baseline_cpm
        * platform_factor(&bidder.platform_multiplier, ctx.platform)
        * bidder.region_multiplier.factor(ctx.timezone)
        * persona_factor
        * ctx.entropy_multiplier
        * variance.next_factor(tables.variance_min, tables.variance_max);
    let amount = round_to(amount, 2);

    if !(amount > 0.0) {
        debug!(bidder = %bidder.id, amount, "non-positive bid dropped");
        return None;
    }

    let interest = match targeted {
        Some(p) if p.value_multiplier >= 1.3 => BidInterest::High,
        Some(_) => BidInterest::Medium,
        None => BidInterest::Low,
    };

    Some(Bid {
        bidder_id: bidder.id.clone(),
        bidder_name: bidder.name.clone(),
        amount,
        interest,
        confidence: targeted.map_or(0.3, |p| p.confidence),
        timestamp: ctx.timestamp,
    })
}

/// Run one sealed-bid round over every bidder in `tables`.
pub fn simulate_rtb_auction(
    snapshot: &FingerprintSnapshot,
    personas: &[Persona],
    total_bits: f64,
    tables: &AuctionTables,
    variance: &mut dyn VarianceSource,
) -> AuctionResult {
    let timestamp = Utc::now();
    let ctx = PricingContext {
        platform: snapshot.device_class(),
        timezone: snapshot.software.timezone.trim(),
        personas,
        entropy_multiplier: entropy_multiplier(total_bits, tables),
        timestamp,
    };

    let mut bids: Vec<Bid> = tables
        .bidders
        .iter()
        .filter_map(|bidder| price_bid(bidder, &ctx, tables, variance))
        .collect();
    bids.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    let total_value = round_to(bids.iter().map(|b| b.amount).sum(), 2);
    let average_cpm = round_to(safe_div(total_value, bids.len() as f64), 2);
    let winner = bids.first().cloned();

    debug!(
        bids = bids.len(),
        average_cpm,
        platform = ctx.platform.as_str(),
        "auction simulated"
    );

    AuctionResult {
        winner,
        total_value,
        average_cpm,
        entropy_multiplier: ctx.entropy_multiplier,
        platform: ctx.platform,
        personas: personas.to_vec(),
        timestamp,
        bids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PersonaCatalog;
    use crate::persona::detect_personas;
    use crate::test_support::{android_phone, canonical_desktop};
    use proptest::prelude::*;

    fn run(snapshot: &FingerprintSnapshot, bits: f64, variance: &mut dyn VarianceSource) -> AuctionResult {
        let personas = detect_personas(snapshot, &PersonaCatalog::default());
        simulate_rtb_auction(snapshot, &personas, bits, &AuctionTables::default(), variance)
    }

    #[test]
    fn test_winner_is_max_bid() {
        let result = run(&canonical_desktop(), 48.3, &mut SeededVariance::from_seed(1));
        let max = result.bids.iter().map(|b| b.amount).fold(f64::MIN, f64::max);
        assert_eq!(result.winner.as_ref().unwrap().amount, max);
        assert_eq!(result.bids.len(), 6);
        assert!(result.bids.iter().all(|b| b.amount > 0.0));
        assert!(result.average_cpm < result.total_value);
        for pair in result.bids.windows(2) {
            assert!(pair[0].amount >= pair[1].amount);
        }
    }

    #[test]
    fn test_empty_catalog_is_guarded() {
        let tables = AuctionTables {
            bidders: Vec::new(),
            ..AuctionTables::default()
        };
        let result = simulate_rtb_auction(
            &canonical_desktop(),
            &[],
            30.0,
            &tables,
            &mut FixedVariance::default(),
        );
        assert!(result.winner.is_none());
        assert_eq!(result.total_value, 0.0);
        assert_eq!(result.average_cpm, 0.0);
    }

    #[test]
    fn test_new_york_outbids_low_multiplier_region() {
        let ny = canonical_desktop();
        let mut elsewhere = canonical_desktop();
        elsewhere.software.timezone = "Asia/Kolkata".into();

        let mut rng = SeededVariance::from_seed(2024);
        let runs = 200;
        let (mut ny_total, mut other_total) = (0.0, 0.0);
        for _ in 0..runs {
            ny_total += run(&ny, 40.0, &mut rng).average_cpm;
            other_total += run(&elsewhere, 40.0, &mut rng).average_cpm;
        }
        assert!(ny_total / runs as f64 > other_total / runs as f64 * 1.2);
    }

    #[test]
    fn test_entropy_multiplier_monotone() {
        let tables = AuctionTables::default();
        let mut last = 0.0;
        for bits in [0.0, 14.9, 15.0, 24.0, 30.0, 40.0, 45.0, 70.0] {
            let m = entropy_multiplier(bits, &tables);
            assert!(m >= last);
            last = m;
        }
        assert_eq!(entropy_multiplier(10.0, &tables), 0.6);
        assert_eq!(entropy_multiplier(50.0, &tables), 1.5);
    }

    #[test]
    fn test_deterministic_with_fixed_variance() {
        let a = run(&canonical_desktop(), 48.3, &mut FixedVariance(1.0));
        let b = run(&canonical_desktop(), 48.3, &mut FixedVariance(1.0));
        let amounts = |r: &AuctionResult| r.bids.iter().map(|b| b.amount).collect::<Vec<_>>();
        assert_eq!(amounts(&a), amounts(&b));

        // amazon_dsp: 3.10 * 1.0 desktop * 1.4 NY * 1.8 affluent * 1.5 entropy
        let amazon = a.bids.iter().find(|b| b.bidder_id == "amazon_dsp").unwrap();
        assert_eq!(amazon.amount, round_to(3.10 * 1.4 * 1.8 * 1.5, 2));
        assert_eq!(amazon.interest, BidInterest::High);
    }

    #[test]
    fn test_mobile_platform_pricing() {
        let result = run(&android_phone(), 25.0, &mut FixedVariance(1.0));
        assert_eq!(result.platform, DeviceClass::Mobile);
        let meta = result.bids.iter().find(|b| b.bidder_id == "meta_audience").unwrap();
        // 2.20 * 1.2 mobile * 0.7 default region * 1.1 mobile_first * 1.0 entropy
        assert_eq!(meta.amount, round_to(2.20 * 1.2 * 0.7 * 1.1, 2));
        assert_eq!(meta.interest, BidInterest::Medium);
    }

    proptest! {
        #[test]
        fn prop_auction_invariants(seed in any::<u64>(), bits in 0.0f64..70.0) {
            let result = run(&canonical_desktop(), bits, &mut SeededVariance::from_seed(seed));
            prop_assert!(result.bids.iter().all(|b| b.amount > 0.0));
            let max = result.bids.iter().map(|b| b.amount).fold(f64::MIN, f64::max);
            prop_assert_eq!(result.winner.as_ref().map(|w| w.amount), Some(max));
            prop_assert!(result.average_cpm <= result.total_value);
        }
    }
}
