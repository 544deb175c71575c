//! # fpval_core
//!
//! Fingerprint valuation engine. Turns one immutable browser fingerprint
//! snapshot into an entropy estimate, a simulated ad-auction price, a
//! privacy-defense score, population comparisons and a graded report.
//!
//! ```
//! use fpval_core::{ExternalHints, FingerprintSnapshot, FixedVariance, ValuationEngine};
//!
//! let engine = ValuationEngine::default();
//! let report = engine.generate_report(
//!     &FingerprintSnapshot::default(),
//!     &ExternalHints::default(),
//!     &mut FixedVariance::default(),
//! );
//! assert!(report.entropy.total_bits < 15.0);
//! ```
//!
//! Everything here is synchronous and free of side effects apart from
//! `tracing` events. Reference tables live in [`config::ValuationConfig`].

pub mod api;
pub mod auction;
pub mod config;
pub mod defense;
pub mod entropy;
pub mod error;
pub mod math;
pub mod persona;
pub mod population;
pub mod report;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod test_support;

pub use auction::{
    calculate_annual_value, explain_cpm, format_cpm, simulate_rtb_auction, AuctionResult, Bid,
    FixedVariance, SeededVariance, VarianceSource,
};
pub use config::ValuationConfig;
pub use defense::{analyze_defenses, generate_hardening_guide, DefenseStatus, DefenseTier, HardeningGuide};
pub use entropy::{
    calculate_entropy_breakdown, compare_to_average, entropy_bits, generate_entropy_report,
    EntropyBreakdown, EntropyReport,
};
pub use error::{Result, ValuationError};
pub use persona::{detect_personas, Persona};
pub use population::{compare_to_population, PopulationComparison};
pub use report::{verify_report, Trackability, ValuationEngine, ValuationReport};
pub use snapshot::{DeviceClass, ExternalHints, FingerprintSnapshot};

/// Engine version string embedded in every report.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
