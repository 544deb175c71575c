//! # Valuation Configuration
//!
//! Every static catalog the engine consults, gathered in one injectable value.
//!
//! ## Usage
//! ```rust
//! use fpval_core::config::ValuationConfig;
//!
//! let config = ValuationConfig::default();
//! assert_eq!(config.auction.bidders.len(), 6);
//! ```
//!
//! ## Environment Variables
//!
//! - `FPVAL_CONFIG`: path to a YAML or JSON override file. Sections that are
//!   left out keep their built-in values.

mod catalogs;
mod tables;

pub use catalogs::{
    AuctionTables, BidderProfile, Condition, ConditionTest, PersonaCatalog, PersonaRule,
    PlatformMultipliers, RegionMultipliers, SignalField,
};
pub use tables::{
    numeric_key, EntropyTables, PopulationTables, ShareEntry, ShareTable, Step, StepTable,
    UniquenessBucket, UniquenessTier,
};

use crate::error::{Result, ValuationError};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::{debug, warn};

pub const CONFIG_ENV_VAR: &str = "FPVAL_CONFIG";

static SHARED_DEFAULT: Lazy<ValuationConfig> = Lazy::new(ValuationConfig::default);

/// Reference tables for the whole pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ValuationConfig {
    pub entropy: EntropyTables,
    pub personas: PersonaCatalog,
    pub auction: AuctionTables,
    pub population: PopulationTables,
}

impl ValuationConfig {
    /// Built-in catalogs, constructed once per process.
    pub fn shared() -> &'static ValuationConfig {
        &SHARED_DEFAULT
    }

    /// Parse an override document. YAML is a superset of JSON, so both work.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load from disk; `.json` goes through serde_json, anything else through
    /// serde_yaml.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ValuationError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        debug!(path = %path.display(), is_json, "loading valuation config");
        if is_json {
            Self::from_json_str(&source)
        } else {
            Self::from_yaml_str(&source)
        }
    }

    /// Load the file named by `FPVAL_CONFIG`, falling back to defaults.
    pub fn from_env_or_default() -> Self {
        match env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => match Self::from_file(path.trim()) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!(%err, "invalid {}, using built-in catalogs", CONFIG_ENV_VAR);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let cfg = ValuationConfig::from_yaml_str(
            r#"
auction:
  variance_min: 1.0
  variance_max: 1.0
"#,
        )
        .unwrap();
        assert_eq!(cfg.auction.variance_min, 1.0);
        assert_eq!(cfg.auction.bidders.len(), 6);
        assert_eq!(cfg.personas.rules.len(), 6);
    }

    #[test]
    fn test_json_roundtrip() {
        let cfg = ValuationConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let parsed = ValuationConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed.personas.rules.len(), cfg.personas.rules.len());
        assert_eq!(parsed.auction.bidders[0].id, cfg.auction.bidders[0].id);
        assert!((parsed.entropy.canvas_bits - cfg.entropy.canvas_bits).abs() < 1e-9);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = ValuationConfig::from_file("/nonexistent/fpval.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/fpval.yaml"));
    }

    #[test]
    fn test_shared_matches_default() {
        assert_eq!(ValuationConfig::shared(), &ValuationConfig::default());
    }
}
