//! JSON boundary for hosts that exchange plain strings with the engine.

use crate::config::ValuationConfig;
use crate::error::{Result, ValuationError};
use crate::report::ValuationEngine;
use crate::snapshot::{ExternalHints, FingerprintSnapshot};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Request schema version understood by this engine.
pub const SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReportRequest {
    /// Defaults to the current version when omitted
    #[serde(default)]
    pub schema_version: Option<u8>,
    pub snapshot: FingerprintSnapshot,
    #[serde(default)]
    pub hints: ExternalHints,
    /// Fixes the auction variance for reproducible pricing
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ReportRequest {
    pub fn validate(&self) -> Result<()> {
        match self.schema_version {
            Some(found) if found != SCHEMA_VERSION => Err(ValuationError::SchemaVersion {
                found,
                expected: SCHEMA_VERSION,
            }),
            _ => Ok(()),
        }
    }
}

/// Generate a report with the built-in tables.
///
/// # Example
/// ```
/// let request = r#"{"snapshot": {}, "seed": 7}"#;
/// let report = fpval_core::api::generate_report_json(request).unwrap();
/// assert!(report.contains("report_card"));
/// ```
pub fn generate_report_json(request_json: &str) -> Result<String> {
    generate_report_json_with(request_json, ValuationConfig::shared())
}

pub fn generate_report_json_with(request_json: &str, config: &ValuationConfig) -> Result<String> {
    let request: ReportRequest = serde_json::from_str(request_json)?;
    request.validate()?;

    debug!(seeded = request.seed.is_some(), "report request accepted");

    let engine = ValuationEngine::new(config.clone());
    let report = engine.generate_report_seeded(&request.snapshot, &request.hints, request.seed);
    Ok(serde_json::to_string(&report)?)
}

/// JSON Schema of [`FingerprintSnapshot`], pretty-printed.
pub fn snapshot_schema_json() -> Result<String> {
    let schema = schemars::schema_for!(FingerprintSnapshot);
    Ok(serde_json::to_string_pretty(&schema)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::canonical_desktop;

    fn request_for(snapshot: FingerprintSnapshot, seed: Option<u64>) -> String {
        serde_json::to_string(&ReportRequest {
            schema_version: Some(SCHEMA_VERSION),
            snapshot,
            hints: ExternalHints::default(),
            seed,
        })
        .unwrap()
    }

    #[test]
    fn test_generate_report_json() {
        let out = generate_report_json(&request_for(canonical_desktop(), Some(1))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["valuation"]["trackability"], "high");
        assert_eq!(value["defenses"]["overall_tier"], "exposed");
    }

    #[test]
    fn test_seed_makes_pricing_reproducible() {
        let request = request_for(canonical_desktop(), Some(42));
        let a: serde_json::Value = serde_json::from_str(&generate_report_json(&request).unwrap()).unwrap();
        let b: serde_json::Value = serde_json::from_str(&generate_report_json(&request).unwrap()).unwrap();
        assert_eq!(
            a["valuation"]["auction"]["average_cpm"],
            b["valuation"]["auction"]["average_cpm"]
        );
    }

    #[test]
    fn test_rejects_unknown_schema_version() {
        let request = r#"{"schema_version": 9, "snapshot": {}}"#;
        let err = generate_report_json(request).unwrap_err();
        assert!(matches!(
            err,
            ValuationError::SchemaVersion { found: 9, expected: 1 }
        ));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = generate_report_json("{not json").unwrap_err();
        assert!(matches!(err, ValuationError::Serialization(_)));
    }

    #[test]
    fn test_partial_snapshot_degrades_gracefully() {
        let request = r#"{"snapshot": {"software": {"timezone": "Europe/Berlin"}}}"#;
        let out = generate_report_json(request).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value["entropy"]["total_bits"].as_f64().unwrap() < 15.0);
    }

    #[test]
    fn test_schema_lists_snapshot_sections() {
        let schema = snapshot_schema_json().unwrap();
        assert!(schema.contains("hardware"));
        assert!(schema.contains("software"));
        assert!(schema.contains("capabilities"));
    }
}
