//! fpval CLI library
//!
//! File loading and output helpers behind the `fpval` binary. Kept outside
//! `main.rs` so they build and test without the `cli` feature.

use anyhow::{Context, Result};
use fpval_core::config::ValuationConfig;
use fpval_core::{ExternalHints, FingerprintSnapshot, ValuationEngine, ValuationReport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file: {}", what, path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {} JSON: {}", what, path.display()))
}

pub fn load_snapshot(path: &Path) -> Result<FingerprintSnapshot> {
    read_json(path, "snapshot")
}

/// No path means no external hints.
pub fn load_hints(path: Option<&Path>) -> Result<ExternalHints> {
    match path {
        Some(path) => read_json(path, "hints"),
        None => Ok(ExternalHints::default()),
    }
}

/// Explicit file first, then `FPVAL_CONFIG`, then built-in tables.
pub fn load_config(path: Option<&Path>) -> Result<ValuationConfig> {
    match path {
        Some(path) => {
            let config = ValuationConfig::from_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
            info!(path = %path.display(), "config loaded");
            Ok(config)
        }
        None => Ok(ValuationConfig::from_env_or_default()),
    }
}

pub fn load_report(path: &Path) -> Result<ValuationReport> {
    read_json(path, "report")
}

pub fn build_report(
    snapshot_path: &Path,
    hints_path: Option<&Path>,
    config: ValuationConfig,
    seed: Option<u64>,
) -> Result<ValuationReport> {
    let snapshot = load_snapshot(snapshot_path)?;
    let hints = load_hints(hints_path)?;
    debug!(snapshot = %snapshot_path.display(), ?hints, ?seed, "building report");

    let engine = ValuationEngine::new(config);
    Ok(engine.generate_report_seeded(&snapshot, &hints, seed))
}

/// Serialize `value` to `out`, or to stdout when no path is given.
pub fn write_json<T: Serialize>(value: &T, out: Option<&Path>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
            fs::write(path, json)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fpval_core::verify_report;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn temp_json(value: serde_json::Value) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(value.to_string().as_bytes())?;
        Ok(file)
    }

    #[test]
    fn test_build_write_and_reload_report() -> Result<()> {
        let snapshot = temp_json(serde_json::json!({
            "hardware": {
                "canvas": { "hash": "abc" },
                "screen": { "width": 1920, "height": 1080, "pixel_ratio": 1.0 },
                "cpu_cores": 8
            },
            "software": {
                "user_agent": "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
                "timezone": "Europe/Berlin"
            }
        }))?;
        let hints = temp_json(serde_json::json!({ "ad_blocker": true }))?;

        let report = build_report(
            snapshot.path(),
            Some(hints.path()),
            ValuationConfig::default(),
            Some(3),
        )?;
        assert!(report.defenses.ad_blocker);

        let dir = tempdir()?;
        let out = dir.path().join("nested").join("report.json");
        write_json(&report, Some(&out), true)?;

        let reloaded = load_report(&out)?;
        assert_eq!(reloaded.meta.report_id, report.meta.report_id);
        assert!(verify_report(&reloaded));
        Ok(())
    }

    #[test]
    fn test_missing_hints_default_to_none() -> Result<()> {
        assert_eq!(load_hints(None)?, ExternalHints::default());
        Ok(())
    }

    #[test]
    fn test_missing_snapshot_names_the_file() {
        let err = load_snapshot(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_bad_snapshot_json_is_reported() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"{ nope")?;
        let err = load_snapshot(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse snapshot JSON"));
        Ok(())
    }

    #[test]
    fn test_config_file_override() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("tables.yaml");
        fs::write(&path, "auction:\n  annual_page_views: 1000\n")?;
        let config = load_config(Some(&path))?;
        assert_eq!(config.auction.annual_page_views, 1000.0);
        assert_eq!(config.auction.bidders.len(), 6);
        Ok(())
    }
}
