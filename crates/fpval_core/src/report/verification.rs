//! Lightweight report verification value.
//!
//! Covers exactly four scalars: report id, total bits, defense score and
//! average CPM. It is a tamper hint for those fields, not a content hash.

use super::ValuationReport;
use uuid::Uuid;

/// Hex characters kept from the digest.
pub const VERIFICATION_HEX_LEN: usize = 16;

fn payload(report_id: &Uuid, total_bits: f64, defense_score: f64, average_cpm: f64) -> String {
    format!(
        "{}:{:.1}:{:.2}:{:.2}",
        report_id, total_bits, defense_score, average_cpm
    )
}

#[cfg(feature = "sha-digest")]
fn digest(payload: &str) -> String {
    use sha2::{Digest, Sha256};

    let hash = Sha256::digest(payload.as_bytes());
    hash.iter()
        .take(VERIFICATION_HEX_LEN / 2)
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(all(feature = "fx-digest", not(feature = "sha-digest")))]
fn digest(payload: &str) -> String {
    format!("{:016x}", fxhash::hash64(payload.as_bytes()))
}

#[cfg(not(any(feature = "sha-digest", feature = "fx-digest")))]
compile_error!("enable either the `sha-digest` or the `fx-digest` feature");

pub fn compute_verification(
    report_id: &Uuid,
    total_bits: f64,
    defense_score: f64,
    average_cpm: f64,
) -> String {
    digest(&payload(report_id, total_bits, defense_score, average_cpm))
}

/// Recompute the value from the report's own fields.
pub fn verify_report(report: &ValuationReport) -> bool {
    let expected = compute_verification(
        &report.meta.report_id,
        report.entropy.total_bits,
        report.defenses.score,
        report.valuation.auction.average_cpm,
    );
    expected == report.meta.verification
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable_and_sized() {
        let id = Uuid::nil();
        let a = compute_verification(&id, 48.3, 0.0, 3.21);
        let b = compute_verification(&id, 48.3, 0.0, 3.21);
        assert_eq!(a, b);
        assert_eq!(a.len(), VERIFICATION_HEX_LEN);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_each_scalar_changes_digest() {
        let id = Uuid::nil();
        let base = compute_verification(&id, 48.3, 0.0, 3.21);
        assert_ne!(base, compute_verification(&Uuid::from_u128(1), 48.3, 0.0, 3.21));
        assert_ne!(base, compute_verification(&id, 40.0, 0.0, 3.21));
        assert_ne!(base, compute_verification(&id, 48.3, 20.0, 3.21));
        assert_ne!(base, compute_verification(&id, 48.3, 0.0, 4.00));
    }

    #[cfg(feature = "sha-digest")]
    #[test]
    fn test_sha_digest_is_truncated_sha256() {
        use sha2::{Digest, Sha256};

        let id = Uuid::nil();
        let full: String = Sha256::digest(payload(&id, 48.3, 0.0, 3.21).as_bytes())
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        assert_eq!(
            compute_verification(&id, 48.3, 0.0, 3.21),
            &full[..VERIFICATION_HEX_LEN]
        );
    }

    #[cfg(all(feature = "fx-digest", not(feature = "sha-digest")))]
    #[test]
    fn test_fx_digest_matches_hash64() {
        let id = Uuid::nil();
        let expected = format!(
            "{:016x}",
            fxhash::hash64(payload(&id, 48.3, 0.0, 3.21).as_bytes())
        );
        assert_eq!(compute_verification(&id, 48.3, 0.0, 3.21), expected);
    }
}
