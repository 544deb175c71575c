//! # Persona Classifier
//!
//! Rule-matches a snapshot against the persona catalog. Every rule is a list
//! of uniform `{field, test}` conditions evaluated by one matcher.

use crate::config::{Condition, ConditionTest, PersonaCatalog, PersonaRule, SignalField};
use crate::snapshot::{capability, FingerprintSnapshot};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inferred behavioral label with its pricing weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub description: String,
    /// 0.0 - 1.0
    pub confidence: f64,
    /// > 0
    pub value_multiplier: f64,
}

/// Value a condition is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FieldValue {
    Number(Option<f64>),
    Flag(bool),
}

fn field_value(snapshot: &FingerprintSnapshot, field: SignalField) -> FieldValue {
    let hw = &snapshot.hardware;
    let positive = |v: f64| (v > 0.0).then_some(v);

    match field {
        SignalField::DeviceMemory => FieldValue::Number(hw.device_memory_gb.and_then(positive)),
        SignalField::CpuCores => {
            FieldValue::Number(hw.cpu_cores.map(|c| c as f64).and_then(positive))
        }
        SignalField::ScreenWidth => FieldValue::Number(positive(hw.screen.width as f64)),
        SignalField::PixelRatio => FieldValue::Number(positive(hw.screen.pixel_ratio)),
        SignalField::TouchPoints => FieldValue::Number(Some(hw.touch_points as f64)),
        SignalField::WebGl2 => FieldValue::Flag(snapshot.capability(capability::WEBGL2)),
        SignalField::WebAssembly => FieldValue::Flag(snapshot.capability(capability::WEBASSEMBLY)),
        SignalField::ServiceWorker => {
            FieldValue::Flag(snapshot.capability(capability::SERVICE_WORKER))
        }
        SignalField::DoNotTrack => FieldValue::Flag(snapshot.software.do_not_track),
        SignalField::GlobalPrivacyControl => {
            FieldValue::Flag(snapshot.software.global_privacy_control)
        }
    }
}

/// Evaluate one condition. Unknown numeric values fail range tests, and a
/// range test against a boolean field (or vice versa) never passes.
pub fn condition_passes(snapshot: &FingerprintSnapshot, condition: &Condition) -> bool {
    match (condition.test, field_value(snapshot, condition.field)) {
        (ConditionTest::Range { min, max }, FieldValue::Number(Some(v))) => {
            min.map_or(true, |lo| v >= lo) && max.map_or(true, |hi| v <= hi)
        }
        (ConditionTest::Range { .. }, FieldValue::Number(None)) => false,
        (ConditionTest::Flag { expected }, FieldValue::Flag(actual)) => actual == expected,
        _ => false,
    }
}

/// Confidence when the rule matches, `None` otherwise.
fn match_rule(snapshot: &FingerprintSnapshot, rule: &PersonaRule) -> Option<f64> {
    if rule.conditions.is_empty() {
        return None;
    }
    let passed = rule
        .conditions
        .iter()
        .filter(|c| condition_passes(snapshot, c))
        .count();
    let declared = rule.conditions.len();
    (passed == declared).then(|| persona_confidence(passed, declared))
}

/// `0.5 + matched / declared * 0.4`. Fields a rule does not declare are
/// ignored; a rule with no conditions scores the base 0.5.
pub fn persona_confidence(matched: usize, declared: usize) -> f64 {
    let ratio = if declared == 0 {
        0.0
    } else {
        matched as f64 / declared as f64
    };
    (0.5 + ratio * 0.4).clamp(0.0, 1.0)
}

/// Every matching persona, highest confidence first. Never empty.
pub fn detect_personas(snapshot: &FingerprintSnapshot, catalog: &PersonaCatalog) -> Vec<Persona> {
    let mut personas: Vec<Persona> = catalog
        .rules
        .iter()
        .filter_map(|rule| {
            match_rule(snapshot, rule).map(|confidence| Persona {
                id: rule.id.clone(),
                name: rule.name.clone(),
                description: rule.description.clone(),
                confidence,
                value_multiplier: if rule.value_multiplier > 0.0 {
                    rule.value_multiplier
                } else {
                    1.0
                },
            })
        })
        .collect();

    if personas.is_empty() {
        personas.push(Persona {
            id: catalog.fallback_id.clone(),
            name: catalog.fallback_name.clone(),
            description: catalog.fallback_description.clone(),
            confidence: 0.5,
            value_multiplier: 1.0,
        });
    }

    // stable: ties keep declaration order
    personas.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    debug!(
        count = personas.len(),
        top = %personas[0].id,
        "personas detected"
    );
    personas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{android_phone, canonical_desktop};

    fn ids(personas: &[Persona]) -> Vec<&str> {
        personas.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_affluent_professional_detected() {
        let mut snap = canonical_desktop();
        snap.hardware.screen.width = 2560;
        snap.hardware.screen.height = 1440;
        snap.hardware.screen.pixel_ratio = 2.0;
        let personas = detect_personas(&snap, &PersonaCatalog::default());
        assert!(ids(&personas).contains(&"affluent_professional"));
    }

    #[test]
    fn test_privacy_conscious_detected() {
        let mut snap = canonical_desktop();
        snap.software.do_not_track = true;
        snap.software.global_privacy_control = true;
        let personas = detect_personas(&snap, &PersonaCatalog::default());
        assert!(ids(&personas).contains(&"privacy_conscious"));
    }

    #[test]
    fn test_fallback_when_nothing_matches() {
        let personas = detect_personas(&FingerprintSnapshot::default(), &PersonaCatalog::default());
        assert_eq!(personas.len(), 1);
        assert_eq!(personas[0].id, "general");
        assert_eq!(personas[0].confidence, 0.5);
        assert_eq!(personas[0].value_multiplier, 1.0);
    }

    #[test]
    fn test_sorted_by_confidence_ties_keep_order() {
        let personas = detect_personas(&canonical_desktop(), &PersonaCatalog::default());
        assert_eq!(
            ids(&personas),
            vec!["affluent_professional", "gamer", "tech_enthusiast"]
        );
        for pair in personas.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn test_all_confidences_bounded() {
        for snap in [canonical_desktop(), android_phone(), FingerprintSnapshot::default()] {
            for persona in detect_personas(&snap, &PersonaCatalog::default()) {
                assert!((0.0..=1.0).contains(&persona.confidence));
                assert!(persona.value_multiplier > 0.0);
            }
        }
    }

    #[test]
    fn test_mobile_personas() {
        let personas = detect_personas(&android_phone(), &PersonaCatalog::default());
        let found = ids(&personas);
        assert!(found.contains(&"mobile_first"));
        assert!(found.contains(&"budget_conscious"));
        assert!(!found.contains(&"gamer"));
    }

    #[test]
    fn test_unknown_value_fails_range() {
        let mut snap = canonical_desktop();
        snap.hardware.device_memory_gb = None;
        let cond = Condition::at_most(SignalField::DeviceMemory, 4.0);
        assert!(!condition_passes(&snap, &cond));
    }

    #[test]
    fn test_mismatched_test_kind_never_passes() {
        let cond = Condition::flag(SignalField::CpuCores, true);
        assert!(!condition_passes(&canonical_desktop(), &cond));
    }

    #[test]
    fn test_custom_catalog_injection() {
        let catalog = PersonaCatalog {
            rules: vec![PersonaRule {
                id: "night_owl".into(),
                name: "Night Owl".into(),
                description: "test".into(),
                value_multiplier: 2.0,
                conditions: vec![Condition::between(SignalField::CpuCores, 8.0, 8.0)],
            }],
            ..PersonaCatalog::default()
        };
        let personas = detect_personas(&canonical_desktop(), &catalog);
        assert_eq!(ids(&personas), vec!["night_owl"]);
        assert!((personas[0].confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_undeclared_fields_do_not_lower_confidence() {
        let mut snap = canonical_desktop();
        snap.software.do_not_track = true;
        snap.software.global_privacy_control = true;
        let personas = detect_personas(&snap, &PersonaCatalog::default());
        assert_eq!(
            ids(&personas),
            vec!["affluent_professional", "gamer", "tech_enthusiast", "privacy_conscious"]
        );
        for persona in &personas {
            assert!((persona.confidence - 0.9).abs() < 1e-9, "{}", persona.id);
        }
    }

    #[test]
    fn test_confidence_scales_with_declared_conditions() {
        assert!((persona_confidence(2, 2) - 0.9).abs() < 1e-9);
        assert!((persona_confidence(1, 2) - 0.7).abs() < 1e-9);
        assert!((persona_confidence(0, 4) - 0.5).abs() < 1e-9);
        assert!((persona_confidence(0, 0) - 0.5).abs() < 1e-9);
    }
}
