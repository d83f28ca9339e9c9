//! # Schema Lint
//!
//! Structural checks the loader deliberately does not enforce. A schema
//! with findings still loads and still answers queries; lint output is for
//! schema authors and CI gates.
//!
//! Checks, each reported per field in declaration order:
//!
//! - level outside the documented 0–4 scale;
//! - a level whose `piiLevelName` differs from the name the same level
//!   carries elsewhere in the document (first occurrence wins);
//! - a field that requires encryption but declares no retention policy.

use std::collections::HashMap;
use std::fmt;

use piitag_core::PiiLevel;
use serde::Serialize;

use crate::document::ClassificationDocument;

/// What a lint finding is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LintKind {
    /// `piiLevel` above the documented maximum.
    LevelOutOfRange {
        /// The offending level.
        level: u32,
    },
    /// `piiLevelName` disagrees with an earlier field at the same level.
    InconsistentLevelName {
        /// The shared level.
        level: u32,
        /// Name first seen for this level.
        expected: String,
        /// Name carried by this field.
        found: String,
    },
    /// Level 3+ field relying on the default retention policy.
    CriticalWithoutRetention {
        /// The field's level.
        level: u32,
    },
}

/// A single lint finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintFinding {
    /// Service containing the field.
    pub service: String,
    /// Field the finding is about.
    pub field: String,
    /// The finding.
    #[serde(flatten)]
    pub kind: LintKind,
}

impl fmt::Display for LintFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: ", self.service, self.field)?;
        match &self.kind {
            LintKind::LevelOutOfRange { level } => write!(
                f,
                "piiLevel {level} is outside the documented range 0-{}",
                PiiLevel::MAX_DOCUMENTED
            ),
            LintKind::InconsistentLevelName {
                level,
                expected,
                found,
            } => write!(
                f,
                "piiLevel {level} is named '{found}' here but '{expected}' elsewhere"
            ),
            LintKind::CriticalWithoutRetention { level } => write!(
                f,
                "piiLevel {level} requires encryption but declares no retention policy"
            ),
        }
    }
}

/// Run every check over the document.
pub fn lint(document: &ClassificationDocument) -> Vec<LintFinding> {
    let mut findings = Vec::new();
    let mut names_by_level: HashMap<PiiLevel, &str> = HashMap::new();

    for (service, descriptor) in document.services().iter() {
        for (field, class) in descriptor.fields().iter() {
            let level = class.pii_level;
            let mut push = |kind| {
                findings.push(LintFinding {
                    service: service.to_string(),
                    field: field.to_string(),
                    kind,
                })
            };

            if !level.is_documented() {
                push(LintKind::LevelOutOfRange {
                    level: level.value(),
                });
            }

            if let Some(name) = class.pii_level_name.as_deref() {
                let expected = *names_by_level.entry(level).or_insert(name);
                if expected != name {
                    push(LintKind::InconsistentLevelName {
                        level: level.value(),
                        expected: expected.to_string(),
                        found: name.to_string(),
                    });
                }
            }

            if level.requires_encryption() && !class.retention_declared {
                push(LintKind::CriticalWithoutRetention {
                    level: level.value(),
                });
            }
        }
    }

    if !findings.is_empty() {
        tracing::warn!(count = findings.len(), "classification schema has lint findings");
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> ClassificationDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn clean_schema_has_no_findings() {
        let d = doc(json!({ "services": { "userinfo": { "fields": {
            "userPassword": { "piiLevel": 4, "piiLevelName": "CRITICAL", "retention": "RETAIN_7_YEARS" },
            "city": { "piiLevel": 1, "piiLevelName": "LOW" }
        } } } }));
        assert!(lint(&d).is_empty());
    }

    #[test]
    fn flags_out_of_range_level() {
        let d = doc(json!({ "services": { "s": { "fields": {
            "f": { "piiLevel": 7, "retention": "RETAIN_1_YEAR" }
        } } } }));
        let findings = lint(&d);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, LintKind::LevelOutOfRange { level: 7 });
        assert!(findings[0].to_string().contains("outside the documented range 0-4"));
    }

    #[test]
    fn levels_past_u8_load_and_are_flagged() {
        let d = doc(json!({ "services": { "s": { "fields": {
            "f": { "piiLevel": 256, "retention": "RETAIN_1_YEAR" }
        } } } }));
        let findings = lint(&d);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, LintKind::LevelOutOfRange { level: 256 });
    }

    #[test]
    fn flags_inconsistent_level_names_across_services() {
        let d = doc(json!({ "services": {
            "userinfo": { "fields": { "address": { "piiLevel": 2, "piiLevelName": "MODERATE" } } },
            "order": { "fields": { "deliveryAddress": { "piiLevel": 2, "piiLevelName": "MEDIUM" } } }
        } }));
        let findings = lint(&d);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].service, "order");
        assert_eq!(findings[0].field, "deliveryAddress");
        assert_eq!(
            findings[0].kind,
            LintKind::InconsistentLevelName {
                level: 2,
                expected: "MODERATE".into(),
                found: "MEDIUM".into(),
            }
        );
    }

    #[test]
    fn flags_critical_field_without_retention() {
        let d = doc(json!({ "services": { "payment": { "fields": {
            "cardNumber": { "piiLevel": 4 },
            "amount": { "piiLevel": 1 }
        } } } }));
        let findings = lint(&d);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].field, "cardNumber");
        assert_eq!(findings[0].kind, LintKind::CriticalWithoutRetention { level: 4 });
    }

    #[test]
    fn findings_serialize_with_kind_tag() {
        let finding = LintFinding {
            service: "s".into(),
            field: "f".into(),
            kind: LintKind::LevelOutOfRange { level: 9 },
        };
        let v = serde_json::to_value(&finding).unwrap();
        assert_eq!(v["kind"], "level_out_of_range");
        assert_eq!(v["level"], 9);
        assert_eq!(v["service"], "s");
    }
}
