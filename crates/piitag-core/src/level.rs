//! # PII Sensitivity Levels
//!
//! [`PiiLevel`] is the ordinal sensitivity scale assigned to every
//! classified field. The documented range is 0 (non-sensitive) to
//! 4 (critical). Values above 4 (up to `u32::MAX`) parse successfully;
//! whether they are acceptable is a lint concern, not a load failure.
//!
//! Two thresholds are fixed here:
//!
//! - [`PiiLevel::SENSITIVE_DEFAULT`] (2): default lower bound for
//!   "sensitive field" queries. Callers may pass any other bound.
//! - [`PiiLevel::ENCRYPTION_THRESHOLD`] (3): fields at or above this level
//!   must be encrypted at rest and in transit. Not caller-tunable.

use serde::{Deserialize, Serialize};

/// Ordinal PII sensitivity of a data field.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PiiLevel(u32);

impl PiiLevel {
    /// Non-sensitive data.
    pub const NONE: Self = Self(0);
    /// Default inclusive lower bound for sensitive-field queries.
    pub const SENSITIVE_DEFAULT: Self = Self(2);
    /// Fields at or above this level must be encrypted.
    pub const ENCRYPTION_THRESHOLD: Self = Self(3);
    /// Highest documented level.
    pub const CRITICAL: Self = Self(4);
    /// Upper end of the documented 0–4 scale.
    pub const MAX_DOCUMENTED: Self = Self::CRITICAL;

    /// Create a level from its numeric value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// The numeric value of this level.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Whether this level lies within the documented 0–4 scale.
    pub fn is_documented(self) -> bool {
        self <= Self::MAX_DOCUMENTED
    }

    /// Whether a field at this level must be encrypted.
    pub fn requires_encryption(self) -> bool {
        self >= Self::ENCRYPTION_THRESHOLD
    }

    /// Conventional label for documented levels.
    ///
    /// Schemas carry their own `piiLevelName`; this is only used to suggest
    /// a label when a schema's names disagree with each other.
    pub fn standard_name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("PUBLIC"),
            1 => Some("LOW"),
            2 => Some("MODERATE"),
            3 => Some("HIGH"),
            4 => Some("CRITICAL"),
            _ => None,
        }
    }
}

impl From<u8> for PiiLevel {
    fn from(value: u8) -> Self {
        Self(u32::from(value))
    }
}

impl From<u32> for PiiLevel {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for PiiLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_is_non_sensitive() {
        assert_eq!(PiiLevel::default(), PiiLevel::NONE);
        assert!(!PiiLevel::default().requires_encryption());
    }

    #[test]
    fn encryption_threshold_is_three() {
        assert!(!PiiLevel::new(2).requires_encryption());
        assert!(PiiLevel::new(3).requires_encryption());
        assert!(PiiLevel::CRITICAL.requires_encryption());
    }

    #[test]
    fn documented_range() {
        assert!(PiiLevel::new(0).is_documented());
        assert!(PiiLevel::new(4).is_documented());
        assert!(!PiiLevel::new(5).is_documented());
    }

    #[test]
    fn standard_names() {
        assert_eq!(PiiLevel::CRITICAL.standard_name(), Some("CRITICAL"));
        assert_eq!(PiiLevel::NONE.standard_name(), Some("PUBLIC"));
        assert_eq!(PiiLevel::new(9).standard_name(), None);
    }

    #[test]
    fn deserializes_from_plain_integer() {
        let level: PiiLevel = serde_json::from_str("4").unwrap();
        assert_eq!(level, PiiLevel::CRITICAL);
        assert!(serde_json::from_str::<PiiLevel>("-1").is_err());
        assert!(serde_json::from_str::<PiiLevel>("2.5").is_err());
    }

    #[test]
    fn levels_past_u8_still_parse() {
        let level: PiiLevel = serde_json::from_str("256").unwrap();
        assert_eq!(level.value(), 256);
        assert!(!level.is_documented());
        assert!(serde_json::from_str::<PiiLevel>("4294967296").is_err());
    }

    proptest! {
        #[test]
        fn encryption_matches_numeric_threshold(v in any::<u32>()) {
            prop_assert_eq!(PiiLevel::new(v).requires_encryption(), v >= 3);
        }

        #[test]
        fn ordering_matches_numeric_ordering(a in any::<u32>(), b in any::<u32>()) {
            prop_assert_eq!(PiiLevel::new(a).cmp(&PiiLevel::new(b)), a.cmp(&b));
        }
    }
}
