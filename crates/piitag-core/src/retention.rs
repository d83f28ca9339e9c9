//! # Retention Policies
//!
//! Retention identifiers form an open enumeration (`RETAIN_INDEFINITE`,
//! `RETAIN_7_YEARS`, ...). They are kept as validated strings rather than
//! an enum so that a schema can introduce new policies without a release.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifier of how long a field's data may be kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RetentionPolicy(String);

impl RetentionPolicy {
    /// Policy applied when a field declares none.
    pub const DEFAULT: &'static str = "RETAIN_INDEFINITE";

    /// Create a retention policy, validating non-emptiness.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRetentionPolicy`] if the string is
    /// empty or whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.trim().is_empty() {
            return Err(ValidationError::InvalidRetentionPolicy);
        }
        Ok(Self(s))
    }

    /// Access the policy identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the indefinite default.
    pub fn is_indefinite(&self) -> bool {
        self.0 == Self::DEFAULT
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl std::fmt::Display for RetentionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
