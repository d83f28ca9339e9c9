//! # Service Identifiers
//!
//! [`ServiceName`] names one service of the system under test
//! (e.g. `"userinfo"`, `"order"`). It is validated to be non-empty at
//! construction time; no further format is imposed because service naming
//! is owned by whoever authors the classification schema.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Name of a classified service.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceName(String);

impl ServiceName {
    /// Create a service name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidServiceName`] if the string is
    /// empty or whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidServiceName);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Access the service name string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ServiceName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ServiceName> for String {
    fn from(name: ServiceName) -> Self {
        name.0
    }
}

impl std::str::FromStr for ServiceName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for ServiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
