//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types used throughout piitag. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Schema errors are construction-time only and carry the identifier of
//!   the source that failed, so the caller can report which document broke.
//! - Lookup errors exist only for strict lookups. The permissive query
//!   surface resolves unknown services and fields to defaults instead.

use thiserror::Error;

/// Failure to construct a classification document from its source.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The source could not be read (not found, permission denied, ...).
    #[error("schema load error for '{source_id}': {reason}")]
    Load {
        /// Identifier of the schema source (usually a filesystem path).
        source_id: String,
        /// Reason the source could not be read.
        reason: String,
    },

    /// The content is not valid structured data or does not have the
    /// expected shape.
    #[error("schema parse error for '{source_id}': {reason}")]
    Parse {
        /// Identifier of the schema source.
        source_id: String,
        /// Description of the malformed content, including its location.
        reason: String,
    },
}

impl SchemaError {
    /// Returns the identifier of the source that failed.
    pub fn source_id(&self) -> &str {
        match self {
            Self::Load { source_id, .. } | Self::Parse { source_id, .. } => source_id,
        }
    }

    /// Returns true for an unreadable source.
    pub fn is_load(&self) -> bool {
        matches!(self, Self::Load { .. })
    }

    /// Returns true for malformed content.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

/// A strict lookup against the classification schema found nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The service has no descriptor in the schema.
    #[error("service '{service}' is not classified")]
    UnknownService {
        /// The requested service name.
        service: String,
    },

    /// The service exists but the field has no classification.
    #[error("field '{field}' of service '{service}' is not classified")]
    UnknownField {
        /// The requested service name.
        service: String,
        /// The requested field name.
        field: String,
    },
}

/// Validation errors for domain primitive construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Service name is empty or whitespace-only.
    #[error("invalid service name: must be non-empty")]
    InvalidServiceName,

    /// Retention policy identifier is empty or whitespace-only.
    #[error("invalid retention policy: must be non-empty")]
    InvalidRetentionPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_display_names_source() {
        let err = SchemaError::Load {
            source_id: "data_tags/missing.json".into(),
            reason: "No such file or directory".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("data_tags/missing.json"));
        assert!(msg.contains("load"));
        assert!(err.is_load());
        assert!(!err.is_parse());
    }

    #[test]
    fn parse_error_exposes_source_id() {
        let err = SchemaError::Parse {
            source_id: "inline".into(),
            reason: "'services' must be an object".into(),
        };
        assert_eq!(err.source_id(), "inline");
        assert!(err.is_parse());
    }

    #[test]
    fn lookup_error_mentions_service_and_field() {
        let err = LookupError::UnknownField {
            service: "userinfo".into(),
            field: "ssn".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("userinfo"));
        assert!(msg.contains("ssn"));
    }
}
