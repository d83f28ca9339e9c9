//! # Tag Validator
//!
//! [`TagValidator`] is the read-only query facade over a loaded
//! [`ClassificationDocument`]. It is constructed once (loading the schema
//! eagerly) and then answers any number of independent queries.
//!
//! ## Open-World Lookups
//!
//! The query operations are total. An unknown service resolves to an empty
//! descriptor and an unknown field to the all-defaults classification
//! (level 0, `RETAIN_INDEFINITE`, not required), so the schema may lag
//! behind the services it describes without breaking callers.
//!
//! Callers that treat "unclassified" as a violation configure
//! [`LookupMode::Strict`] and use [`TagValidator::lookup_service`] /
//! [`TagValidator::lookup_field`], or call the `strict_*` methods directly.
//!
//! ## Thread Safety
//!
//! `TagValidator` is `Send + Sync` and never mutates after construction.
//! Share it behind an `Arc` or by reference across threads freely.

use std::path::Path;

use piitag_core::{LookupError, PiiLevel, SchemaError};
use serde::Serialize;

use crate::document::{ClassificationDocument, FieldClassification, ServiceDescriptor};
use crate::loader::{self, SchemaSource};
use crate::record::{FieldSet, RecordReport};

/// How lookups of unclassified services and fields are answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LookupMode {
    /// Unknown service or field resolves to defaults.
    #[default]
    Permissive,
    /// Unknown service or field is a [`LookupError`].
    Strict,
}

/// One row of a service's classification summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSummary {
    /// Field name.
    pub field: String,
    /// Numeric sensitivity.
    pub pii_level: u32,
    /// Label for the level, if declared.
    pub pii_level_name: Option<String>,
    /// Effective retention policy.
    pub retention: String,
    /// Whether the field is required.
    pub required: bool,
    /// Documentation text, if declared.
    pub description: Option<String>,
    /// Whether the field must be encrypted.
    pub encrypt: bool,
}

/// Read-only query facade over a classification schema.
#[derive(Debug, Clone)]
pub struct TagValidator {
    document: ClassificationDocument,
    mode: LookupMode,
    empty_service: ServiceDescriptor,
    default_field: FieldClassification,
}

impl TagValidator {
    /// Wrap an already-loaded document.
    pub fn new(document: ClassificationDocument) -> Self {
        Self {
            document,
            mode: LookupMode::default(),
            empty_service: ServiceDescriptor::default(),
            default_field: FieldClassification::default(),
        }
    }

    /// Load the document from a source and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Load`] if the source is unreadable and
    /// [`SchemaError::Parse`] if its content is malformed.
    pub fn from_source(source: &dyn SchemaSource) -> Result<Self, SchemaError> {
        loader::load(source).map(Self::new)
    }

    /// Load the document from a file and wrap it.
    ///
    /// # Errors
    ///
    /// See [`TagValidator::from_source`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        loader::load_path(path).map(Self::new)
    }

    /// Set the lookup mode used by [`lookup_service`](Self::lookup_service)
    /// and [`lookup_field`](Self::lookup_field).
    pub fn with_mode(mut self, mode: LookupMode) -> Self {
        self.mode = mode;
        self
    }

    /// The configured lookup mode.
    pub fn mode(&self) -> LookupMode {
        self.mode
    }

    /// The underlying document.
    pub fn document(&self) -> &ClassificationDocument {
        &self.document
    }

    /// Descriptor for `service`, or an empty descriptor if unknown.
    pub fn get_service_schema(&self, service: &str) -> &ServiceDescriptor {
        self.document.service(service).unwrap_or(&self.empty_service)
    }

    /// Classification of `field`, or the all-defaults record if the service
    /// or field is unknown.
    pub fn get_field_tags(&self, service: &str, field: &str) -> &FieldClassification {
        self.get_service_schema(service)
            .field(field)
            .unwrap_or(&self.default_field)
    }

    /// Required fields of `service` that `record` lacks, in declaration
    /// order. Only key presence is checked.
    pub fn validate_field_exists<R>(&self, service: &str, record: &R) -> Vec<String>
    where
        R: FieldSet + ?Sized,
    {
        let missing: Vec<String> = self
            .get_service_schema(service)
            .required_fields()
            .filter(|name| !record.contains_field(name))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            tracing::debug!(service, missing = ?missing, "record lacks required fields");
        }
        missing
    }

    /// Fields of `service` whose level is at least `min_level`, in
    /// declaration order.
    pub fn get_sensitive_fields(&self, service: &str, min_level: PiiLevel) -> Vec<String> {
        self.get_service_schema(service)
            .fields()
            .iter()
            .filter(|(_, f)| f.is_sensitive(min_level))
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// [`get_sensitive_fields`](Self::get_sensitive_fields) at
    /// [`PiiLevel::SENSITIVE_DEFAULT`].
    pub fn get_default_sensitive_fields(&self, service: &str) -> Vec<String> {
        self.get_sensitive_fields(service, PiiLevel::SENSITIVE_DEFAULT)
    }

    /// Whether `field` must be encrypted (level 3 or above). Unknown
    /// fields are level 0 and therefore never need encryption.
    pub fn should_field_be_encrypted(&self, service: &str, field: &str) -> bool {
        self.get_field_tags(service, field).requires_encryption()
    }

    /// Retention policy of `field`, `RETAIN_INDEFINITE` when undeclared or
    /// unknown.
    pub fn get_retention_policy(&self, service: &str, field: &str) -> &str {
        self.get_field_tags(service, field).retention.as_str()
    }

    /// Descriptor for `service`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::UnknownService`] if the schema has no such
    /// service.
    pub fn strict_service_schema(&self, service: &str) -> Result<&ServiceDescriptor, LookupError> {
        self.document
            .service(service)
            .ok_or_else(|| LookupError::UnknownService {
                service: service.to_string(),
            })
    }

    /// Classification of `field`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::UnknownService`] or
    /// [`LookupError::UnknownField`] when either is unclassified.
    pub fn strict_field_tags(
        &self,
        service: &str,
        field: &str,
    ) -> Result<&FieldClassification, LookupError> {
        self.strict_service_schema(service)?
            .field(field)
            .ok_or_else(|| LookupError::UnknownField {
                service: service.to_string(),
                field: field.to_string(),
            })
    }

    /// Service lookup honouring the configured [`LookupMode`].
    ///
    /// # Errors
    ///
    /// Only in [`LookupMode::Strict`]; see
    /// [`strict_service_schema`](Self::strict_service_schema).
    pub fn lookup_service(&self, service: &str) -> Result<&ServiceDescriptor, LookupError> {
        match self.mode {
            LookupMode::Permissive => Ok(self.get_service_schema(service)),
            LookupMode::Strict => self.strict_service_schema(service),
        }
    }

    /// Field lookup honouring the configured [`LookupMode`].
    ///
    /// # Errors
    ///
    /// Only in [`LookupMode::Strict`]; see
    /// [`strict_field_tags`](Self::strict_field_tags).
    pub fn lookup_field(
        &self,
        service: &str,
        field: &str,
    ) -> Result<&FieldClassification, LookupError> {
        match self.mode {
            LookupMode::Permissive => Ok(self.get_field_tags(service, field)),
            LookupMode::Strict => self.strict_field_tags(service, field),
        }
    }

    /// Classification summary of every field of `service`, in declaration
    /// order.
    pub fn summary(&self, service: &str) -> Vec<FieldSummary> {
        self.get_service_schema(service)
            .fields()
            .iter()
            .map(|(name, f)| FieldSummary {
                field: name.to_string(),
                pii_level: f.pii_level.value(),
                pii_level_name: f.pii_level_name.clone(),
                retention: f.retention.to_string(),
                required: f.required,
                description: f.description.clone(),
                encrypt: f.requires_encryption(),
            })
            .collect()
    }

    /// Check a record for missing required and sensitive fields and
    /// collect keys the schema does not classify.
    pub fn check_record<R>(&self, service: &str, record: &R, min_level: PiiLevel) -> RecordReport
    where
        R: FieldSet + ?Sized,
    {
        let descriptor = self.get_service_schema(service);
        let missing_sensitive = self
            .get_sensitive_fields(service, min_level)
            .into_iter()
            .filter(|name| !record.contains_field(name))
            .collect();
        let unclassified = record
            .field_names()
            .into_iter()
            .filter(|name| descriptor.field(name).is_none())
            .map(str::to_string)
            .collect();
        let exposed_encrypted: Vec<String> = descriptor
            .fields()
            .iter()
            .filter(|(name, f)| f.requires_encryption() && record.has_value(name))
            .map(|(name, _)| name.to_string())
            .collect();
        if !exposed_encrypted.is_empty() {
            tracing::warn!(service, exposed = ?exposed_encrypted, "encrypted fields returned in record");
        }

        let report = RecordReport {
            service: service.to_string(),
            missing_required: self.validate_field_exists(service, record),
            missing_sensitive,
            unclassified,
            exposed_encrypted,
        };
        tracing::debug!(
            service,
            complete = report.is_complete(),
            unclassified = report.unclassified.len(),
            "checked record"
        );
        report
    }
}
