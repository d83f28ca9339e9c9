//! # piitag-schema: PII Classification Schema & Tag Validator
//!
//! Loads a declarative classification document describing, per service and
//! per field, a PII sensitivity level, a level name, a retention policy and
//! a required flag, and answers structural queries against it.
//!
//! ## Modules
//!
//! - [`document`]: typed document model; deserialization is the one
//!   validating pass and applies all defaults.
//! - [`loader`]: [`SchemaSource`] retrieval seam, file and inline sources,
//!   JSON and YAML parsing into [`SchemaError`]-typed failures.
//! - [`validator`]: [`TagValidator`], the read-only query facade.
//! - [`record`]: candidate records, response envelope unwrapping, record
//!   reports.
//! - [`lint`]: non-fatal consistency checks for schema authors.
//!
//! ## Crate Policy
//!
//! - Depends only on `piitag-core` internally.
//! - A validator that cannot load its schema is never constructed; there is
//!   no silent fallback to an empty document.

pub mod document;
pub mod lint;
pub mod loader;
pub mod record;
pub mod validator;

pub use document::{ClassificationDocument, FieldClassification, OrderedMap, ServiceDescriptor};
pub use lint::{lint, LintFinding, LintKind};
pub use loader::{
    load, load_path, parse_str, FileSource, InlineSource, SchemaSource, SourceFormat,
    DEFAULT_SCHEMA_PATH,
};
pub use piitag_core::{LookupError, PiiLevel, RetentionPolicy, SchemaError};
pub use record::{into_record, unwrap_envelope, CandidateRecord, FieldSet, RecordReport};
pub use validator::{FieldSummary, LookupMode, TagValidator};
