//! # piitag-core: Foundational Types for PII Classification
//!
//! This crate is the leaf of the piitag workspace. It defines the small set
//! of domain primitives every other crate speaks in: sensitivity levels,
//! retention policy identifiers, service names, and the error hierarchy.
//!
//! ## Key Design Principles
//!
//! 1. **Newtypes for domain primitives.** `PiiLevel`, `RetentionPolicy`,
//!    `ServiceName`. A level is never a bare integer once it leaves the
//!    parser, and policy thresholds live next to the type they compare.
//!
//! 2. **Defaults in one place.** The all-defaults classification (level 0,
//!    `RETAIN_INDEFINITE`, not required) is expressed through `Default`
//!    impls on these types rather than re-derived at call sites.
//!
//! 3. **Typed construction errors.** Loading a classification schema either
//!    succeeds completely or fails with a [`SchemaError`]. Post-load queries
//!    never fail in permissive mode.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `piitag-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod level;
pub mod retention;
pub mod service;

pub use error::{LookupError, SchemaError, ValidationError};
pub use level::PiiLevel;
pub use retention::RetentionPolicy;
pub use service::ServiceName;
