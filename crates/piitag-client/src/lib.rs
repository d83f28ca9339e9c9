//! # piitag-client: Live Record Access
//!
//! Reads records off the running services and audits them against the
//! PII classification schema.
//!
//! - [`config`]: base URLs of every service, from environment variables or
//!   a contiguous localhost port range for tests.
//! - [`client`]: [`RecordClient`], a thin `reqwest` wrapper that unwraps
//!   response envelopes and produces [`piitag_schema::RecordReport`]s.
//! - [`access`]: access-control assessment of the userinfo service
//!   (missing or forged credentials, id enumeration, role field,
//!   encrypted fields returned in the clear).
//!
//! Requests are `GET`s with no retry. They carry no credentials unless the
//! caller passes headers, e.g. from [`client::authorization`].

pub mod access;
pub mod client;
pub mod config;
pub mod error;

pub use access::{assess_user_access, AccessFinding, AccessReport};
pub use client::{authorization, user_path, RecordClient};
pub use config::{ConfigError, ServiceEndpoints};
pub use error::ClientError;
