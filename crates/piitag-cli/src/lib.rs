//! # piitag-cli: Command-Line Interface for the PII Classification Schema
//!
//! Provides the `piitag` command.
//!
//! ## Subcommands
//!
//! - `piitag fields|sensitive|encrypt|retention`: single-question queries.
//! - `piitag check`: check a record file for missing required fields.
//! - `piitag summary`: per-field classification table of a service.
//! - `piitag lint`: consistency findings for schema authors.
//! - `piitag probe`: fetch a record from a running service and check it.
//! - `piitag access`: access-control assessment of the userinfo service.
//!
//! ```bash
//! piitag sensitive userinfo --min-level 3
//! piitag check userinfo response.json
//! piitag --schema data_tags/tag_schema.json lint
//! ```
//!
//! ## Exit Codes
//!
//! `0` success, `1` policy failure (missing fields, lint findings,
//! access findings),
//! `2` operational error (unreadable schema, unreachable service).

pub mod access;
pub mod check;
pub mod lint;
pub mod probe;
pub mod query;
pub mod summary;

use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use piitag_schema::{LookupMode, TagValidator, DEFAULT_SCHEMA_PATH};

/// Environment variable naming the schema file when `--schema` is absent.
pub const SCHEMA_ENV_VAR: &str = "PIITAG_SCHEMA";

/// Exit code for a policy failure.
pub const EXIT_POLICY_FAILURE: u8 = 1;
/// Exit code for an operational error.
pub const EXIT_OPERATIONAL_ERROR: u8 = 2;

/// Pick the schema path: explicit flag, then `PIITAG_SCHEMA`, then the
/// repository default.
pub fn resolve_schema_path(flag: Option<&Path>, env_value: Option<String>) -> PathBuf {
    match (flag, env_value) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(value)) if !value.trim().is_empty() => PathBuf::from(value),
        _ => PathBuf::from(DEFAULT_SCHEMA_PATH),
    }
}

/// Load the classification schema, failing the whole command if it cannot
/// be read or parsed.
pub fn load_validator(path: &Path, strict: bool) -> Result<TagValidator> {
    let mode = if strict {
        LookupMode::Strict
    } else {
        LookupMode::Permissive
    };
    let validator = TagValidator::from_path(path)
        .with_context(|| format!("failed to load classification schema {}", path.display()))?
        .with_mode(mode);
    tracing::debug!(
        path = %path.display(),
        services = validator.document().services().len(),
        ?mode,
        "loaded classification schema"
    );
    Ok(validator)
}

/// Drive `future` to completion on a fresh current-thread runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

/// Flush command output, turning a failed write into an operational error
/// even when the command itself succeeded.
pub fn flush_output(result: Result<u8>, out: &mut impl Write) -> Result<u8> {
    let code = result?;
    out.flush().context("failed to write command output")?;
    Ok(code)
}
