//! # Check Subcommand
//!
//! Checks a record saved as JSON (typically a captured API response)
//! against the classification of one service. A `{"body": {...}}`
//! response envelope is unwrapped first.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use piitag_core::{PiiLevel, ServiceName};
use piitag_schema::{into_record, RecordReport, TagValidator};

use crate::EXIT_POLICY_FAILURE;

/// Arguments for `piitag check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Service name as declared in the schema.
    pub service: ServiceName,

    /// JSON file holding the record.
    #[arg(value_name = "RECORD")]
    pub record: PathBuf,

    /// Minimum PII level for the missing-sensitive report.
    #[arg(long, default_value_t = PiiLevel::SENSITIVE_DEFAULT.value())]
    pub min_level: u32,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the check subcommand.
///
/// Returns exit code 1 when a required field is missing.
pub fn run_check(args: &CheckArgs, validator: &TagValidator, out: &mut impl Write) -> Result<u8> {
    let service = args.service.as_str();
    validator.lookup_service(service)?;

    let text = std::fs::read_to_string(&args.record)
        .with_context(|| format!("failed to read record {}", args.record.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("record {} is not valid JSON", args.record.display()))?;
    let record = into_record(value).with_context(|| {
        format!("record {} is not a JSON object", args.record.display())
    })?;

    let report = validator.check_record(service, &record, PiiLevel::new(args.min_level));
    write_report(&report, args.json, out)?;
    Ok(if report.is_complete() { 0 } else { EXIT_POLICY_FAILURE })
}

/// Render a record report as text or pretty JSON.
pub fn write_report(report: &RecordReport, json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
    } else {
        writeln!(out, "{report}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use piitag_schema::InlineSource;

    fn validator() -> TagValidator {
        let text = r#"{"services": {"userinfo": {"fields": {
            "userId": {"piiLevel": 1, "required": true},
            "userPassword": {"piiLevel": 4, "required": true},
            "city": {"piiLevel": 1}
        }}}}"#;
        TagValidator::from_source(&InlineSource::json("test", text)).unwrap()
    }

    fn args(record: PathBuf, json: bool) -> CheckArgs {
        CheckArgs {
            service: ServiceName::new("userinfo").unwrap(),
            record,
            min_level: 2,
            json,
        }
    }

    fn write_record(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("record.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn complete_record_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_record(&dir, r#"{"userId": 6, "userPassword": "x"}"#);
        let mut out = Vec::new();
        assert_eq!(run_check(&args(path, false), &validator(), &mut out).unwrap(), 0);
        assert!(String::from_utf8(out).unwrap().contains("all required fields present"));
    }

    #[test]
    fn enveloped_record_missing_password_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_record(&dir, r#"{"body": {"userId": 6, "city": "Boston"}}"#);
        let mut out = Vec::new();
        assert_eq!(run_check(&args(path, true), &validator(), &mut out).unwrap(), 1);
        let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(report["missing_required"], serde_json::json!(["userPassword"]));
    }

    #[test]
    fn array_record_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_record(&dir, "[1, 2]");
        assert!(run_check(&args(path, false), &validator(), &mut Vec::new()).is_err());
    }
}
