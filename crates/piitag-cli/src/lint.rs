//! # Lint Subcommand
//!
//! Reports schema consistency findings. Findings never stop the schema
//! from loading; they only fail this command.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use piitag_schema::{lint, TagValidator};

use crate::EXIT_POLICY_FAILURE;

/// Arguments for `piitag lint`.
#[derive(Args, Debug)]
pub struct LintArgs {
    /// Print findings as a JSON array.
    #[arg(long)]
    pub json: bool,
}

/// Execute the lint subcommand.
///
/// Returns exit code 1 when any finding is reported.
pub fn run_lint(args: &LintArgs, validator: &TagValidator, out: &mut impl Write) -> Result<u8> {
    let findings = lint(validator.document());

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&findings)?)?;
    } else if findings.is_empty() {
        writeln!(
            out,
            "Schema: {} service(s), {} field(s), no findings",
            validator.document().services().len(),
            validator.document().field_count()
        )?;
    } else {
        for finding in &findings {
            writeln!(out, "  WARN: {finding}")?;
        }
        writeln!(out, "\n{} finding(s).", findings.len())?;
    }

    Ok(if findings.is_empty() { 0 } else { EXIT_POLICY_FAILURE })
}

#[cfg(test)]
mod tests {
    use super::*;
    use piitag_schema::InlineSource;

    fn validator(text: &str) -> TagValidator {
        TagValidator::from_source(&InlineSource::json("test", text)).unwrap()
    }

    #[test]
    fn clean_schema_exits_zero() {
        let v = validator(r#"{"services": {"a": {"fields": {"x": {"piiLevel": 1}}}}}"#);
        let mut out = Vec::new();
        assert_eq!(run_lint(&LintArgs { json: false }, &v, &mut out).unwrap(), 0);
        assert!(String::from_utf8(out).unwrap().contains("no findings"));
    }

    #[test]
    fn findings_exit_one() {
        let v = validator(r#"{"services": {"a": {"fields": {"x": {"piiLevel": 9}}}}}"#);
        let mut out = Vec::new();
        assert_eq!(run_lint(&LintArgs { json: true }, &v, &mut out).unwrap(), 1);
        let findings: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(findings[0]["kind"], "level_out_of_range");
    }
}
