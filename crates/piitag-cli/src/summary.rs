//! # Summary Subcommand
//!
//! Per-field classification of a service: level, retention, required and
//! encryption flags, as an aligned table or JSON.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use piitag_core::{PiiLevel, ServiceName};
use piitag_schema::{FieldSummary, TagValidator};

/// Arguments for `piitag summary`.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Service name as declared in the schema.
    pub service: ServiceName,

    /// Print the summary as a JSON array.
    #[arg(long)]
    pub json: bool,
}

/// Execute the summary subcommand.
pub fn run_summary(args: &SummaryArgs, validator: &TagValidator, out: &mut impl Write) -> Result<u8> {
    let service = args.service.as_str();
    validator.lookup_service(service)?;
    let rows = validator.summary(service);

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
    } else {
        write_table(&rows, out)?;
    }
    Ok(0)
}

fn write_table(rows: &[FieldSummary], out: &mut impl Write) -> Result<()> {
    let width = rows
        .iter()
        .map(|r| r.field.len())
        .chain(std::iter::once("FIELD".len()))
        .max()
        .unwrap_or(0);
    writeln!(
        out,
        "{:<width$}  LEVEL  {:<10}  {:<30}  REQUIRED  ENCRYPT",
        "FIELD", "NAME", "RETENTION"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:<width$}  {:>5}  {:<10}  {:<30}  {:<8}  {}",
            row.field,
            row.pii_level,
            row.pii_level_name
                .as_deref()
                .or_else(|| PiiLevel::new(row.pii_level).standard_name())
                .unwrap_or("-"),
            row.retention,
            if row.required { "yes" } else { "no" },
            if row.encrypt { "yes" } else { "no" },
        )?;
    }
    Ok(())
}
