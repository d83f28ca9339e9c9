//! # Probe Subcommand
//!
//! Fetches one record from a running service and checks it against the
//! schema. Endpoints come from the `PIITAG_*` environment variables.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use piitag_client::{RecordClient, ServiceEndpoints};
use piitag_core::{PiiLevel, ServiceName};
use piitag_schema::{RecordReport, TagValidator};

use crate::check::write_report;
use crate::{block_on, EXIT_POLICY_FAILURE};

/// Arguments for `piitag probe`.
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Service name as declared in the schema.
    pub service: ServiceName,

    /// Request path on that service, e.g. `/user/fetchUserById/6`.
    pub path: String,

    /// Minimum PII level for the missing-sensitive report.
    #[arg(long, default_value_t = PiiLevel::SENSITIVE_DEFAULT.value())]
    pub min_level: u32,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the probe subcommand against endpoints from the environment.
pub fn run_probe(args: &ProbeArgs, validator: &TagValidator, out: &mut impl Write) -> Result<u8> {
    let endpoints = ServiceEndpoints::from_env().context("invalid endpoint configuration")?;
    run_probe_with(args, validator, endpoints, out)
}

/// Execute the probe subcommand against explicit endpoints.
pub fn run_probe_with(
    args: &ProbeArgs,
    validator: &TagValidator,
    endpoints: ServiceEndpoints,
    out: &mut impl Write,
) -> Result<u8> {
    let service = args.service.as_str();
    validator.lookup_service(service)?;

    let client = RecordClient::new(endpoints)?;
    let report: RecordReport = block_on(client.audit(
        validator,
        service,
        &args.path,
        PiiLevel::new(args.min_level),
    ))?
    .with_context(|| format!("probe of {service} {} failed", args.path))?;

    write_report(&report, args.json, out)?;
    Ok(if report.is_complete() { 0 } else { EXIT_POLICY_FAILURE })
}
