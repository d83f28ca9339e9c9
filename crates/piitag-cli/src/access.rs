//! # Access Subcommand
//!
//! Assesses how the userinfo service guards one user record: requests
//! without credentials and with forged ones, reads of neighbouring user
//! ids, the presence of a role field and encrypted fields returned in the
//! clear. Any finding is a policy failure.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use piitag_client::access::{DEFAULT_ENUMERATION_SPAN, USER_SERVICE};
use piitag_client::{assess_user_access, RecordClient, ServiceEndpoints};
use piitag_schema::TagValidator;

use crate::{block_on, EXIT_POLICY_FAILURE};

/// Arguments for `piitag access`.
#[derive(Args, Debug)]
pub struct AccessArgs {
    /// User id whose record is assessed.
    pub user_id: u64,

    /// How many following user ids to try for enumeration.
    #[arg(long, default_value_t = DEFAULT_ENUMERATION_SPAN)]
    pub span: u64,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the access subcommand against endpoints from the environment.
pub fn run_access(args: &AccessArgs, validator: &TagValidator, out: &mut impl Write) -> Result<u8> {
    let endpoints = ServiceEndpoints::from_env().context("invalid endpoint configuration")?;
    run_access_with(args, validator, endpoints, out)
}

/// Execute the access subcommand against explicit endpoints.
pub fn run_access_with(
    args: &AccessArgs,
    validator: &TagValidator,
    endpoints: ServiceEndpoints,
    out: &mut impl Write,
) -> Result<u8> {
    validator.lookup_service(USER_SERVICE)?;

    let client = RecordClient::new(endpoints)?;
    let report = block_on(assess_user_access(&client, validator, args.user_id, args.span))?
        .with_context(|| format!("access assessment of user {} failed", args.user_id))?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{report}")?;
    }
    Ok(if report.is_secure() { 0 } else { EXIT_POLICY_FAILURE })
}
