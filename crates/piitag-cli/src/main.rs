//! # piitag CLI entry point
//!
//! Parses command-line arguments, loads the classification schema once and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use piitag_cli::access::{run_access, AccessArgs};
use piitag_cli::check::{run_check, CheckArgs};
use piitag_cli::lint::{run_lint, LintArgs};
use piitag_cli::probe::{run_probe, ProbeArgs};
use piitag_cli::query::{
    run_encrypt, run_fields, run_retention, run_sensitive, FieldArgs, FieldsArgs, SensitiveArgs,
};
use piitag_cli::summary::{run_summary, SummaryArgs};
use piitag_cli::{
    flush_output, load_validator, resolve_schema_path, EXIT_OPERATIONAL_ERROR, SCHEMA_ENV_VAR,
};

/// PII classification schema toolkit.
///
/// Answers sensitivity, encryption and retention questions about service
/// fields, checks records for missing required fields and audits live
/// service responses.
#[derive(Parser, Debug)]
#[command(name = "piitag", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the classification schema (JSON or YAML).
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Treat unclassified services and fields as errors.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every field of a service.
    Fields(FieldsArgs),

    /// List fields at or above a PII level.
    Sensitive(SensitiveArgs),

    /// Whether a field must be encrypted at rest.
    Encrypt(FieldArgs),

    /// Retention policy of a field.
    Retention(FieldArgs),

    /// Check a JSON record file for missing required fields.
    Check(CheckArgs),

    /// Per-field classification table of a service.
    Summary(SummaryArgs),

    /// Report schema consistency findings.
    Lint(LintArgs),

    /// Fetch a record from a running service and check it.
    Probe(ProbeArgs),

    /// Assess access control of the userinfo service for one user.
    Access(AccessArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let schema_path = resolve_schema_path(cli.schema.as_deref(), std::env::var(SCHEMA_ENV_VAR).ok());
    tracing::debug!(schema = %schema_path.display(), "resolved schema path");

    let validator = match load_validator(&schema_path, cli.strict) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(EXIT_OPERATIONAL_ERROR);
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match &cli.command {
        Commands::Fields(args) => run_fields(args, &validator, &mut out),
        Commands::Sensitive(args) => run_sensitive(args, &validator, &mut out),
        Commands::Encrypt(args) => run_encrypt(args, &validator, &mut out),
        Commands::Retention(args) => run_retention(args, &validator, &mut out),
        Commands::Check(args) => run_check(args, &validator, &mut out),
        Commands::Summary(args) => run_summary(args, &validator, &mut out),
        Commands::Lint(args) => run_lint(args, &validator, &mut out),
        Commands::Probe(args) => run_probe(args, &validator, &mut out),
        Commands::Access(args) => run_access(args, &validator, &mut out),
    };
    let result = flush_output(result, &mut out);

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_OPERATIONAL_ERROR)
        }
    }
}
