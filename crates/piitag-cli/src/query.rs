//! # Query Subcommands
//!
//! `fields`, `sensitive`, `encrypt` and `retention`: one schema question
//! each, answered on stdout one item per line.
//!
//! In strict mode an unclassified service or field is an error instead of
//! resolving to defaults.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use piitag_core::{PiiLevel, ServiceName};
use piitag_schema::TagValidator;

/// Arguments for `piitag fields`.
#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Service name as declared in the schema.
    pub service: ServiceName,
}

/// Arguments for `piitag sensitive`.
#[derive(Args, Debug)]
pub struct SensitiveArgs {
    /// Service name as declared in the schema.
    pub service: ServiceName,

    /// Minimum PII level to report.
    #[arg(long, default_value_t = PiiLevel::SENSITIVE_DEFAULT.value())]
    pub min_level: u32,
}

/// Arguments for `piitag encrypt` and `piitag retention`.
#[derive(Args, Debug)]
pub struct FieldArgs {
    /// Service name as declared in the schema.
    pub service: ServiceName,

    /// Field name.
    pub field: String,
}

/// Print every field of a service in declaration order.
pub fn run_fields(args: &FieldsArgs, validator: &TagValidator, out: &mut impl Write) -> Result<u8> {
    let descriptor = validator.lookup_service(args.service.as_str())?;
    for name in descriptor.field_names() {
        writeln!(out, "{name}")?;
    }
    Ok(0)
}

/// Print the fields at or above `--min-level`.
pub fn run_sensitive(
    args: &SensitiveArgs,
    validator: &TagValidator,
    out: &mut impl Write,
) -> Result<u8> {
    let service = args.service.as_str();
    validator.lookup_service(service)?;
    for name in validator.get_sensitive_fields(service, PiiLevel::new(args.min_level)) {
        writeln!(out, "{name}")?;
    }
    Ok(0)
}

/// Print `true` or `false`.
pub fn run_encrypt(args: &FieldArgs, validator: &TagValidator, out: &mut impl Write) -> Result<u8> {
    let tags = validator.lookup_field(args.service.as_str(), &args.field)?;
    writeln!(out, "{}", tags.requires_encryption())?;
    Ok(0)
}

/// Print the effective retention policy.
pub fn run_retention(
    args: &FieldArgs,
    validator: &TagValidator,
    out: &mut impl Write,
) -> Result<u8> {
    let tags = validator.lookup_field(args.service.as_str(), &args.field)?;
    writeln!(out, "{}", tags.retention)?;
    Ok(0)
}
