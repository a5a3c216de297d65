//! # trellis CLI
//!
//! `describe` prints a schema's descriptor; `check` validates an input
//! document against a schema.
//!
//! Exit codes: 0 on success, 1 when the input is invalid, 2 on any other
//! failure (unreadable files, malformed documents, schemas that do not build).

mod document;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::report::ErrorFormat;

/// Validate data against composable schemas with conditional fields.
#[derive(Parser, Debug)]
#[command(name = "trellis", version, about)]
struct Cli {
    /// More log output (repeat for trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the descriptor of a schema as JSON.
    Describe(DescribeArgs),
    /// Validate an input document against a schema.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct DescribeArgs {
    /// Schema document (`.json`, `.yaml` or `.yml`; `-` for stdin).
    schema: PathBuf,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Schema document (`.json`, `.yaml` or `.yml`).
    schema: PathBuf,

    /// Input document; `-` reads stdin. An empty document is an absent value.
    #[arg(default_value = "-")]
    input: PathBuf,

    /// How to print validation errors.
    #[arg(long, value_enum, default_value_t = ErrorFormat::Flat)]
    format: ErrorFormat,

    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = if verbose > 0 || quiet {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn describe(args: &DescribeArgs) -> Result<ExitCode> {
    let schema = document::load_schema(&args.schema)?;
    let text = report::to_json(&schema.descriptor(), args.pretty)
        .context("failed to serialize descriptor")?;
    println!("{text}");
    Ok(ExitCode::SUCCESS)
}

fn check(args: &CheckArgs) -> Result<ExitCode> {
    if document::is_stdin(&args.schema) && document::is_stdin(&args.input) {
        anyhow::bail!("schema and input cannot both be read from stdin");
    }
    let schema = document::load_schema(&args.schema)?;
    let input = document::load_input(&args.input)?;

    match schema.safe_parse(input.as_ref()) {
        Ok(output) => {
            let text = report::render_output(&output, args.pretty)
                .context("failed to serialize output")?;
            println!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        Err(errors) => {
            tracing::info!(errors = errors.len(), "input rejected");
            let text = report::render_errors(&errors, args.format, args.pretty)
                .context("failed to serialize errors")?;
            println!("{text}");
            Ok(ExitCode::from(1))
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Command::Describe(args) => describe(args),
        Command::Check(args) => check(args),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
