//! padmapc - pad mapping catalogue compiler
//!
//! Compiles a YAML catalogue of per-title keyboard-to-pad bindings into a C
//! header and source pair holding the fingerprint table and the compressed
//! bucket blobs.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod c_artifact;
mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{CompileArgs, InspectArgs, StatsArgs};

#[derive(Parser)]
#[command(name = "padmapc")]
#[command(about = "Pad mapping catalogue compiler")]
#[command(version)]
#[command(long_about = "
padmapc compiles a catalogue of titles, their identifying files and their
keyboard-to-pad bindings into an embeddable C artifact: a fingerprint table
plus deduplicated, deflate-compressed bucket blobs.

Use --json for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a catalogue and write <STEM>.h and <STEM>.cpp
    Compile(CompileArgs),

    /// Report table fill, per-bucket sizes and the computed warm action set
    Stats(StatsArgs),

    /// Resolve an identifying file and decode its title and mappings
    Inspect(InspectArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("padmapc={log_level},padmap_compiler={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    match execute_command(&cli) {
        Ok(()) => Ok(()),
        Err(e) => {
            let exit_code = error::exit_code(&e);
            if cli.json {
                output::print_error_json(&e, exit_code);
            } else {
                output::print_error_human(&e);
            }
            std::process::exit(exit_code);
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Compile(args) => commands::compile(args, cli.json),
        Commands::Stats(args) => commands::stats(args, cli.json),
        Commands::Inspect(args) => commands::inspect(args, cli.json),
    }
}
