//! Command implementations for padmapc

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use padmap_compiler::config::{DEFAULT_BUCKET_COUNT, DEFAULT_TABLE_SIZE};
use padmap_compiler::{
    Catalogue, Compiler, CompilerConfig, DeflateCompressor, WarmActions, catalogue,
    compute_warm_set, prepare, resolve_warm_actions,
};
use padmap_format::{YEAR_EPOCH, fingerprint};
use tracing::{debug, info};

use crate::c_artifact;
use crate::error::CliError;
use crate::output;

/// Where the pre-seeded action labels come from.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmSource {
    /// Built-in list of common labels
    Builtin,
    /// Most frequent labels of the catalogue being compiled
    Computed,
    /// No pre-seeded labels
    None,
}

/// Layout flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Number of independently compressed buckets
    #[arg(long, default_value_t = DEFAULT_BUCKET_COUNT)]
    pub buckets: usize,

    /// Fingerprint table slots; must be a multiple of --buckets
    #[arg(long, default_value_t = DEFAULT_TABLE_SIZE)]
    pub table_size: usize,

    /// Source of the action labels seeded into every bucket
    #[arg(long, value_enum, default_value_t = WarmSource::Builtin)]
    pub warm_actions: WarmSource,

    /// Seed exactly these labels, in order (repeatable; overrides --warm-actions)
    #[arg(long = "warm-action", value_name = "LABEL")]
    pub warm_action: Vec<String>,
}

impl LayoutArgs {
    pub fn config(&self) -> CompilerConfig {
        let warm_actions = if !self.warm_action.is_empty() {
            WarmActions::Fixed(self.warm_action.clone())
        } else {
            match self.warm_actions {
                WarmSource::Builtin => WarmActions::Builtin,
                WarmSource::Computed => WarmActions::Computed,
                WarmSource::None => WarmActions::Fixed(Vec::new()),
            }
        };
        CompilerConfig {
            bucket_count: self.buckets,
            table_size: self.table_size,
            year_epoch: YEAR_EPOCH,
            warm_actions,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CompileArgs {
    /// Catalogue YAML file
    pub catalogue: PathBuf,

    /// Output path stem; writes <STEM>.h and <STEM>.cpp
    #[arg(short, long, value_name = "STEM")]
    pub output: PathBuf,

    /// Deflate level (0-9)
    #[arg(long, default_value_t = DeflateCompressor::DEFAULT_LEVEL)]
    pub level: u32,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    /// Catalogue YAML file
    pub catalogue: PathBuf,

    /// Deflate level used for the reported compressed sizes
    #[arg(long, default_value_t = DeflateCompressor::DEFAULT_LEVEL)]
    pub level: u32,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Catalogue YAML file
    pub catalogue: PathBuf,

    /// Identifying file name, exactly as listed in the catalogue
    #[arg(long)]
    pub file: String,

    /// Identifying file size in bytes
    #[arg(long)]
    pub size: u32,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

fn check_level(level: u32) -> Result<()> {
    if level > DeflateCompressor::DEFAULT_LEVEL {
        return Err(CliError::InvalidArguments(format!(
            "deflate level {level} outside 0..={}",
            DeflateCompressor::DEFAULT_LEVEL
        ))
        .into());
    }
    Ok(())
}

fn load(path: &Path) -> Result<Catalogue> {
    info!("Loading {} ...", path.display());
    let catalogue = catalogue::load_path(path).map_err(CliError::Catalogue)?;
    debug!("{} titles in catalogue", catalogue.titles.len());
    Ok(catalogue)
}

/// Compile a catalogue and write the C artifact.
pub fn compile(args: &CompileArgs, json: bool) -> Result<()> {
    check_level(args.level)?;
    let catalogue = load(&args.catalogue)?;
    let config = args.layout.config();

    let assembly = padmap_compiler::compile(&catalogue, &config)
        .with_context(|| format!("failed to compile {}", args.catalogue.display()))?;
    let artifact = assembly.emit(&DeflateCompressor::new(args.level))?;
    let written = c_artifact::write_artifacts(&artifact, &args.output)?;

    output::print_compile_summary(&assembly.stats, &artifact, &written, json)
}

/// Compile without writing anything and report what the layout looks like.
pub fn stats(args: &StatsArgs, json: bool) -> Result<()> {
    check_level(args.level)?;
    let catalogue = load(&args.catalogue)?;
    let config = args.layout.config();
    let context = || format!("failed to compile {}", args.catalogue.display());

    let titles = prepare(&catalogue, &config).with_context(context)?;
    let computed = compute_warm_set(titles.iter().map(|title| &title.mappings));
    let warm_actions = resolve_warm_actions(&config, &titles);

    let mut compiler = Compiler::new(config, warm_actions).with_context(context)?;
    for title in &titles {
        compiler.add_title(title).with_context(context)?;
    }
    let assembly = compiler.finish();
    let artifact = assembly.emit(&DeflateCompressor::new(args.level))?;

    output::print_stats(&assembly.stats, &artifact, &computed, json)
}

/// Resolve one identifying file through the compiled layout.
pub fn inspect(args: &InspectArgs, json: bool) -> Result<()> {
    let catalogue = load(&args.catalogue)?;
    let config = args.layout.config();
    let assembly = padmap_compiler::compile(&catalogue, &config)
        .with_context(|| format!("failed to compile {}", args.catalogue.display()))?;

    let found = assembly
        .identify(&args.file, args.size)
        .map_err(CliError::Decode)?
        .ok_or_else(|| {
            CliError::IdentifierNotFound(format!(
                "{} (size {}), fingerprint {:#010x}",
                args.file,
                args.size,
                fingerprint(&args.file, args.size)
            ))
        })?;

    output::print_identified(&found, assembly.buckets.len(), json)
}
