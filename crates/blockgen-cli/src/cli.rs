//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// blockgen - schema and adapter generator for dynamic UI blocks and actions
#[derive(Parser)]
#[command(name = "blockgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write schema JSON, adapters and providers
    Generate(GenerateArgs),

    /// Run a full pass without writing anything
    Check(CheckArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output directory
    #[arg(long, default_value = "generated")]
    pub out: PathBuf,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Where declarations come from and how the pass is configured. Flags win
/// over `BLOCKGEN_*` variables, which win over the config file.
#[derive(Args, Clone, Debug, Default)]
pub struct SourceArgs {
    /// Config file (defaults to ./blockgen.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Source directory to scan
    #[arg(long, default_value = "src")]
    pub src: PathBuf,

    #[arg(long)]
    pub base_package: Option<String>,

    #[arg(long)]
    pub module_name: Option<String>,

    /// Crate path generated adapters call into
    #[arg(long)]
    pub runtime_crate: Option<String>,

    #[arg(long)]
    pub platform_support: Option<String>,
}

///
/// TESTS
///
