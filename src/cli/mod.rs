//! CLI module for Swagdoc.
//!
//! Commands:
//! - generate: document handlers under a directory
//! - undo: restore every backup under a directory

pub mod generate;
pub mod undo;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Config file looked up in the target directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "swagdoc.toml";

#[derive(Parser)]
#[command(name = "swagdoc")]
#[command(about = "Swagdoc - Swagger comments for Go HTTP handlers", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate Swagger comments for every handler under a directory
    Generate(GenerateArgs),

    /// Restore files from the backups left by `generate`
    Undo {
        /// Project root directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Config file (default: <dir>/swagdoc.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the restore report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Project root directory
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Show the rewritten files without touching disk
    #[arg(long)]
    pub dry_run: bool,

    /// Model identifier (overrides the config file)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Go file that registers the routes
    #[arg(short, long)]
    pub routes: Option<PathBuf>,

    /// Config file (default: <dir>/swagdoc.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Generation requests in flight at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Skip the cost confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Print the run report as JSON instead of the text summary
    #[arg(long)]
    pub json: bool,
}

/// Resolve the config path for a command run against `dir`.
pub fn config_path(dir: &std::path::Path, explicit: Option<&std::path::Path>) -> PathBuf {
    explicit
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| dir.join(DEFAULT_CONFIG_FILE))
}
