//! Command-line interface for the `chaff` binary.

pub mod list_cmd;
pub mod output;
pub mod start;

use crate::config::MAX_WORKERS;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "chaff")]
#[command(about = "Generate human-plausible browsing noise to blur your traffic profile")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress status output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start generating traffic
    Run(RunArgs),

    /// List available personas
    Personas {
        /// Extra catalog fragments directory
        #[arg(long)]
        plugins: Option<PathBuf>,
    },

    /// List simulated issue types
    Issues {
        /// Only show one family (network, system, malware, software)
        #[arg(long)]
        family: Option<String>,
    },

    /// List browsing categories
    Catalog {
        /// Extra catalog fragments directory
        #[arg(long)]
        plugins: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// JSON config file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Concurrent workers
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..=MAX_WORKERS as i64))]
    pub workers: Option<u16>,

    /// Run length in minutes (0 runs until Ctrl-C)
    #[arg(short, long)]
    pub duration: Option<u64>,

    /// Chaotic (logistic map) timing
    #[arg(long)]
    pub chaos: bool,

    /// Use one fixed fingerprint instead of randomizing
    #[arg(long)]
    pub no_stealth: bool,

    /// Do not attach decoy cookies
    #[arg(long)]
    pub no_decoys: bool,

    /// Blend the persona with a time-of-day profile
    #[arg(long)]
    pub schedule: bool,

    /// Simulate tech issues: an issue type, a family, or "mixed"
    #[arg(long, value_name = "SELECTOR")]
    pub issue: Option<String>,

    /// Browse as a persona
    #[arg(short, long)]
    pub persona: Option<String>,

    /// Optional content groups (political, tabloids, social, privacy, hobbies, issues, all)
    #[arg(long, value_delimiter = ',')]
    pub include: Vec<String>,

    /// Extra catalog fragments directory
    #[arg(long)]
    pub plugins: Option<PathBuf>,

    /// Describe requests without sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Append every request to a JSONL audit log
    #[arg(long, value_name = "PATH")]
    pub audit_log: Option<PathBuf>,

    /// Fixed RNG seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Headlines kept for display
    #[arg(long)]
    pub max_headlines: Option<usize>,

    /// Multiply every wait (e.g. 0.1 for a fast demo)
    #[arg(long)]
    pub time_scale: Option<f64>,

    /// Seconds between status lines
    #[arg(long)]
    pub status_interval: Option<u64>,
}
