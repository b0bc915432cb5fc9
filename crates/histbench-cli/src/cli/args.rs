use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "histbench",
    version,
    about = "Run a consistency checker over a corpus of recorded database histories"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check every history under the corpus root and write a report
    Run(RunArgs),
    /// Discover histories and print their task ids without running anything
    List(ListArgs),
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// YAML config file; flags below override its fields
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Checker binary to supervise
    #[arg(long)]
    pub checker: Option<PathBuf>,

    /// Directory holding the recorded histories
    #[arg(long)]
    pub history_root: Option<PathBuf>,

    /// History format: cobra|dbcop
    #[arg(long)]
    pub history_type: Option<String>,

    /// Corpus layout: flat|nested
    #[arg(long)]
    pub discovery: Option<String>,

    /// Solver backend passed to the checker
    #[arg(long)]
    pub solver: Option<String>,

    /// Pruning mode: fast|normal|none
    #[arg(long)]
    pub pruning: Option<String>,

    /// Concurrent checker processes
    #[arg(long)]
    pub workers: Option<usize>,

    /// Per-task wall-clock budget, e.g. "420s" or "7m"
    #[arg(long)]
    pub timeout: Option<humantime::Duration>,

    /// Where to write the JSON report
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Suppress the live progress line on stderr
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    #[arg(long)]
    pub history_root: PathBuf,

    /// History format: cobra|dbcop
    #[arg(long)]
    pub history_type: String,

    /// Corpus layout: flat|nested
    #[arg(long, default_value = "flat")]
    pub discovery: String,
}
