//! Run configuration: checker invocation flags, discovery shape, worker
//! count and timeout. Loadable from a YAML file; the CLI applies flag
//! overrides on top. All parameters are fixed once the run starts.

use crate::errors::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// On-disk encoding of the history corpus the checker understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryType {
    Cobra,
    Dbcop,
}

impl HistoryType {
    pub fn as_flag(self) -> &'static str {
        match self {
            Self::Cobra => "cobra",
            Self::Dbcop => "dbcop",
        }
    }
}

impl FromStr for HistoryType {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cobra" => Ok(Self::Cobra),
            "dbcop" => Ok(Self::Dbcop),
            other => Err(ConfigError(format!("unknown history type '{other}'"))),
        }
    }
}

impl fmt::Display for HistoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

/// Backend the checker is asked to solve with (`--solver`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Solver {
    AcyclicMinisat,
    Monosat,
    MonosatBaseline,
    Z3,
}

impl Solver {
    pub fn as_flag(self) -> &'static str {
        match self {
            Self::AcyclicMinisat => "acyclic-minisat",
            Self::Monosat => "monosat",
            Self::MonosatBaseline => "monosat-baseline",
            Self::Z3 => "z3",
        }
    }
}

impl FromStr for Solver {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "acyclic-minisat" => Ok(Self::AcyclicMinisat),
            "monosat" => Ok(Self::Monosat),
            "monosat-baseline" => Ok(Self::MonosatBaseline),
            "z3" => Ok(Self::Z3),
            other => Err(ConfigError(format!("unknown solver '{other}'"))),
        }
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

/// Constraint-pruning mode; `None` omits the `--pruning` flag entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PruningMode {
    Fast,
    Normal,
    None,
}

impl PruningMode {
    pub fn as_flag(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Normal => "normal",
            Self::None => "none",
        }
    }
}

impl FromStr for PruningMode {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fast" => Ok(Self::Fast),
            "normal" => Ok(Self::Normal),
            "none" => Ok(Self::None),
            other => Err(ConfigError(format!("unknown pruning mode '{other}'"))),
        }
    }
}

impl fmt::Display for PruningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

/// How tasks are laid out under the history root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscoveryMode {
    /// One artifact directory per task.
    Flat,
    /// Group directories containing sub-instance directories; one task per
    /// `group;sub` pair.
    Nested,
}

impl FromStr for DiscoveryMode {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat" => Ok(Self::Flat),
            "nested" => Ok(Self::Nested),
            other => Err(ConfigError(format!("unknown discovery mode '{other}'"))),
        }
    }
}

impl fmt::Display for DiscoveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Flat => "flat",
            Self::Nested => "nested",
        })
    }
}

pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 420;
pub const DEFAULT_OUTPUT: &str = "results/bench-results.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenchConfig {
    /// Checker executable to invoke per task.
    pub checker: PathBuf,
    /// Root directory holding the history corpus.
    pub history_root: PathBuf,
    pub history_type: HistoryType,
    #[serde(default = "default_discovery")]
    pub discovery: DiscoveryMode,
    pub solver: Solver,
    #[serde(default = "default_pruning")]
    pub pruning: PruningMode,
    /// Parallel workers. Keep small; over-subscription risks the OS
    /// killing checker processes under memory pressure.
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Where the aggregate report is written, exactly once.
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_discovery() -> DiscoveryMode {
    DiscoveryMode::Flat
}
fn default_pruning() -> PruningMode {
    PruningMode::Fast
}
fn default_workers() -> usize {
    DEFAULT_WORKERS
}
fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}
fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

impl BenchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError("workers must be at least 1".into()));
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError("timeout must be nonzero".into()));
        }
        if self.checker.as_os_str().is_empty() {
            return Err(ConfigError("checker path is empty".into()));
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<BenchConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError(format!("failed to read config {}: {}", path.display(), e)))?;
    let cfg: BenchConfig = serde_yaml::from_str(&raw)
        .map_err(|e| ConfigError(format!("failed to parse YAML: {}", e)))?;
    cfg.validate()?;
    Ok(cfg)
}
