//! Error taxonomy. Only discovery and configuration errors abort a run;
//! everything that happens inside a task (spawn failure, timeout,
//! unparseable output, a vanished process) is contained at the task level.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal: raised before any worker starts.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("history root {} does not exist", .0.display())]
    RootMissing(PathBuf),
    #[error("history root {} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("no histories found under {}", .0.display())]
    Empty(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal: invalid or unreadable benchmark configuration.
#[derive(Debug, Error)]
#[error("config error: {0}")]
pub struct ConfigError(pub String);
