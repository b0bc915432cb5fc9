//! Task discovery: enumerate the history corpus under a root directory and
//! assign each task a stable identifier. Order is not semantically
//! significant, but results are sorted so logs and reports are stable.

use crate::config::{DiscoveryMode, HistoryType};
use crate::errors::DiscoveryError;
use crate::model::Task;
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the single sub-instance directory in a flat dbcop layout.
const DBCOP_FLAT_INSTANCE: &str = "hist-00000";
/// Binary-encoded history file inside a dbcop instance directory.
const DBCOP_ARTIFACT: &str = "history.bincode";

/// Enumerate tasks from `root`. Fatal if the root is missing, not a
/// directory, or yields zero tasks; the run must not start in that case.
pub fn discover_tasks(
    root: &Path,
    history_type: HistoryType,
    mode: DiscoveryMode,
) -> Result<Vec<Task>, DiscoveryError> {
    if !root.exists() {
        return Err(DiscoveryError::RootMissing(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(DiscoveryError::NotADirectory(root.to_path_buf()));
    }

    let mut tasks = match mode {
        DiscoveryMode::Flat => discover_flat(root, history_type)?,
        DiscoveryMode::Nested => discover_nested(root, history_type)?,
    };

    if tasks.is_empty() {
        return Err(DiscoveryError::Empty(root.to_path_buf()));
    }
    tasks.sort_by(|a, b| a.id.cmp(&b.id));
    info!(count = tasks.len(), root = %root.display(), "discovered tasks");
    Ok(tasks)
}

fn discover_flat(root: &Path, history_type: HistoryType) -> Result<Vec<Task>, DiscoveryError> {
    let mut tasks = Vec::new();
    for dir in subdirs(root)? {
        let name = dir_name(&dir);
        tasks.push(Task::new(name, artifact_path(&dir, history_type)));
    }
    Ok(tasks)
}

fn discover_nested(root: &Path, history_type: HistoryType) -> Result<Vec<Task>, DiscoveryError> {
    let mut tasks = Vec::new();
    for group_dir in subdirs(root)? {
        let group = dir_name(&group_dir);
        for sub_dir in subdirs(&group_dir)? {
            let sub = dir_name(&sub_dir);
            tasks.push(Task::new(
                format!("{group};{sub}"),
                nested_artifact_path(&sub_dir, history_type),
            ));
        }
    }
    Ok(tasks)
}

/// Flat mode: cobra histories are whole directories; dbcop histories live
/// in a single well-known instance subdirectory.
fn artifact_path(task_dir: &Path, history_type: HistoryType) -> PathBuf {
    match history_type {
        HistoryType::Cobra => task_dir.to_path_buf(),
        HistoryType::Dbcop => task_dir.join(DBCOP_FLAT_INSTANCE).join(DBCOP_ARTIFACT),
    }
}

/// Nested mode: the sub-instance directory itself is the leaf.
fn nested_artifact_path(sub_dir: &Path, history_type: HistoryType) -> PathBuf {
    match history_type {
        HistoryType::Cobra => sub_dir.to_path_buf(),
        HistoryType::Dbcop => sub_dir.join(DBCOP_ARTIFACT),
    }
}

fn subdirs(path: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let entries = std::fs::read_dir(path).map_err(|e| DiscoveryError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DiscoveryError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }
    Ok(dirs)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
