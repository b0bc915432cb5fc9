//! Core data model: tasks, per-task metric records, and the aggregate report.

use serde::ser::Serializer;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Sentinel written in place of every metric of a task that exceeded its
/// time budget.
pub const TIMEOUT_SENTINEL: &str = "TO";
/// Marker for a task whose checker process could not be launched at all.
/// Distinct from both a completed and a timed-out task.
pub const FAILED_MARKER: &str = "ERR";

/// Reserved metric keys. The checker may emit arbitrary additional keys;
/// these three are always present once a task is terminal.
pub const KEY_ACCEPT: &str = "accept";
pub const KEY_MAX_MEMORY: &str = "max memory";
pub const KEY_TOTAL_TIME: &str = "total time";

/// One unit of verification work bound to one input artifact on disk.
///
/// Immutable after discovery. `id` is unique across the run and keys the
/// result store; nested discovery produces composite `"group;sub"` ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub artifact_path: PathBuf,
}

impl Task {
    pub fn new(id: impl Into<String>, artifact_path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            artifact_path: artifact_path.into(),
        }
    }
}

/// A single collected metric value.
///
/// The persisted report only carries strings, integers, booleans and the
/// two markers; `Timeout` serializes as `"TO"` and `Failed` as `"ERR"` so
/// downstream consumers can detect an untrustworthy row with one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricValue {
    Text(String),
    Bytes(u64),
    Flag(bool),
    Timeout,
    Failed,
}

impl MetricValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// True for the timeout sentinel and the spawn-failure marker.
    pub fn is_marker(&self) -> bool {
        matches!(self, Self::Timeout | Self::Failed)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Timeout => Some(TIMEOUT_SENTINEL),
            Self::Failed => Some(FAILED_MARKER),
            _ => None,
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) => serializer.serialize_str(s),
            Self::Bytes(n) => serializer.serialize_u64(*n),
            Self::Flag(b) => serializer.serialize_bool(*b),
            Self::Timeout => serializer.serialize_str(TIMEOUT_SENTINEL),
            Self::Failed => serializer.serialize_str(FAILED_MARKER),
        }
    }
}

/// Open mapping from metric name to value for one task. Ordered so the
/// persisted report is deterministic.
pub type ExecutionResult = BTreeMap<String, MetricValue>;

/// The final durable artifact: task id -> finished ExecutionResult.
/// Created once after all workers have joined, then immutable.
pub type AggregateReport = BTreeMap<String, ExecutionResult>;

/// Terminal state of one supervised checker invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisionOutcome {
    /// Process exited on its own; a nonzero exit code still counts here.
    Completed,
    /// Deadline exceeded; the process was terminated by the supervisor.
    TimedOut,
    /// The checker binary could not be launched.
    SpawnFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_serialize_as_fixed_strings() {
        assert_eq!(
            serde_json::to_string(&MetricValue::Timeout).unwrap(),
            "\"TO\""
        );
        assert_eq!(
            serde_json::to_string(&MetricValue::Failed).unwrap(),
            "\"ERR\""
        );
    }

    #[test]
    fn plain_values_serialize_naturally() {
        assert_eq!(
            serde_json::to_string(&MetricValue::text("120ms")).unwrap(),
            "\"120ms\""
        );
        assert_eq!(serde_json::to_string(&MetricValue::Bytes(4096)).unwrap(), "4096");
        assert_eq!(serde_json::to_string(&MetricValue::Flag(true)).unwrap(), "true");
    }

    #[test]
    fn marker_detection() {
        assert!(MetricValue::Timeout.is_marker());
        assert!(MetricValue::Failed.is_marker());
        assert!(!MetricValue::text("5ms").is_marker());
        assert!(!MetricValue::Flag(false).is_marker());
    }
}
