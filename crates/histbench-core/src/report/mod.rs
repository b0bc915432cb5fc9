//! Report finalization: roll per-phase timings up into one `total time`
//! per task, substitute markers where a task produced no trustworthy
//! numbers, and persist/display the aggregate.

pub mod console;
pub mod json;
pub mod progress;

use crate::model::{AggregateReport, MetricValue, KEY_TOTAL_TIME};
use tracing::warn;

/// Compute the derived `total time` field for every task.
///
/// A checker may report several named phase timings (construction,
/// pruning, solving, ...); every metric whose key ends in `time` and whose
/// value ends in `ms` contributes to the sum. Any timeout sentinel or
/// spawn-failure marker in a task's record forces `total time` to the same
/// marker instead of a partial number.
pub fn finalize(report: &mut AggregateReport) {
    for (task_id, result) in report.iter_mut() {
        if result.values().any(|v| *v == MetricValue::Timeout) {
            result.insert(KEY_TOTAL_TIME.to_string(), MetricValue::Timeout);
            continue;
        }
        if result.values().any(|v| *v == MetricValue::Failed) {
            result.insert(KEY_TOTAL_TIME.to_string(), MetricValue::Failed);
            continue;
        }

        let mut total_ms: u64 = 0;
        for (key, value) in result.iter() {
            if key == KEY_TOTAL_TIME || !key.ends_with("time") {
                continue;
            }
            let Some(text) = value.as_text() else { continue };
            let Some(number) = text.strip_suffix("ms") else { continue };
            match number.trim().parse::<u64>() {
                Ok(ms) => total_ms += ms,
                Err(_) => warn!(task_id, key, value = text, "unparseable time metric"),
            }
        }
        result.insert(
            KEY_TOTAL_TIME.to_string(),
            MetricValue::Text(format!("{total_ms}ms")),
        );
    }
}
