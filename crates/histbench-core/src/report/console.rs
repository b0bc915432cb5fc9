//! Human-readable tabular summary, derived purely from the in-memory
//! report. Failed and timed-out tasks keep their row with the marker in
//! place of numbers rather than being omitted.

use crate::model::{
    AggregateReport, ExecutionResult, MetricValue, KEY_ACCEPT, KEY_MAX_MEMORY, KEY_TOTAL_TIME,
};

/// Verdict cell: checkmark/cross for a real verdict, the marker for tasks
/// without trustworthy numbers, `?` when the checker never printed one.
#[must_use]
pub fn verdict_cell(result: &ExecutionResult) -> String {
    match result.get(KEY_ACCEPT) {
        Some(MetricValue::Flag(true)) => "✔".to_string(),
        Some(MetricValue::Flag(false)) => "✘".to_string(),
        Some(value) => value.as_text().unwrap_or("?").to_string(),
        None => "?".to_string(),
    }
}

#[must_use]
pub fn memory_cell(result: &ExecutionResult) -> String {
    match result.get(KEY_MAX_MEMORY) {
        Some(MetricValue::Bytes(bytes)) => format_bytes(*bytes),
        Some(value) => value.as_text().unwrap_or("?").to_string(),
        None => "?".to_string(),
    }
}

#[must_use]
pub fn time_cell(result: &ExecutionResult) -> String {
    match result.get(KEY_TOTAL_TIME) {
        Some(value) => value.as_text().unwrap_or("?").to_string(),
        None => "?".to_string(),
    }
}

/// Decimal-unit byte humanizer, e.g. `83.9 MB`.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "kB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Print the summary table to stderr.
pub fn print_table(report: &AggregateReport) {
    let id_width = report
        .keys()
        .map(|id| id.chars().count())
        .max()
        .unwrap_or(7)
        .max("History".len());

    eprintln!();
    eprintln!("{:<id_width$}  {:>10}  {:>10}  Accept", "History", "Time", "Memory");
    let mut accepted = 0usize;
    let mut rejected = 0usize;
    let mut timed_out = 0usize;
    let mut failed = 0usize;
    for (id, result) in report {
        eprintln!(
            "{:<id_width$}  {:>10}  {:>10}  {}",
            id,
            time_cell(result),
            memory_cell(result),
            verdict_cell(result)
        );
        match result.get(KEY_ACCEPT) {
            Some(MetricValue::Flag(true)) => accepted += 1,
            Some(MetricValue::Timeout) => timed_out += 1,
            Some(MetricValue::Failed) => failed += 1,
            _ => rejected += 1,
        }
    }
    eprintln!();
    eprintln!(
        "Summary: {} histories checked, {} accepted, {} rejected, {} timed out, {} failed",
        report.len(),
        accepted,
        rejected,
        timed_out,
        failed
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(entries: &[(&str, MetricValue)]) -> ExecutionResult {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(999), "999 B");
        assert_eq!(format_bytes(1_500), "1.5 kB");
        assert_eq!(format_bytes(83_886_080), "83.9 MB");
        assert_eq!(format_bytes(2_000_000_000), "2.0 GB");
    }

    #[test]
    fn verdict_cells() {
        assert_eq!(
            verdict_cell(&result_with(&[(KEY_ACCEPT, MetricValue::Flag(true))])),
            "✔"
        );
        assert_eq!(
            verdict_cell(&result_with(&[(KEY_ACCEPT, MetricValue::Flag(false))])),
            "✘"
        );
        assert_eq!(
            verdict_cell(&result_with(&[(KEY_ACCEPT, MetricValue::Timeout)])),
            "TO"
        );
        assert_eq!(
            verdict_cell(&result_with(&[(KEY_ACCEPT, MetricValue::Failed)])),
            "ERR"
        );
        assert_eq!(verdict_cell(&result_with(&[])), "?");
    }

    #[test]
    fn marker_rows_keep_marker_in_every_cell() {
        let result = result_with(&[
            (KEY_ACCEPT, MetricValue::Timeout),
            (KEY_MAX_MEMORY, MetricValue::Timeout),
            (KEY_TOTAL_TIME, MetricValue::Timeout),
        ]);
        assert_eq!(time_cell(&result), "TO");
        assert_eq!(memory_cell(&result), "TO");
        assert_eq!(verdict_cell(&result), "TO");
    }
}
