//! Live progress observation. Purely observational — counts never gate
//! correctness. The runner emits an event on every task start/finish; a
//! sink decides how to display it.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// One progress update.
#[derive(Debug, Clone, Copy)]
pub struct ProgressEvent {
    pub running: usize,
    pub finished: usize,
    pub total: usize,
}

/// Sink for progress events. Implementations may throttle.
pub type ProgressSink = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

#[derive(Debug, Default)]
struct Counts {
    running: usize,
    finished: usize,
    peak_running: usize,
}

/// Tracks queued/running/finished counts behind one lock and forwards
/// transitions to an optional sink.
pub struct ProgressTracker {
    total: usize,
    counts: Mutex<Counts>,
    sink: Option<ProgressSink>,
}

impl ProgressTracker {
    pub fn new(total: usize, sink: Option<ProgressSink>) -> Self {
        Self {
            total,
            counts: Mutex::new(Counts::default()),
            sink,
        }
    }

    pub fn task_started(&self) {
        let event = {
            let mut counts = self.counts.lock().expect("progress lock");
            counts.running += 1;
            counts.peak_running = counts.peak_running.max(counts.running);
            self.event(&counts)
        };
        self.emit(event);
    }

    pub fn task_finished(&self) {
        let event = {
            let mut counts = self.counts.lock().expect("progress lock");
            counts.running -= 1;
            counts.finished += 1;
            self.event(&counts)
        };
        self.emit(event);
    }

    /// High-water mark of concurrently running tasks.
    pub fn peak_running(&self) -> usize {
        self.counts.lock().expect("progress lock").peak_running
    }

    pub fn finished(&self) -> usize {
        self.counts.lock().expect("progress lock").finished
    }

    fn event(&self, counts: &Counts) -> ProgressEvent {
        ProgressEvent {
            running: counts.running,
            finished: counts.finished,
            total: self.total,
        }
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(sink) = &self.sink {
            sink(event);
        }
    }
}

/// Format a single progress line. Deterministic, unit-testable.
#[must_use]
pub fn format_progress_line(event: ProgressEvent) -> String {
    format!(
        "({} out of {} tasks finished, {} running)",
        event.finished, event.total, event.running
    )
}

/// Minimum interval between emitted lines to avoid log spam.
const PROGRESS_MIN_INTERVAL_MS: u64 = 200;

/// For large task sets, emit at most every this many finishes.
pub(crate) fn progress_step(total: usize) -> usize {
    if total <= 10 {
        1
    } else {
        std::cmp::max(1, total / 10)
    }
}

/// Default stderr sink: throttled by time and by step, always emits the
/// final event. Single-task runs stay silent; there is nothing worth
/// reporting.
pub fn default_progress_sink() -> ProgressSink {
    let last_emit: Arc<Mutex<Option<Instant>>> = Arc::new(Mutex::new(None));
    Arc::new(move |event: ProgressEvent| {
        if event.total <= 1 {
            return;
        }
        let step = progress_step(event.total);
        let now = Instant::now();
        let should_emit = {
            let mut last = last_emit.lock().expect("progress throttle lock");
            let emit_final = event.finished == event.total;
            let emit_step = event.finished > 0 && event.finished % step == 0;
            let interval_ok = last
                .map(|t| {
                    now.saturating_duration_since(t)
                        >= Duration::from_millis(PROGRESS_MIN_INTERVAL_MS)
                })
                .unwrap_or(true);
            let ok = emit_final || (emit_step && interval_ok);
            if ok {
                *last = Some(now);
            }
            ok
        };
        if should_emit {
            eprintln!("{}", format_progress_line(event));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_counts_and_peak() {
        let tracker = ProgressTracker::new(3, None);
        tracker.task_started();
        tracker.task_started();
        tracker.task_finished();
        tracker.task_started();
        tracker.task_finished();
        tracker.task_finished();
        assert_eq!(tracker.finished(), 3);
        assert_eq!(tracker.peak_running(), 2);
    }

    #[test]
    fn sink_sees_transitions() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink: ProgressSink = {
            let seen = seen.clone();
            Arc::new(move |ev: ProgressEvent| seen.lock().unwrap().push(ev.finished))
        };
        let tracker = ProgressTracker::new(2, Some(sink));
        tracker.task_started();
        tracker.task_finished();
        tracker.task_started();
        tracker.task_finished();
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 1, 2]);
    }

    #[test]
    fn progress_step_logic() {
        assert_eq!(progress_step(5), 1);
        assert_eq!(progress_step(10), 1);
        assert_eq!(progress_step(25), 2);
        assert_eq!(progress_step(100), 10);
    }

    #[test]
    fn format_contains_counts() {
        let line = format_progress_line(ProgressEvent {
            running: 2,
            finished: 3,
            total: 10,
        });
        assert!(line.contains("3 out of 10"));
        assert!(line.contains("2 running"));
    }
}
