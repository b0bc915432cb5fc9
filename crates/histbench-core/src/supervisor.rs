//! Process supervision: run exactly one checker invocation to completion
//! or timeout. A single poll loop with a fixed tick carries the three
//! per-tick duties — liveness check, resident-memory sample, deadline
//! check — so timeout and sampling semantics stay easy to reason about.

use crate::config::{BenchConfig, PruningMode};
use crate::model::{
    ExecutionResult, MetricValue, SupervisionOutcome, Task, KEY_ACCEPT, KEY_MAX_MEMORY,
    KEY_TOTAL_TIME,
};
use crate::parser::{parse_line, LogLine};
use std::process::Stdio;
use std::time::Duration;
use sysinfo::{Pid, System};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

/// Poll tick for liveness, memory sampling and the deadline check.
const SAMPLE_INTERVAL: Duration = Duration::from_millis(100);
/// Wait after process exit before reading the captured streams, so the
/// last buffered output has been flushed through the pipe.
const STREAM_SETTLE: Duration = Duration::from_secs(1);
/// Grace window between SIGTERM and SIGKILL on timeout.
const KILL_GRACE: Duration = Duration::from_secs(5);

/// Result of supervising one checker invocation.
#[derive(Debug)]
pub struct Supervision {
    pub outcome: SupervisionOutcome,
    pub result: ExecutionResult,
}

/// Spawn the checker for `task`, sample its resident memory while it runs,
/// enforce the configured deadline, and parse its stdout into metrics.
///
/// Never returns an error: spawn failures and timeouts are contained here
/// and reported through the outcome plus marker-filled metrics, so one
/// misbehaving invocation cannot stop the rest of the run.
pub async fn supervise(task: &Task, cfg: &BenchConfig) -> Supervision {
    let mut cmd = Command::new(&cfg.checker);
    cmd.arg(&task.artifact_path)
        .arg("--solver")
        .arg(cfg.solver.as_flag())
        .arg("--history-type")
        .arg(cfg.history_type.as_flag());
    if cfg.pruning != PruningMode::None {
        cmd.arg("--pruning").arg(cfg.pruning.as_flag());
    }
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(task = %task.id, checker = %cfg.checker.display(), "spawning checker");
    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            warn!(task = %task.id, error = %e, "failed to spawn checker");
            return Supervision {
                outcome: SupervisionOutcome::SpawnFailed,
                result: marker_result(MetricValue::Failed),
            };
        }
    };

    let pid = child.id();
    let stdout_task = collect_lines(child.stdout.take());
    let stderr_task = collect_lines(child.stderr.take());

    let deadline = Instant::now() + cfg.timeout();
    let mut sampler = MemorySampler::new(pid);

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break Some(status),
            Ok(None) => {}
            Err(e) => {
                warn!(task = %task.id, error = %e, "liveness check failed");
                break child.wait().await.ok();
            }
        }

        sampler.sample();

        if Instant::now() >= deadline {
            info!(task = %task.id, "checker timed out, terminating");
            terminate(&mut child, pid).await;
            // No output parsing for a timed-out task; an orphaned
            // grandchild may still hold the pipe open, so don't wait for
            // EOF either.
            stdout_task.abort();
            stderr_task.abort();
            return Supervision {
                outcome: SupervisionOutcome::TimedOut,
                result: marker_result(MetricValue::Timeout),
            };
        }

        sleep(SAMPLE_INTERVAL).await;
    };

    match status {
        Some(status) if !status.success() => {
            warn!(task = %task.id, %status, "checker exited nonzero");
        }
        None => warn!(task = %task.id, "checker exit status unavailable"),
        _ => {}
    }

    sleep(STREAM_SETTLE).await;
    let stdout_lines = stdout_task.await.unwrap_or_default();
    let stderr_lines = stderr_task.await.unwrap_or_default();
    if !stderr_lines.is_empty() {
        debug!(task = %task.id, lines = stderr_lines.len(), "checker stderr captured");
    }

    let mut result = ExecutionResult::new();
    result.insert(KEY_MAX_MEMORY.to_string(), MetricValue::Bytes(sampler.max()));
    for line in &stdout_lines {
        let Some(parsed) = parse_line(line) else { continue };
        let key = parsed.key().to_string();
        let value = match parsed {
            LogLine::Metric { value, .. } => MetricValue::Text(value),
            LogLine::Verdict(accept) => MetricValue::Flag(accept),
        };
        result.insert(key, value);
    }

    Supervision {
        outcome: SupervisionOutcome::Completed,
        result,
    }
}

/// Every reserved field set to one marker, so downstream consumers detect
/// an untrustworthy task with a single check instead of per-field probing.
fn marker_result(marker: MetricValue) -> ExecutionResult {
    [KEY_ACCEPT, KEY_MAX_MEMORY, KEY_TOTAL_TIME]
        .iter()
        .map(|key| ((*key).to_string(), marker.clone()))
        .collect()
}

/// SIGTERM, wait for the grace window, then SIGKILL if the process is
/// still alive. On non-unix platforms only the forced tier exists.
async fn terminate(child: &mut Child, pid: Option<u32>) {
    #[cfg(unix)]
    if let Some(pid) = pid {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid as NixPid;

        let _ = kill(NixPid::from_raw(pid as i32), Signal::SIGTERM);
        let grace_end = Instant::now() + KILL_GRACE;
        while Instant::now() < grace_end {
            if let Ok(Some(_)) = child.try_wait() {
                return;
            }
            sleep(Duration::from_millis(50)).await;
        }
    }
    #[cfg(not(unix))]
    let _ = pid;

    if let Err(e) = child.kill().await {
        warn!(error = %e, "force kill failed");
    }
    let _ = child.wait().await;
}

/// Buffer one captured stream line by line. Collecting while the process
/// runs avoids blocking the checker on a full pipe; the supervisor still
/// only reads the buffered lines after exit.
fn collect_lines<R>(reader: Option<R>) -> JoinHandle<Vec<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut collected = Vec::new();
        if let Some(reader) = reader {
            let mut lines = BufReader::new(reader).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                collected.push(line);
            }
        }
        collected
    })
}

/// Tracks the running maximum of the child's resident set size. A process
/// that disappears between the liveness check and a sample is a benign
/// race; sampling just stops.
struct MemorySampler {
    system: System,
    pid: Option<Pid>,
    max_resident: u64,
}

impl MemorySampler {
    fn new(pid: Option<u32>) -> Self {
        Self {
            system: System::new(),
            pid: pid.map(Pid::from_u32),
            max_resident: 0,
        }
    }

    fn sample(&mut self) {
        let Some(pid) = self.pid else { return };
        if !self.system.refresh_process(pid) {
            debug!(pid = pid.as_u32(), "process vanished mid-poll, sampling stopped");
            self.pid = None;
            return;
        }
        if let Some(process) = self.system.process(pid) {
            self.max_resident = self.max_resident.max(process.memory());
        }
    }

    fn max(&self) -> u64 {
        self.max_resident
    }
}
