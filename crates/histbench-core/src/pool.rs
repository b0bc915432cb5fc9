//! Fixed-size worker pool over a shared FIFO task queue. Each worker runs
//! one supervision to completion before taking the next task; the pool
//! returns only after every task is terminal and all workers have joined.

use crate::config::BenchConfig;
use crate::discovery::discover_tasks;
use crate::model::{AggregateReport, Task};
use crate::report::progress::{ProgressSink, ProgressTracker};
use crate::report;
use crate::store::ResultStore;
use crate::supervisor::supervise;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::task::JoinSet;
use tracing::info;

/// Run every task exactly once across at most `cfg.workers` concurrent
/// executions. Completion order is nondeterministic; the only ordering
/// contract is that the store is complete when this returns.
pub async fn run_pool(
    tasks: Vec<Task>,
    cfg: Arc<BenchConfig>,
    store: Arc<ResultStore>,
    tracker: Arc<ProgressTracker>,
) -> anyhow::Result<()> {
    let queue: Arc<Mutex<VecDeque<Task>>> = Arc::new(Mutex::new(tasks.into()));
    let mut workers = JoinSet::new();

    for worker_id in 0..cfg.workers {
        let queue = queue.clone();
        let cfg = cfg.clone();
        let store = store.clone();
        let tracker = tracker.clone();
        workers.spawn(async move {
            loop {
                let task = {
                    let mut queue = queue.lock().expect("task queue lock");
                    queue.pop_front()
                };
                let Some(task) = task else {
                    info!(worker_id, "queue empty, worker exiting");
                    break;
                };

                info!(worker_id, task = %task.id, "running task");
                tracker.task_started();
                let supervision = supervise(&task, &cfg).await;
                for (key, value) in supervision.result {
                    store.update(&task.id, &key, value);
                }
                info!(worker_id, task = %task.id, outcome = ?supervision.outcome, "task finished");
                tracker.task_finished();
            }
        });
    }

    while let Some(joined) = workers.join_next().await {
        joined?;
    }
    Ok(())
}

/// Full harness run: validate the config, discover tasks, drive the pool,
/// finalize the rollup. Config and discovery failures abort before any
/// worker starts; nothing else does.
pub async fn run_benchmark(
    cfg: BenchConfig,
    sink: Option<ProgressSink>,
) -> anyhow::Result<AggregateReport> {
    cfg.validate()?;
    let tasks = discover_tasks(&cfg.history_root, cfg.history_type, cfg.discovery)?;
    info!(
        tasks = tasks.len(),
        workers = cfg.workers,
        solver = %cfg.solver,
        timeout_seconds = cfg.timeout_seconds,
        "starting benchmark run"
    );

    let tracker = Arc::new(ProgressTracker::new(tasks.len(), sink));
    let store = Arc::new(ResultStore::new(&tasks));
    run_pool(tasks, Arc::new(cfg), store.clone(), tracker).await?;

    let store = Arc::into_inner(store).expect("all workers joined");
    let mut report = store.into_report();
    report::finalize(&mut report);
    Ok(report)
}
