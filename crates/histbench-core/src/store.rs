//! Concurrency-safe result store. A single lock guards the outer mapping;
//! by construction each task's sub-map is written by exactly one worker at
//! a time, so per-entry locking is unnecessary.

use crate::model::{AggregateReport, ExecutionResult, MetricValue, Task};
use std::sync::Mutex;
use tracing::debug;

pub struct ResultStore {
    inner: Mutex<AggregateReport>,
}

impl ResultStore {
    /// Pre-seed one empty record per task so every task appears in the
    /// report even if its execution never writes a metric.
    pub fn new(tasks: &[Task]) -> Self {
        let mut map = AggregateReport::new();
        for task in tasks {
            map.insert(task.id.clone(), ExecutionResult::new());
        }
        Self {
            inner: Mutex::new(map),
        }
    }

    /// Point update; later writes for the same key overwrite earlier ones.
    pub fn update(&self, task_id: &str, key: &str, value: MetricValue) {
        let mut map = self.inner.lock().expect("result store lock");
        debug!(task_id, key, ?value, "store update");
        map.entry(task_id.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Clone of the current contents. Intended for observation only; the
    /// authoritative read happens after all workers have joined.
    pub fn snapshot(&self) -> AggregateReport {
        self.inner.lock().expect("result store lock").clone()
    }

    /// Consume the store once the pool has returned.
    pub fn into_report(self) -> AggregateReport {
        self.inner.into_inner().expect("result store lock")
    }
}
