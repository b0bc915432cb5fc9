//! Concurrent benchmark-execution harness for transaction-consistency
//! checkers: discovers history artifacts on disk, runs an external checker
//! per task under a bounded worker pool with memory sampling and timeout
//! enforcement, parses the checker's log output into metrics, and
//! aggregates everything into one durable report.

pub mod config;
pub mod discovery;
pub mod errors;
pub mod model;
pub mod parser;
pub mod pool;
pub mod report;
pub mod store;
pub mod supervisor;

pub use config::BenchConfig;
pub use errors::{ConfigError, DiscoveryError};
pub use model::{AggregateReport, ExecutionResult, MetricValue, SupervisionOutcome, Task};
pub use pool::run_benchmark;
