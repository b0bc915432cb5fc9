use std::path::PathBuf;

use tracing::error;

use histbench_core::config::{self, BenchConfig, DiscoveryMode, PruningMode};
use histbench_core::model::KEY_ACCEPT;
use histbench_core::report::{console, json, progress};
use histbench_core::{ConfigError, DiscoveryError, MetricValue};

use crate::cli::args::RunArgs;
use crate::exit_codes;

pub async fn run(args: RunArgs) -> anyhow::Result<i32> {
    let cfg = match build_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let sink = if args.no_progress {
        None
    } else {
        Some(progress::default_progress_sink())
    };

    let output = cfg.output.clone();
    let report = match histbench_core::run_benchmark(cfg, sink).await {
        Ok(report) => report,
        Err(e) => {
            if let Some(discovery) = e.downcast_ref::<DiscoveryError>() {
                error!("{discovery}");
                return Ok(exit_codes::CONFIG_ERROR);
            }
            if let Some(config) = e.downcast_ref::<ConfigError>() {
                error!("{config}");
                return Ok(exit_codes::CONFIG_ERROR);
            }
            return Err(e);
        }
    };

    json::write_report(&report, &output)?;
    console::print_table(&report);

    let all_accepted = report
        .values()
        .all(|result| matches!(result.get(KEY_ACCEPT), Some(MetricValue::Flag(true))));
    if all_accepted {
        Ok(exit_codes::SUCCESS)
    } else {
        Ok(exit_codes::TASK_FAILURES)
    }
}

/// Layer CLI flags over the YAML config. Without `--config`, the four
/// fields with no sane default must all come from flags.
fn build_config(args: &RunArgs) -> Result<BenchConfig, ConfigError> {
    let mut cfg = match &args.config {
        Some(path) => config::load_config(path)?,
        None => BenchConfig {
            checker: require_path(&args.checker, "--checker")?,
            history_root: require_path(&args.history_root, "--history-root")?,
            history_type: args
                .history_type
                .as_deref()
                .ok_or_else(|| missing("--history-type"))?
                .parse()?,
            discovery: DiscoveryMode::Flat,
            solver: args
                .solver
                .as_deref()
                .ok_or_else(|| missing("--solver"))?
                .parse()?,
            pruning: PruningMode::Fast,
            workers: config::DEFAULT_WORKERS,
            timeout_seconds: config::DEFAULT_TIMEOUT_SECONDS,
            output: PathBuf::from(config::DEFAULT_OUTPUT),
        },
    };

    if let Some(checker) = &args.checker {
        cfg.checker = checker.clone();
    }
    if let Some(root) = &args.history_root {
        cfg.history_root = root.clone();
    }
    if let Some(history_type) = &args.history_type {
        cfg.history_type = history_type.parse()?;
    }
    if let Some(discovery) = &args.discovery {
        cfg.discovery = discovery.parse()?;
    }
    if let Some(solver) = &args.solver {
        cfg.solver = solver.parse()?;
    }
    if let Some(pruning) = &args.pruning {
        cfg.pruning = pruning.parse()?;
    }
    if let Some(workers) = args.workers {
        cfg.workers = workers;
    }
    if let Some(timeout) = args.timeout {
        cfg.timeout_seconds = timeout.as_secs();
    }
    if let Some(output) = &args.output {
        cfg.output = output.clone();
    }

    cfg.validate()?;
    Ok(cfg)
}

fn require_path(value: &Option<PathBuf>, flag: &str) -> Result<PathBuf, ConfigError> {
    value.clone().ok_or_else(|| missing(flag))
}

fn missing(flag: &str) -> ConfigError {
    ConfigError(format!("{flag} is required when no --config file is given"))
}
