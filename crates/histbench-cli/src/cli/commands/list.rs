use tracing::error;

use histbench_core::discovery::discover_tasks;

use crate::cli::args::ListArgs;
use crate::exit_codes;

pub fn run(args: ListArgs) -> anyhow::Result<i32> {
    let history_type = match args.history_type.parse() {
        Ok(t) => t,
        Err(e) => {
            error!("{e}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };
    let mode = match args.discovery.parse() {
        Ok(m) => m,
        Err(e) => {
            error!("{e}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    match discover_tasks(&args.history_root, history_type, mode) {
        Ok(tasks) => {
            for task in &tasks {
                println!("{}", task.id);
            }
            eprintln!("{} histories", tasks.len());
            Ok(exit_codes::SUCCESS)
        }
        Err(e) => {
            error!("{e}");
            Ok(exit_codes::CONFIG_ERROR)
        }
    }
}
