//! Exit codes are part of the public contract: downstream scripts gate on
//! them instead of scraping the table.

/// Every task completed and the checker accepted every history.
pub const SUCCESS: i32 = 0;
/// At least one rejection, timeout, or spawn failure.
pub const TASK_FAILURES: i32 = 1;
/// Invalid configuration or discovery failure; no worker ever started.
pub const CONFIG_ERROR: i32 = 2;
