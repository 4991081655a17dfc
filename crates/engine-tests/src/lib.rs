#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use expression_engine::{CapturedEnv, Lambda};
use model::catalog::entities;
use planner::{CompiledPredicate, PlanError, compile_predicate};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

pub mod utils;

/// Route this thread's events to a fmt subscriber honouring `RUST_LOG`
/// until the guard is dropped.
pub fn init_tracing() -> DefaultGuard {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .finish();
    tracing::subscriber::set_default(subscriber)
}

/// Pinned `UtcNow()` for date scenarios: 2024-03-01T12:00:00Z.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Compile a predicate against the task catalog with no captured variables.
pub fn compile_tasks(predicate: &Lambda) -> Result<CompiledPredicate, PlanError> {
    compile_tasks_with(predicate, &CapturedEnv::new())
}

pub fn compile_tasks_with(
    predicate: &Lambda,
    env: &CapturedEnv,
) -> Result<CompiledPredicate, PlanError> {
    compile_predicate(predicate, entities::tasks(), env)
}
