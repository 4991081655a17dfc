use crate::fetcher::BoxError;
use engine_config::SettingsError;
use planner::PlanError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The predicate or ordering could not be compiled; nothing was fetched.
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// The fetch collaborator failed; the sequence ends here.
    #[error("Failed to fetch page {page}: {source}")]
    FetchFailed {
        page: usize,
        #[source]
        source: BoxError,
    },

    #[error("Query cancelled before page {page} was delivered")]
    Cancelled { page: usize },
}
