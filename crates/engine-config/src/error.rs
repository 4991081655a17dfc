use thiserror::Error;

/// Errors raised when loading or validating query settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Page size outside `1..=max_page_size`.
    #[error("Invalid page size {page_size}: expected a value between 1 and {max}")]
    InvalidPageSize { page_size: usize, max: usize },

    /// An environment override could not be parsed.
    #[error("Invalid value for {key}: {value:?} ({message})")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    #[error("Failed to parse settings document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid env file: {0}")]
    EnvFile(String),
}
