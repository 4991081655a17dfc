//! Paginated execution of compiled listing queries.

pub mod error;
pub mod fetcher;
pub mod paginator;
pub mod query;

pub use error::ExecutionError;
pub use fetcher::{BoxError, PageFetcher};
pub use paginator::Paginator;
pub use query::Query;
