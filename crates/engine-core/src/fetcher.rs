use async_trait::async_trait;
use model::pagination::{page::Page, request::PageRequest};

/// Error type returned by fetch collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One paginated listing operation of the remote service.
///
/// `request.page` is zero-based. Implementations perform a single round trip
/// per call and do not retry.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    type Item: Send + 'static;

    async fn fetch_page(&self, request: PageRequest) -> Result<Page<Self::Item>, BoxError>;
}

