use crate::{error::ExecutionError, fetcher::PageFetcher};
use futures::{
    TryStreamExt,
    stream::{self, BoxStream, StreamExt},
};
use model::pagination::request::PageRequest;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Drives a paginated listing: one sequential fetch per page until the
/// result is exhausted.
///
/// Termination: the cumulative item count reaches the total reported by the
/// first page, or a page comes back empty. Cancellation is checked before
/// every fetch and again once it completes; a page received after
/// cancellation is dropped whole.
pub struct Paginator<F: PageFetcher> {
    template: PageRequest,
    fetcher: Arc<F>,
    cancel: CancellationToken,
}

struct PageCursor<F: PageFetcher> {
    template: PageRequest,
    fetcher: Arc<F>,
    cancel: CancellationToken,
    page: usize,
    fetched: usize,
    total: Option<usize>,
    done: bool,
}

impl<F> Paginator<F>
where
    F: PageFetcher + 'static,
{
    /// `template.page` is ignored: fetching always starts at page 0.
    pub fn new(template: PageRequest, fetcher: Arc<F>, cancel: CancellationToken) -> Self {
        Self {
            template,
            fetcher,
            cancel,
        }
    }

    /// Lazy, single-pass sequence of items. The next page is only requested
    /// once every item of the current one has been consumed.
    pub fn into_stream(self) -> BoxStream<'static, Result<F::Item, ExecutionError>> {
        let cursor = PageCursor {
            template: self.template,
            fetcher: self.fetcher,
            cancel: self.cancel,
            page: 0,
            fetched: 0,
            total: None,
            done: false,
        };

        stream::try_unfold(cursor, PageCursor::next_page)
            .map_ok(|items| stream::iter(items.into_iter().map(Ok::<_, ExecutionError>)))
            .try_flatten()
            .boxed()
    }

    /// Fetch every page and return the complete, ordered result.
    pub async fn collect_all(self) -> Result<Vec<F::Item>, ExecutionError> {
        self.into_stream().try_collect().await
    }
}

impl<F: PageFetcher> PageCursor<F> {
    async fn next_page(mut self) -> Result<Option<(Vec<F::Item>, Self)>, ExecutionError> {
        if self.done {
            return Ok(None);
        }

        let page = self.page;
        if self.cancel.is_cancelled() {
            info!(page_no = page, fetched = self.fetched, "Pagination cancelled.");
            return Err(ExecutionError::Cancelled { page });
        }

        let request = PageRequest {
            page,
            ..self.template.clone()
        };
        debug!(page_no = page, page_size = request.page_size, "Fetching page.");

        let result = self
            .fetcher
            .fetch_page(request)
            .await
            .map_err(|source| ExecutionError::FetchFailed { page, source })?;

        if self.cancel.is_cancelled() {
            info!(
                page_no = page,
                discarded = result.len(),
                "Pagination cancelled while fetching, page discarded."
            );
            return Err(ExecutionError::Cancelled { page });
        }

        let total = *self.total.get_or_insert(result.total);
        if result.total != total {
            warn!(
                page_no = page,
                first_total = total,
                page_total = result.total,
                "Total changed between pages, keeping the first one."
            );
        }

        if result.is_empty() {
            info!(pages = page, fetched = self.fetched, "Pagination finished.");
            return Ok(None);
        }

        self.fetched += result.len();
        self.page += 1;
        info!(
            page_no = page,
            items = result.len(),
            fetched = self.fetched,
            total,
            "Fetched page."
        );

        if self.fetched >= total {
            info!(pages = self.page, fetched = self.fetched, "Pagination finished.");
            self.done = true;
        }
        Ok(Some((result.items, self)))
    }
}
