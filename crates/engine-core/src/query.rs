use crate::{error::ExecutionError, fetcher::PageFetcher, paginator::Paginator};
use engine_config::QuerySettings;
use expression_engine::{CapturedEnv, Clock, Evaluator, FunctionRegistry, Lambda};
use futures::{
    TryStreamExt,
    stream::{self, BoxStream, StreamExt},
};
use model::{
    catalog::{FieldCatalog, entities},
    core::value::Value,
    filter::field::EntityKind,
    pagination::request::SortDirection,
};
use planner::{QueryPlan, QueryPlanner};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Listing query against one entity kind: an optional predicate, an optional
/// ordering and the fetch collaborator that serves the pages.
///
/// Nothing is compiled until [`Query::plan`], [`Query::stream`],
/// [`Query::collect`] or [`Query::count`] is called, and compilation errors are
/// always returned before the first fetch.
pub struct Query<F: PageFetcher> {
    fetcher: Arc<F>,
    catalog: Arc<dyn FieldCatalog>,
    predicate: Option<Lambda>,
    order_by: Option<Lambda>,
    direction: Option<SortDirection>,
    page_size: Option<usize>,
    settings: QuerySettings,
    env: CapturedEnv,
    cancel: CancellationToken,
    clock: Option<Clock>,
    functions: Option<FunctionRegistry>,
}

impl<F> Query<F>
where
    F: PageFetcher + 'static,
{
    pub fn new(fetcher: Arc<F>, catalog: Arc<dyn FieldCatalog>) -> Self {
        Self {
            fetcher,
            catalog,
            predicate: None,
            order_by: None,
            direction: None,
            page_size: None,
            settings: QuerySettings::default(),
            env: CapturedEnv::new(),
            cancel: CancellationToken::new(),
            clock: None,
            functions: None,
        }
    }

    /// Query using the built-in catalog of `entity`.
    pub fn for_entity(fetcher: Arc<F>, entity: EntityKind) -> Self {
        Self::new(fetcher, Arc::new(entities::for_entity(entity).clone()))
    }

    /// Restrict the result. Repeated calls are AND-ed together.
    pub fn filter(mut self, predicate: Lambda) -> Self {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => existing.and_also(predicate),
            None => predicate,
        });
        self
    }

    pub fn order_by(mut self, key: Lambda) -> Self {
        self.order_by = Some(key);
        self.direction = Some(SortDirection::Ascending);
        self
    }

    pub fn order_by_descending(mut self, key: Lambda) -> Self {
        self.order_by = Some(key);
        self.direction = Some(SortDirection::Descending);
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_settings(mut self, settings: QuerySettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Functions available to the closed parts of the predicate, in place of
    /// the built-in set.
    pub fn with_functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions = Some(functions);
        self
    }

    /// Bind an outer variable referenced by the predicate.
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.env.bind(name, value);
        self
    }

    /// Compile the request template without fetching anything.
    pub fn plan(&self) -> Result<QueryPlan, ExecutionError> {
        let page_size = self.page_size.unwrap_or(self.settings.page_size);
        self.settings.check_page_size(page_size)?;

        let mut planner = QueryPlanner::new(self.catalog.as_ref(), &self.env)
            .predicate(self.predicate.as_ref())
            .order_by(self.order_by.as_ref())
            .direction(self.direction.unwrap_or(self.settings.default_direction))
            .page_size(page_size);
        if let Some(clock) = self.clock {
            planner = planner.clock(clock);
        }
        if let Some(functions) = &self.functions {
            planner = planner.evaluator(Evaluator::with_registry(functions.clone()));
        }

        Ok(planner.plan()?)
    }

    /// Lazy sequence over every matching item.
    ///
    /// A token cancelled before the first fetch yields `Cancelled { page: 0 }`,
    /// also when the predicate is always false.
    pub fn stream(
        &self,
    ) -> Result<BoxStream<'static, Result<F::Item, ExecutionError>>, ExecutionError> {
        let plan = self.plan()?;
        let entity = self.catalog.entity();

        let Some(template) = plan.request(0) else {
            if self.cancel.is_cancelled() {
                info!(entity = %entity, "Query cancelled before it started.");
                return Ok(stream::iter([Err(ExecutionError::Cancelled { page: 0 })]).boxed());
            }
            info!(entity = %entity, "Predicate is always false, no page fetched.");
            return Ok(stream::empty().boxed());
        };

        info!(
            entity = %entity,
            sort = %template.sort.field,
            page_size = template.page_size,
            "Starting query."
        );
        Ok(Paginator::new(template, self.fetcher.clone(), self.cancel.clone()).into_stream())
    }

    /// Every matching item, in server order.
    pub async fn collect(&self) -> Result<Vec<F::Item>, ExecutionError> {
        self.stream()?.try_collect().await
    }

    /// Number of matching items, read from the total of a one-item page.
    ///
    /// Cancellation is honoured the same way as [`Query::stream`].
    pub async fn count(&self) -> Result<usize, ExecutionError> {
        let plan = self.plan()?;
        if self.cancel.is_cancelled() {
            info!(entity = %self.catalog.entity(), "Query cancelled before it started.");
            return Err(ExecutionError::Cancelled { page: 0 });
        }
        let Some(mut request) = plan.request(0) else {
            return Ok(0);
        };
        request.page_size = 1;

        let page = self
            .fetcher
            .fetch_page(request)
            .await
            .map_err(|source| ExecutionError::FetchFailed { page: 0, source })?;

        info!(entity = %self.catalog.entity(), total = page.total, "Counted items.");
        Ok(page.total)
    }
}
