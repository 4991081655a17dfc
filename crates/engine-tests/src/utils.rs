#![allow(dead_code)]

use async_trait::async_trait;
use engine_core::{BoxError, PageFetcher};
use model::{
    catalog::entities::{TaskOptionField, TaskSummaryField},
    core::status::TaskStatus,
    filter::{
        FieldCondition, FilterField, NumberFilter, StatusFilter, StringFilter,
        field::EntityKind,
        operator::{NumberOperator, StatusOperator, StringOperator},
    },
    pagination::{page::Page, request::PageRequest},
};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Fake listing operation serving `sizes[i]` items on page `i`, every page
/// reporting the same `total`. Items are numbered globally from 0 and every
/// request is recorded.
pub struct ScriptedFetcher {
    sizes: Vec<usize>,
    total: usize,
    fail_on: Option<usize>,
    cancel_during: Option<(usize, CancellationToken)>,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedFetcher {
    pub fn new(sizes: Vec<usize>, total: usize) -> Self {
        Self {
            sizes,
            total,
            fail_on: None,
            cancel_during: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fail with a transport error when `page` is requested.
    pub fn failing_on(mut self, page: usize) -> Self {
        self.fail_on = Some(page);
        self
    }

    /// Trip `token` while `page` is in flight.
    pub fn cancelling_during(mut self, page: usize, token: CancellationToken) -> Self {
        self.cancel_during = Some((page, token));
        self
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    type Item = usize;

    async fn fetch_page(&self, request: PageRequest) -> Result<Page<usize>, BoxError> {
        let page = request.page;
        self.requests.lock().unwrap().push(request);

        if self.fail_on == Some(page) {
            return Err(format!("listing unavailable on page {page}").into());
        }
        if let Some((at, token)) = &self.cancel_during
            && *at == page
        {
            token.cancel();
        }

        let start: usize = self.sizes.iter().take(page).sum();
        let len = self.sizes.get(page).copied().unwrap_or(0);
        Ok(Page::new(self.total, (start..start + len).collect()))
    }
}

pub fn status_is(status: TaskStatus) -> FilterField {
    FilterField::new(
        TaskSummaryField::Status.id(),
        FieldCondition::Status(StatusFilter {
            value: status.into(),
            operator: StatusOperator::Equal,
        }),
    )
}

pub fn application_starts_with(prefix: &str) -> FilterField {
    FilterField::new(
        TaskOptionField::ApplicationName.id(EntityKind::Task),
        FieldCondition::String(StringFilter {
            value: prefix.to_string(),
            operator: StringOperator::StartsWith,
        }),
    )
}

pub fn priority(operator: NumberOperator, value: i64) -> FilterField {
    FilterField::new(
        TaskOptionField::Priority.id(EntityKind::Task),
        FieldCondition::Number(NumberFilter { value, operator }),
    )
}

pub fn max_retries(operator: NumberOperator, value: i64) -> FilterField {
    FilterField::new(
        TaskOptionField::MaxRetries.id(EntityKind::Task),
        FieldCondition::Number(NumberFilter { value, operator }),
    )
}
