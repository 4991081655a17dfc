use crate::filter::{FilterOr, field::SortableFieldId};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Page size used when a query does not set one.
pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(format!("Unknown sort direction: {other}")),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortableFieldId,
    pub direction: SortDirection,
}

/// One call of a paginated listing operation.
///
/// `page` is zero-based: the first request of a query carries `page = 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRequest {
    pub filter: FilterOr,
    pub sort: SortSpec,
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    /// Index of the first item this page covers in the full result.
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.page_size)
    }
}
