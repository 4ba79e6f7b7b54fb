use std::num::NonZeroU32;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Parameters for collecting the full history of one symbol.
///
/// Date bounds are inclusive. An unset bound is left out of the upstream
/// query entirely so the remote falls back to its full-history default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectParams {
    /// Stock ticker, e.g. `"HPG"`.
    pub symbol: String,

    /// Inclusive start date.
    #[serde(default)]
    pub start: Option<NaiveDate>,

    /// Inclusive end date.
    #[serde(default)]
    pub end: Option<NaiveDate>,

    /// Upper bound on records requested per page.
    pub page_size: u32,

    /// Stop with an error instead of requesting more than this many pages.
    /// `None` keeps paging until the remote signals the end.
    #[serde(default)]
    pub max_pages: Option<NonZeroU32>,
}

impl CollectParams {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            start: None,
            end: None,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: None,
        }
    }

    pub fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<NonZeroU32>) -> Self {
        self.max_pages = max_pages;
        self
    }
}

/// One request of the pagination loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest<'a> {
    pub symbol: &'a str,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// 1-based page index.
    pub page_index: u32,
    pub page_size: u32,
}

impl<'a> PageRequest<'a> {
    pub fn first(params: &'a CollectParams) -> Self {
        Self {
            symbol: &params.symbol,
            start: params.start,
            end: params.end,
            page_index: 1,
            page_size: params.page_size,
        }
    }

    pub fn next(&self) -> Self {
        Self {
            page_index: self.page_index + 1,
            ..self.clone()
        }
    }
}
