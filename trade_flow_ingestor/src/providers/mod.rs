//! Provider abstraction for trade-flow sources.
//!
//! Two seams live here:
//!
//! - [`PageSource`] is one paginated list endpoint. [`collect`] drives any
//!   page source to completion and is the only place that knows how paging
//!   terminates.
//! - [`TradeFlowProvider`] is a whole upstream (CafeF, Smoney) that can hand
//!   back the full daily history of a symbol for a [`TradeCategory`]. It is
//!   object safe so the binary can pick a provider at runtime through
//!   [`build_provider`].
//!
//! # Example
//!
//! ```rust
//! use trade_flow_ingestor::models::{
//!     category::TradeCategory,
//!     record::Record,
//!     request_params::{CollectParams, PageRequest},
//! };
//! use trade_flow_ingestor::providers::{collect, Page, PageSource, ProviderError};
//!
//! struct OnePage;
//!
//! impl PageSource for OnePage {
//!     fn category(&self) -> TradeCategory {
//!         TradeCategory::Foreign
//!     }
//!
//!     fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Page, ProviderError> {
//!         let records = if request.page_index == 1 { vec![Record::default()] } else { vec![] };
//!         Ok(Page { records, total_count: None })
//!     }
//! }
//!
//! let set = collect(&OnePage, &CollectParams::new("HPG")).unwrap();
//! assert_eq!(set.len(), 1);
//! ```

pub mod cafef;
pub mod http;
pub mod smoney;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use snafu::{Backtrace, Snafu};
use tracing::{debug, info};

use crate::{
    config::IngestorConfig,
    errors::ErrorKind,
    models::{
        category::TradeCategory,
        record::{Record, RecordSet},
        request_params::{CollectParams, PageRequest},
        table::Table,
    },
    providers::{cafef::CafefProvider, smoney::SmoneyProvider},
};

/// One page of records as returned by a single request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub records: Vec<Record>,
    /// Total record count reported by the remote, when it reports one.
    pub total_count: Option<u64>,
}

/// A paginated list endpoint for one trade category.
pub trait PageSource {
    /// The category every page of this source belongs to.
    fn category(&self) -> TradeCategory;

    /// Requests a single page.
    fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Page, ProviderError>;
}

/// Requests pages until the source is exhausted and returns every record in page order.
///
/// The loop stops on the first of:
/// 1. an empty page, whatever total the remote reported earlier;
/// 2. the accumulated row count reaching the total-count reported on page 1.
///
/// With `params.max_pages` set, asking for a page beyond the ceiling fails
/// with [`ProviderError::PageLimit`] instead of returning a partial set.
pub fn collect<S: PageSource + ?Sized>(
    source: &S,
    params: &CollectParams,
) -> Result<RecordSet, ProviderError> {
    let category = source.category();
    let mut set = RecordSet::new(&params.symbol, category);
    let mut request = PageRequest::first(params);
    let mut total_count: Option<u64> = None;

    loop {
        if let Some(max) = params.max_pages {
            if request.page_index > max.get() {
                return PageLimitSnafu {
                    symbol: &params.symbol,
                    max_pages: max.get(),
                }
                .fail();
            }
        }

        let page = source.fetch_page(&request)?;
        debug!(
            symbol = %params.symbol,
            %category,
            page = request.page_index,
            rows = page.records.len(),
            reported_total = ?page.total_count,
            "fetched page"
        );

        if page.records.is_empty() {
            break;
        }
        set.extend(page.records);

        if request.page_index == 1 {
            total_count = page.total_count.filter(|&n| n > 0);
        }
        if let Some(total) = total_count {
            if set.len() as u64 >= total {
                break;
            }
        }

        request = request.next();
    }

    info!(
        symbol = %params.symbol,
        %category,
        rows = set.len(),
        pages = request.page_index,
        "collection finished"
    );
    Ok(set)
}

/// A trade-flow upstream able to return the daily history of a symbol.
pub trait TradeFlowProvider {
    /// Short provider code, used in logs and output file names.
    fn name(&self) -> &'static str;

    /// Record field holding the trading day for `category`.
    fn date_field(&self, category: TradeCategory) -> &'static str;

    /// Collection parameters this provider would use by default for `symbol`.
    fn default_params(&self, _category: TradeCategory, symbol: &str) -> CollectParams {
        CollectParams::new(symbol)
    }

    /// Other record fields that hold dates and should be typed as such.
    fn secondary_date_fields(&self, _category: TradeCategory) -> &'static [&'static str] {
        &[]
    }

    /// Fetches every record of `category` for the requested symbol.
    fn fetch_trades(
        &self,
        category: TradeCategory,
        params: &CollectParams,
    ) -> Result<RecordSet, ProviderError>;

    /// Fetches and materializes the history as a date-indexed [`Table`].
    fn fetch_table(
        &self,
        category: TradeCategory,
        params: &CollectParams,
    ) -> Result<Table, ProviderError> {
        let set = self.fetch_trades(category, params)?;
        Ok(self.table_for(&set))
    }

    /// Materializes a record set of this provider with its date fields typed.
    fn table_for(&self, set: &RecordSet) -> Table {
        Table::from_records_with_dates(
            &set.records,
            self.date_field(set.category),
            self.secondary_date_fields(set.category),
        )
    }
}

/// Which upstream to use (serde snake_case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    /// CafeF paginated JSON endpoints.
    Cafef,
    /// Smoney stock page with embedded JSON.
    Smoney,
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderId::Cafef => f.write_str("cafef"),
            ProviderId::Smoney => f.write_str("smoney"),
        }
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cafef" => Ok(ProviderId::Cafef),
            "smoney" => Ok(ProviderId::Smoney),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

/// Build and return a boxed provider corresponding to the supplied ProviderId.
pub fn build_provider(
    id: ProviderId,
    config: &IngestorConfig,
) -> Result<Box<dyn TradeFlowProvider + Send + Sync>, ProviderInitError> {
    match id {
        ProviderId::Cafef => Ok(Box::new(CafefProvider::new(config)?)),
        ProviderId::Smoney => Ok(Box::new(SmoneyProvider::new(config)?)),
    }
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// A configured header value contains invalid characters.
    #[snafu(display("Invalid value for header {name}: {source}"))]
    InvalidHeader {
        name: String,
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },
}

/// Errors that can occur while fetching or decoding upstream data.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// Transport failure (connect, DNS, timeout, reading the body).
    #[snafu(display("HTTP request to {url} failed: {source}"))]
    Http {
        url: String,
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The remote answered with a non-2xx status.
    #[snafu(display("HTTP {status} from {url}: {body}"))]
    Status {
        url: String,
        status: u16,
        body: String,
        backtrace: Backtrace,
    },

    /// The body parsed but lacks the expected section, tag or list.
    #[snafu(display("Malformed response: {message}"))]
    Parse {
        message: String,
        backtrace: Backtrace,
    },

    /// The body is not valid JSON.
    #[snafu(display("Response body is not valid JSON: {source}"))]
    Json {
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// Paging went past the configured ceiling without reaching the end.
    #[snafu(display("Stopped after {max_pages} pages for {symbol} without reaching the last page"))]
    PageLimit {
        symbol: String,
        max_pages: u32,
        backtrace: Backtrace,
    },

    /// An error during provider configuration or initialization.
    #[snafu(display("Provider initialization error: {source}"))]
    Init {
        #[snafu(backtrace)]
        source: ProviderInitError,
    },
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::Http { .. } | ProviderError::Status { .. } => ErrorKind::Http,
            ProviderError::Parse { .. } | ProviderError::Json { .. } => ErrorKind::Parse,
            ProviderError::PageLimit { .. } => ErrorKind::PageLimit,
            ProviderError::Init { .. } => ErrorKind::Config,
        }
    }
}

impl From<ProviderInitError> for ProviderError {
    fn from(source: ProviderInitError) -> Self {
        ProviderError::Init { source }
    }
}
