use reqwest::blocking::Client;
use tracing::info;

use crate::{
    config::IngestorConfig,
    models::{category::TradeCategory, record::RecordSet, request_params::CollectParams},
    providers::{
        http::{build_client, get_text},
        smoney::extract::extract_both,
        ProviderError, ProviderInitError, TradeFlowProvider,
    },
};

/// Record field holding the trading day in both payloads.
pub const DATE_FIELD: &str = "date";

/// Period marker Smoney attaches to each row; parsed as a date, not used as the index.
pub const GROUP_DATE_FIELD: &str = "group_date";

pub struct SmoneyProvider {
    client: Client,
    base_url: String,
}

impl SmoneyProvider {
    pub fn new(config: &IngestorConfig) -> Result<Self, ProviderInitError> {
        Ok(Self {
            client: build_client(&config.http, &[])?,
            base_url: config.smoney.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn page_url(&self, symbol: &str) -> String {
        format!("{}/co-phieu/{}", self.base_url, symbol)
    }

    /// Downloads the stock page HTML.
    pub fn fetch_document(&self, symbol: &str) -> Result<String, ProviderError> {
        get_text(&self.client, &self.page_url(symbol), &[])
    }

    /// Fetches the page once and returns `(foreign, self)` record sets.
    ///
    /// Fails if either payload is missing.
    pub fn fetch_both(&self, symbol: &str) -> Result<(RecordSet, RecordSet), ProviderError> {
        let html = self.fetch_document(symbol)?;
        let (foreign_rows, own_rows) = extract_both(&html)?;

        let mut foreign = RecordSet::new(symbol, TradeCategory::Foreign);
        foreign.extend(foreign_rows);
        let mut own = RecordSet::new(symbol, TradeCategory::Proprietary);
        own.extend(own_rows);

        info!(
            symbol,
            foreign_rows = foreign.len(),
            self_rows = own.len(),
            "extracted embedded payloads"
        );
        Ok((foreign, own))
    }
}

impl TradeFlowProvider for SmoneyProvider {
    fn name(&self) -> &'static str {
        "smoney"
    }

    fn date_field(&self, _category: TradeCategory) -> &'static str {
        DATE_FIELD
    }

    fn secondary_date_fields(&self, _category: TradeCategory) -> &'static [&'static str] {
        &[GROUP_DATE_FIELD]
    }

    /// Smoney serves a fixed trailing window; date bounds and paging are not
    /// part of its interface and are ignored. The page must carry both
    /// payloads even though only one is returned.
    fn fetch_trades(
        &self,
        category: TradeCategory,
        params: &CollectParams,
    ) -> Result<RecordSet, ProviderError> {
        let (foreign, own) = self.fetch_both(&params.symbol)?;
        Ok(match category {
            TradeCategory::Foreign => foreign,
            TradeCategory::Proprietary => own,
        })
    }
}
