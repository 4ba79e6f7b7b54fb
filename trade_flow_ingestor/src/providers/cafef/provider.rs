use std::num::NonZeroU32;

use reqwest::{blocking::Client, header};

use crate::{
    config::IngestorConfig,
    models::{
        category::TradeCategory,
        record::RecordSet,
        request_params::{CollectParams, PageRequest},
    },
    providers::{
        cafef::{
            params::{CafefEndpoint, construct_params, endpoint},
            response::parse_page,
        },
        collect,
        http::{build_client, get_text},
        Page, PageSource, ProviderError, ProviderInitError, TradeFlowProvider,
    },
};

pub struct CafefProvider {
    client: Client,
    base_url: String,
    foreign_page_size: u32,
    proprietary_page_size: u32,
    max_pages: Option<NonZeroU32>,
}

impl CafefProvider {
    /// Creates a provider from the `[http]` and `[cafef]` configuration sections.
    pub fn new(config: &IngestorConfig) -> Result<Self, ProviderInitError> {
        let client = build_client(
            &config.http,
            &[
                (header::REFERER, config.cafef.referer.as_str()),
                (header::ACCEPT, "application/json, text/plain, */*"),
            ],
        )?;

        Ok(Self {
            client,
            base_url: config.cafef.base_url.trim_end_matches('/').to_string(),
            foreign_page_size: config.cafef.foreign_page_size,
            proprietary_page_size: config.cafef.self_page_size,
            max_pages: config.cafef.max_pages,
        })
    }

    /// The paginated list endpoint for one category.
    pub fn source(&self, category: TradeCategory) -> CafefSource<'_> {
        let endpoint = endpoint(category);
        CafefSource {
            client: &self.client,
            url: format!("{}/{}", self.base_url, endpoint.path),
            category,
            endpoint,
        }
    }
}

impl TradeFlowProvider for CafefProvider {
    fn name(&self) -> &'static str {
        "cafef"
    }

    fn date_field(&self, category: TradeCategory) -> &'static str {
        endpoint(category).date_field
    }

    fn default_params(&self, category: TradeCategory, symbol: &str) -> CollectParams {
        let page_size = match category {
            TradeCategory::Foreign => self.foreign_page_size,
            TradeCategory::Proprietary => self.proprietary_page_size,
        };
        CollectParams::new(symbol)
            .with_page_size(page_size)
            .with_max_pages(self.max_pages)
    }

    fn fetch_trades(
        &self,
        category: TradeCategory,
        params: &CollectParams,
    ) -> Result<RecordSet, ProviderError> {
        collect(&self.source(category), params)
    }
}

/// One CafeF handler bound to a category.
pub struct CafefSource<'a> {
    client: &'a Client,
    url: String,
    category: TradeCategory,
    endpoint: CafefEndpoint,
}

impl PageSource for CafefSource<'_> {
    fn category(&self) -> TradeCategory {
        self.category
    }

    fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Page, ProviderError> {
        let query = construct_params(request);
        let body = get_text(self.client, &self.url, &query)?;
        parse_page(&body, self.endpoint.list_key)
    }
}
