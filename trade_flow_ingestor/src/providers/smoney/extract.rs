//! Locating the JSON payloads embedded in the stock page.
//!
//! The page carries `<script id="foreign-trade-data" type="application/json">`
//! and `<script id="self-trade-data" ...>`, each holding an array of daily
//! objects (`date`, `total_bva`, `total_nva`, `cumulative_total_nv`, ...).

use scraper::{Html, Selector};
use serde_json::Value;
use snafu::{OptionExt, ResultExt};

use crate::{
    models::{category::TradeCategory, record::Record},
    providers::{JsonSnafu, ParseSnafu, ProviderError},
};

pub const FOREIGN_TAG_ID: &str = "foreign-trade-data";
pub const SELF_TAG_ID: &str = "self-trade-data";

pub fn tag_id(category: TradeCategory) -> &'static str {
    match category {
        TradeCategory::Foreign => FOREIGN_TAG_ID,
        TradeCategory::Proprietary => SELF_TAG_ID,
    }
}

/// Extracts and decodes the payload of the `<script>` tag with the given id.
pub fn extract_embedded_json(document: &Html, id: &str) -> Result<Vec<Record>, ProviderError> {
    let selector = Selector::parse(&format!("script#{id}")).map_err(|e| {
        ParseSnafu {
            message: format!("invalid selector for tag '{id}': {e:?}"),
        }
        .build()
    })?;

    let element = document.select(&selector).next().context(ParseSnafu {
        message: format!("could not find JSON data for {id}"),
    })?;
    let text: String = element.text().collect();

    let items: Vec<Value> = serde_json::from_str(text.trim()).context(JsonSnafu)?;
    items
        .into_iter()
        .map(|item| {
            Record::from_value(item).context(ParseSnafu {
                message: format!("payload of {id} contains a non-object entry"),
            })
        })
        .collect()
}

/// Extracts `(foreign, self)` records from a raw page.
///
/// A page is only usable when it carries both payloads; either one missing
/// fails the whole extraction.
pub fn extract_both(html: &str) -> Result<(Vec<Record>, Vec<Record>), ProviderError> {
    let document = Html::parse_document(html);
    let foreign = extract_embedded_json(&document, tag_id(TradeCategory::Foreign))?;
    let own = extract_embedded_json(&document, tag_id(TradeCategory::Proprietary))?;
    Ok((foreign, own))
}
