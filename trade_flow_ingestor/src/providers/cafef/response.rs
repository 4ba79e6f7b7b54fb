//! Decoding of CafeF list responses.
//!
//! Both handlers answer `{"Data": {...}, "Success": true, ...}`. The record
//! list sits either directly in the section (`Data.Data` for foreign trades)
//! or one level deeper (`Data.Data.ListDataTudoanh` for proprietary trades).

use serde_json::Value;
use snafu::{OptionExt, ResultExt};

use crate::{
    models::record::Record,
    providers::{JsonSnafu, Page, ParseSnafu, ProviderError},
};

pub const SECTION_KEY: &str = "Data";
pub const TOTAL_COUNT_KEY: &str = "TotalCount";

/// Parses one response body into a [`Page`].
pub fn parse_page(body: &str, list_key: &str) -> Result<Page, ProviderError> {
    let json: Value = serde_json::from_str(body).context(JsonSnafu)?;
    let section = json
        .get(SECTION_KEY)
        .filter(|s| s.is_object())
        .context(ParseSnafu {
            message: format!("response has no '{SECTION_KEY}' section"),
        })?;

    let items = locate_records(section, list_key).context(ParseSnafu {
        message: format!("no '{list_key}' list under '{SECTION_KEY}' or '{SECTION_KEY}.{SECTION_KEY}'"),
    })?;

    let records = items
        .iter()
        .cloned()
        .map(|item| {
            Record::from_value(item).context(ParseSnafu {
                message: format!("'{list_key}' contains a non-object entry"),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let total_count = section.get(TOTAL_COUNT_KEY).and_then(Value::as_u64);

    Ok(Page {
        records,
        total_count,
    })
}

/// Shallow path first, then the nested `Data` wrapper.
fn locate_records<'a>(section: &'a Value, list_key: &str) -> Option<&'a Vec<Value>> {
    section
        .get(list_key)
        .and_then(Value::as_array)
        .or_else(|| {
            section
                .get(SECTION_KEY)
                .and_then(|inner| inner.get(list_key))
                .and_then(Value::as_array)
        })
}
