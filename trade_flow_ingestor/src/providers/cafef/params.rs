use crate::models::{
    category::TradeCategory, date::format_query_date, request_params::PageRequest,
};

/// Where one CafeF category lives and how its payload is shaped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CafefEndpoint {
    /// Handler file name under the configured base URL.
    pub path: &'static str,
    /// Key of the record list inside the `Data` section.
    pub list_key: &'static str,
    /// Record field holding the trading day (`dd/mm/yyyy`).
    pub date_field: &'static str,
}

pub const FOREIGN_ENDPOINT: CafefEndpoint = CafefEndpoint {
    path: "GDKhoiNgoai.ashx",
    list_key: "Data",
    date_field: "Ngay",
};

pub const PROPRIETARY_ENDPOINT: CafefEndpoint = CafefEndpoint {
    path: "GDTuDoanh.ashx",
    list_key: "ListDataTudoanh",
    date_field: "Date",
};

pub fn endpoint(category: TradeCategory) -> CafefEndpoint {
    match category {
        TradeCategory::Foreign => FOREIGN_ENDPOINT,
        TradeCategory::Proprietary => PROPRIETARY_ENDPOINT,
    }
}

/// Builds the query string for one page.
///
/// Unset date bounds are left out rather than sent empty.
pub fn construct_params(request: &PageRequest<'_>) -> Vec<(String, String)> {
    let mut query = vec![("Symbol".to_string(), request.symbol.to_string())];
    if let Some(start) = request.start {
        query.push(("StartDate".to_string(), format_query_date(start)));
    }
    if let Some(end) = request.end {
        query.push(("EndDate".to_string(), format_query_date(end)));
    }
    query.push(("PageIndex".to_string(), request.page_index.to_string()));
    query.push(("PageSize".to_string(), request.page_size.to_string()));
    query
}
