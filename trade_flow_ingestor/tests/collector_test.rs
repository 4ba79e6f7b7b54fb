use std::cell::RefCell;

use proptest::prelude::*;
use serde_json::json;
use trade_flow_ingestor::{
    collect,
    models::{
        category::TradeCategory,
        record::Record,
        request_params::{CollectParams, PageRequest},
    },
    providers::{Page, PageSource, ProviderError},
};

/// Serves `rows` in pages of the requested size, reporting the true total.
struct InMemorySource {
    rows: Vec<Record>,
    requests: RefCell<Vec<u32>>,
}

impl InMemorySource {
    fn new(n: usize) -> Self {
        let rows = (0..n)
            .map(|i| Record::from_value(json!({"seq": i, "Ngay": "05/12/2025"})).unwrap())
            .collect();
        Self {
            rows,
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl PageSource for InMemorySource {
    fn category(&self) -> TradeCategory {
        TradeCategory::Foreign
    }

    fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Page, ProviderError> {
        self.requests.borrow_mut().push(request.page_index);
        let size = request.page_size as usize;
        let start = (request.page_index as usize - 1) * size;
        let records = self.rows.iter().skip(start).take(size).cloned().collect();
        Ok(Page {
            records,
            total_count: Some(self.rows.len() as u64),
        })
    }
}

proptest! {
    #[test]
    fn collects_every_row_with_minimal_requests(n in 1usize..200, page_size in 1u32..40) {
        let source = InMemorySource::new(n);
        let params = CollectParams::new("HPG").with_page_size(page_size);
        let set = collect(&source, &params).unwrap();

        prop_assert_eq!(set.len(), n);
        let seqs: Vec<u64> = set
            .records
            .iter()
            .map(|r| r.get("seq").and_then(|v| v.as_u64()).unwrap())
            .collect();
        prop_assert_eq!(seqs, (0..n as u64).collect::<Vec<_>>());

        let expected_requests = n.div_ceil(page_size as usize);
        let requests = source.requests.borrow().clone();
        prop_assert_eq!(requests, (1..=expected_requests as u32).collect::<Vec<_>>());
    }
}

#[test]
fn empty_history_takes_one_request() {
    let source = InMemorySource::new(0);
    let set = collect(&source, &CollectParams::new("HPG").with_page_size(10)).unwrap();
    assert!(set.is_empty());
    assert_eq!(*source.requests.borrow(), vec![1]);
    assert_eq!(set.symbol, "HPG");
    assert_eq!(set.category, TradeCategory::Foreign);
}
