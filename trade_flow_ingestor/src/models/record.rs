//! Schema-less daily records as returned by the upstream sources.
//!
//! The field set differs per source and category (CafeF foreign trades carry
//! `Ngay`, `KLGDRong`, `RoomConLai`...; Smoney carries `date`, `total_nva`,
//! `cumulative_total_nv`...), so a [`Record`] is an ordered mapping from field
//! name to raw JSON value rather than a fixed struct.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::category::TradeCategory;

/// One day's statistics for one symbol, in upstream field order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, Value>);

impl Record {
    /// Builds a record from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map.into_iter().collect())),
            _ => None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// All records collected for one symbol and category.
///
/// Records keep the order in which pages arrived; duplicates are not removed.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    /// The symbol this data represents (e.g., "HPG").
    pub symbol: String,
    /// Which flow the records describe.
    pub category: TradeCategory,
    /// Records in arrival order.
    pub records: Vec<Record>,
}

impl RecordSet {
    pub fn new(symbol: impl Into<String>, category: TradeCategory) -> Self {
        Self {
            symbol: symbol.into(),
            category,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = Record>) {
        self.records.extend(records);
    }
}
