//! Per-column combine rules, derived from column names.

use indexmap::IndexMap;

use crate::models::table::{Column, Table};

/// How one column's values are combined inside a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationRule {
    /// Flow quantities accumulate.
    Sum,
    /// Levels (prices and any other numeric field) average.
    Mean,
    /// Running totals: forward-filled over the whole range, then the bucket's closing value.
    LastFilled,
    /// Non-numeric fields: last non-null value in the bucket.
    Last,
}

impl AggregationRule {
    /// Rule for a numeric column. Predicates are checked in order; first match wins.
    pub fn for_numeric(name: &str) -> Self {
        if name.contains("cumulative") {
            AggregationRule::LastFilled
        } else if name.starts_with("total_") {
            AggregationRule::Sum
        } else if name.to_lowercase().contains("price") {
            AggregationRule::Mean
        } else {
            AggregationRule::Mean
        }
    }

    pub fn for_column(name: &str, column: &Column) -> Self {
        if column.is_numeric() {
            Self::for_numeric(name)
        } else {
            AggregationRule::Last
        }
    }
}

/// Rule table for every non-date column of a table, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationSpec {
    rules: IndexMap<String, AggregationRule>,
}

impl AggregationSpec {
    pub fn from_table(table: &Table) -> Self {
        let date_column = table.date_column();
        let rules = table
            .columns()
            .filter(|(name, _)| Some(name.as_str()) != date_column)
            .map(|(name, col)| (name.clone(), AggregationRule::for_column(name, col)))
            .collect();
        Self { rules }
    }

    pub fn get(&self, column: &str) -> Option<AggregationRule> {
        self.rules.get(column).copied()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
