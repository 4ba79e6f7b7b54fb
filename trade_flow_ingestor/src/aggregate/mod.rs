//! Horizon-based resampling of daily tables.
//!
//! `1M` returns the table untouched. Longer horizons bucket rows by week,
//! month or quarter (see [`Horizon::granularity`]) and combine each column
//! with the rule [`AggregationSpec`] derives from its name. Output has one row
//! per bucket from the first dated row to the last, in date order, stamped
//! with the bucket's last day. Buckets with no rows inside that range (a
//! holiday week) are kept: sums are `0`, everything else is null.
//!
//! Sources that only expose a short trailing window yield few buckets for long
//! horizons; nothing is padded beyond the data's own range.

pub mod rules;

use chrono::NaiveDate;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, warn};

pub use rules::{AggregationRule, AggregationSpec};

use crate::models::{
    granularity::Granularity,
    horizon::{Horizon, HorizonError},
    table::{Column, Table, TableError},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error(transparent)]
    InvalidHorizon(#[from] HorizonError),

    #[error("Table has no date column to resample on")]
    MissingDateColumn,

    #[error("Failed to assemble aggregated table: {0}")]
    Table(#[from] TableError),
}

/// Aggregates `table` for a horizon label (`1M`, `6M`, `1Y`, `2Y`, `3Y`, `5Y`, any case).
pub fn aggregate(table: &Table, horizon: &str) -> Result<Table, AggregateError> {
    let horizon: Horizon = horizon.parse()?;
    aggregate_horizon(table, horizon)
}

pub fn aggregate_horizon(table: &Table, horizon: Horizon) -> Result<Table, AggregateError> {
    match horizon.granularity() {
        None => Ok(table.clone()),
        Some(granularity) => resample(table, granularity),
    }
}

/// Buckets rows by `granularity` and combines every column per its rule.
pub fn resample(table: &Table, granularity: Granularity) -> Result<Table, AggregateError> {
    let date_name = table.date_column().ok_or(AggregateError::MissingDateColumn)?;
    let dates = table
        .column(date_name)
        .and_then(Column::as_dates)
        .ok_or(AggregateError::MissingDateColumn)?;
    let spec = AggregationSpec::from_table(table);

    // stable sort keeps upstream order among same-day rows; undated rows drop out
    let mut order: Vec<(NaiveDate, usize)> = dates
        .iter()
        .enumerate()
        .filter_map(|(row, date)| date.map(|d| (d, row)))
        .collect();
    order.sort_by_key(|&(date, _)| date);

    let mut grouped: Vec<(NaiveDate, Vec<usize>)> = Vec::new();
    for &(date, row) in &order {
        let Some(end) = granularity.bucket_end(date) else {
            warn!(%date, "date outside representable range, row skipped");
            continue;
        };
        match grouped.last_mut() {
            Some((last_end, rows)) if *last_end == end => rows.push(row),
            _ => grouped.push((end, vec![row])),
        }
    }
    let buckets = fill_gaps(granularity, grouped);

    let mut columns = IndexMap::with_capacity(table.width());
    for (name, column) in table.columns() {
        let out = if name == date_name {
            Column::Date(buckets.iter().map(|(end, _)| Some(*end)).collect())
        } else {
            let rule = spec.get(name).unwrap_or(AggregationRule::Last);
            combine(column, rule, &order, &buckets)
        };
        columns.insert(name.clone(), out);
    }

    debug!(
        %granularity,
        rows_in = table.len(),
        buckets = buckets.len(),
        "resampled table"
    );
    Ok(Table::from_columns(Some(date_name.to_string()), columns)?)
}

/// Inserts an empty bucket for every period missing between consecutive groups.
fn fill_gaps(
    granularity: Granularity,
    grouped: Vec<(NaiveDate, Vec<usize>)>,
) -> Vec<(NaiveDate, Vec<usize>)> {
    let mut buckets: Vec<(NaiveDate, Vec<usize>)> = Vec::with_capacity(grouped.len());
    for (end, rows) in grouped {
        if let Some(previous) = buckets.last().map(|(d, _)| *d) {
            let mut next = granularity.next_bucket_end(previous);
            while let Some(gap) = next.filter(|d| *d < end) {
                buckets.push((gap, Vec::new()));
                next = granularity.next_bucket_end(gap);
            }
        }
        buckets.push((end, rows));
    }
    buckets
}

fn combine(
    column: &Column,
    rule: AggregationRule,
    order: &[(NaiveDate, usize)],
    buckets: &[(NaiveDate, Vec<usize>)],
) -> Column {
    match column {
        Column::Number(values) => {
            let values = if rule == AggregationRule::LastFilled {
                forward_fill(values, order)
            } else {
                values.clone()
            };
            Column::Number(
                buckets
                    .iter()
                    .map(|(_, rows)| reduce_numbers(rule, rows.iter().map(|&r| values[r])))
                    .collect(),
            )
        }
        Column::Text(values) => Column::Text(
            buckets
                .iter()
                .map(|(_, rows)| rows.iter().rev().find_map(|&r| values[r].clone()))
                .collect(),
        ),
        Column::Date(values) => Column::Date(
            buckets
                .iter()
                .map(|(_, rows)| rows.iter().rev().find_map(|&r| values[r]))
                .collect(),
        ),
    }
}

/// Carries the last seen value forward along the date-sorted row order.
fn forward_fill(values: &[Option<f64>], order: &[(NaiveDate, usize)]) -> Vec<Option<f64>> {
    let mut filled = values.to_vec();
    let mut carry = None;
    for &(_, row) in order {
        match values[row] {
            Some(v) => carry = Some(v),
            None => filled[row] = carry,
        }
    }
    filled
}

fn reduce_numbers(rule: AggregationRule, values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    match rule {
        AggregationRule::Sum => Some(values.flatten().sum()),
        AggregationRule::Mean => {
            let (sum, count) = values
                .flatten()
                .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
            (count > 0).then(|| sum / count as f64)
        }
        AggregationRule::LastFilled | AggregationRule::Last => values.flatten().last(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::record::Record;

    fn table(rows: &[serde_json::Value]) -> Table {
        let records: Vec<Record> = rows
            .iter()
            .cloned()
            .map(|v| Record::from_value(v).unwrap())
            .collect();
        Table::from_records(&records, "date")
    }

    fn numbers(table: &Table, name: &str) -> Vec<Option<f64>> {
        table.column(name).unwrap().as_numbers().unwrap().to_vec()
    }

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn one_month_is_a_structural_copy() {
        let t = table(&[
            json!({"date": "2025-12-05", "total_nva": 1.0}),
            json!({"date": "2025-12-01", "total_nva": 2.0}),
        ]);
        assert_eq!(aggregate(&t, "1m").unwrap(), t);
    }

    #[test]
    fn invalid_horizon_is_rejected() {
        let t = table(&[json!({"date": "2025-12-05", "total_nva": 1.0})]);
        assert!(matches!(
            aggregate(&t, "10Y"),
            Err(AggregateError::InvalidHorizon(_))
        ));
    }

    #[test]
    fn missing_date_column_is_rejected() {
        let records = vec![Record::from_value(json!({"Ngay": "05/12/2025", "x": 1})).unwrap()];
        let t = Table::from_records(&records, "date");
        assert_eq!(aggregate(&t, "6M"), Err(AggregateError::MissingDateColumn));
    }

    #[test]
    fn unsorted_input_is_bucketed_in_date_order() {
        let t = table(&[
            json!({"date": "2025-12-09", "total_nva": 4.0, "price": 12.0, "note": "b"}),
            json!({"date": "2025-12-02", "total_nva": 1.0, "price": 10.0, "note": "a"}),
            json!({"date": "2025-12-03", "total_nva": 2.0, "price": 11.0, "note": null}),
        ]);
        let out = aggregate(&t, "6M").unwrap();
        assert_eq!(
            out.column("date").unwrap().as_dates().unwrap(),
            &[ymd(2025, 12, 7), ymd(2025, 12, 14)]
        );
        assert_eq!(numbers(&out, "total_nva"), vec![Some(3.0), Some(4.0)]);
        assert_eq!(numbers(&out, "price"), vec![Some(10.5), Some(12.0)]);
        assert_eq!(
            out.column("note"),
            Some(&Column::Text(vec![Some("a".into()), Some("b".into())]))
        );
        assert_eq!(out.column_names().collect::<Vec<_>>(), vec!["date", "total_nva", "price", "note"]);
    }

    #[test]
    fn gap_weeks_inside_the_range_are_kept() {
        // nothing traded in the week ending 2025-02-02
        let t = table(&[
            json!({"date": "2025-02-03", "total_nva": 4.0, "price": 12.0, "cumulative_x": 9.0, "note": "b"}),
            json!({"date": "2025-01-24", "total_nva": 1.0, "price": 10.0, "cumulative_x": 5.0, "note": "a"}),
        ]);
        let out = aggregate(&t, "6M").unwrap();
        assert_eq!(
            out.column("date").unwrap().as_dates().unwrap(),
            &[ymd(2025, 1, 26), ymd(2025, 2, 2), ymd(2025, 2, 9)]
        );
        assert_eq!(numbers(&out, "total_nva"), vec![Some(1.0), Some(0.0), Some(4.0)]);
        assert_eq!(numbers(&out, "price"), vec![Some(10.0), None, Some(12.0)]);
        assert_eq!(numbers(&out, "cumulative_x"), vec![Some(5.0), None, Some(9.0)]);
        assert_eq!(
            out.column("note"),
            Some(&Column::Text(vec![Some("a".into()), None, Some("b".into())]))
        );
    }

    #[test]
    fn gap_quarters_are_kept() {
        let t = table(&[
            json!({"date": "2025-01-10", "total_nva": 1.0}),
            json!({"date": "2025-11-10", "total_nva": 2.0}),
        ]);
        let out = aggregate(&t, "5Y").unwrap();
        assert_eq!(
            out.column("date").unwrap().as_dates().unwrap(),
            &[ymd(2025, 3, 31), ymd(2025, 6, 30), ymd(2025, 9, 30), ymd(2025, 12, 31)]
        );
        assert_eq!(numbers(&out, "total_nva"), vec![Some(1.0), Some(0.0), Some(0.0), Some(2.0)]);
    }

    #[test]
    fn cumulative_is_forward_filled_across_buckets() {
        let t = table(&[
            json!({"date": "2025-11-28", "cumulative_total_nv": 5.0}),
            json!({"date": "2025-12-01", "cumulative_total_nv": null}),
            json!({"date": "2025-12-02", "cumulative_total_nv": null}),
        ]);
        let out = aggregate(&t, "1Y").unwrap();
        assert_eq!(numbers(&out, "cumulative_total_nv"), vec![Some(5.0), Some(5.0)]);
    }

    #[test]
    fn empty_table_stays_empty() {
        let t = Table::from_records(&[], "date");
        let out = aggregate(&t, "5Y").unwrap();
        assert!(out.is_empty());
        assert_eq!(out.date_column(), Some("date"));
    }

    #[test]
    fn mean_of_all_nulls_is_null_and_sum_is_zero() {
        let t = table(&[json!({"date": "2025-12-01", "total_bva": null, "entryPriceBuy": null, "x": 1})]);
        let out = aggregate(&t, "3Y").unwrap();
        assert_eq!(numbers(&out, "total_bva"), vec![Some(0.0)]);
        assert_eq!(numbers(&out, "entryPriceBuy"), vec![None]);
        assert_eq!(out.column("date").unwrap().as_dates().unwrap(), &[ymd(2025, 12, 31)]);
    }
}
