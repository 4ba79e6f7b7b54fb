//! Columnar table materialized from a [`RecordSet`](crate::models::record::RecordSet).
//!
//! Column kinds are inferred once at materialization:
//! - the category's date field becomes a [`Column::Date`],
//! - a field whose non-null values are all JSON numbers becomes a [`Column::Number`],
//! - everything else is kept as [`Column::Text`].

use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::models::{date::parse_record_date, record::Record};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Column '{column}' has {found} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Date column '{0}' is not part of the table or is not a date column")]
    InvalidDateColumn(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Date(Vec<Option<NaiveDate>>),
    Number(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Date(v) => v.len(),
            Column::Number(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Number(_))
    }

    pub fn cell(&self, row: usize) -> Cell<'_> {
        let cell = match self {
            Column::Date(v) => v.get(row).copied().flatten().map(Cell::Date),
            Column::Number(v) => v.get(row).copied().flatten().map(Cell::Number),
            Column::Text(v) => v
                .get(row)
                .and_then(|s| s.as_deref())
                .map(Cell::Text),
        };
        cell.unwrap_or(Cell::Null)
    }

    pub fn as_numbers(&self) -> Option<&[Option<f64>]> {
        match self {
            Column::Number(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_dates(&self) -> Option<&[Option<NaiveDate>]> {
        match self {
            Column::Date(v) => Some(v),
            _ => None,
        }
    }
}

/// A borrowed view of one table cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Date(NaiveDate),
    Number(f64),
    Text(&'a str),
    Null,
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => f.write_str(s),
            Cell::Null => Ok(()),
        }
    }
}

/// Rows of daily statistics, indexed by an optional date column.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    date_column: Option<String>,
    columns: IndexMap<String, Column>,
    rows: usize,
}

impl Table {
    /// Builds a table from already-typed columns.
    ///
    /// All columns must have the same length; `date_column`, when given, must
    /// name a [`Column::Date`].
    pub fn from_columns(
        date_column: Option<String>,
        columns: IndexMap<String, Column>,
    ) -> Result<Self, TableError> {
        let rows = columns.values().next().map(Column::len).unwrap_or(0);
        for (name, col) in &columns {
            if col.len() != rows {
                return Err(TableError::LengthMismatch {
                    column: name.clone(),
                    expected: rows,
                    found: col.len(),
                });
            }
        }
        if let Some(name) = &date_column {
            if !matches!(columns.get(name), Some(Column::Date(_))) {
                return Err(TableError::InvalidDateColumn(name.clone()));
            }
        }
        Ok(Self {
            date_column,
            columns,
            rows,
        })
    }

    /// Materializes records into columns, in first-seen field order.
    ///
    /// `date_field` is parsed into a date column when any record carries it.
    /// An empty record list yields an empty table that still has the date
    /// column, so it can be aggregated like any other history.
    pub fn from_records(records: &[Record], date_field: &str) -> Self {
        Self::from_records_with_dates(records, date_field, &[])
    }

    /// Like [`Table::from_records`], also typing `extra_dates` as date columns.
    /// Only `date_field` becomes the index.
    pub fn from_records_with_dates(
        records: &[Record],
        date_field: &str,
        extra_dates: &[&str],
    ) -> Self {
        if records.is_empty() {
            let mut columns = IndexMap::new();
            columns.insert(date_field.to_string(), Column::Date(Vec::new()));
            return Self {
                date_column: Some(date_field.to_string()),
                columns,
                rows: 0,
            };
        }

        let mut names: IndexMap<&str, ()> = IndexMap::new();
        for record in records {
            for (name, _) in record.fields() {
                names.entry(name.as_str()).or_default();
            }
        }

        let mut columns = IndexMap::with_capacity(names.len());
        let mut date_column = None;
        for name in names.keys().copied() {
            let values: Vec<Option<&Value>> = records
                .iter()
                .map(|r| r.get(name).filter(|v| !v.is_null()))
                .collect();

            let column = if name == date_field || extra_dates.contains(&name) {
                if name == date_field {
                    date_column = Some(name.to_string());
                }
                Column::Date(values.iter().map(|v| v.and_then(date_cell)).collect())
            } else if values.iter().flatten().all(|v| v.is_number()) {
                Column::Number(values.iter().map(|v| v.and_then(Value::as_f64)).collect())
            } else {
                Column::Text(values.iter().map(|v| v.map(text_cell)).collect())
            };
            columns.insert(name.to_string(), column);
        }

        Self {
            date_column,
            columns,
            rows: records.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Name of the date index column, if the table has one.
    pub fn date_column(&self) -> Option<&str> {
        self.date_column.as_deref()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&String, &Column)> {
        self.columns.iter()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn row(&self, index: usize) -> Vec<Cell<'_>> {
        self.columns.values().map(|c| c.cell(index)).collect()
    }

    /// A printable view of the first `n` rows.
    pub fn preview(&self, n: usize) -> Preview<'_> {
        Preview { table: self, rows: n }
    }
}

fn date_cell(value: &Value) -> Option<NaiveDate> {
    let parsed = value.as_str().and_then(parse_record_date);
    if parsed.is_none() {
        warn!(value = %value, "unparseable record date, treating as missing");
    }
    parsed
}

fn text_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Fixed-width rendering of the head of a table.
pub struct Preview<'a> {
    table: &'a Table,
    rows: usize,
}

impl fmt::Display for Preview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self.rows.min(self.table.len());
        let header: Vec<String> = self.table.column_names().map(str::to_string).collect();
        let body: Vec<Vec<String>> = (0..shown)
            .map(|i| self.table.row(i).iter().map(Cell::to_string).collect())
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for row in &body {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, &w)| format!("{c:>w$}"))
                .collect::<Vec<_>>()
                .join("  ")
        };

        writeln!(f, "{}", line(&header[..]))?;
        for row in &body {
            writeln!(f, "{}", line(&row[..]))?;
        }
        write!(
            f,
            "[{} rows x {} columns]",
            self.table.len(),
            self.table.width()
        )
    }
}
