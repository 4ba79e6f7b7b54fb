use std::{
    fs::{self, File},
    io::Write,
    path::PathBuf,
};

use chrono::Utc;
use snafu::ResultExt;
use tracing::info;
use uuid::Uuid;

use crate::{
    io::sink::{CsvSnafu, DataSink, IoSnafu, SinkError, WriteSnafu},
    models::table::Table,
};

/// Writes tables as CSV files into a directory, one file per write.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DataSink for CsvSink {
    type Output = PathBuf;

    fn write(&self, name: &str, table: &Table) -> Result<PathBuf, SinkError> {
        if name.is_empty() || name.contains(['/', '\\']) {
            return WriteSnafu {
                message: format!("invalid output name {name:?}"),
            }
            .fail();
        }
        fs::create_dir_all(&self.dir).context(IoSnafu)?;

        let timestamp = Utc::now().format("%Y%m%d%H%M%S");
        let path = self
            .dir
            .join(format!("{name}_{timestamp}_{}.csv", Uuid::new_v4()));

        let file = File::create(&path).context(IoSnafu)?;
        write_table_csv(file, table)?;
        info!(path = %path.display(), rows = table.len(), "wrote table");
        Ok(path)
    }
}

/// Serializes a table as CSV: a header of column names, then one line per row.
/// Nulls are empty fields; dates are `YYYY-MM-DD`.
pub fn write_table_csv<W: Write>(writer: W, table: &Table) -> Result<(), SinkError> {
    let mut out = ::csv::Writer::from_writer(writer);
    out.write_record(table.column_names()).context(CsvSnafu)?;
    for row in 0..table.len() {
        out.write_record(table.row(row).iter().map(ToString::to_string))
            .context(CsvSnafu)?;
    }
    out.flush().context(IoSnafu)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::tempdir;

    use super::*;
    use crate::models::record::Record;

    fn table() -> Table {
        let records = vec![
            Record::from_value(json!({"date": "2025-12-05", "total_nva": 1.5, "note": "a,b"})).unwrap(),
            Record::from_value(json!({"date": "2025-12-04", "total_nva": null, "note": "c"})).unwrap(),
        ];
        Table::from_records(&records, "date")
    }

    #[test]
    fn writes_header_and_rows() {
        let mut buf = Vec::new();
        write_table_csv(&mut buf, &table()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "date,total_nva,note\n2025-12-05,1.5,\"a,b\"\n2025-12-04,,c\n"
        );
    }

    #[test]
    fn sink_creates_named_file() {
        let dir = tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("out"));
        let path = sink.write("HPG_foreign", &table()).unwrap();

        assert!(path.starts_with(dir.path().join("out")));
        let file_name = path.file_name().unwrap().to_string_lossy();
        assert!(file_name.starts_with("HPG_foreign_"));
        assert!(file_name.ends_with(".csv"));
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 3);
    }

    #[test]
    fn rejects_path_like_names() {
        let dir = tempdir().unwrap();
        let sink = CsvSink::new(dir.path());
        assert!(matches!(
            sink.write("../escape", &table()),
            Err(SinkError::Write { .. })
        ));
    }
}
