use snafu::{Backtrace, Snafu};

use crate::models::table::Table;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// The destination could not be prepared or written.
    #[snafu(display("Failed to write data: {message}"))]
    Write {
        message: String,
        backtrace: Backtrace,
    },

    /// Encoding rows for the destination format failed.
    #[snafu(display("CSV encoding error: {source}"))]
    Csv {
        source: ::csv::Error,
        backtrace: Backtrace,
    },

    /// A generic I/O error.
    #[snafu(display("I/O error: {source}"))]
    Io {
        source: std::io::Error,
        backtrace: Backtrace,
    },
}

pub trait DataSink {
    /// The type of output returned after a successful write operation.
    ///
    /// A file sink returns the path it created; other sinks may return a row count.
    type Output;

    /// Writes `table` under a caller-chosen `name` (typically `{symbol}_{category}`).
    fn write(&self, name: &str, table: &Table) -> Result<Self::Output, SinkError>;
}
