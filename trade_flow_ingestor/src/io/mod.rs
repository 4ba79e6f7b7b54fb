pub mod csv;
pub mod sink;

pub use self::csv::{CsvSink, write_table_csv};
pub use sink::{DataSink, SinkError};
