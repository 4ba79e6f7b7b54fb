use thiserror::Error;

use crate::{
    aggregate::AggregateError,
    config::ConfigError,
    io::sink::SinkError,
    providers::{ProviderError, ProviderInitError},
};

/// Coarse classification shared by every error the crate surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Transport failure or non-success status from a source.
    Http,
    /// Response body did not have the expected shape.
    Parse,
    /// Caller passed something the crate cannot act on (unknown horizon, missing date column).
    InvalidArgument,
    /// Pagination hit the configured request ceiling.
    PageLimit,
    Config,
    Io,
}

/// The unified error type for the `trade_flow_ingestor` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// An error originating from a data source (request, status, body shape, paging).
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Provider setup failed: {0}")]
    ProviderInit(#[from] ProviderInitError),

    #[error("Aggregation failed: {0}")]
    Aggregate(#[from] AggregateError),

    /// An error related to configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An error originating from a data sink.
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// A generic I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Provider(e) => e.kind(),
            Error::ProviderInit(_) | Error::Config(_) => ErrorKind::Config,
            Error::Aggregate(_) => ErrorKind::InvalidArgument,
            Error::Sink(_) | Error::Io(_) => ErrorKind::Io,
        }
    }
}

impl AggregateError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}
