//! Collection of daily foreign and proprietary trading flow for Vietnamese
//! listed stocks, with optional resampling to longer horizons.
//!
//! Two sources are supported: the CafeF paginated JSON API
//! ([`providers::cafef`]) and JSON embedded in Smoney stock pages
//! ([`providers::smoney`]). Both hand back a [`models::record::RecordSet`]
//! that becomes a [`models::table::Table`] for [`aggregate()`].

pub mod aggregate;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod io;
pub mod models;
pub mod providers;

pub use aggregate::aggregate;
pub use errors::{Error, ErrorKind};
pub use providers::collect;
