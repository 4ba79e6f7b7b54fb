//! CafeF paginated JSON endpoints (`GDKhoiNgoai.ashx`, `GDTuDoanh.ashx`).

pub mod params;
pub mod provider;
pub mod response;

pub use provider::{CafefProvider, CafefSource};
