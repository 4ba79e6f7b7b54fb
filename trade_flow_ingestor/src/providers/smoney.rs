//! Smoney stock page, which embeds the last ~30 trading days as JSON.

pub mod extract;
pub mod provider;

pub use provider::SmoneyProvider;
