//! Investment universe backend integration.
//!
//! Provides the HTTP client, wire models and the normalized error type.

pub mod client;
pub mod error;
pub mod models;

pub use client::UniverseClient;
pub use error::FetchError;
pub use models::{MarketCapRecord, PriceRow, PricesSnapshot};
