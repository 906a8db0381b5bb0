//! Investment universe wire models and data structures.
//!
//! Contains request bodies, the response envelope, and the records the
//! dashboard tables display.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Date format used by request bodies.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Standard response wrapper used by every endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Request success status
    #[serde(default = "default_success")]
    pub success: bool,
    /// Response payload
    pub data: T,
    /// Optional human-readable message
    #[serde(default)]
    pub message: Option<String>,
    /// Server timestamp
    #[serde(default)]
    #[allow(dead_code)] // Part of the envelope, kept for debugging output
    pub timestamp: Option<String>,
}

fn default_success() -> bool {
    true
}

/// One asset of the market cap snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCapRecord {
    /// Trading pair, e.g. `BTCUSDT`
    pub symbol: String,
    /// Full asset name, e.g. `Bitcoin`
    pub long_name: String,
    pub base_asset: String,
    pub quote_asset: String,
    /// Last price in the quote asset
    pub price: f64,
    /// Circulating supply
    pub supply: f64,
    /// `price * supply`
    pub market_cap: f64,
}

/// One position of the positions query.
#[allow(dead_code)] // Useful for the positioning page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub asset: String,
    pub quantity: f64,
    pub value_usdt: f64,
    /// Share of the portfolio value
    pub weight: f64,
}

/// Positions responses come either bare or wrapped in the envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
#[allow(dead_code)] // Useful for the positioning page
pub enum PositionsResponse {
    Bare(Vec<PositionRecord>),
    Wrapped(ApiEnvelope<Vec<PositionRecord>>),
}

/// Price history for a set of symbols over a date range.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PricesSnapshot {
    pub symbols: Vec<String>,
    pub start_date: String,
    pub end_date: String,
    /// date -> symbol -> close price. The backend has shipped this under
    /// both `data` and `prices`.
    #[serde(alias = "prices")]
    pub data: BTreeMap<String, BTreeMap<String, Option<f64>>>,
    #[serde(default)]
    pub count: usize,
}

impl PricesSnapshot {
    /// One row per date, ascending, one value per symbol.
    pub fn rows(&self) -> Vec<PriceRow> {
        self.data
            .iter()
            .map(|(date, prices)| PriceRow {
                date: date.clone(),
                values: prices
                    .iter()
                    .filter_map(|(symbol, price)| price.map(|p| (symbol.clone(), p)))
                    .collect(),
            })
            .collect()
    }

    /// Symbols to show as columns: the requested ones, else every symbol
    /// seen in the data.
    pub fn column_symbols(&self) -> Vec<String> {
        if !self.symbols.is_empty() {
            return self.symbols.clone();
        }
        let mut seen: Vec<String> = Vec::new();
        for prices in self.data.values() {
            for symbol in prices.keys() {
                if !seen.contains(symbol) {
                    seen.push(symbol.clone());
                }
            }
        }
        seen
    }
}

/// Price history pivoted to one row per date.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    /// `YYYY-MM-DD`
    pub date: String,
    pub values: BTreeMap<String, f64>,
}

impl PriceRow {
    pub fn price(&self, symbol: &str) -> Option<f64> {
        self.values.get(symbol).copied()
    }
}

/// Body of the market cap query.
#[derive(Debug, Serialize)]
pub struct MarketCapRequest<'a> {
    pub quote: &'a str,
}

/// Body of the positions and prices queries.
#[derive(Debug, Serialize)]
pub struct RangeRequest<'a> {
    pub symbols: &'a [String],
    pub start_date: String,
    pub end_date: String,
}

impl<'a> RangeRequest<'a> {
    pub fn new(symbols: &'a [String], start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            symbols,
            start_date: start.format(DATE_FORMAT).to_string(),
            end_date: end.format(DATE_FORMAT).to_string(),
        }
    }
}
