//! Investment universe HTTP client.
//!
//! One request per logical query; response envelopes are unwrapped here so
//! callers only ever see records or a [`FetchError`].

use crate::api::error::{FetchError, server_message};
use crate::api::models::{
    ApiEnvelope, MarketCapRecord, MarketCapRequest, PositionRecord, PositionsResponse,
    PricesSnapshot, RangeRequest,
};
use crate::config::Config;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

const MARKET_CAP_PATH: &str = "/api/v1/investment-universe/market-cap";
const POSITIONS_PATH: &str = "/api/v1/investment-universe/positions";
const PRICES_PATH: &str = "/api/v1/investment-universe/prices";

/// Client for the investment universe endpoints.
#[derive(Debug, Clone)]
pub struct UniverseClient {
    /// HTTP client for API requests
    client: Client,
    /// Base URL without trailing slash
    base_url: String,
    /// Bearer token sent with every request, if configured
    token: Option<String>,
}

impl UniverseClient {
    /// Create a new client from configuration.
    ///
    /// # Arguments
    /// * `config` - Application configuration
    ///
    /// # Returns
    /// * `Result<UniverseClient>` - New client or error
    ///
    /// # Details
    /// Requires a non-empty `api_base_url`. The request timeout comes from
    /// `request_timeout_secs`.
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config.api_base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(anyhow::anyhow!(
                "Backend URL is required. Please set api_base_url in config.jsonc"
            ));
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            token: config.api_token.clone().filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the market cap snapshot for a quote asset.
    pub async fn fetch_market_cap(&self, quote: &str) -> Result<Vec<MarketCapRecord>, FetchError> {
        let envelope: ApiEnvelope<Vec<MarketCapRecord>> = self
            .post(MARKET_CAP_PATH, &MarketCapRequest { quote })
            .await?;
        unwrap_envelope(envelope)
    }

    /// Fetch positions for `symbols` between `start` and `end`.
    #[allow(dead_code)] // Useful for the positioning page
    pub async fn fetch_positions(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PositionRecord>, FetchError> {
        let response: PositionsResponse = self
            .post(POSITIONS_PATH, &RangeRequest::new(symbols, start, end))
            .await?;
        match response {
            PositionsResponse::Bare(records) => Ok(records),
            PositionsResponse::Wrapped(envelope) => unwrap_envelope(envelope),
        }
    }

    /// Fetch daily price history for `symbols` between `start` and `end`.
    pub async fn fetch_prices(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PricesSnapshot, FetchError> {
        let envelope: ApiEnvelope<PricesSnapshot> = self
            .post(PRICES_PATH, &RangeRequest::new(symbols, start, end))
            .await?;
        unwrap_envelope(envelope)
    }

    /// POST a JSON body and decode the JSON response.
    ///
    /// # Details
    /// 401/403 map to [`FetchError::Auth`]; other failure statuses map to
    /// [`FetchError::Server`] carrying the server message when the body has one.
    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "POST");

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            let error = FetchError::from(e);
            tracing::warn!(%url, error = %error, "request failed");
            error
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(%url, status = status.as_u16(), "authentication rejected");
            return Err(FetchError::Auth {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(%url, status = status.as_u16(), "backend returned an error");
            return Err(FetchError::Server {
                status: Some(status.as_u16()),
                message: server_message(&error_text).unwrap_or_default(),
            });
        }

        let bytes = response.bytes().await.map_err(FetchError::from)?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

fn unwrap_envelope<T>(envelope: ApiEnvelope<T>) -> Result<T, FetchError> {
    if envelope.success {
        Ok(envelope.data)
    } else {
        Err(FetchError::Server {
            status: None,
            message: envelope.message.unwrap_or_default(),
        })
    }
}
