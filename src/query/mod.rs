//! Query layer between pages and the HTTP client.
//!
//! Every logical query has a [`QueryKey`]. The [`Fetcher`] runs at most one
//! task per key, caches successful payloads, and hands completions back to
//! the event loop tagged with their key so pages can drop results for
//! parameters they no longer show.

pub mod cache;
pub mod remote;

pub use cache::{Lookup, QueryCache};
pub use remote::{Remote, RemoteView};

use crate::api::{FetchError, MarketCapRecord, PricesSnapshot, UniverseClient};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Identity of a backend query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    MarketCap {
        quote: String,
    },
    Prices {
        symbols: Vec<String>,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl QueryKey {
    async fn execute(&self, client: &UniverseClient) -> Result<Payload, FetchError> {
        match self {
            QueryKey::MarketCap { quote } => client
                .fetch_market_cap(quote)
                .await
                .map(|records| Payload::MarketCap(Arc::new(records))),
            QueryKey::Prices {
                symbols,
                start,
                end,
            } => client
                .fetch_prices(symbols, *start, *end)
                .await
                .map(|snapshot| Payload::Prices(Arc::new(snapshot))),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::MarketCap { quote } => write!(f, "market-cap({quote})"),
            QueryKey::Prices {
                symbols,
                start,
                end,
            } => write!(f, "prices({} {start}..{end})", symbols.join(",")),
        }
    }
}

/// Successful query result. Payloads are immutable and shared.
#[derive(Debug, Clone)]
pub enum Payload {
    MarketCap(Arc<Vec<MarketCapRecord>>),
    Prices(Arc<PricesSnapshot>),
}

/// A finished fetch.
#[derive(Debug)]
pub struct Completion {
    pub key: QueryKey,
    pub result: Result<Payload, FetchError>,
}

/// Runs query tasks on the tokio runtime and owns the cache.
#[derive(Debug)]
pub struct Fetcher {
    client: UniverseClient,
    cache: QueryCache,
    in_flight: HashMap<QueryKey, JoinHandle<Result<Payload, FetchError>>>,
}

impl Fetcher {
    pub fn new(client: UniverseClient, stale_after: Duration) -> Self {
        Self {
            client,
            cache: QueryCache::new(stale_after),
            in_flight: HashMap::new(),
        }
    }

    /// Ask for `key`.
    ///
    /// # Returns
    /// * `Option<Payload>` - Cached payload if there is one
    ///
    /// # Details
    /// A fresh cache entry is returned without any request. A stale entry
    /// is returned and refreshed in the background. A missing entry starts
    /// a fetch. Requests for a key already in flight are coalesced.
    pub fn request(&mut self, key: &QueryKey, now: Instant) -> Option<Payload> {
        match self.cache.lookup(key, now) {
            Lookup::Fresh(payload) => {
                tracing::debug!(query = %key, "cache hit");
                Some(payload)
            }
            Lookup::Stale(payload) => {
                tracing::debug!(query = %key, "stale cache hit, refreshing");
                self.spawn(key);
                Some(payload)
            }
            Lookup::Missing => {
                self.spawn(key);
                None
            }
        }
    }

    /// Fetch `key` again regardless of the cache.
    pub fn refetch(&mut self, key: &QueryKey) {
        self.spawn(key);
    }

    pub fn is_in_flight(&self, key: &QueryKey) -> bool {
        self.in_flight.contains_key(key)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    fn spawn(&mut self, key: &QueryKey) {
        if self.in_flight.contains_key(key) {
            tracing::debug!(query = %key, "coalesced with in-flight fetch");
            return;
        }
        tracing::info!(query = %key, "fetch started");
        let client = self.client.clone();
        let task_key = key.clone();
        let handle = tokio::spawn(async move { task_key.execute(&client).await });
        self.in_flight.insert(key.clone(), handle);
    }

    /// Collect every finished task, caching successes.
    pub async fn poll_completed(&mut self, now: Instant) -> Vec<Completion> {
        let finished: Vec<QueryKey> = self
            .in_flight
            .iter()
            .filter(|(_, handle)| handle.is_finished())
            .map(|(key, _)| key.clone())
            .collect();

        let mut completions = Vec::with_capacity(finished.len());
        for key in finished {
            let Some(handle) = self.in_flight.remove(&key) else {
                continue;
            };
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(FetchError::Task(e.to_string())),
            };
            match &result {
                Ok(payload) => {
                    self.cache.store(key.clone(), payload.clone(), now);
                    tracing::info!(query = %key, cached = self.cache.len(), "fetch finished");
                }
                Err(error) => tracing::warn!(
                    query = %key,
                    %error,
                    network = error.is_network(),
                    auth = error.is_auth(),
                    "fetch failed"
                ),
            }
            completions.push(Completion { key, result });
        }
        completions
    }

    /// Wait for every in-flight task and return their completions.
    #[cfg(test)]
    pub async fn settle(&mut self) -> Vec<Completion> {
        let mut all = Vec::new();
        while !self.in_flight.is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
            all.extend(self.poll_completed(Instant::now()).await);
        }
        all
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::api::UniverseClient;
    use crate::config::Config;
    use axum::Router;
    use axum::routing::post;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend serving a fixed market cap snapshot and counting hits.
    pub async fn market_cap_backend(records: usize) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let router = Router::new().route(
            "/api/v1/investment-universe/market-cap",
            post(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let data: Vec<_> = (1..=records)
                        .map(|i| {
                            json!({
                                "symbol": format!("C{i}USDT"),
                                "long_name": format!("Coin {i}"),
                                "base_asset": format!("C{i}"),
                                "quote_asset": "USDT",
                                "price": i as f64,
                                "supply": 1000.0,
                                "market_cap": i as f64 * 1000.0
                            })
                        })
                        .collect();
                    axum::Json(json!({ "success": true, "data": data }))
                }
            }),
        );
        (serve(router).await, hits)
    }

    pub async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Base URL nothing listens on.
    pub async fn dead_backend() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    pub fn client(base_url: &str) -> UniverseClient {
        let config = Config {
            api_base_url: base_url.to_string(),
            request_timeout_secs: 5,
            ..Config::default()
        };
        UniverseClient::new(&config).unwrap()
    }
}
