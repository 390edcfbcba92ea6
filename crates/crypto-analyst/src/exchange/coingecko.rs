//! CoinGecko Market Data
//!
//! Public, keyless market data: `/search` resolves a ticker or coin name to a
//! CoinGecko id, `/coins/markets` returns price, volume and 24h change.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::MarketDataSource;
use crate::error::{AnalystError, Result};
use crate::model::MarketSnapshot;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const VS_CURRENCY: &str = "usd";

/// CoinGecko REST client
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
}

impl CoinGeckoClient {
    /// Client with its own HTTP client against `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AnalystError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, Some(base_url.into())))
    }

    /// Client with a pre-configured HTTP client and optional base URL
    /// (mock servers in tests, proxies, the Pro API host).
    pub fn with_client(client: Client, base_url: Option<String>) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Self { client, base_url }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        symbol: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| AnalystError::data_unavailable(symbol, format!("market data request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let reason = match status {
                StatusCode::NOT_FOUND => "asset not found".to_string(),
                StatusCode::TOO_MANY_REQUESTS => "rate limited by market data provider".to_string(),
                other => format!("unexpected status: {other}"),
            };
            tracing::warn!(%symbol, status = status.as_u16(), path, "market data request rejected");
            return Err(AnalystError::data_unavailable(symbol, reason));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AnalystError::data_unavailable(symbol, format!("failed to decode market data: {e}")))
    }

    /// Resolve free-text input to a CoinGecko coin
    async fn resolve(&self, query: &str) -> Result<SearchCoin> {
        let search: SearchResponse = self.get_json(query, "/search", &[("query", query)]).await?;
        pick_coin(query, search.coins)
            .ok_or_else(|| AnalystError::data_unavailable(query, "no coin matches this symbol or name"))
    }
}

/// Exact symbol match wins (results come ordered by market cap), then id or name.
fn pick_coin(query: &str, coins: Vec<SearchCoin>) -> Option<SearchCoin> {
    let position = coins
        .iter()
        .position(|c| c.symbol.eq_ignore_ascii_case(query))
        .or_else(|| {
            coins
                .iter()
                .position(|c| c.id.eq_ignore_ascii_case(query) || c.name.eq_ignore_ascii_case(query))
        })?;
    coins.into_iter().nth(position)
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    async fn snapshot(&self, symbol: &str) -> Result<MarketSnapshot> {
        let query = symbol.trim();
        if query.is_empty() {
            return Err(AnalystError::data_unavailable(symbol, "empty symbol"));
        }

        let coin = self.resolve(query).await?;
        tracing::debug!(%query, id = %coin.id, "resolved coin");

        let markets: Vec<MarketEntry> = self
            .get_json(
                query,
                "/coins/markets",
                &[("vs_currency", VS_CURRENCY), ("ids", coin.id.as_str())],
            )
            .await?;

        let entry = markets
            .into_iter()
            .find(|m| m.id == coin.id)
            .ok_or_else(|| AnalystError::data_unavailable(query, "provider returned no market entry"))?;

        entry.into_snapshot(query)
    }

    fn name(&self) -> &str {
        "CoinGecko"
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    coins: Vec<SearchCoin>,
}

#[derive(Debug, Deserialize)]
struct SearchCoin {
    id: String,
    name: String,
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct MarketEntry {
    id: String,
    symbol: String,
    name: String,
    current_price: Option<Decimal>,
    total_volume: Option<Decimal>,
    market_cap: Option<Decimal>,
    price_change_percentage_24h: Option<Decimal>,
    last_updated: Option<DateTime<Utc>>,
}

impl MarketEntry {
    fn into_snapshot(self, query: &str) -> Result<MarketSnapshot> {
        let price = self
            .current_price
            .ok_or_else(|| AnalystError::data_unavailable(query, "provider has no current price"))?;
        let volume = self.total_volume.unwrap_or(Decimal::ZERO);

        if price.is_sign_negative() || volume.is_sign_negative() {
            return Err(AnalystError::data_unavailable(query, "provider returned negative price or volume"));
        }

        let mut snapshot = MarketSnapshot::new(self.symbol, self.name, price, volume)
            .at(self.last_updated.unwrap_or_else(Utc::now));
        if let Some(change) = self.price_change_percentage_24h {
            snapshot = snapshot.with_change_24h(change);
        }
        if let Some(market_cap) = self.market_cap {
            snapshot = snapshot.with_market_cap(market_cap);
        }
        Ok(snapshot)
    }
}
