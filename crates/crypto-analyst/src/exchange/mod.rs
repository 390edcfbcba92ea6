//! Market Data Sources
//!
//! Abstractions and implementations for public cryptocurrency market data.

mod coingecko;
mod mock;

pub use coingecko::{CoinGeckoClient, DEFAULT_BASE_URL as COINGECKO_BASE_URL};
pub use mock::MockExchangeClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::MarketSnapshot;

/// Market data source trait (Strategy pattern)
///
/// Implement this for each provider: CoinGecko, Binance, Kraken, etc.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Current snapshot for a ticker symbol or coin name
    ///
    /// Unknown assets and unreachable providers both fail with
    /// `AnalystError::DataUnavailable`.
    async fn snapshot(&self, symbol: &str) -> Result<MarketSnapshot>;

    /// Provider name
    fn name(&self) -> &str;
}
