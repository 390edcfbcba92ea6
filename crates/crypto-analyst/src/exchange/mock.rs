//! Mock Exchange Client
//!
//! For tests and offline demos. Returns realistic static prices.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::MarketDataSource;
use crate::error::{AnalystError, Result};
use crate::model::MarketSnapshot;

/// Mock market data source with static prices
#[derive(Debug, Default)]
pub struct MockExchangeClient;

impl MockExchangeClient {
    pub fn new() -> Self {
        Self
    }

    /// (ticker, name, price, 24h volume, 24h change)
    fn quote(symbol: &str) -> Option<(&'static str, &'static str, Decimal, Decimal, Decimal)> {
        match symbol.to_uppercase().as_str() {
            "BTC" | "BITCOIN" => Some(("BTC", "Bitcoin", dec!(97500), dec!(25_000_000_000), dec!(2.5))),
            "ETH" | "ETHEREUM" => Some(("ETH", "Ethereum", dec!(3450), dec!(15_000_000_000), dec!(1.8))),
            "SOL" | "SOLANA" => Some(("SOL", "Solana", dec!(195), dec!(3_000_000_000), dec!(4.2))),
            "ADA" | "CARDANO" => Some(("ADA", "Cardano", dec!(0.95), dec!(800_000_000), dec!(-1.2))),
            "DOT" | "POLKADOT" => Some(("DOT", "Polkadot", dec!(7.20), dec!(400_000_000), dec!(0.8))),
            "LINK" | "CHAINLINK" => Some(("LINK", "Chainlink", dec!(24.50), dec!(600_000_000), dec!(3.1))),
            "AVAX" | "AVALANCHE" => Some(("AVAX", "Avalanche", dec!(42.00), dec!(700_000_000), dec!(5.5))),
            "XRP" | "RIPPLE" => Some(("XRP", "XRP", dec!(2.35), dec!(4_000_000_000), dec!(0.9))),
            "DOGE" | "DOGECOIN" => Some(("DOGE", "Dogecoin", dec!(0.38), dec!(2_000_000_000), dec!(12.0))),
            "LTC" | "LITECOIN" => Some(("LTC", "Litecoin", dec!(105), dec!(500_000_000), dec!(1.5))),
            _ => None,
        }
    }
}

#[async_trait]
impl MarketDataSource for MockExchangeClient {
    async fn snapshot(&self, symbol: &str) -> Result<MarketSnapshot> {
        let symbol = symbol.trim();
        let (ticker, name, price, volume, change_24h) = Self::quote(symbol)
            .ok_or_else(|| AnalystError::data_unavailable(symbol, "not in the mock price table"))?;

        Ok(MarketSnapshot::new(ticker, name, price, volume)
            .with_change_24h(change_24h))
    }

    fn name(&self) -> &str {
        "MockExchange"
    }
}
