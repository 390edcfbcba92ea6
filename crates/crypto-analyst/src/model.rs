//! Domain Models
//!
//! Core data types for market snapshots and LLM analysis reports.
//! Uses `rust_decimal` for all monetary values - never use f64 for money!

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Legal notice attached to every report
pub const DISCLAIMER: &str = "NOT FINANCIAL ADVICE. HIGH RISK. DYOR.";

/// Point-in-time market data for one asset
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Ticker symbol (e.g., "BTC", "ETH")
    pub symbol: String,

    /// Full name (e.g., "Bitcoin", "Ethereum")
    pub name: String,

    /// Current price in USD
    pub price_usd: Decimal,

    /// 24-hour traded volume in USD
    pub volume_24h: Decimal,

    /// 24-hour price change percentage
    pub change_24h: Option<Decimal>,

    /// Market capitalization in USD
    pub market_cap: Option<Decimal>,

    /// Provider's last update time
    pub timestamp: DateTime<Utc>,
}

impl MarketSnapshot {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        price_usd: Decimal,
        volume_24h: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into().trim().to_uppercase(),
            name: name.into(),
            price_usd,
            volume_24h,
            change_24h: None,
            market_cap: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_change_24h(mut self, change: Decimal) -> Self {
        self.change_24h = Some(change);
        self
    }

    pub fn with_market_cap(mut self, market_cap: Decimal) -> Self {
        self.market_cap = Some(market_cap);
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Normalize an LLM-provided label: "Strong Buy" / "strong-buy" -> "strong_buy"
fn normalize_label(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Implements `as_str`, `Display`, `FromStr` and string-based serde for a label enum.
macro_rules! label_enum {
    ($name:ident, $what:literal, { $($variant:ident => $label:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl $name {
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match normalize_label(s).as_str() {
                    $($label $(| $alias)* => Ok(Self::$variant),)+
                    other => Err(format!("unknown {} '{}'", $what, other)),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Market mood
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

label_enum!(Sentiment, "sentiment", {
    Bullish => "bullish" | "positive",
    Bearish => "bearish" | "negative",
    Neutral => "neutral",
});

/// Expected price direction over the next 7 days
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prediction {
    Up,
    Down,
    Sideways,
}

label_enum!(Prediction, "prediction", {
    Up => "up" | "bullish",
    Down => "down" | "bearish",
    Sideways => "sideways" | "flat" | "neutral",
});

/// Overall recommendation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recommendation {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

label_enum!(Recommendation, "recommendation", {
    StrongBuy => "strong_buy",
    Buy => "buy" | "accumulate",
    Hold => "hold",
    Sell => "sell" | "reduce",
    StrongSell => "strong_sell",
});

/// Risk classification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

label_enum!(RiskLevel, "risk level", {
    Low => "low",
    Medium => "medium" | "moderate",
    High => "high",
    VeryHigh => "very_high" | "extreme",
});

/// Price range forecast for one timeframe
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceForecast {
    /// Horizon label (e.g., "24h", "7d", "30d")
    pub timeframe: String,

    pub low_estimate: Decimal,
    pub mid_estimate: Decimal,
    pub high_estimate: Decimal,

    /// Probability that price ends the timeframe higher (0-1)
    pub probability_up: f64,
}

/// Validated LLM analysis of one snapshot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub name: String,

    /// Price from the market snapshot, not from the model
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub volume_24h: Decimal,
    pub market_timestamp: DateTime<Utc>,

    pub technical_summary: String,
    pub sentiment: Sentiment,
    pub prediction: Prediction,

    /// Model confidence (0-1)
    pub confidence: f64,

    pub recommendation: Recommendation,
    pub risk_level: RiskLevel,
    pub advice: String,

    #[serde(default)]
    pub forecasts: Vec<PriceForecast>,

    pub generated_at: DateTime<Utc>,
    pub disclaimer: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_snapshot_symbol_normalized() {
        let snapshot = MarketSnapshot::new(" btc ", "Bitcoin", dec!(97500), dec!(1000));
        assert_eq!(snapshot.symbol, "BTC");
        assert!(snapshot.change_24h.is_none());
    }

    #[test]
    fn test_labels_parse_case_insensitively() {
        assert_eq!("Bullish".parse::<Sentiment>().unwrap(), Sentiment::Bullish);
        assert_eq!("Strong Buy".parse::<Recommendation>().unwrap(), Recommendation::StrongBuy);
        assert_eq!("strong-sell".parse::<Recommendation>().unwrap(), Recommendation::StrongSell);
        assert_eq!("VERY HIGH".parse::<RiskLevel>().unwrap(), RiskLevel::VeryHigh);
        assert_eq!(" flat ".parse::<Prediction>().unwrap(), Prediction::Sideways);
        assert!("moon".parse::<Prediction>().is_err());
    }

    #[test]
    fn test_labels_serialize_snake_case() {
        let json = serde_json::to_string(&Recommendation::StrongBuy).unwrap();
        assert_eq!(json, "\"strong_buy\"");
        let back: RiskLevel = serde_json::from_str("\"Very_High\"").unwrap();
        assert_eq!(back, RiskLevel::VeryHigh);
    }
}
