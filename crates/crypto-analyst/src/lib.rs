//! # crypto-analyst
//!
//! Fetches a live market snapshot for a cryptocurrency, asks an LLM for
//! technical and sentiment analysis, and persists the validated result.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐
//! │ MarketDataSource │──▶│     Analyst      │──▶│   ReportWriter   │
//! │ (CoinGecko/mock) │   │ prompt → LLM →   │   │ report_*.json    │
//! │  MarketSnapshot  │   │ JSON → validate  │   │ + CSV row        │
//! └──────────────────┘   └──────────────────┘   └──────────────────┘
//! ```
//!
//! The analysis itself is delegated to the model. This crate owns the
//! prompt, the output contract, and the files:
//!
//! - **Prices come from the snapshot** - the model's own price guesses are ignored
//! - **Strict contract** - missing fields, unknown labels or out-of-range
//!   confidence reject the whole response
//! - **Nothing is saved on failure** - files are written only after validation

pub mod svckit;
pub mod exchange;
pub mod model;
pub mod contract;
pub mod prompt;
pub mod error;

pub use error::{AnalystError, Result};
pub use model::{
    AnalysisReport, MarketSnapshot, Prediction, PriceForecast, Recommendation, RiskLevel, Sentiment,
};
pub use exchange::{CoinGeckoClient, MarketDataSource, MockExchangeClient};
pub use svckit::{Analyst, PersistedReport, Pipeline, PipelineOutcome, ReportWriter};
