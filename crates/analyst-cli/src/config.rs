//! Settings
//!
//! Everything the process reads from the environment, read exactly once.

use std::path::PathBuf;

use agent_core::GenerationOptions;
use agent_runtime::OpenAiConfig;
use anyhow::{Context, bail};
use crypto_analyst::exchange::COINGECKO_BASE_URL;

const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_MAX_TOKENS: u32 = 4000;
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_OUTPUT_DIR: &str = "reports";
const DEFAULT_CSV_FILE: &str = "analysis_reports.csv";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarketSource {
    CoinGecko,
    Mock,
}

#[derive(Clone)]
pub struct Settings {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
    pub market_source: MarketSource,
    pub coingecko_base_url: String,
    pub output_dir: PathBuf,
    pub csv_file: PathBuf,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("market_source", &self.market_source)
            .field("coingecko_base_url", &self.coingecko_base_url)
            .field("output_dir", &self.output_dir)
            .field("csv_file", &self.csv_file)
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let openai_api_key = get("OPENAI_API_KEY").context("OPENAI_API_KEY is required")?;
        let openai_base_url = get("OPENAI_BASE_URL").context("OPENAI_BASE_URL is required")?;

        let market_source = match get("ANALYST_MARKET_SOURCE").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("coingecko") => MarketSource::CoinGecko,
            Some("mock") => MarketSource::Mock,
            Some(other) => bail!("ANALYST_MARKET_SOURCE must be 'coingecko' or 'mock' (got '{other}')"),
        };

        Ok(Self {
            openai_api_key,
            openai_base_url,
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: parse_or(get("OPENAI_TEMPERATURE"), "OPENAI_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            max_tokens: parse_or(get("OPENAI_MAX_TOKENS"), "OPENAI_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            request_timeout_secs: parse_or(get("OPENAI_TIMEOUT_SECS"), "OPENAI_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            market_source,
            coingecko_base_url: get("COINGECKO_BASE_URL").unwrap_or_else(|| COINGECKO_BASE_URL.to_string()),
            output_dir: get("ANALYST_OUTPUT_DIR").map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR), PathBuf::from),
            csv_file: get("ANALYST_CSV_FILE").map_or_else(|| PathBuf::from(DEFAULT_CSV_FILE), PathBuf::from),
        })
    }

    /// Command-line flags win over the environment.
    pub fn with_output_overrides(mut self, output_dir: Option<PathBuf>, csv_file: Option<PathBuf>) -> Self {
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        if let Some(file) = csv_file {
            self.csv_file = file;
        }
        self
    }

    pub fn openai_config(&self) -> OpenAiConfig {
        OpenAiConfig::new(&self.openai_api_key, &self.openai_base_url)
            .with_timeout_secs(self.request_timeout_secs)
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            ..GenerationOptions::default()
        }
        .with_model(&self.model)
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
    }
}
