//! crypto-analyst CLI
//!
//! Prompts for cryptocurrency symbols (or takes them as arguments), runs the
//! analysis pipeline for each one and saves the reports.
//!
//! Reports are printed to stdout; logs go to stderr.

mod config;
mod session;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_runtime::OpenAiProvider;
use crypto_analyst::{
    Analyst, CoinGeckoClient, MarketDataSource, MockExchangeClient, Pipeline, ReportWriter,
    model::DISCLAIMER,
};

use crate::config::{MarketSource, Settings};

#[derive(Debug, Parser)]
#[command(name = "crypto-analyst", version, about = "LLM-backed cryptocurrency market analysis")]
struct Args {
    /// Symbols or coin names to analyze; prompts interactively when omitted
    symbols: Vec<String>,

    /// Directory for JSON reports and the CSV log
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// CSV log file, relative to the output directory unless absolute
    #[arg(long)]
    csv_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let settings = Settings::from_env()?.with_output_overrides(args.output_dir, args.csv_file);
    tracing::debug!(?settings, "configuration loaded");

    let provider = Arc::new(OpenAiProvider::from_config(settings.openai_config())?);

    let market: Arc<dyn MarketDataSource> = match settings.market_source {
        MarketSource::CoinGecko => Arc::new(CoinGeckoClient::with_base_url(&settings.coingecko_base_url)?),
        MarketSource::Mock => {
            tracing::warn!("using mock market data");
            Arc::new(MockExchangeClient::new())
        }
    };

    let pipeline = Pipeline::new(
        market,
        Analyst::new(provider, settings.generation_options()),
        ReportWriter::new(&settings.output_dir, &settings.csv_file),
    );

    tracing::info!(
        model = %settings.model,
        output_dir = %pipeline.writer().output_dir().display(),
        csv = %pipeline.writer().csv_path().display(),
        "crypto analyst ready"
    );
    eprintln!("{DISCLAIMER}");

    let mut stdout = std::io::stdout().lock();
    if args.symbols.is_empty() {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        session::run_interactive(&pipeline, stdin, &mut stdout).await?;
    } else {
        let summary = session::run_batch(&pipeline, &args.symbols, &mut stdout).await?;
        if summary.failed > 0 {
            anyhow::bail!("{} of {} analyses failed", summary.failed, summary.failed + summary.succeeded);
        }
    }

    Ok(())
}
