//! Pipeline
//!
//! fetch -> analyze -> persist for one symbol. Nothing touches the disk
//! unless the analysis validated.

use std::sync::Arc;

use crate::error::Result;
use crate::exchange::MarketDataSource;
use crate::model::AnalysisReport;
use crate::svckit::analyst::Analyst;
use crate::svckit::report_writer::{PersistedReport, ReportWriter};

/// Result of a successful run
#[derive(Clone, Debug)]
pub struct PipelineOutcome {
    pub report: AnalysisReport,
    pub persisted: PersistedReport,
}

pub struct Pipeline {
    market: Arc<dyn MarketDataSource>,
    analyst: Analyst,
    writer: ReportWriter,
}

impl Pipeline {
    pub fn new(market: Arc<dyn MarketDataSource>, analyst: Analyst, writer: ReportWriter) -> Self {
        Self { market, analyst, writer }
    }

    pub fn writer(&self) -> &ReportWriter {
        &self.writer
    }

    pub async fn run(&self, symbol: &str) -> Result<PipelineOutcome> {
        let snapshot = self.market.snapshot(symbol).await?;
        tracing::info!(
            symbol = %snapshot.symbol,
            source = self.market.name(),
            price = %snapshot.price_usd,
            volume_24h = %snapshot.volume_24h,
            "market snapshot"
        );

        let report = self.analyst.analyze(&snapshot).await?;
        let persisted = self.writer.persist(&report)?;

        tracing::info!(
            json = %persisted.json_path.display(),
            csv = %persisted.csv_path.display(),
            "report saved"
        );

        Ok(PipelineOutcome { report, persisted })
    }
}
