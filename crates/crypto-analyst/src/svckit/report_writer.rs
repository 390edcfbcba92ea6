//! Report Writer
//!
//! One pretty-printed JSON file per analysis plus a cumulative CSV with one
//! row per analysis. The two writes are independent: a crash between them
//! leaves a JSON file without its CSV row.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::Result;
use crate::model::{AnalysisReport, Prediction, Recommendation, RiskLevel, Sentiment};

/// Where a report ended up on disk
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistedReport {
    pub json_path: PathBuf,
    pub csv_path: PathBuf,
}

/// CSV schema, one row per analysis
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    timestamp: String,
    symbol: &'a str,
    name: &'a str,
    price: Decimal,
    volume_24h: Decimal,
    sentiment: Sentiment,
    prediction: Prediction,
    confidence: f64,
    recommendation: Recommendation,
    risk_level: RiskLevel,
    technical_summary: &'a str,
    advice: &'a str,
}

impl<'a> From<&'a AnalysisReport> for CsvRow<'a> {
    fn from(report: &'a AnalysisReport) -> Self {
        Self {
            timestamp: report.generated_at.to_rfc3339(),
            symbol: &report.symbol,
            name: &report.name,
            price: report.price,
            volume_24h: report.volume_24h,
            sentiment: report.sentiment,
            prediction: report.prediction,
            confidence: report.confidence,
            recommendation: report.recommendation,
            risk_level: report.risk_level,
            technical_summary: &report.technical_summary,
            advice: &report.advice,
        }
    }
}

/// Persists reports under an output directory
#[derive(Clone, Debug)]
pub struct ReportWriter {
    output_dir: PathBuf,
    csv_path: PathBuf,
}

impl ReportWriter {
    /// A relative `csv_file` lives inside `output_dir`; an absolute one is used as-is.
    pub fn new(output_dir: impl Into<PathBuf>, csv_file: impl AsRef<Path>) -> Self {
        let output_dir = output_dir.into();
        let csv_file = csv_file.as_ref();
        let csv_path = if csv_file.is_absolute() {
            csv_file.to_path_buf()
        } else {
            output_dir.join(csv_file)
        };
        Self { output_dir, csv_path }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// `report_<symbol>_<YYYYmmdd_HHMMSS>.json` inside the output directory
    pub fn json_path(&self, report: &AnalysisReport) -> PathBuf {
        let symbol: String = report
            .symbol
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        let stamp = report.generated_at.format("%Y%m%d_%H%M%S");
        self.output_dir.join(format!("report_{symbol}_{stamp}.json"))
    }

    /// Write the report as JSON, replacing any file of the same name.
    pub fn write_json(&self, report: &AnalysisReport) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.json_path(report);

        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, report)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        tracing::debug!(path = %path.display(), "wrote JSON report");
        Ok(path)
    }

    /// Append one row; the header goes in only when the file is new or empty.
    pub fn append_csv(&self, report: &AnalysisReport) -> Result<()> {
        if let Some(parent) = self.csv_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let needs_header = match fs::metadata(&self.csv_path) {
            Ok(meta) => meta.len() == 0,
            Err(err) if err.kind() == io::ErrorKind::NotFound => true,
            Err(err) => return Err(err.into()),
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.csv_path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(CsvRow::from(report))?;
        writer.flush()?;

        tracing::debug!(path = %self.csv_path.display(), header = needs_header, "appended CSV row");
        Ok(())
    }

    /// JSON first, then the CSV row.
    pub fn persist(&self, report: &AnalysisReport) -> Result<PersistedReport> {
        let json_path = self.write_json(report)?;
        self.append_csv(report)?;
        Ok(PersistedReport {
            json_path,
            csv_path: self.csv_path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalystError;
    use crate::model::{DISCLAIMER, PriceForecast};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn report(symbol: &str, second: u32) -> AnalysisReport {
        AnalysisReport {
            symbol: symbol.to_string(),
            name: "Bitcoin".to_string(),
            price: dec!(97500.12),
            volume_24h: dec!(25000000000),
            market_timestamp: Utc.with_ymd_and_hms(2025, 12, 1, 12, 0, 0).unwrap(),
            technical_summary: "Uptrend, RSI 61, support at 95k, resistance at 100k.".to_string(),
            sentiment: Sentiment::Bullish,
            prediction: Prediction::Up,
            confidence: 0.7,
            recommendation: Recommendation::Buy,
            risk_level: RiskLevel::High,
            advice: "Buy in tranches, never more than you can lose.".to_string(),
            forecasts: vec![PriceForecast {
                timeframe: "7d".to_string(),
                low_estimate: dec!(92000),
                mid_estimate: dec!(99000),
                high_estimate: dec!(104000),
                probability_up: 0.58,
            }],
            generated_at: Utc.with_ymd_and_hms(2025, 12, 1, 12, 0, second).unwrap(),
            disclaimer: DISCLAIMER.to_string(),
        }
    }

    #[test]
    fn test_relative_csv_lives_in_output_dir() {
        let writer = ReportWriter::new("reports", "all.csv");
        assert_eq!(writer.csv_path(), Path::new("reports/all.csv"));
        assert_eq!(
            writer.json_path(&report("BTC", 7)),
            Path::new("reports/report_btc_20251201_120007.json")
        );
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path(), "reports.csv");
        let original = report("BTC", 1);

        let path = writer.write_json(&original).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        for key in ["symbol", "price", "sentiment", "prediction", "confidence", "advice"] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["sentiment"], "bullish");
        assert_eq!(value["price"], "97500.12");
        assert_eq!(value["volume_24h"], "25000000000");

        let back: AnalysisReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_json_overwrites_same_name() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path(), "reports.csv");
        let mut first = report("BTC", 1);
        writer.write_json(&first).unwrap();
        first.advice = "Hold.".to_string();
        let path = writer.write_json(&first).unwrap();

        let back: AnalysisReport = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(back.advice, "Hold.");
    }

    #[test]
    fn test_csv_single_header_two_rows() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path().join("nested"), "reports.csv");
        let first = report("BTC", 1);
        let mut second = report("ETH", 2);
        second.name = "Ethereum".to_string();
        second.sentiment = Sentiment::Bearish;

        writer.append_csv(&first).unwrap();
        writer.append_csv(&second).unwrap();

        let mut reader = csv::Reader::from_path(writer.csv_path()).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec![
                "timestamp", "symbol", "name", "price", "volume_24h", "sentiment", "prediction",
                "confidence", "recommendation", "risk_level", "technical_summary", "advice",
            ]
        );

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "BTC");
        assert_eq!(&rows[0][3], "97500.12");
        assert_eq!(&rows[0][5], "bullish");
        assert_eq!(&rows[0][7], "0.7");
        assert_eq!(&rows[0][8], "buy");
        assert_eq!(&rows[0][10], first.technical_summary.as_str());
        assert_eq!(&rows[1][1], "ETH");
        assert_eq!(&rows[1][2], "Ethereum");
        assert_eq!(&rows[1][5], "bearish");
        assert_eq!(&rows[1][0], "2025-12-01T12:00:02+00:00");

        let text = fs::read_to_string(writer.csv_path()).unwrap();
        assert_eq!(text.matches("timestamp,symbol").count(), 1);
    }

    #[test]
    fn test_persist_reports_paths() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path(), "reports.csv");
        let persisted = writer.persist(&report("BTC", 3)).unwrap();
        assert!(persisted.json_path.exists());
        assert_eq!(persisted.csv_path, dir.path().join("reports.csv"));
        assert!(persisted.csv_path.exists());
    }

    #[test]
    fn test_unwritable_output_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let writer = ReportWriter::new(&blocker, "reports.csv");
        let err = writer.persist(&report("BTC", 4)).unwrap_err();
        assert!(matches!(err, AnalystError::Io(_)));
    }
}
