use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{AnalystError, Result};
use crate::model::{AnalysisReport, DISCLAIMER, MarketSnapshot, PriceForecast};

/// Analysis object exactly as the model emits it, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmAnalysis {
    pub technical_summary: Option<String>,
    pub sentiment: Option<String>,
    pub prediction: Option<String>,
    pub confidence: Option<f64>,
    pub recommendation: Option<String>,
    pub risk_level: Option<String>,
    pub advice: Option<String>,
    #[serde(default)]
    pub forecasts: Vec<LlmForecast>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmForecast {
    pub timeframe: String,
    pub low_estimate: Decimal,
    pub mid_estimate: Decimal,
    pub high_estimate: Decimal,
    pub probability_up: f64,
}

/// Decode model text (fenced or bare JSON) and validate it against the snapshot.
pub fn parse_analysis(
    text: &str,
    snapshot: &MarketSnapshot,
    generated_at: DateTime<Utc>,
) -> Result<AnalysisReport> {
    let parsed: LlmAnalysis = agent_core::json::parse_json(text)?;
    parsed.validate_and_into_report(snapshot, generated_at)
}

impl LlmAnalysis {
    pub fn validate_and_into_report(
        self,
        snapshot: &MarketSnapshot,
        generated_at: DateTime<Utc>,
    ) -> Result<AnalysisReport> {
        let technical_summary = required_text("technical_summary", self.technical_summary)?;
        let sentiment = required_label("sentiment", self.sentiment)?;
        let prediction = required_label("prediction", self.prediction)?;
        let recommendation = required_label("recommendation", self.recommendation)?;
        let risk_level = required_label("risk_level", self.risk_level)?;
        let advice = required_text("advice", self.advice)?;

        let confidence = self
            .confidence
            .ok_or_else(|| AnalystError::malformed("missing required field 'confidence'"))?;
        ensure_probability("confidence", confidence)?;

        let forecasts = self
            .forecasts
            .into_iter()
            .map(LlmForecast::validate_and_into_forecast)
            .collect::<Result<Vec<_>>>()?;

        Ok(AnalysisReport {
            symbol: snapshot.symbol.clone(),
            name: snapshot.name.clone(),
            price: snapshot.price_usd,
            volume_24h: snapshot.volume_24h,
            market_timestamp: snapshot.timestamp,
            technical_summary,
            sentiment,
            prediction,
            confidence,
            recommendation,
            risk_level,
            advice,
            forecasts,
            generated_at,
            disclaimer: DISCLAIMER.to_string(),
        })
    }
}

impl LlmForecast {
    fn validate_and_into_forecast(self) -> Result<PriceForecast> {
        let timeframe = self.timeframe.trim().to_string();
        if timeframe.is_empty() {
            return Err(AnalystError::malformed("forecast timeframe must be non-empty"));
        }

        if self.low_estimate.is_sign_negative() {
            return Err(AnalystError::malformed(format!(
                "forecast {timeframe}: estimates must be non-negative"
            )));
        }
        if self.low_estimate > self.mid_estimate || self.mid_estimate > self.high_estimate {
            return Err(AnalystError::malformed(format!(
                "forecast {timeframe}: expected low <= mid <= high, got {} / {} / {}",
                self.low_estimate, self.mid_estimate, self.high_estimate
            )));
        }
        ensure_probability("probability_up", self.probability_up)?;

        Ok(PriceForecast {
            timeframe,
            low_estimate: self.low_estimate,
            mid_estimate: self.mid_estimate,
            high_estimate: self.high_estimate,
            probability_up: self.probability_up,
        })
    }
}

fn required_text(field: &str, value: Option<String>) -> Result<String> {
    let text = value
        .map(|s| s.trim().to_string())
        .ok_or_else(|| AnalystError::malformed(format!("missing required field '{field}'")))?;
    if text.is_empty() {
        return Err(AnalystError::malformed(format!("field '{field}' must be non-empty")));
    }
    Ok(text)
}

fn required_label<T: FromStr<Err = String>>(field: &str, value: Option<String>) -> Result<T> {
    let raw = value.ok_or_else(|| AnalystError::malformed(format!("missing required field '{field}'")))?;
    raw.parse::<T>()
        .map_err(|e| AnalystError::malformed(format!("field '{field}': {e}")))
}

fn ensure_probability(field: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(AnalystError::malformed(format!(
            "field '{field}' must be between 0 and 1 (got {value})"
        )));
    }
    Ok(())
}
