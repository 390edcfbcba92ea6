//! Prompt construction
//!
//! The system prompt pins the output schema; the user prompt carries the
//! market snapshot so the model never has to guess current prices.

use crate::model::MarketSnapshot;

/// System prompt for the analyst model
pub const ANALYST_SYSTEM_PROMPT: &str = r#"You are an expert cryptocurrency analyst. You receive a live market snapshot and produce technical analysis, sentiment analysis, a short-term prediction, and advice.

## Output Rules

- Return ONLY one valid JSON object. No markdown, no prose, no code fences.
- Use double quotes for all strings. No trailing commas. No comments.
- Base price levels on the snapshot price; do not invent a different current price.

## Output Schema

{
  "technical_summary": "2-4 sentences on trend, momentum, support and resistance",
  "sentiment": "bullish | bearish | neutral",
  "prediction": "up | down | sideways",
  "confidence": 0.0,
  "recommendation": "strong_buy | buy | hold | sell | strong_sell",
  "risk_level": "low | medium | high | very_high",
  "advice": "1-3 sentences of practical, risk-aware guidance",
  "forecasts": [
    {
      "timeframe": "24h",
      "low_estimate": 0.0,
      "mid_estimate": 0.0,
      "high_estimate": 0.0,
      "probability_up": 0.0
    }
  ]
}

## Field Rules

- "prediction" is the expected direction over the next 7 days.
- "confidence" and every "probability_up" are numbers between 0 and 1.
- "forecasts" covers the timeframes 24h, 7d and 30d, with low_estimate <= mid_estimate <= high_estimate.
- Be probabilistic and conservative. Crypto is volatile; say so when it matters."#;

/// User prompt embedding every snapshot field
pub fn user_prompt(snapshot: &MarketSnapshot) -> String {
    let mut prompt = format!(
        "Analyze {name} ({symbol}) using this market snapshot:\n\
         - price_usd: {price}\n\
         - volume_24h_usd: {volume}\n",
        name = snapshot.name,
        symbol = snapshot.symbol,
        price = snapshot.price_usd,
        volume = snapshot.volume_24h,
    );

    if let Some(change) = snapshot.change_24h {
        prompt.push_str(&format!("- change_24h_percent: {change}\n"));
    }
    if let Some(market_cap) = snapshot.market_cap {
        prompt.push_str(&format!("- market_cap_usd: {market_cap}\n"));
    }
    prompt.push_str(&format!(
        "- as_of: {}\n\nReturn the JSON object described in the system prompt.",
        snapshot.timestamp.to_rfc3339()
    ));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_user_prompt_embeds_snapshot() {
        let snapshot = MarketSnapshot::new("SOL", "Solana", dec!(195.25), dec!(3000000000))
            .with_change_24h(dec!(-4.2))
            .at(Utc.with_ymd_and_hms(2025, 12, 1, 9, 30, 0).unwrap());

        let prompt = user_prompt(&snapshot);
        assert!(prompt.contains("Solana (SOL)"));
        assert!(prompt.contains("price_usd: 195.25"));
        assert!(prompt.contains("volume_24h_usd: 3000000000"));
        assert!(prompt.contains("change_24h_percent: -4.2"));
        assert!(!prompt.contains("market_cap_usd"));
        assert!(prompt.contains("as_of: 2025-12-01T09:30:00+00:00"));
    }

    #[test]
    fn test_system_prompt_names_required_fields() {
        for field in ["technical_summary", "sentiment", "prediction", "confidence", "advice"] {
            assert!(ANALYST_SYSTEM_PROMPT.contains(field), "missing {field}");
        }
    }
}
