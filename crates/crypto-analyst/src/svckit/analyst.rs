//! Analyst
//!
//! Turns a market snapshot into a validated `AnalysisReport` with one
//! completion request.

use std::sync::Arc;

use agent_core::{GenerationOptions, LlmProvider, Message};
use chrono::Utc;

use crate::contract;
use crate::error::Result;
use crate::model::{AnalysisReport, MarketSnapshot};
use crate::prompt::{ANALYST_SYSTEM_PROMPT, user_prompt};

/// Prompt/response orchestrator over any `LlmProvider`
pub struct Analyst {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
}

impl Analyst {
    /// JSON mode is always requested, whatever `options` says.
    pub fn new(provider: Arc<dyn LlmProvider>, options: GenerationOptions) -> Self {
        Self {
            provider,
            options: options.with_json_mode(true),
        }
    }

    /// System + user messages for one snapshot
    pub fn messages(snapshot: &MarketSnapshot) -> Vec<Message> {
        vec![
            Message::system(ANALYST_SYSTEM_PROMPT),
            Message::user(user_prompt(snapshot)),
        ]
    }

    /// Single attempt: provider failures and invalid output are returned as-is.
    pub async fn analyze(&self, snapshot: &MarketSnapshot) -> Result<AnalysisReport> {
        let messages = Self::messages(snapshot);
        let prompt_tokens: u32 = messages.iter().map(Message::estimate_tokens).sum();

        tracing::info!(
            symbol = %snapshot.symbol,
            provider = self.provider.name(),
            model = %self.options.model,
            prompt_tokens,
            "requesting analysis"
        );

        let completion = self.provider.complete(&messages, &self.options).await?;

        if completion.truncated() {
            tracing::warn!(
                symbol = %snapshot.symbol,
                max_tokens = self.options.max_tokens,
                "completion hit max_tokens; output is likely incomplete"
            );
        }

        let report = contract::parse_analysis(&completion.content, snapshot, Utc::now())?;

        tracing::info!(
            symbol = %report.symbol,
            sentiment = %report.sentiment,
            prediction = %report.prediction,
            confidence = report.confidence,
            "analysis received"
        );

        Ok(report)
    }
}
