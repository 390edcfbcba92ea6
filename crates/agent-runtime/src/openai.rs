//! OpenAI LLM Provider
//!
//! Implementation of `LlmProvider` for the OpenAI chat completions API and
//! compatible gateways.

use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    message::Message,
    provider::{Completion, FinishReason, GenerationOptions, LlmProvider, TokenUsage},
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// OpenAI provider configuration
#[derive(Clone)]
pub struct OpenAiConfig {
    /// Secret API key sent as a bearer token
    pub api_key: String,

    /// Base endpoint, e.g. `https://api.openai.com/v1`
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout_secs: 120,
        }
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// OpenAI-compatible LLM provider
pub struct OpenAiProvider {
    http: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create from configuration
    pub fn from_config(config: OpenAiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(AgentError::Config("OpenAI API key is empty".into()));
        }
        if config.base_url.trim().is_empty() {
            return Err(AgentError::Config("OpenAI base URL is empty".into()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Convert agent messages and options to the wire request
    fn build_request<'a>(messages: &'a [Message], options: &'a GenerationOptions) -> ChatRequest<'a> {
        ChatRequest {
            model: &options.model,
            messages: messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            stop: (!options.stop_sequences.is_empty()).then_some(options.stop_sequences.as_slice()),
            response_format: options.json_mode.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        }
    }

    /// Convert the wire response to an agent completion
    fn convert_completion(response: ChatResponse, requested_model: &str) -> Result<Completion> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Parse("response contained no choices".into()))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| AgentError::Parse("first choice has no message content".into()))?;

        Ok(Completion {
            content: content.trim().to_string(),
            model: response.model.unwrap_or_else(|| requested_model.to_string()),
            usage: response.usage,
            finish_reason: choice.finish_reason,
        })
    }

    /// Map a non-success HTTP status to an error kind
    fn status_error(status: StatusCode, body: String) -> AgentError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                AgentError::Auth(format!("HTTP {}: {}", status.as_u16(), body))
            }
            _ => AgentError::Upstream {
                status: status.as_u16(),
                body,
            },
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = Self::build_request(messages, options);
        tracing::debug!(model = %options.model, messages = messages.len(), "sending chat completion request");

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    AgentError::Config(e.to_string())
                } else {
                    AgentError::ProviderUnavailable(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "chat completion request rejected");
            return Err(Self::status_error(status, text));
        }

        let parsed = serde_json::from_str::<ChatResponse>(&text)
            .map_err(|e| AgentError::Parse(format!("failed to decode chat completion: {e}")))?;

        if let Some(usage) = &parsed.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "token usage"
            );
        }

        Self::convert_completion(parsed, &options.model)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<FinishReason>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn provider_for(server: &MockServer) -> OpenAiProvider {
        OpenAiProvider::from_config(OpenAiConfig::new("test-key", server.base_url())).unwrap()
    }

    fn messages() -> Vec<Message> {
        vec![Message::system("Return JSON."), Message::user("Analyze BTC")]
    }

    #[test]
    fn test_config_defaults() {
        let config = OpenAiConfig::new("k", "https://api.openai.com/v1");
        assert_eq!(config.timeout_secs, 120);
        assert!(!format!("{config:?}").contains("\"k\""));
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = OpenAiProvider::from_config(OpenAiConfig::new("  ", "http://localhost"));
        assert!(matches!(result, Err(AgentError::Config(_))));
    }

    #[test]
    fn test_request_serialization() {
        let msgs = messages();
        let opts = GenerationOptions::default().with_json_mode(true);
        let value = serde_json::to_value(OpenAiProvider::build_request(&msgs, &opts)).unwrap();
        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "Analyze BTC");
        assert_eq!(value["response_format"]["type"], "json_object");
        assert!(value.get("stop").is_none());
    }

    #[tokio::test]
    async fn test_complete_success() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .header("authorization", "Bearer test-key")
                    .json_body_partial(r#"{"response_format":{"type":"json_object"}}"#);
                then.status(200).json_body(json!({
                    "model": "gpt-4o-2024-08-06",
                    "choices": [{
                        "index": 0,
                        "message": {"role": "assistant", "content": "  {\"ok\": true}\n"},
                        "finish_reason": "stop"
                    }],
                    "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
                }));
            })
            .await;

        let provider = provider_for(&server);
        let opts = GenerationOptions::default().with_json_mode(true);
        let completion = provider.complete(&messages(), &opts).await.unwrap();

        mock.assert_async().await;
        assert_eq!(completion.content, "{\"ok\": true}");
        assert_eq!(completion.model, "gpt-4o-2024-08-06");
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
        assert_eq!(completion.usage.unwrap().total_tokens, 15);
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(401).json_body(json!({"error": {"message": "Incorrect API key provided"}}));
            })
            .await;

        let err = provider_for(&server)
            .complete(&messages(), &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Auth(msg) if msg.contains("401")));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_upstream() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(500).body("overloaded");
            })
            .await;

        let err = provider_for(&server)
            .complete(&messages(), &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Upstream { status: 500, ref body } if body == "overloaded"));
    }

    #[tokio::test]
    async fn test_invalid_body_maps_to_parse() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).body("{\"choices\": [");
            })
            .await;

        let err = provider_for(&server)
            .complete(&messages(), &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Parse(_)));
    }

    #[tokio::test]
    async fn test_empty_choices_maps_to_parse() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).json_body(json!({"choices": []}));
            })
            .await;

        let err = provider_for(&server)
            .complete(&messages(), &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Parse(msg) if msg.contains("no choices")));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let provider = OpenAiProvider::from_config(
            OpenAiConfig::new("test-key", "http://127.0.0.1:9").with_timeout_secs(5),
        )
        .unwrap();
        let err = provider
            .complete(&messages(), &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::ProviderUnavailable(_)));
    }
}
