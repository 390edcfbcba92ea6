//! # agent-runtime
//!
//! Runtime providers for the crypto analyst.
//!
//! ## Providers
//!
//! - **OpenAI** (default): any endpoint speaking the OpenAI chat completions API
//!   (api.openai.com, Azure-style gateways, local proxies)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::openai::{OpenAiConfig, OpenAiProvider};
//!
//! let provider = OpenAiProvider::from_config(OpenAiConfig::new(key, base_url))?;
//! let completion = provider.complete(&messages, &options).await?;
//! ```

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "openai")]
pub use openai::{OpenAiConfig, OpenAiProvider};

// Re-export core types for convenience
pub use agent_core::{
    AgentError, Completion, GenerationOptions, LlmProvider, Message, Result, Role,
};
