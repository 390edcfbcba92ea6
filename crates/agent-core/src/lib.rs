//! # agent-core
//!
//! Provider-agnostic LLM abstraction shared by the analyst crates.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     crypto-analyst                          │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │   Prompt    │  │    JSON     │  │   LlmProvider       │  │
//! │  │  Messages   │──│  Extraction │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait lets the analyst talk to OpenAI or any
//! OpenAI-compatible endpoint (or a test double) without changing its logic.

pub mod provider;
pub mod message;
pub mod error;
pub mod json;

pub use error::{AgentError, Result};
pub use message::{Message, Role};
pub use provider::{Completion, FinishReason, GenerationOptions, LlmProvider, TokenUsage};
