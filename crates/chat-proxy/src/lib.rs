//! Chat relay that helps users classify their e-waste.
//!
//! The public form carries a "Need Help?" widget that talks to a hosted
//! language model. This crate owns everything between the HTTP handler and
//! that model:
//!
//! - the fixed classification-assistant system prompt,
//! - the conversation transcript and its `role: content` prompt template,
//! - a conversation-keyed store so concurrent users never share a
//!   transcript, and
//! - the [`ChatModel`] capability trait with a hosted-model implementation
//!   ([`ReplicateChatModel`]).
//!
//! Transcripts are in-memory only and live for the process's lifetime; no
//! length bound or truncation policy is applied to a single conversation.

use async_trait::async_trait;
use thiserror::Error;

pub mod replicate;
pub mod transcript;

pub use replicate::ReplicateChatModel;
pub use transcript::{Conversation, ConversationStore, SYSTEM_PROMPT};

/// Generation parameters forwarded on every model call.
pub const MAX_TOKENS: u32 = 500;
pub const TEMPERATURE: f32 = 0.7;

/// Errors surfaced by a model call.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("model service error: {message}")]
    Remote {
        status: Option<u16>,
        message: String,
    },

    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// The hosted-model capability: one rendered prompt in, one reply out.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ChatError>;
}

/// Configuration for the hosted model client.
#[derive(Debug, Clone)]
pub struct ChatProxyConfig {
    /// Prediction endpoint of the hosted model.
    pub model_url: String,

    /// API token sent as a bearer credential.
    pub api_token: String,
}

impl Default for ChatProxyConfig {
    fn default() -> Self {
        Self {
            model_url:
                "https://api.replicate.com/v1/models/meta/meta-llama-3-8b-instruct/predictions"
                    .to_string(),
            api_token: String::new(),
        }
    }
}

impl ChatProxyConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            model_url: std::env::var("CHAT_MODEL_URL").unwrap_or(default.model_url),
            api_token: std::env::var("REPLICATE_API_TOKEN").unwrap_or(default.api_token),
        }
    }
}
