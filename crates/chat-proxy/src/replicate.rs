//! Hosted-model implementation of [`ChatModel`].
//!
//! Calls a Replicate-hosted Llama 3 instruct model in blocking mode
//! (`Prefer: wait`), so one POST yields the finished prediction. The reply
//! may arrive as a single string or as an array of string chunks; chunks are
//! joined in order.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ChatError, ChatModel, ChatProxyConfig, MAX_TOKENS, TEMPERATURE};

#[derive(Serialize)]
struct PredictionRequest<'a> {
    input: PredictionInput<'a>,
}

#[derive(Serialize)]
struct PredictionInput<'a> {
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
    system_prompt: &'a str,
}

#[derive(Deserialize)]
struct PredictionResponse {
    #[serde(default)]
    output: Option<PredictionOutput>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PredictionOutput {
    Chunks(Vec<String>),
    Text(String),
}

impl PredictionOutput {
    fn into_text(self) -> String {
        match self {
            PredictionOutput::Chunks(chunks) => chunks.concat(),
            PredictionOutput::Text(text) => text,
        }
    }
}

/// Chat model backed by a hosted Replicate prediction endpoint.
pub struct ReplicateChatModel {
    client: Client,
    model_url: String,
    api_token: String,
}

impl ReplicateChatModel {
    pub fn new(config: ChatProxyConfig) -> Self {
        Self {
            client: Client::new(),
            model_url: config.model_url,
            api_token: config.api_token,
        }
    }
}

#[async_trait]
impl ChatModel for ReplicateChatModel {
    async fn complete(&self, prompt: &str) -> Result<String, ChatError> {
        debug!("Sending {}-char prompt to {}", prompt.len(), self.model_url);

        let body = PredictionRequest {
            input: PredictionInput {
                prompt,
                max_tokens: MAX_TOKENS,
                temperature: TEMPERATURE,
                system_prompt: crate::SYSTEM_PROMPT,
            },
        };

        let response = self
            .client
            .post(&self.model_url)
            .bearer_auth(&self.api_token)
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ChatError::Remote {
                status: Some(status.as_u16()),
                message,
            });
        }

        let prediction: PredictionResponse = response.json().await?;
        if let Some(message) = prediction.error {
            return Err(ChatError::Remote {
                status: None,
                message,
            });
        }

        prediction
            .output
            .map(PredictionOutput::into_text)
            .ok_or_else(|| ChatError::Remote {
                status: None,
                message: "prediction finished without output".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_for(url: String) -> ReplicateChatModel {
        ReplicateChatModel::new(ChatProxyConfig {
            model_url: url,
            api_token: "test-token".to_string(),
        })
    }

    #[tokio::test]
    async fn joins_chunked_output() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/predictions")
            .match_header("authorization", "Bearer test-token")
            .match_header("prefer", "wait")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"output":["That sounds like ","IT equipment."]}"#)
            .create_async()
            .await;

        let model = model_for(format!("{}/predictions", server.url()));
        let reply = model.complete("user: two laptops\nassistant:").await.unwrap();

        assert_eq!(reply, "That sounds like IT equipment.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn accepts_plain_string_output() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/predictions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"output":"Toys, most likely."}"#)
            .create_async()
            .await;

        let model = model_for(format!("{}/predictions", server.url()));
        let reply = model.complete("user: a drone\nassistant:").await.unwrap();

        assert_eq!(reply, "Toys, most likely.");
    }

    #[tokio::test]
    async fn forwards_fixed_generation_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/predictions")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "input": {
                    "prompt": "user: hello\nassistant:",
                    "max_tokens": 500,
                    "temperature": 0.7
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"output":"Hi!"}"#)
            .create_async()
            .await;

        let model = model_for(format!("{}/predictions", server.url()));
        model.complete("user: hello\nassistant:").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_a_remote_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/predictions")
            .with_status(401)
            .with_body("authentication required")
            .create_async()
            .await;

        let model = model_for(format!("{}/predictions", server.url()));
        let err = model.complete("user: hi\nassistant:").await.unwrap_err();

        match err {
            ChatError::Remote { status, message } => {
                assert_eq!(status, Some(401));
                assert_eq!(message, "authentication required");
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn prediction_level_error_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/predictions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"model is cold-starting"}"#)
            .create_async()
            .await;

        let model = model_for(format!("{}/predictions", server.url()));
        let err = model.complete("user: hi\nassistant:").await.unwrap_err();

        match err {
            ChatError::Remote { status, message } => {
                assert_eq!(status, None);
                assert_eq!(message, "model is cold-starting");
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }
}
