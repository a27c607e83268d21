//! OpenAI-compatible chat-completions client.
//!
//! [`ChatCompletionsGenerator`] implements the core
//! [`Generator`](doc_advisor_core::generation::Generator) trait by calling
//! `POST {base_url}/chat/completions`, which Ollama serves under `/v1`.
//!
//! # Failure Policy
//!
//! One attempt per request, bounded by `generation.timeout_secs`. Every
//! failure maps to a [`GenerationError`]:
//!
//! - request exceeded the timeout → [`GenerationError::Timeout`]
//! - connection or protocol error → [`GenerationError::Transport`]
//! - non-2xx status → [`GenerationError::Status`]
//! - body without `choices[0].message.content` → [`GenerationError::MalformedResponse`]

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

use doc_advisor_core::generation::{GenerationError, GenerationRequest, Generator};
use doc_advisor_core::models::ChatMessage;

use crate::config::GenerationConfig;

pub struct ChatCompletionsGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f64,
    timeout_secs: u64,
}

impl ChatCompletionsGenerator {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn classify(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout(self.timeout_secs)
        } else if err.is_decode() {
            GenerationError::MalformedResponse(err.to_string())
        } else {
            GenerationError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl Generator for ChatCompletionsGenerator {
    fn model(&self) -> &str {
        &self.model
    }

    fn temperature(&self) -> f64 {
        self.temperature
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        tracing::debug!(endpoint = %self.endpoint, model = %request.model, "sending chat completion");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response.json().await.map_err(|e| self.classify(e))?;
        parse_chat_response(&json)
    }
}

/// Extract `choices[0].message.content` from a chat-completions response.
fn parse_chat_response(json: &serde_json::Value) -> Result<String, GenerationError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            GenerationError::MalformedResponse(
                "missing choices[0].message.content".to_string(),
            )
        })
}

/// Send a one-line greeting to the configured service and report the result.
///
/// Used by `advisor check` to verify the generation endpoint before asking
/// real questions.
pub async fn run_check(config: &GenerationConfig) -> Result<()> {
    let generator = ChatCompletionsGenerator::new(config)?;
    println!("Connecting to {}...", generator.endpoint());

    let request = GenerationRequest {
        model: generator.model().to_string(),
        messages: vec![ChatMessage::user("Hello, are you working?")],
        temperature: generator.temperature(),
    };

    match generator.generate(&request).await {
        Ok(text) => {
            println!("Success! Response:");
            println!("{}", text);
            Ok(())
        }
        Err(e) => anyhow::bail!("Failed to connect: {}", e),
    }
}
