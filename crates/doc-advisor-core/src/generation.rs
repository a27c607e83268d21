//! Text-generation collaborator.
//!
//! The [`Generator`] trait is the seam between answer assembly and whatever
//! language-model service produces the synthesized answer. Implementations
//! report failure through [`GenerationError`] instead of panicking or
//! retrying; the caller decides how a failure is shown to the user.
//!
//! The HTTP implementation lives in the `doc-advisor` app crate.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::ChatMessage;

/// One chat-style generation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    /// Model identifier (e.g. `"llama3"`).
    pub model: String,
    /// Ordered `{role, content}` messages.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Why a generation call produced no text.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The service did not answer within the configured timeout.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// Connection refused, DNS failure, TLS error, and the like.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success HTTP status.
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// A service that turns a [`GenerationRequest`] into text.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Model identifier requests are sent with.
    fn model(&self) -> &str;

    /// Sampling temperature requests are sent with.
    fn temperature(&self) -> f64;

    /// Submit the request and return the generated text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}
