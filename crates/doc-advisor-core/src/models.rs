//! Core data models used throughout Doc Advisor.
//!
//! These types represent the uploaded documents, the answers returned to
//! callers, and the conversation and feedback records the application
//! persists alongside them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An uploaded text document.
///
/// Identity is the filename, which is not enforced to be unique. Missing
/// fields deserialize to empty strings (and the Unix epoch for
/// `uploaded_at`) so loosely-shaped records never fail to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub uploaded_at: DateTime<Utc>,
}

impl Document {
    /// Create a document stamped with the current time.
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            uploaded_at: Utc::now(),
        }
    }
}

/// The answer returned for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    /// Answer text (extracted snippets, generated prose, or a fixed message).
    pub answer: String,
    /// Filenames of the documents the answer drew from, best match first.
    pub sources: Vec<String>,
    /// Heuristic reliability in `[0.0, 1.0]`; not a calibrated probability.
    pub confidence: f64,
}

/// Speaker of a [`ChatMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system" => Some(Role::System),
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

/// One `{role, content}` message, used both for chat history and for the
/// generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A persisted question/answer exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Record a single question and its answer as a new conversation.
    pub fn exchange(question: &str, answer: &AnswerResult) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            messages: vec![
                ChatMessage::user(question),
                ChatMessage::assistant(answer.answer.clone()),
            ],
        }
    }
}

/// User feedback on an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}

impl Feedback {
    pub fn new(conversation_id: Option<String>, rating: i32, comment: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            conversation_id,
            rating,
            comment: comment.into(),
            timestamp: Utc::now(),
        }
    }
}
