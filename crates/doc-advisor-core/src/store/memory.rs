//! In-memory [`DocumentStore`] for tests and single-process sessions.
//!
//! Uses `Vec`s behind `std::sync::RwLock`. Contents vanish with the process.

use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::models::{Conversation, Document, Feedback};

use super::DocumentStore;

/// Transient store backed by process memory.
#[derive(Default)]
pub struct InMemoryStore {
    docs: RwLock<Vec<Document>>,
    conversations: RwLock<Vec<Conversation>>,
    feedback: RwLock<Vec<Feedback>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow!("in-memory store lock poisoned")
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    fn backend(&self) -> &str {
        "memory"
    }

    async fn insert_document(&self, doc: &Document) -> Result<()> {
        self.docs.write().map_err(poisoned)?.push(doc.clone());
        Ok(())
    }

    async fn list_documents(&self) -> Result<Vec<Document>> {
        Ok(self.docs.read().map_err(poisoned)?.clone())
    }

    async fn insert_conversation(&self, conv: &Conversation) -> Result<()> {
        self.conversations
            .write()
            .map_err(poisoned)?
            .push(conv.clone());
        Ok(())
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        Ok(self.conversations.read().map_err(poisoned)?.clone())
    }

    async fn insert_feedback(&self, feedback: &Feedback) -> Result<()> {
        self.feedback.write().map_err(poisoned)?.push(feedback.clone());
        Ok(())
    }

    async fn list_feedback(&self) -> Result<Vec<Feedback>> {
        Ok(self.feedback.read().map_err(poisoned)?.clone())
    }
}
