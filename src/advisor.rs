//! Application assembly: one store, one answerer.
//!
//! [`Advisor`] is built once from [`Config`] and passed to the CLI commands
//! and the HTTP server. It owns the chosen [`DocumentStore`] backend and the
//! chosen [`Answerer`]; nothing here is a process-wide singleton.

use anyhow::Result;
use std::sync::Arc;

use doc_advisor_core::models::{AnswerResult, Conversation, Document, Feedback};
use doc_advisor_core::store::memory::InMemoryStore;
use doc_advisor_core::store::DocumentStore;
use doc_advisor_core::{Answerer, ExtractiveAnswerer, GenerativeAnswerer};

use crate::config::Config;
use crate::generation::ChatCompletionsGenerator;
use crate::sqlite_store::SqliteStore;

#[derive(Clone)]
pub struct Advisor {
    store: Arc<dyn DocumentStore>,
    answerer: Arc<dyn Answerer>,
}

impl Advisor {
    pub fn new(store: Arc<dyn DocumentStore>, answerer: Arc<dyn Answerer>) -> Self {
        Self { store, answerer }
    }

    /// Open the configured store and construct the configured answerer.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store: Arc<dyn DocumentStore> = match config.store.backend.as_str() {
            "memory" => Arc::new(InMemoryStore::new()),
            _ => Arc::new(SqliteStore::open(&config.db.path).await?),
        };

        let params = config.retrieval.params();
        let answerer: Arc<dyn Answerer> = if config.answer.is_generative() {
            let generator = ChatCompletionsGenerator::new(&config.generation)?;
            Arc::new(GenerativeAnswerer::new(Arc::new(generator), params))
        } else {
            Arc::new(ExtractiveAnswerer::new(params))
        };

        tracing::debug!(
            store = store.backend(),
            answerer = answerer.name(),
            "advisor ready"
        );

        Ok(Self::new(store, answerer))
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub fn answerer_name(&self) -> &str {
        self.answerer.name()
    }

    pub async fn upload(&self, filename: &str, content: &str) -> Result<Document> {
        let doc = Document::new(filename, content);
        self.store.insert_document(&doc).await?;
        tracing::info!(filename, chars = content.chars().count(), "document uploaded");
        Ok(doc)
    }

    pub async fn documents(&self) -> Result<Vec<Document>> {
        self.store.list_documents().await
    }

    /// Answer `question` over every stored document and persist the exchange.
    ///
    /// Returns the answer together with the stored conversation.
    pub async fn ask(&self, question: &str) -> Result<(AnswerResult, Conversation)> {
        let docs = self.store.list_documents().await?;
        let result = self.answerer.answer(question, &docs).await;
        tracing::info!(
            documents = docs.len(),
            sources = result.sources.len(),
            confidence = result.confidence,
            "question answered"
        );

        let conversation = Conversation::exchange(question, &result);
        self.store.insert_conversation(&conversation).await?;
        Ok((result, conversation))
    }

    pub async fn conversations(&self) -> Result<Vec<Conversation>> {
        self.store.list_conversations().await
    }

    pub async fn feedback(
        &self,
        conversation_id: Option<String>,
        rating: i32,
        comment: &str,
    ) -> Result<Feedback> {
        let feedback = Feedback::new(conversation_id, rating, comment);
        self.store.insert_feedback(&feedback).await?;
        Ok(feedback)
    }
}
