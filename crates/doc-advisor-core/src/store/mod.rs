//! Storage abstraction for Doc Advisor.
//!
//! The [`DocumentStore`] trait covers everything the application persists:
//! uploaded documents, question/answer conversations, and feedback. The
//! answer pipeline itself only ever reads the document list.
//!
//! Two backends exist: [`memory::InMemoryStore`] here, and the SQLite store
//! in the `doc-advisor` app crate. Which one is used is decided once, when
//! the application is constructed.
//!
//! Implementations must be `Send + Sync`; concurrent readers are expected.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Conversation, Document, Feedback};

/// Abstract storage backend.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`insert_document`](DocumentStore::insert_document) | Store an uploaded document |
/// | [`list_documents`](DocumentStore::list_documents) | All documents, in upload order |
/// | [`insert_conversation`](DocumentStore::insert_conversation) | Persist a chat exchange |
/// | [`list_conversations`](DocumentStore::list_conversations) | All conversations, oldest first |
/// | [`insert_feedback`](DocumentStore::insert_feedback) | Persist user feedback |
/// | [`list_feedback`](DocumentStore::list_feedback) | All feedback, oldest first |
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs (`"memory"`, `"sqlite"`).
    fn backend(&self) -> &str;

    /// Store a document. Filenames are not required to be unique.
    async fn insert_document(&self, doc: &Document) -> Result<()>;

    async fn list_documents(&self) -> Result<Vec<Document>>;

    async fn insert_conversation(&self, conv: &Conversation) -> Result<()>;

    async fn list_conversations(&self) -> Result<Vec<Conversation>>;

    async fn insert_feedback(&self, feedback: &Feedback) -> Result<()>;

    async fn list_feedback(&self) -> Result<Vec<Feedback>>;
}
