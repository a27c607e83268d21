//! SQLite-backed [`DocumentStore`] implementation.
//!
//! The durable backend. Opening the store creates the database file (and
//! its parent directory) if needed and runs the idempotent migrations, so a
//! fresh path is usable immediately.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;

use doc_advisor_core::models::{ChatMessage, Conversation, Document, Feedback, Role};
use doc_advisor_core::store::DocumentStore;

use crate::migrate;

/// SQLite implementation of the [`DocumentStore`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `path` and migrate it.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        migrate::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

#[async_trait]
impl DocumentStore for SqliteStore {
    fn backend(&self) -> &str {
        "sqlite"
    }

    async fn insert_document(&self, doc: &Document) -> Result<()> {
        sqlx::query("INSERT INTO documents (filename, content, uploaded_at) VALUES (?, ?, ?)")
            .bind(&doc.filename)
            .bind(&doc.content)
            .bind(format_ts(&doc.uploaded_at))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_documents(&self) -> Result<Vec<Document>> {
        let rows = sqlx::query("SELECT filename, content, uploaded_at FROM documents ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let uploaded_at: String = row.get("uploaded_at");
                Document {
                    filename: row.get("filename"),
                    content: row.get("content"),
                    uploaded_at: parse_ts(&uploaded_at),
                }
            })
            .collect())
    }

    async fn insert_conversation(&self, conv: &Conversation) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO conversations (id, timestamp) VALUES (?, ?)")
            .bind(&conv.id)
            .bind(format_ts(&conv.timestamp))
            .execute(&mut *tx)
            .await?;

        for (position, msg) in conv.messages.iter().enumerate() {
            sqlx::query(
                "INSERT INTO messages (conversation_id, position, role, content) VALUES (?, ?, ?, ?)",
            )
            .bind(&conv.id)
            .bind(position as i64)
            .bind(msg.role.as_str())
            .bind(&msg.content)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let rows = sqlx::query(
            "SELECT c.id, c.timestamp, m.role, m.content \
             FROM conversations c \
             LEFT JOIN messages m ON m.conversation_id = c.id \
             ORDER BY c.seq, m.position",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut conversations: Vec<Conversation> = Vec::new();
        for row in &rows {
            let id: String = row.get("id");
            if conversations.last().map(|c| c.id != id).unwrap_or(true) {
                let timestamp: String = row.get("timestamp");
                conversations.push(Conversation {
                    id,
                    timestamp: parse_ts(&timestamp),
                    messages: Vec::new(),
                });
            }

            // A conversation without messages yields one row of NULLs.
            let role: Option<String> = row.get("role");
            let content: Option<String> = row.get("content");
            if let (Some(role), Some(content), Some(conv)) = (
                role.as_deref().and_then(Role::parse),
                content,
                conversations.last_mut(),
            ) {
                conv.messages.push(ChatMessage { role, content });
            }
        }

        Ok(conversations)
    }

    async fn insert_feedback(&self, feedback: &Feedback) -> Result<()> {
        sqlx::query(
            "INSERT INTO feedback (id, conversation_id, rating, comment, timestamp) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&feedback.id)
        .bind(&feedback.conversation_id)
        .bind(feedback.rating)
        .bind(&feedback.comment)
        .bind(format_ts(&feedback.timestamp))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_feedback(&self) -> Result<Vec<Feedback>> {
        let rows = sqlx::query(
            "SELECT id, conversation_id, rating, comment, timestamp FROM feedback ORDER BY seq",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let timestamp: String = row.get("timestamp");
                Feedback {
                    id: row.get("id"),
                    conversation_id: row.get("conversation_id"),
                    rating: row.get("rating"),
                    comment: row.get("comment"),
                    timestamp: parse_ts(&timestamp),
                }
            })
            .collect())
    }
}
