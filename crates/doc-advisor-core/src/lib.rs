//! # Doc Advisor Core
//!
//! Shared logic for Doc Advisor: data models, the tokenizer, the
//! token-overlap ranker, snippet extraction, answer assembly, and the
//! storage and generation traits the application plugs into.
//!
//! This crate contains no tokio runtime, sqlx, HTTP client, or filesystem
//! I/O. Everything that talks to the outside world is a trait
//! ([`store::DocumentStore`], [`generation::Generator`]) implemented by the
//! `doc-advisor` app crate.
//!
//! ## Pipeline
//!
//! ```text
//! query ─▶ tokenize ─▶ score ─▶ rank ─┬─▶ snippet ─▶ extractive answer
//!                                     └─▶ context ─▶ generator ─▶ answer
//! ```

pub mod answer;
pub mod generation;
pub mod models;
pub mod rank;
pub mod score;
pub mod snippet;
pub mod store;
pub mod tokenize;

pub use answer::{Answerer, ExtractiveAnswerer, GenerativeAnswerer};
pub use models::{AnswerResult, Document};
pub use rank::RetrievalParams;
