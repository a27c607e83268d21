//! # Document Advisor
//!
//! Question answering over a small collection of uploaded plain-text
//! documents (legacy runbooks, migration notes, architecture write-ups).
//!
//! Retrieval and answer construction live in `doc-advisor-core`; this crate
//! adds the SQLite store, the chat-completions client, the CLI commands,
//! and the HTTP API.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────────┐   ┌──────────────────┐
//! │  upload   │──▶│ DocumentStore │──▶│ Answerer         │
//! │  (files)  │   │ sqlite/memory │   │ extractive or    │
//! └───────────┘   └──────────────┘   │ generative (LLM) │
//!                                     └────────┬─────────┘
//!                       ┌──────────────────────┤
//!                       ▼                      ▼
//!                  ┌──────────┐          ┌──────────┐
//!                  │   CLI    │          │   HTTP   │
//!                  │(advisor) │          │  (axum)  │
//!                  └──────────┘          └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`advisor`] | Store + answerer assembly |
//! | [`sqlite_store`] | SQLite-backed document store |
//! | [`migrate`] | Schema migrations |
//! | [`generation`] | OpenAI-compatible chat-completions client |
//! | [`upload`] | Directory scanning and upload |
//! | [`ask`] | `ask` and `docs` commands |
//! | [`history`] | `history` and `feedback` commands |
//! | [`shell`] | Interactive command loop |
//! | [`server`] | HTTP API |

pub mod advisor;
pub mod ask;
pub mod config;
pub mod generation;
pub mod history;
pub mod migrate;
pub mod server;
pub mod shell;
pub mod sqlite_store;
pub mod upload;
