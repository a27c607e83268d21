//! # Document Advisor CLI (`advisor`)
//!
//! Upload plain-text documents, then ask questions answered from them.
//!
//! ## Usage
//!
//! ```bash
//! advisor --config ./config/advisor.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `advisor init` | Create the SQLite database and run schema migrations |
//! | `advisor upload <dir>` | Store every `.txt` file under a directory |
//! | `advisor docs` | List stored documents |
//! | `advisor ask "<question>"` | Answer a question from the stored documents |
//! | `advisor history` | Show persisted question/answer exchanges |
//! | `advisor feedback --rating N` | Rate an answer |
//! | `advisor check` | Verify the language-model endpoint responds |
//! | `advisor shell` | Interactive upload/docs/ask loop |
//! | `advisor serve` | Start the HTTP API |
//!
//! ## Examples
//!
//! ```bash
//! advisor init
//! advisor upload ./legacy-docs
//! advisor ask "How do we migrate the database?"
//!
//! # Offline, no language model
//! advisor --config ./config/extractive.example.toml ask "Which Tomcat version?"
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use doc_advisor::advisor::Advisor;
use doc_advisor::sqlite_store::SqliteStore;
use doc_advisor::{ask, config, generation, history, server, shell, upload};

/// Document Advisor: question answering over uploaded legacy documentation.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. A missing file means built-in defaults plus `OLLAMA_*` environment
/// overrides.
#[derive(Parser)]
#[command(
    name = "advisor",
    about = "Document Advisor: ask questions about uploaded plain-text documentation",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/advisor.toml")]
    config: PathBuf,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Idempotent; running it again leaves existing data in place.
    Init,

    /// Upload every matching file under a directory.
    Upload {
        /// Directory to scan.
        dir: PathBuf,
    },

    /// List stored documents.
    Docs,

    /// Answer a question from the stored documents.
    Ask {
        /// The question.
        question: String,
    },

    /// Show persisted conversations, oldest first.
    History,

    /// Record feedback on an answer.
    Feedback {
        /// Rating from 1 (useless) to 5 (exactly right).
        #[arg(long)]
        rating: i32,

        /// Conversation ID the rating applies to (see `advisor history`).
        #[arg(long)]
        conversation: Option<String>,

        /// Free-form comment.
        #[arg(long, default_value = "")]
        comment: String,
    },

    /// Send a test prompt to the configured language-model endpoint.
    Check,

    /// Interactive command loop reading from stdin.
    Shell,

    /// Start the HTTP API on `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "doc_advisor={},doc_advisor_core={}",
            log_level, log_level
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cfg = config::load_or_minimal(&cli.config)?;

    // Commands that don't need a store
    match &cli.command {
        Commands::Init => {
            let store = SqliteStore::open(&cfg.db.path).await?;
            store.close().await;
            println!("Database initialized successfully.");
            return Ok(());
        }
        Commands::Check => {
            generation::run_check(&cfg.generation).await?;
            return Ok(());
        }
        _ => {}
    }

    let advisor = Advisor::from_config(&cfg).await?;

    match cli.command {
        Commands::Upload { dir } => {
            upload::run_upload(&advisor, &dir, &cfg.upload).await?;
        }
        Commands::Docs => {
            ask::run_docs(&advisor).await?;
        }
        Commands::Ask { question } => {
            ask::run_ask(&advisor, &question).await?;
        }
        Commands::History => {
            history::run_history(&advisor).await?;
        }
        Commands::Feedback {
            rating,
            conversation,
            comment,
        } => {
            history::run_feedback(&advisor, rating, conversation, &comment).await?;
        }
        Commands::Shell => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            shell::run_shell(&advisor, &cfg.upload, stdin, tokio::io::stdout()).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg, advisor).await?;
        }
        Commands::Init | Commands::Check => {
            // Handled above
        }
    }

    Ok(())
}
