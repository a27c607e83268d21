//! TOML configuration parsing and validation.
//!
//! Every section has defaults, so an empty file (or no file at all, see
//! [`Config::minimal`]) yields a working offline-capable setup. Generation
//! settings can be overridden from the environment:
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `OLLAMA_BASE_URL` | `generation.base_url` |
//! | `OLLAMA_MODEL` | `generation.model` |
//! | `OLLAMA_API_KEY` | `generation.api_key` |

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use doc_advisor_core::RetrievalParams;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub answer: AnswerConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./data/advisor.sqlite")
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// `"sqlite"` (durable) or `"memory"` (lives for one process).
    #[serde(default = "default_backend")]
    pub backend: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
        }
    }
}

fn default_backend() -> String {
    "sqlite".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_context_chars")]
    pub context_chars: usize,
    #[serde(default = "default_snippet_window_chars")]
    pub snippet_window_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            context_chars: default_context_chars(),
            snippet_window_chars: default_snippet_window_chars(),
        }
    }
}

fn default_top_k() -> usize {
    3
}
fn default_context_chars() -> usize {
    1000
}
fn default_snippet_window_chars() -> usize {
    200
}

impl RetrievalConfig {
    pub fn params(&self) -> RetrievalParams {
        RetrievalParams {
            top_k: self.top_k,
            context_chars: self.context_chars,
            snippet_window_chars: self.snippet_window_chars,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnswerConfig {
    /// `"generative"` (language model) or `"extractive"` (quoted sentences, offline).
    #[serde(default = "default_mode")]
    pub mode: String,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
        }
    }
}

fn default_mode() -> String {
    "generative".to_string()
}

impl AnswerConfig {
    pub fn is_generative(&self) -> bool {
        self.mode == "generative"
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    /// OpenAI-compatible API root; `/chat/completions` is appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Sent as a bearer token. Ollama ignores it but clients must send one.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: default_api_key(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:11434/v1".to_string()
}
fn default_model() -> String {
    "llama3".to_string()
}
fn default_api_key() -> String {
    "ollama".to_string()
}
fn default_temperature() -> f64 {
    0.3
}
fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8501".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
        }
    }
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*.txt".to_string()]
}

impl Config {
    /// All-defaults configuration, used when no config file exists.
    pub fn minimal() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Apply `OLLAMA_*` overrides using `lookup` to read variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("OLLAMA_BASE_URL").filter(|v| !v.is_empty()) {
            self.generation.base_url = url;
        }
        if let Some(model) = lookup("OLLAMA_MODEL").filter(|v| !v.is_empty()) {
            self.generation.model = model;
        }
        if let Some(key) = lookup("OLLAMA_API_KEY").filter(|v| !v.is_empty()) {
            self.generation.api_key = key;
        }
    }

    /// Check value ranges and enumerated settings.
    pub fn validate(&self) -> Result<()> {
        if self.retrieval.top_k == 0 {
            bail!("retrieval.top_k must be >= 1");
        }
        if self.retrieval.context_chars == 0 {
            bail!("retrieval.context_chars must be >= 1");
        }
        if self.retrieval.snippet_window_chars == 0 {
            bail!("retrieval.snippet_window_chars must be >= 1");
        }

        match self.store.backend.as_str() {
            "sqlite" | "memory" => {}
            other => bail!(
                "Unknown store backend: '{}'. Must be sqlite or memory.",
                other
            ),
        }

        match self.answer.mode.as_str() {
            "generative" | "extractive" => {}
            other => bail!(
                "Unknown answer mode: '{}'. Must be generative or extractive.",
                other
            ),
        }

        if self.answer.is_generative() {
            if self.generation.base_url.trim().is_empty() {
                bail!("generation.base_url must be set when answer.mode is 'generative'");
            }
            if self.generation.model.trim().is_empty() {
                bail!("generation.model must be set when answer.mode is 'generative'");
            }
        }

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            bail!("generation.temperature must be in [0.0, 2.0]");
        }
        if self.generation.timeout_secs == 0 {
            bail!("generation.timeout_secs must be >= 1");
        }

        Ok(())
    }
}

/// Parse a TOML config string, apply environment overrides, and validate.
pub fn parse_config(
    content: &str,
    env_lookup: impl Fn(&str) -> Option<String>,
) -> Result<Config> {
    let mut config: Config =
        toml::from_str(content).with_context(|| "Failed to parse config file")?;
    config.apply_env(env_lookup);
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content, |key| std::env::var(key).ok())
}

/// Load `path` if it exists, otherwise fall back to [`Config::minimal`].
pub fn load_or_minimal(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        let config = Config::minimal();
        config.validate()?;
        Ok(config)
    }
}
