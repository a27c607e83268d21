//! Directory upload.
//!
//! Walks a local directory, keeps files matching `upload.include_globs` and
//! not matching `upload.exclude_globs` (plus `.git`, `target`, and
//! `node_modules`), and stores each as a [`Document`](doc_advisor_core::Document)
//! named by its path relative to the directory. Invalid UTF-8 is replaced
//! and Windows line endings are normalized to `\n`.

use anyhow::{bail, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;
use walkdir::WalkDir;

use crate::advisor::Advisor;
use crate::config::UploadConfig;

/// A file read from disk, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub filename: String,
    pub content: String,
}

pub fn scan_directory(root: &Path, config: &UploadConfig) -> Result<Vec<UploadFile>> {
    if !root.is_dir() {
        bail!("Invalid path: {} is not a directory", root.display());
    }

    let include_set = build_globset(&config.include_globs)?;

    let mut default_excludes = vec![
        "**/.git/**".to_string(),
        "**/target/**".to_string(),
        "**/node_modules/**".to_string(),
    ];
    default_excludes.extend(config.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let mut files = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().replace('\\', "/");

        if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
            continue;
        }

        let bytes = std::fs::read(path)?;
        files.push(UploadFile {
            filename: rel_str,
            content: normalize_text(&String::from_utf8_lossy(&bytes)),
        });
    }

    // Sort for deterministic ordering
    files.sort_by(|a, b| a.filename.cmp(&b.filename));

    Ok(files)
}

fn normalize_text(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Patterns match case-insensitively, so `**/*.txt` also picks up `README.TXT`.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(GlobBuilder::new(pattern).case_insensitive(true).build()?);
    }
    Ok(builder.build()?)
}

/// Upload every matching file under `dir`. Returns the number stored.
pub async fn upload_directory(advisor: &Advisor, dir: &Path, config: &UploadConfig) -> Result<usize> {
    let files = scan_directory(dir, config)?;
    for file in &files {
        advisor.upload(&file.filename, &file.content).await?;
    }
    tracing::info!(dir = %dir.display(), count = files.len(), "directory uploaded");
    Ok(files.len())
}

/// CLI entry point for `advisor upload <dir>`.
pub async fn run_upload(advisor: &Advisor, dir: &Path, config: &UploadConfig) -> Result<()> {
    let count = upload_directory(advisor, dir, config).await?;
    println!("Uploaded {} files", count);
    Ok(())
}
