//! Interactive command loop (`advisor shell`).
//!
//! Reads one command per line:
//!
//! ```text
//! upload <dir>     store every matching file under <dir>
//! docs             list stored documents
//! ask <question>   answer a question and persist the exchange
//! exit | quit      leave the shell
//! ```
//!
//! With the in-memory store backend this is the way to keep uploads and
//! questions in one session.

use anyhow::Result;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt};

use crate::advisor::Advisor;
use crate::ask::format_answer;
use crate::config::UploadConfig;
use crate::upload::upload_directory;

pub const HELP: &str = "Commands:\n  upload <dir>\n  docs\n  ask <question>\n  exit";

/// Result of one shell line.
#[derive(Debug, PartialEq)]
pub enum Step {
    /// Print this text (possibly empty) and read the next line.
    Output(String),
    Exit,
}

/// Execute one command line.
///
/// Command failures (bad directory, store errors) are reported as output
/// rather than ending the session.
pub async fn execute_line(advisor: &Advisor, line: &str, upload: &UploadConfig) -> Step {
    let line = line.trim();
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    let outcome: Result<String> = match (cmd, rest) {
        ("", _) => Ok(String::new()),
        ("exit" | "quit", "") => return Step::Exit,
        ("help", _) => Ok(HELP.to_string()),
        ("upload", dir) if !dir.is_empty() => upload_directory(advisor, Path::new(dir), upload)
            .await
            .map(|n| format!("Uploaded {} files", n)),
        ("docs", "") => advisor.documents().await.map(|docs| {
            docs.iter()
                .enumerate()
                .map(|(i, d)| format!("{} {}", i + 1, d.filename))
                .collect::<Vec<_>>()
                .join("\n")
        }),
        ("ask", question) if !question.is_empty() => advisor
            .ask(question)
            .await
            .map(|(result, _)| format_answer(&result)),
        _ => Ok("Unknown command".to_string()),
    };

    match outcome {
        Ok(text) => Step::Output(text),
        Err(e) => {
            tracing::warn!(command = cmd, error = %e, "shell command failed");
            Step::Output(format!("Error: {}", e))
        }
    }
}

/// Run the loop until `exit`, `quit`, or end of input.
pub async fn run_shell<R, W>(
    advisor: &Advisor,
    upload: &UploadConfig,
    input: R,
    mut output: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: tokio::io::AsyncWrite + Unpin,
{
    output.write_all(format!("{}\n", HELP).as_bytes()).await?;
    let mut lines = input.lines();

    loop {
        output.write_all(b"cmd> ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match execute_line(advisor, &line, upload).await {
            Step::Exit => break,
            Step::Output(text) if text.is_empty() => {}
            Step::Output(text) => output.write_all(format!("{}\n", text).as_bytes()).await?,
        }
    }

    output.flush().await?;
    Ok(())
}
