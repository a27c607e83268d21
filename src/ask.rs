//! Question answering from the command line.
//!
//! Used by `advisor ask` and the `ask` command of `advisor shell`.

use anyhow::Result;

use doc_advisor_core::AnswerResult;

use crate::advisor::Advisor;

/// Render an answer the way the CLI prints it.
pub fn format_answer(result: &AnswerResult) -> String {
    format!(
        "\n---Answer---\n\n{}\nSources: {:?}\nConfidence: {:.2}",
        result.answer, result.sources, result.confidence
    )
}

pub async fn run_ask(advisor: &Advisor, question: &str) -> Result<()> {
    let (result, _) = advisor.ask(question.trim()).await?;
    println!("{}", format_answer(&result));
    Ok(())
}

/// `advisor docs`: numbered list of stored documents.
pub async fn run_docs(advisor: &Advisor) -> Result<()> {
    let docs = advisor.documents().await?;
    if docs.is_empty() {
        println!("No documents uploaded.");
        return Ok(());
    }
    for (i, doc) in docs.iter().enumerate() {
        println!("{} {}", i + 1, doc.filename);
    }
    Ok(())
}
