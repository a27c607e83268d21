//! Conversation history and feedback commands.

use anyhow::{bail, Result};

use crate::advisor::Advisor;

/// `advisor history`: every persisted exchange, oldest first.
pub async fn run_history(advisor: &Advisor) -> Result<()> {
    let conversations = advisor.conversations().await?;
    if conversations.is_empty() {
        println!("No conversations yet.");
        return Ok(());
    }

    for conv in &conversations {
        println!(
            "[{}] {}",
            conv.timestamp.format("%Y-%m-%d %H:%M:%S"),
            conv.id
        );
        for msg in &conv.messages {
            println!("  {}: {}", msg.role.as_str(), msg.content.replace('\n', " "));
        }
        println!();
    }
    Ok(())
}

/// Ratings are on a 1 to 5 scale.
pub fn validate_rating(rating: i32) -> Result<()> {
    if !(1..=5).contains(&rating) {
        bail!("rating must be between 1 and 5, got {}", rating);
    }
    Ok(())
}

/// `advisor feedback`: record a rating, optionally tied to a conversation.
pub async fn run_feedback(
    advisor: &Advisor,
    rating: i32,
    conversation_id: Option<String>,
    comment: &str,
) -> Result<()> {
    validate_rating(rating)?;
    let feedback = advisor.feedback(conversation_id, rating, comment).await?;
    println!("Feedback recorded: {}", feedback.id);
    Ok(())
}
