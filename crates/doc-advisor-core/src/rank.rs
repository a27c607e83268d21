//! Candidate scoring and top-K selection.
//!
//! # Algorithm
//!
//! 1. If the collection is empty, stop with [`Retrieval::NoContext`].
//! 2. Score every document against the query with [`overlap_score`].
//! 3. Drop documents scoring 0.
//! 4. Stable sort by score descending; ties keep input order.
//! 5. Truncate to `top_k`.
//! 6. Nothing left means [`Retrieval::NoRelevantMatch`].

use crate::models::Document;
use crate::score::{overlap_score, TermCounts};

/// Retrieval tuning parameters, decoupled from application config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalParams {
    /// Maximum number of documents used to build an answer.
    pub top_k: usize,
    /// Prefix length (in characters) of each document forwarded as context.
    pub context_chars: usize,
    /// Snippet length (in characters) when no sentence-ending period follows a match.
    pub snippet_window_chars: usize,
}

impl Default for RetrievalParams {
    fn default() -> Self {
        Self {
            top_k: 3,
            context_chars: 1000,
            snippet_window_chars: 200,
        }
    }
}

/// A document paired with its overlap score for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate<'a> {
    pub score: usize,
    pub document: &'a Document,
}

/// Outcome of the retrieval stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval<'a> {
    /// The document collection was empty; nothing was scored.
    NoContext,
    /// Documents exist but none shares a token with the query.
    NoRelevantMatch,
    /// Best-scoring documents, highest first, at most `top_k` of them.
    Ranked(Vec<ScoredCandidate<'a>>),
}

/// Score each document against `query`, preserving input order.
pub fn score_documents<'a>(query: &str, docs: &'a [Document]) -> Vec<ScoredCandidate<'a>> {
    let query_counts = TermCounts::from_text(query);
    docs.iter()
        .map(|document| ScoredCandidate {
            score: overlap_score(&query_counts, &TermCounts::from_text(&document.content)),
            document,
        })
        .collect()
}

/// Keep positive scores, order by score descending (stable), cap at `top_k`.
pub fn rank(mut candidates: Vec<ScoredCandidate<'_>>, top_k: usize) -> Vec<ScoredCandidate<'_>> {
    candidates.retain(|c| c.score > 0);
    // `sort_by` is stable, which is what gives equal scores their input order.
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates.truncate(top_k);
    candidates
}

/// Run the full retrieval stage for one query.
pub fn retrieve<'a>(query: &str, docs: &'a [Document], top_k: usize) -> Retrieval<'a> {
    if docs.is_empty() {
        return Retrieval::NoContext;
    }

    let ranked = rank(score_documents(query, docs), top_k);
    if ranked.is_empty() {
        Retrieval::NoRelevantMatch
    } else {
        Retrieval::Ranked(ranked)
    }
}
