//! Token-overlap scoring.
//!
//! The score between a query and a document is the cardinality of the
//! multiset intersection of their tokens: for every token both sides
//! contain, add the smaller of the two occurrence counts. Documents that
//! repeat query terms score higher; word order and position are ignored.

use std::collections::HashMap;

use crate::tokenize::tokenize;

/// Token → occurrence count for one text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermCounts {
    counts: HashMap<String, usize>,
}

impl TermCounts {
    /// Tokenize `text` and count each token.
    pub fn from_text(text: &str) -> Self {
        Self::from_tokens(tokenize(text))
    }

    pub fn from_tokens<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut counts = HashMap::new();
        for token in tokens {
            *counts.entry(token).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn get(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }
}

/// Multiset intersection cardinality of two token counts.
pub fn overlap_score(query: &TermCounts, doc: &TermCounts) -> usize {
    // Iterate the smaller map.
    let (small, large) = if query.len() <= doc.len() {
        (query, doc)
    } else {
        (doc, query)
    };
    small
        .counts
        .iter()
        .map(|(token, &n)| n.min(large.get(token)))
        .sum()
}
