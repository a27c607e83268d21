//! Sentence-window snippet extraction.
//!
//! Given a document and the query's tokens, find the first query token (in
//! query order) that occurs anywhere in the content, case-insensitively and
//! as a plain substring, then cut out the sentence around it:
//!
//! - start: just after the last `.` before the match, or the document start
//! - end: the first `.` at or after the match, or `window_chars` characters
//!   past the match start (clamped to the document length) if there is none
//!
//! The slice is whitespace-trimmed. Substring matching means a token can hit
//! inside a longer word (`"to"` in `"tomcat"`), and a document that scored
//! through tokenization may still produce no snippet.

/// Extract the sentence around the first matching query token.
///
/// Returns `None` when no token occurs in `content`.
pub fn extract_snippet(content: &str, query_tokens: &[String], window_chars: usize) -> Option<String> {
    // ASCII folding keeps byte offsets identical to `content`; tokens are ASCII.
    let haystack = content.to_ascii_lowercase();

    let idx = query_tokens
        .iter()
        .filter(|t| !t.is_empty())
        .find_map(|t| haystack.find(t.as_str()))?;

    let start = haystack[..idx].rfind('.').map(|p| p + 1).unwrap_or(0);
    let end = match haystack[idx..].find('.') {
        Some(p) => idx + p,
        None => content[idx..]
            .char_indices()
            .nth(window_chars)
            .map(|(p, _)| idx + p)
            .unwrap_or(content.len()),
    };
    let start = start.min(end);

    Some(content[start..end].trim().to_string())
}
