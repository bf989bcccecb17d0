//! Keyword extraction for related-issue search.

use std::collections::HashSet;

/// Default number of keywords kept by [`extract_keywords`].
pub const DEFAULT_MAX_KEYWORDS: usize = 5;

/// Tokens shorter than this (in characters) are dropped.
const MIN_KEYWORD_LEN: usize = 3;

/// Filler words and generic task verbs that say nothing about what an issue is about.
const STOP_WORDS: &[&str] = &[
	"the", "and", "but", "for", "with", "from", "about", "into", "through", "during", "are", "was", "were", "been", "being", "have", "has", "had", "does", "did", "will", "would",
	"should", "could", "may", "might", "must", "can", "this", "that", "these", "those", "then", "than", "when", "where", "which", "while", "also", "not", "all", "any", "some",
	"our", "its", "via", "per", "add", "create", "implement", "fix", "update", "remove", "delete", "support", "make", "use", "need", "needs", "new",
];

/// Extract up to `max_keywords` salient, lower-cased keywords from `text`.
///
/// Tokens are split on every non-alphanumeric character. Stop words and short tokens are dropped,
/// duplicates keep their first position.
pub fn extract_keywords(text: &str, max_keywords: usize) -> Vec<String> {
	let lowered = text.to_lowercase();
	let mut seen = HashSet::new();
	lowered
		.split(|c: char| !c.is_alphanumeric())
		.filter(|token| token.chars().count() >= MIN_KEYWORD_LEN)
		.filter(|token| !STOP_WORDS.contains(token))
		.filter(|token| seen.insert(*token))
		.take(max_keywords)
		.map(str::to_string)
		.collect()
}
