//! Text helpers shared by strategy generation and result deduplication.

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Tokens ignored when picking the "significant" words of a title.
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "of", "and", "or", "in", "on", "at", "to", "for", "with",
];

/// Leading articles stripped by the article-less title variants.
const LEADING_ARTICLES: &[&str] = &["The ", "A ", "An "];

/// NFKC-fold, lowercase, and collapse whitespace.
///
/// Two queries that differ only in casing, trailing space, or compatibility
/// forms must hash identically for deduplication.
#[must_use]
pub fn normalize_query(raw: &str) -> String {
    raw.nfkc()
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[must_use]
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.iter().any(|stop| word.eq_ignore_ascii_case(stop))
}

/// The words of a title with stopwords removed, in original order and casing.
#[must_use]
pub fn significant_tokens(title: &str) -> Vec<&str> {
    title
        .unicode_words()
        .filter(|word| !is_stopword(word))
        .collect()
}

/// Strip one leading English article ("The ", "A ", "An "), if present.
#[must_use]
pub fn strip_leading_article(title: &str) -> Option<&str> {
    LEADING_ARTICLES.iter().find_map(|article| {
        title
            .strip_prefix(article)
            .map(str::trim_start)
            .filter(|rest| !rest.is_empty())
    })
}

/// Last word of a personal name ("L. Frank Baum" -> "Baum").
#[must_use]
pub fn last_name(name: &str) -> Option<&str> {
    name.unicode_words().last()
}

/// Longest significant word of a title, used as a single-keyword probe.
#[must_use]
pub fn extract_keyword(title: &str) -> Option<&str> {
    significant_tokens(title)
        .into_iter()
        .max_by_key(|word| word.len())
        .filter(|word| word.len() >= 4)
}
