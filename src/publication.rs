//! Maps catalog item identifiers to canonical publication names.
//!
//! Scanned trade-paper volumes carry their masthead in the identifier prefix
//! (`variety137-1939-08_0054`), so classification is an ordered first-match
//! scan over anchored patterns.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One (canonical name, identifier pattern) pair from a research profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationPattern {
    pub name: String,
    pub pattern: String,
}

impl PublicationPattern {
    #[must_use]
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid identifier pattern for publication {name}")]
pub struct PatternError {
    pub name: String,
    #[source]
    source: regex::Error,
}

/// Compiled, ordered classifier. Pure function of the identifier string.
///
/// Entry order is significant: narrow masthead variants must precede the
/// broad catch-alls that share their prefix, and the first match wins.
#[derive(Debug)]
pub struct PublicationClassifier {
    entries: Vec<(String, Regex)>,
}

impl PublicationClassifier {
    /// Compile profile patterns in their declared order.
    ///
    /// # Errors
    /// Returns [`PatternError`] naming the offending publication when a
    /// pattern does not compile.
    pub fn compile(patterns: &[PublicationPattern]) -> Result<Self, PatternError> {
        let mut entries = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let regex = RegexBuilder::new(&pattern.pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| PatternError {
                    name: pattern.name.clone(),
                    source,
                })?;
            entries.push((pattern.name.clone(), regex));
        }
        Ok(Self { entries })
    }

    /// Canonical publication for an item identifier, or `None` when no
    /// pattern matches.
    #[must_use]
    pub fn classify(&self, item_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, regex)| regex.is_match(item_id))
            .map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Built-in masthead patterns for the default profile, narrow before broad.
#[must_use]
pub fn default_patterns() -> Vec<PublicationPattern> {
    [
        ("variety", "^variety"),
        ("film daily", "^filmdail"),
        ("hollywood reporter", "^hollywoodreport"),
        ("motion picture daily", "^motionpicturedai"),
        ("motion picture herald", "^motionpictureher"),
        ("motion picture news", "^motionpicturenew"),
        ("moving picture world", "^movingpicturewor"),
        ("exhibitors herald", "^exhibitorsherald"),
        ("photoplay", "^photoplay"),
        ("boxoffice", "^boxoffice"),
        ("modern screen", "^modernscreen"),
        ("screenland", "^screenland"),
        // Broad catch-all for remaining motionpicture* scans. Must stay
        // after the specific motionpicture mastheads above.
        ("motion picture magazine", "^motionpicture"),
    ]
    .into_iter()
    .map(|(name, pattern)| PublicationPattern::new(name, pattern))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> PublicationClassifier {
        PublicationClassifier::compile(&default_patterns()).expect("default patterns compile")
    }

    #[test]
    fn classify_reads_masthead_prefix() {
        let classifier = classifier();
        assert_eq!(
            classifier.classify("variety137-1939-08_0054"),
            Some("variety")
        );
        assert_eq!(
            classifier.classify("filmdaily78-1939-10_0012"),
            Some("film daily")
        );
    }

    #[test]
    fn classify_is_deterministic() {
        let classifier = classifier();
        let first = classifier.classify("photoplay53-1939_0200");
        let second = classifier.classify("photoplay53-1939_0200");
        assert_eq!(first, second);
        assert_eq!(first, Some("photoplay"));
    }

    #[test]
    fn specific_masthead_wins_over_shared_prefix_catchall() {
        let classifier = classifier();
        assert_eq!(
            classifier.classify("motionpictureher135-1939_0417"),
            Some("motion picture herald")
        );
        assert_eq!(
            classifier.classify("motionpicture57-1939_0088"),
            Some("motion picture magazine")
        );
    }

    #[test]
    fn unknown_identifier_is_unclassified() {
        assert_eq!(classifier().classify("harrisonsreports21-1939_0003"), None);
    }

    #[test]
    fn compile_names_offending_publication() {
        let patterns = vec![PublicationPattern::new("broken", "^[unclosed")];
        let error = PublicationClassifier::compile(&patterns).expect_err("bad pattern");
        assert_eq!(error.name, "broken");
    }

    #[test]
    fn classify_ignores_identifier_case() {
        assert_eq!(
            classifier().classify("Variety137-1939-08_0054"),
            Some("variety")
        );
    }
}
