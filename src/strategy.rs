//! Search strategy model: shared types, the template catalog, and the
//! profile-driven generator.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod generator;

/// How tightly a strategy's phrasing is expected to pin down the film.
///
/// Drives the year-range width applied to catalog requests; ordering is by
/// severity (`high` first) when breaking execution-order ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy families a profile can enable or disable wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyCategory {
    Title,
    Creator,
    Production,
    Star,
    Contextual,
    Labor,
}

impl StrategyCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Creator => "creator",
            Self::Production => "production",
            Self::Star => "star",
            Self::Contextual => "contextual",
            Self::Labor => "labor",
        }
    }
}

impl fmt::Display for StrategyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Up to three ordered keyword slots, fixed per strategy type at generation
/// time. The catalog request is built from these slots directly; the
/// human-readable query string is never re-parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordSlots {
    pub keyword: String,
    pub second: Option<String>,
    pub third: Option<String>,
}

impl KeywordSlots {
    #[must_use]
    pub fn single(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            second: None,
            third: None,
        }
    }

    #[must_use]
    pub fn pair(keyword: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            second: Some(second.into()),
            third: None,
        }
    }

    #[must_use]
    pub fn triple(
        keyword: impl Into<String>,
        second: impl Into<String>,
        third: impl Into<String>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            second: Some(second.into()),
            third: Some(third.into()),
        }
    }

    /// Slots joined for logging and dedup.
    #[must_use]
    pub fn joined(&self) -> String {
        let mut query = self.keyword.clone();
        for slot in [&self.second, &self.third].into_iter().flatten() {
            query.push(' ');
            query.push_str(slot);
        }
        query
    }
}

/// One generated, weighted query variant for a film.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Strategy {
    /// Globally unique template id, e.g. `exact_title`.
    pub kind: &'static str,
    pub category: StrategyCategory,
    pub tier: ConfidenceTier,
    /// Profile override when present, template default otherwise.
    pub profile_weight: f32,
    pub slots: KeywordSlots,
    /// Slots joined for logging and dedup.
    pub query: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_severity_orders_high_first() {
        assert!(ConfidenceTier::High.severity() < ConfidenceTier::Medium.severity());
        assert!(ConfidenceTier::Medium.severity() < ConfidenceTier::Low.severity());
    }

    #[test]
    fn slots_join_in_order() {
        let slots = KeywordSlots::triple("Baum", "director", "The Wizard of Oz");
        assert_eq!(slots.joined(), "Baum director The Wizard of Oz");
        assert_eq!(KeywordSlots::single("\"Oz\"").joined(), "\"Oz\"");
    }

    #[test]
    fn tier_serializes_lowercase() {
        let yaml = serde_yaml::to_string(&ConfidenceTier::High).expect("serialize");
        assert_eq!(yaml.trim(), "high");
    }
}
