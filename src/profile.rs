//! Research profiles: the user-selected weighting and filtering values that
//! shape a session, plus the YAML-backed store they load from.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::publication::{self, PublicationClassifier, PublicationPattern};
use crate::strategy::{ConfidenceTier, StrategyCategory};

/// Year window applied around a film's release year, per confidence tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub before: i32,
    pub after: i32,
}

/// Search-loop halting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopConditions {
    pub max_results_per_film: usize,
    pub high_quality_threshold: usize,
}

impl Default for StopConditions {
    fn default() -> Self {
        Self {
            max_results_per_film: 150,
            high_quality_threshold: 60,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("unknown profile: {0}")]
    NotFound(String),
    #[error("failed to read profile {key} from {path}")]
    Io {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse profile {key}")]
    Parse {
        key: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("profile {key} is invalid: {reason}")]
    Invalid { key: String, reason: String },
}

/// Immutable for the duration of one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    key: String,
    name: String,
    #[serde(default)]
    description: String,
    /// Missing categories fall back to enabled, except labor which is
    /// opt-in.
    #[serde(default)]
    categories: HashMap<StrategyCategory, bool>,
    /// Per-type weight overrides; 0 excludes the type, absence means the
    /// template default.
    #[serde(default)]
    strategy_weights: HashMap<String, f32>,
    #[serde(default)]
    date_ranges: HashMap<ConfidenceTier, YearRange>,
    #[serde(default)]
    publication_weights: HashMap<String, f32>,
    #[serde(default)]
    publication_patterns: Vec<PublicationPattern>,
    #[serde(default)]
    stop_conditions: StopConditions,
}

impl Profile {
    /// The embedded default profile: every non-labor family enabled,
    /// template weights untouched, trade-paper weighting favoring the
    /// majors.
    #[must_use]
    pub fn built_in() -> Self {
        Self {
            key: "default".to_string(),
            name: "Default research profile".to_string(),
            description: "Balanced coverage across title, creator, production, and star phrasings"
                .to_string(),
            categories: HashMap::from([
                (StrategyCategory::Title, true),
                (StrategyCategory::Creator, true),
                (StrategyCategory::Production, true),
                (StrategyCategory::Star, true),
                (StrategyCategory::Contextual, true),
                (StrategyCategory::Labor, false),
            ]),
            strategy_weights: HashMap::new(),
            date_ranges: HashMap::from([
                (ConfidenceTier::High, YearRange { before: 1, after: 1 }),
                (ConfidenceTier::Medium, YearRange { before: 2, after: 3 }),
                (ConfidenceTier::Low, YearRange { before: 3, after: 5 }),
            ]),
            publication_weights: HashMap::from([
                ("variety".to_string(), 1.4),
                ("motion picture herald".to_string(), 1.25),
                ("film daily".to_string(), 1.15),
                ("hollywood reporter".to_string(), 1.1),
                ("motion picture daily".to_string(), 1.0),
                ("photoplay".to_string(), 0.85),
                ("modern screen".to_string(), 0.7),
            ]),
            publication_patterns: publication::default_patterns(),
            stop_conditions: StopConditions::default(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether a strategy family participates in generation.
    #[must_use]
    pub fn category_enabled(&self, category: StrategyCategory) -> bool {
        self.categories
            .get(&category)
            .copied()
            .unwrap_or(category != StrategyCategory::Labor)
    }

    /// Explicit per-type weight override, if the profile carries one.
    #[must_use]
    pub fn strategy_weight(&self, kind: &str) -> Option<f32> {
        self.strategy_weights.get(kind).copied()
    }

    #[must_use]
    pub fn date_range(&self, tier: ConfidenceTier) -> Option<YearRange> {
        self.date_ranges.get(&tier).copied()
    }

    /// Weight multiplier for a classified publication; unlisted and
    /// unclassified publications weigh 1.0.
    #[must_use]
    pub fn publication_weight(&self, publication: &str) -> f32 {
        self.publication_weights
            .get(publication)
            .copied()
            .unwrap_or(1.0)
    }

    #[must_use]
    pub fn publication_patterns(&self) -> &[PublicationPattern] {
        &self.publication_patterns
    }

    #[must_use]
    pub fn stop_conditions(&self) -> StopConditions {
        self.stop_conditions
    }

    pub fn set_category(&mut self, category: StrategyCategory, enabled: bool) {
        self.categories.insert(category, enabled);
    }

    pub fn set_strategy_weight(&mut self, kind: impl Into<String>, weight: f32) {
        self.strategy_weights.insert(kind.into(), weight);
    }

    pub fn set_stop_conditions(&mut self, stop_conditions: StopConditions) {
        self.stop_conditions = stop_conditions;
    }

    /// Check the profile before any network call.
    ///
    /// # Errors
    /// Returns [`ProfileError::Invalid`] naming this profile's key when the
    /// publication pattern list is empty or malformed, a weight is
    /// negative, or a stop threshold is zero.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let invalid = |reason: String| ProfileError::Invalid {
            key: self.key.clone(),
            reason,
        };

        if self.publication_patterns.is_empty() {
            return Err(invalid(
                "publication_patterns: at least one pattern is required".to_string(),
            ));
        }
        PublicationClassifier::compile(&self.publication_patterns)
            .map_err(|error| invalid(format!("publication_patterns: {error}")))?;

        if let Some((kind, weight)) = self
            .strategy_weights
            .iter()
            .find(|(_, weight)| !weight.is_finite() || **weight < 0.0)
        {
            return Err(invalid(format!(
                "strategy_weights.{kind}: weight {weight} must be a non-negative number"
            )));
        }
        if let Some((publication, weight)) = self
            .publication_weights
            .iter()
            .find(|(_, weight)| !weight.is_finite() || **weight < 0.0)
        {
            return Err(invalid(format!(
                "publication_weights.{publication}: weight {weight} must be a non-negative number"
            )));
        }
        if let Some((tier, range)) = self
            .date_ranges
            .iter()
            .find(|(_, range)| range.before < 0 || range.after < 0)
        {
            return Err(invalid(format!(
                "date_ranges.{tier}: before/after must not be negative ({}, {})",
                range.before, range.after
            )));
        }
        if self.stop_conditions.max_results_per_film == 0 {
            return Err(invalid(
                "stop_conditions.max_results_per_film: must be greater than zero".to_string(),
            ));
        }
        if self.stop_conditions.high_quality_threshold == 0 {
            return Err(invalid(
                "stop_conditions.high_quality_threshold: must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Key, name, and description row for profile listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub key: String,
    pub name: String,
    pub description: String,
}

/// Loads profiles from an optional directory of YAML documents; the
/// embedded default is always available under the key `default`.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    dir: Option<PathBuf>,
}

impl ProfileStore {
    #[must_use]
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// Load one profile by key.
    ///
    /// # Errors
    /// Returns [`ProfileError`] when the key is unknown or the document
    /// cannot be read or parsed.
    pub fn load(&self, key: &str) -> Result<Profile, ProfileError> {
        if key == "default" {
            return Ok(Profile::built_in());
        }
        let Some(dir) = &self.dir else {
            return Err(ProfileError::NotFound(key.to_string()));
        };
        let path = ["yaml", "yml"]
            .iter()
            .map(|ext| dir.join(format!("{key}.{ext}")))
            .find(|candidate| candidate.exists())
            .ok_or_else(|| ProfileError::NotFound(key.to_string()))?;
        let raw = fs::read_to_string(&path).map_err(|source| ProfileError::Io {
            key: key.to_string(),
            path: path.clone(),
            source,
        })?;
        let mut profile: Profile =
            serde_yaml::from_str(&raw).map_err(|source| ProfileError::Parse {
                key: key.to_string(),
                source,
            })?;
        // The filename is authoritative for the key.
        profile.key = key.to_string();
        Ok(profile)
    }

    /// All available profiles: the embedded default plus every parseable
    /// YAML document in the profile directory.
    #[must_use]
    pub fn list(&self) -> Vec<ProfileSummary> {
        let mut summaries = vec![summary_of(&Profile::built_in())];
        let Some(dir) = &self.dir else {
            return summaries;
        };
        let Ok(entries) = fs::read_dir(dir) else {
            warn!(dir = %dir.display(), "profile directory is not readable");
            return summaries;
        };
        let mut keys: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let path = entry.path();
                let extension = path.extension()?.to_str()?;
                if !matches!(extension, "yaml" | "yml") {
                    return None;
                }
                Some(path.file_stem()?.to_str()?.to_string())
            })
            .collect();
        keys.sort_unstable();
        for key in keys {
            match self.load(&key) {
                Ok(profile) => summaries.push(summary_of(&profile)),
                Err(error) => {
                    warn!(profile = %key, error = %error, "skipping unloadable profile");
                }
            }
        }
        summaries
    }
}

fn summary_of(profile: &Profile) -> ProfileSummary {
    ProfileSummary {
        key: profile.key.clone(),
        name: profile.name.clone(),
        description: profile.description.clone(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const LABOR_PROFILE: &str = r#"
key: labor
name: Labor actions
description: Strike and boycott coverage around a production
categories:
  labor: true
  star: false
strategy_weights:
  title_picketed: 1.8
  studio_strike_action: 1.2
date_ranges:
  high: { before: 1, after: 2 }
publication_weights:
  variety: 1.5
publication_patterns:
  - { name: variety, pattern: "^variety" }
stop_conditions:
  max_results_per_film: 80
  high_quality_threshold: 40
"#;

    #[test]
    fn built_in_profile_is_valid() {
        Profile::built_in().validate().expect("default is valid");
    }

    #[test]
    fn built_in_enables_everything_but_labor() {
        let profile = Profile::built_in();
        assert!(profile.category_enabled(StrategyCategory::Title));
        assert!(profile.category_enabled(StrategyCategory::Contextual));
        assert!(!profile.category_enabled(StrategyCategory::Labor));
    }

    #[test]
    fn missing_category_defaults_depend_on_family() {
        let profile: Profile = serde_yaml::from_str(
            "key: bare\nname: Bare\npublication_patterns:\n  - { name: variety, pattern: \"^variety\" }\n",
        )
        .expect("parse minimal profile");
        assert!(profile.category_enabled(StrategyCategory::Title));
        assert!(!profile.category_enabled(StrategyCategory::Labor));
    }

    #[test]
    fn yaml_profile_round_trips() {
        let profile: Profile = serde_yaml::from_str(LABOR_PROFILE).expect("parse labor profile");
        assert_eq!(profile.key(), "labor");
        assert!(profile.category_enabled(StrategyCategory::Labor));
        assert!(!profile.category_enabled(StrategyCategory::Star));
        assert_eq!(profile.strategy_weight("title_picketed"), Some(1.8));
        assert_eq!(
            profile.date_range(ConfidenceTier::High),
            Some(YearRange { before: 1, after: 2 })
        );
        assert_eq!(profile.date_range(ConfidenceTier::Low), None);
        assert_eq!(profile.stop_conditions().max_results_per_film, 80);
        profile.validate().expect("labor profile is valid");
    }

    #[test]
    fn unlisted_publication_weighs_one() {
        let profile = Profile::built_in();
        assert!((profile.publication_weight("screenland") - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn validate_requires_publication_patterns() {
        let mut profile = Profile::built_in();
        profile.publication_patterns.clear();

        let error = profile.validate().expect_err("empty patterns rejected");

        assert!(matches!(error, ProfileError::Invalid { ref key, .. } if key == "default"));
        assert!(error.to_string().contains("publication_patterns"));
    }

    #[test]
    fn validate_rejects_negative_weight() {
        let mut profile = Profile::built_in();
        profile.set_strategy_weight("exact_title", -1.0);

        let error = profile.validate().expect_err("negative weight rejected");

        assert!(error.to_string().contains("exact_title"));
    }

    #[test]
    fn validate_rejects_zero_stop_threshold() {
        let mut profile = Profile::built_in();
        profile.set_stop_conditions(StopConditions {
            max_results_per_film: 0,
            high_quality_threshold: 40,
        });

        let error = profile.validate().expect_err("zero cap rejected");

        assert!(error.to_string().contains("max_results_per_film"));
    }

    #[test]
    fn store_loads_from_directory_and_lists_profiles() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut file = fs::File::create(dir.path().join("labor.yaml")).expect("create profile");
        file.write_all(LABOR_PROFILE.as_bytes()).expect("write profile");

        let store = ProfileStore::new(Some(dir.path().to_path_buf()));

        let profile = store.load("labor").expect("labor profile loads");
        assert_eq!(profile.key(), "labor");
        assert_eq!(profile.name(), "Labor actions");

        let listed: Vec<String> = store.list().into_iter().map(|s| s.key).collect();
        assert_eq!(listed, vec!["default".to_string(), "labor".to_string()]);
    }

    #[test]
    fn store_reports_unknown_key() {
        let store = ProfileStore::new(None);
        let error = store.load("missing").expect_err("unknown key fails");
        assert!(matches!(error, ProfileError::NotFound(ref key) if key == "missing"));
    }
}
