//! Profile-driven strategy generation.

use std::collections::HashSet;

use tracing::debug;

use crate::film::FilmRecord;
use crate::profile::Profile;
use crate::util::text;

use super::catalog;
use super::{Strategy, StrategyCategory};

/// Generate the deduplicated strategy list for one film under one profile.
///
/// A template is skipped when its condition fails, its category is disabled,
/// or its resolved weight is exactly zero. Labor templates additionally
/// require an explicit per-type weight in the profile; they never run on
/// defaults alone. Later strategies whose normalized query duplicates an
/// earlier one are dropped, keeping the first occurrence's metadata.
#[must_use]
pub fn generate(film: &FilmRecord, profile: &Profile) -> Vec<Strategy> {
    let mut seen_queries = HashSet::new();
    let mut strategies = Vec::new();

    for template in catalog::templates() {
        if !(template.condition)(film) {
            continue;
        }
        if !profile.category_enabled(template.category) {
            continue;
        }
        let override_weight = profile.strategy_weight(template.kind);
        if template.category == StrategyCategory::Labor && override_weight.is_none() {
            continue;
        }
        let weight = override_weight.unwrap_or(template.default_weight);
        if weight == 0.0 {
            continue;
        }
        let Some(generated) = (template.generate)(film) else {
            continue;
        };

        let query = generated.slots.joined();
        if !seen_queries.insert(text::normalize_query(&query)) {
            debug!(
                strategy = template.kind,
                query = %query,
                "dropping duplicate query phrasing"
            );
            continue;
        }

        strategies.push(Strategy {
            kind: template.kind,
            category: template.category,
            tier: template.tier,
            profile_weight: weight,
            slots: generated.slots,
            query,
            description: generated.description,
        });
    }

    debug!(
        film = %film.title,
        strategies = strategies.len(),
        "strategy list generated"
    );
    strategies
}

#[cfg(test)]
mod tests {
    use crate::profile::Profile;
    use crate::strategy::ConfidenceTier;

    use super::*;

    fn oz() -> FilmRecord {
        FilmRecord {
            title: "The Wizard of Oz".to_string(),
            year: Some(1939),
            author: Some("L. Frank Baum".to_string()),
            director: Some("Victor Fleming".to_string()),
            studio: Some("Metro-Goldwyn-Mayer".to_string()),
            stars: vec!["Judy Garland".to_string(), "Frank Morgan".to_string()],
        }
    }

    fn kinds(strategies: &[Strategy]) -> Vec<&'static str> {
        strategies.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn generates_exact_title_at_high_confidence() {
        let strategies = generate(&oz(), &Profile::built_in());
        let exact = strategies
            .iter()
            .find(|s| s.kind == "exact_title")
            .expect("exact_title present");
        assert_eq!(exact.tier, ConfidenceTier::High);
        assert_eq!(exact.query, "\"The Wizard of Oz\"");
        assert!((exact.profile_weight - 2.5).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_weight_excludes_a_type() {
        let mut profile = Profile::built_in();
        profile.set_strategy_weight("possessive_title", 0.0);

        let strategies = generate(&oz(), &profile);

        assert!(!kinds(&strategies).contains(&"possessive_title"));
    }

    #[test]
    fn profile_override_replaces_default_weight() {
        let mut profile = Profile::built_in();
        profile.set_strategy_weight("title_exhibitor", 2.0);

        let strategies = generate(&oz(), &profile);
        let exhibitor = strategies
            .iter()
            .find(|s| s.kind == "title_exhibitor")
            .expect("title_exhibitor present");

        assert!((exhibitor.profile_weight - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn disabled_category_removes_its_family() {
        let mut profile = Profile::built_in();
        profile.set_category(StrategyCategory::Star, false);

        let strategies = generate(&oz(), &profile);

        assert!(
            strategies
                .iter()
                .all(|s| s.category != StrategyCategory::Star)
        );
    }

    #[test]
    fn labor_family_is_absent_by_default() {
        let strategies = generate(&oz(), &Profile::built_in());
        assert!(
            strategies
                .iter()
                .all(|s| s.category != StrategyCategory::Labor)
        );
    }

    #[test]
    fn labor_family_requires_explicit_weight_even_when_enabled() {
        let mut profile = Profile::built_in();
        profile.set_category(StrategyCategory::Labor, true);

        // Category enabled but no per-type weight: still absent.
        let strategies = generate(&oz(), &profile);
        assert!(!kinds(&strategies).contains(&"title_picketed"));

        profile.set_strategy_weight("title_picketed", 1.5);
        let strategies = generate(&oz(), &profile);
        assert!(kinds(&strategies).contains(&"title_picketed"));
        assert!(!kinds(&strategies).contains(&"title_walk_out"));
    }

    #[test]
    fn duplicate_phrasings_keep_first_occurrence() {
        // Author and director phrased identically produce one strategy.
        let film = FilmRecord {
            author: Some("Victor Fleming".to_string()),
            ..oz()
        };

        let strategies = generate(&film, &Profile::built_in());
        let duplicates: Vec<&Strategy> = strategies
            .iter()
            .filter(|s| s.query == "Victor Fleming The Wizard of Oz")
            .collect();

        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].kind, "author_title");
    }

    #[test]
    fn kinds_are_unique_in_generated_list() {
        let strategies = generate(&oz(), &Profile::built_in());
        let mut unique = kinds(&strategies);
        let total = unique.len();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), total);
    }

    #[test]
    fn title_only_film_generates_title_and_context_strategies() {
        let film = FilmRecord::titled("The Wizard of Oz");
        let strategies = generate(&film, &Profile::built_in());
        let kinds = kinds(&strategies);

        assert!(kinds.contains(&"exact_title"));
        assert!(kinds.contains(&"title_no_article"));
        assert!(kinds.contains(&"novel_adaptation"));
        assert!(!kinds.contains(&"author_title"));
        assert!(!kinds.contains(&"studio_title"));
    }
}
