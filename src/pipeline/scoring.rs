//! Position scoring and final ranking.
//!
//! Rank is 1-based discovery order across the whole accumulated list, not a
//! relevance signal from the catalog. Because discovery order follows
//! strategy execution order, the final score partially encodes strategy
//! priority; that conflation is intentional and downstream reports rely on
//! it.

use serde::Serialize;

use crate::profile::Profile;
use crate::publication::PublicationClassifier;

use super::session::RawResult;

/// A result with its discovery rank, score components, and final score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
    #[serde(flatten)]
    pub result: RawResult,
    pub discovery_rank: usize,
    pub position_score: f32,
    pub publication: Option<String>,
    pub publication_weight: f32,
    pub final_score: f32,
}

/// Score for a 1-based discovery rank. Steps down in coarse bands: the
/// first five discoveries carry most of the weight, everything past rank
/// 20 decays linearly to a floor of 10.
#[must_use]
pub fn position_score(rank: usize) -> f32 {
    let rank = rank.max(1) as i64;
    let score = match rank {
        1..=5 => 100 - (rank - 1) * 5,
        6..=10 => 75 - (rank - 6) * 5,
        11..=20 => 50 - (rank - 11) * 2,
        _ => (30 - (rank - 21)).max(10),
    };
    score as f32
}

/// Score and rank an accumulated result list.
///
/// The sort is stable and descending by final score, so equal scores keep
/// their discovery order.
#[must_use]
pub fn rank_results(
    accumulated: Vec<RawResult>,
    classifier: &PublicationClassifier,
    profile: &Profile,
) -> Vec<ScoredResult> {
    let mut scored: Vec<ScoredResult> = accumulated
        .into_iter()
        .enumerate()
        .map(|(index, result)| {
            let discovery_rank = index + 1;
            let position = position_score(discovery_rank);
            let publication = classifier.classify(&result.item.id).map(str::to_string);
            let publication_weight = publication
                .as_deref()
                .map_or(1.0, |name| profile.publication_weight(name));
            ScoredResult {
                result,
                discovery_rank,
                position_score: position,
                publication,
                publication_weight,
                final_score: position * publication_weight,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    scored
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::client::CatalogItem;
    use crate::publication;
    use crate::strategy::ConfidenceTier;

    use super::*;

    fn raw(id: &str) -> RawResult {
        RawResult {
            item: CatalogItem {
                id: id.to_string(),
                title: None,
                year: None,
                read_url: None,
            },
            found_by: "exact_title".to_string(),
            confidence_tier: ConfidenceTier::High,
            search_query: "\"The Wizard of Oz\"".to_string(),
        }
    }

    fn classifier() -> PublicationClassifier {
        PublicationClassifier::compile(&publication::default_patterns()).expect("patterns compile")
    }

    #[rstest]
    #[case(1, 100.0)]
    #[case(2, 95.0)]
    #[case(5, 80.0)]
    #[case(6, 75.0)]
    #[case(10, 55.0)]
    #[case(11, 50.0)]
    #[case(20, 32.0)]
    #[case(21, 30.0)]
    #[case(25, 26.0)]
    #[case(41, 10.0)]
    #[case(500, 10.0)]
    fn position_score_band_boundaries(#[case] rank: usize, #[case] expected: f32) {
        assert!((position_score(rank) - expected).abs() < f32::EPSILON);
    }

    #[test]
    fn position_score_never_increases_with_rank() {
        for rank in 1..200 {
            assert!(
                position_score(rank) >= position_score(rank + 1),
                "rank {rank} scored below rank {}",
                rank + 1
            );
        }
    }

    #[test]
    fn publication_weight_multiplies_position_score() {
        let profile = Profile::built_in();
        let scored = rank_results(
            vec![raw("variety137-1939-08_0054")],
            &classifier(),
            &profile,
        );

        assert_eq!(scored[0].publication.as_deref(), Some("variety"));
        assert!((scored[0].position_score - 100.0).abs() < f32::EPSILON);
        assert!((scored[0].final_score - 140.0).abs() < 0.01);
    }

    #[test]
    fn unclassified_results_weigh_one() {
        let profile = Profile::built_in();
        let scored = rank_results(vec![raw("unknownjournal-1939_0001")], &classifier(), &profile);

        assert_eq!(scored[0].publication, None);
        assert!((scored[0].publication_weight - 1.0).abs() < f32::EPSILON);
        assert!((scored[0].final_score - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn ranking_reorders_by_final_score() {
        // A weighted masthead at rank 2 overtakes an unclassified rank 1.
        let profile = Profile::built_in();
        let scored = rank_results(
            vec![raw("unknownjournal-1939_0001"), raw("variety137-1939-08_0054")],
            &classifier(),
            &profile,
        );

        assert_eq!(scored[0].result.item.id, "variety137-1939-08_0054");
        assert_eq!(scored[0].discovery_rank, 2);
        assert_eq!(scored[1].discovery_rank, 1);
    }

    #[test]
    fn equal_scores_preserve_discovery_order() {
        let profile = Profile::built_in();
        // Ranks 21 and beyond share scores once the floor is reached; use
        // two unclassified items with identical weights at equal scores.
        let accumulated: Vec<RawResult> = (0..45).map(|i| raw(&format!("plain{i}"))).collect();
        let scored = rank_results(accumulated, &classifier(), &profile);

        let floor: Vec<&ScoredResult> = scored
            .iter()
            .filter(|s| (s.final_score - 10.0).abs() < f32::EPSILON)
            .collect();
        assert!(floor.len() >= 2);
        for pair in floor.windows(2) {
            assert!(pair[0].discovery_rank < pair[1].discovery_rank);
        }
    }
}
