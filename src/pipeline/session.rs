//! Per-film dedup session: the seen-identifier set and the accumulated
//! result list, in discovery order.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::client::CatalogItem;
use crate::strategy::{ConfidenceTier, Strategy};

/// A catalog item with the provenance it gained when first discovered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawResult {
    #[serde(flatten)]
    pub item: CatalogItem,
    /// Strategy type that first surfaced this item.
    pub found_by: String,
    pub confidence_tier: ConfidenceTier,
    pub search_query: String,
}

/// Owned by exactly one film's search run; created fresh and discarded
/// after scoring.
#[derive(Debug, Default)]
pub struct DedupSession {
    seen_ids: HashSet<String>,
    accumulated: Vec<RawResult>,
}

impl DedupSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one strategy's results, skipping identifiers already seen.
    /// Returns the number of newly accumulated items.
    pub fn merge(&mut self, items: Vec<CatalogItem>, strategy: &Strategy) -> usize {
        let mut added = 0;
        for item in items {
            if !self.seen_ids.insert(item.id.clone()) {
                continue;
            }
            self.accumulated.push(RawResult {
                item,
                found_by: strategy.kind.to_string(),
                confidence_tier: strategy.tier,
                search_query: strategy.query.clone(),
            });
            added += 1;
        }
        added
    }

    #[must_use]
    pub fn unique_count(&self) -> usize {
        self.accumulated.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accumulated.is_empty()
    }

    /// Items per first-discovering strategy type.
    #[must_use]
    pub fn strategy_summary(&self) -> BTreeMap<String, usize> {
        let mut summary = BTreeMap::new();
        for result in &self.accumulated {
            *summary.entry(result.found_by.clone()).or_insert(0) += 1;
        }
        summary
    }

    /// Consume the session, yielding results in discovery order.
    #[must_use]
    pub fn into_accumulated(self) -> Vec<RawResult> {
        self.accumulated
    }
}
