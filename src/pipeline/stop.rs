//! Early-halt checks evaluated after each executed strategy.

use crate::profile::StopConditions;

/// Why a film's search loop stopped before exhausting its strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The hard per-film result cap was reached.
    ResultCapReached,
    /// Enough coverage exists to stop spending catalog calls on
    /// low-priority strategies.
    CoverageSatisfied,
}

#[derive(Debug, Clone, Copy)]
pub struct StopConditionController {
    max_results_per_film: usize,
    high_quality_threshold: usize,
}

impl StopConditionController {
    #[must_use]
    pub fn new(conditions: StopConditions) -> Self {
        Self {
            max_results_per_film: conditions.max_results_per_film,
            high_quality_threshold: conditions.high_quality_threshold,
        }
    }

    /// Evaluate after a strategy finishes. `current_weight` is the weight
    /// of the strategy that just ran; the soft stop only fires once the
    /// loop has descended into sub-1.0 strategies.
    #[must_use]
    pub fn evaluate(&self, accumulated: usize, current_weight: f32) -> Option<StopReason> {
        if accumulated >= self.max_results_per_film {
            return Some(StopReason::ResultCapReached);
        }
        if current_weight < 1.0 && accumulated >= self.high_quality_threshold {
            return Some(StopReason::CoverageSatisfied);
        }
        None
    }
}
