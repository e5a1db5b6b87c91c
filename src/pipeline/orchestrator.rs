//! Drives one film end-to-end: generate, order, execute, score.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::film::FilmRecord;
use crate::profile::Profile;
use crate::publication::PublicationClassifier;
use crate::strategy::{generator, Strategy};
use crate::util::cancel::CancelFlag;
use crate::util::pace::Pacer;

use super::executor::SearchExecutor;
use super::scoring::{self, ScoredResult};
use super::session::DedupSession;
use super::stop::{StopConditionController, StopReason};
use super::ProgressObserver;

/// Why a session ended before exhausting its strategy list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionHalt {
    Stopped(StopReason),
    Cancelled,
}

/// Everything one film's search run produced.
#[derive(Debug)]
pub struct SessionOutcome {
    pub film: FilmRecord,
    /// Ranked results, final score descending.
    pub sources: Vec<ScoredResult>,
    /// Unique items per first-discovering strategy type.
    pub strategy_summary: BTreeMap<String, usize>,
    pub strategies_generated: usize,
    pub strategies_executed: usize,
    pub halted: Option<SessionHalt>,
}

pub struct SessionOrchestrator {
    executor: SearchExecutor,
    pacer: Arc<dyn Pacer>,
    observer: Arc<dyn ProgressObserver>,
    cancel: CancelFlag,
    max_strategies: Option<usize>,
}

impl SessionOrchestrator {
    #[must_use]
    pub fn new(
        executor: SearchExecutor,
        pacer: Arc<dyn Pacer>,
        observer: Arc<dyn ProgressObserver>,
        cancel: CancelFlag,
    ) -> Self {
        Self {
            executor,
            pacer,
            observer,
            cancel,
            max_strategies: None,
        }
    }

    /// Cap the number of strategies executed per film, applied after
    /// ordering so the highest-priority strategies survive.
    #[must_use]
    pub fn with_max_strategies(mut self, max_strategies: Option<usize>) -> Self {
        self.max_strategies = max_strategies;
        self
    }

    /// Execution order: profile weight descending, confidence severity
    /// ascending on ties. The sort is stable, so catalog order breaks the
    /// remaining ties.
    pub fn order_for_execution(strategies: &mut [Strategy]) {
        strategies.sort_by(|a, b| {
            b.profile_weight
                .total_cmp(&a.profile_weight)
                .then_with(|| a.tier.severity().cmp(&b.tier.severity()))
        });
    }

    /// Run one film's search session against a validated profile.
    ///
    /// # Errors
    /// Fails only on a broken publication pattern set; per-strategy search
    /// failures are absorbed by the executor.
    pub async fn run_session(
        &self,
        film: &FilmRecord,
        profile: &Profile,
    ) -> Result<SessionOutcome> {
        let classifier = PublicationClassifier::compile(profile.publication_patterns())
            .context("profile publication patterns rejected")?;

        let mut strategies = generator::generate(film, profile);
        let strategies_generated = strategies.len();
        Self::order_for_execution(&mut strategies);
        if let Some(cap) = self.max_strategies {
            strategies.truncate(cap);
        }

        info!(
            film = %film.title,
            strategies = strategies.len(),
            generated = strategies_generated,
            "session started"
        );

        let stop = StopConditionController::new(profile.stop_conditions());
        let mut session = DedupSession::new();
        let mut strategies_executed = 0;
        let mut halted = None;
        let planned = strategies.len();

        for (index, strategy) in strategies.iter().enumerate() {
            if self.cancel.is_requested() {
                info!(film = %film.title, "stop requested, returning partial results");
                halted = Some(SessionHalt::Cancelled);
                break;
            }

            let items = self.executor.execute(strategy, film, profile).await;
            let added = session.merge(items, strategy);
            strategies_executed += 1;
            self.observer.strategy_executed(
                &film.title,
                strategy.kind,
                added,
                session.unique_count(),
            );

            if let Some(reason) = stop.evaluate(session.unique_count(), strategy.profile_weight) {
                debug!(
                    film = %film.title,
                    reason = ?reason,
                    accumulated = session.unique_count(),
                    "halting search loop"
                );
                halted = Some(SessionHalt::Stopped(reason));
                break;
            }

            if index + 1 < planned {
                self.pacer.pause().await;
            }
        }

        let strategy_summary = session.strategy_summary();
        let sources = scoring::rank_results(session.into_accumulated(), &classifier, profile);

        info!(
            film = %film.title,
            sources = sources.len(),
            strategies_executed,
            "session finished"
        );

        Ok(SessionOutcome {
            film: film.clone(),
            sources,
            strategy_summary,
            strategies_generated,
            strategies_executed,
            halted,
        })
    }
}
