//! The per-film search pipeline and the batch loop that drives it.
//!
//! One film flows one way: profile + film -> ordered strategy list ->
//! executor loop (paced, stop-checked) -> dedup session -> scoring ->
//! ranked report. No state crosses film boundaries.

use tracing::info;

pub mod batch;
pub mod executor;
pub mod orchestrator;
pub mod persist;
pub mod scoring;
pub mod session;
pub mod stop;

/// Hook invoked after each strategy execution and each completed film.
pub trait ProgressObserver: Send + Sync {
    fn strategy_executed(
        &self,
        _film_title: &str,
        _strategy_kind: &str,
        _new_results: usize,
        _accumulated: usize,
    ) {
    }

    fn film_completed(&self, _film_title: &str, _index: usize, _total: usize) {}
}

/// Observer that does nothing. Default for library callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}

/// Observer that reports progress through tracing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn strategy_executed(
        &self,
        film_title: &str,
        strategy_kind: &str,
        new_results: usize,
        accumulated: usize,
    ) {
        info!(
            film = %film_title,
            strategy = strategy_kind,
            new_results,
            accumulated,
            "strategy executed"
        );
    }

    fn film_completed(&self, film_title: &str, index: usize, total: usize) {
        info!(film = %film_title, index, total, "film completed");
    }
}
