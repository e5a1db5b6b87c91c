//! Iterates a film batch, checkpointing as it goes.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::film::FilmRecord;
use crate::profile::Profile;
use crate::util::cancel::CancelFlag;

use super::orchestrator::SessionOrchestrator;
use super::persist::{BatchSnapshot, CheckpointStore, FilmReport};
use super::ProgressObserver;

pub struct BatchController {
    orchestrator: SessionOrchestrator,
    store: Arc<dyn CheckpointStore>,
    observer: Arc<dyn ProgressObserver>,
    cancel: CancelFlag,
    /// Interim checkpoint cadence in films; 0 disables interim writes.
    checkpoint_interval: usize,
}

impl BatchController {
    #[must_use]
    pub fn new(
        orchestrator: SessionOrchestrator,
        store: Arc<dyn CheckpointStore>,
        observer: Arc<dyn ProgressObserver>,
        cancel: CancelFlag,
        checkpoint_interval: usize,
    ) -> Self {
        Self {
            orchestrator,
            store,
            observer,
            cancel,
            checkpoint_interval,
        }
    }

    /// Process up to `limit` films sequentially and persist the combined
    /// output. A cancellation request ends the batch after the current
    /// film; whatever completed is still persisted.
    ///
    /// # Errors
    /// Fails on an invalid profile, an empty batch, a broken profile
    /// pattern set, or a checkpoint write failure. Per-strategy search
    /// failures never abort the batch.
    pub async fn run(
        &self,
        films: &[FilmRecord],
        profile: &Profile,
        limit: Option<usize>,
    ) -> Result<Vec<FilmReport>> {
        if films.is_empty() {
            anyhow::bail!("film batch is empty");
        }
        profile.validate()?;

        let batch_id = Uuid::new_v4();
        let started_at = Utc::now();
        let cap = limit.unwrap_or(films.len()).min(films.len());
        let selected = &films[..cap];

        info!(
            %batch_id,
            profile = profile.key(),
            films = selected.len(),
            "batch started"
        );

        let mut reports = Vec::with_capacity(selected.len());
        for (index, film) in selected.iter().enumerate() {
            if self.cancel.is_requested() {
                warn!(
                    completed = reports.len(),
                    remaining = selected.len() - index,
                    "stop requested, ending batch early"
                );
                break;
            }

            let outcome = self
                .orchestrator
                .run_session(film, profile)
                .await
                .with_context(|| format!("search session failed for {}", film.title))?;
            reports.push(FilmReport::from(outcome));
            self.observer
                .film_completed(&film.title, index + 1, selected.len());

            let completed = index + 1;
            if self.checkpoint_interval > 0
                && completed % self.checkpoint_interval == 0
                && completed < selected.len()
            {
                self.checkpoint(batch_id, profile, started_at, None, &reports)
                    .await?;
            }
        }

        self.checkpoint(batch_id, profile, started_at, Some(Utc::now()), &reports)
            .await?;

        info!(
            %batch_id,
            films = reports.len(),
            sources = reports.iter().map(|r| r.total_unique_sources).sum::<usize>(),
            "batch finished"
        );
        Ok(reports)
    }

    async fn checkpoint(
        &self,
        batch_id: Uuid,
        profile: &Profile,
        started_at: DateTime<Utc>,
        finished_at: Option<DateTime<Utc>>,
        reports: &[FilmReport],
    ) -> Result<()> {
        let snapshot = BatchSnapshot {
            batch_id,
            profile_key: profile.key(),
            started_at,
            finished_at,
            films_processed: reports.len(),
            reports,
        };

        if let Err(persist_error) = self.store.write(&snapshot).await {
            // The scored results only exist in memory at this point; list
            // them before aborting so the run is not silently lost.
            error!(
                error = %persist_error,
                films_processed = reports.len(),
                "checkpoint write failed; unpersisted results follow"
            );
            for report in reports {
                error!(
                    film = %report.film.title,
                    sources = report.total_unique_sources,
                    "unpersisted film result"
                );
            }
            return Err(persist_error).context("failed to persist batch checkpoint");
        }
        Ok(())
    }
}
