//! Checkpoint persistence for batch output.
//!
//! The serialized shape (`film`, `total_unique_sources`,
//! `search_strategy_summary`, `sources`) is consumed by downstream report
//! generators and must stay stable.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::film::FilmRecord;

use super::orchestrator::SessionOutcome;
use super::scoring::ScoredResult;

/// One film's ranked result set in the batch output file.
#[derive(Debug, Serialize)]
pub struct FilmReport {
    pub film: FilmRecord,
    pub total_unique_sources: usize,
    pub search_strategy_summary: BTreeMap<String, usize>,
    pub sources: Vec<ScoredResult>,
}

impl From<SessionOutcome> for FilmReport {
    fn from(outcome: SessionOutcome) -> Self {
        Self {
            film: outcome.film,
            total_unique_sources: outcome.sources.len(),
            search_strategy_summary: outcome.strategy_summary,
            sources: outcome.sources,
        }
    }
}

/// Full snapshot written at every checkpoint: batch metadata plus every
/// report completed so far.
#[derive(Debug, Serialize)]
pub struct BatchSnapshot<'a> {
    pub batch_id: Uuid,
    pub profile_key: &'a str,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub films_processed: usize,
    pub reports: &'a [FilmReport],
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write batch output to {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize batch output")]
    Serialize(#[from] serde_json::Error),
}

#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Persist a snapshot. Each write replaces the previous checkpoint.
    async fn write(&self, snapshot: &BatchSnapshot<'_>) -> Result<(), PersistError>;
}

/// Writes checkpoints as pretty JSON via a temp-file rename, so a crash
/// mid-write never leaves a truncated output file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl CheckpointStore for JsonFileStore {
    async fn write(&self, snapshot: &BatchSnapshot<'_>) -> Result<(), PersistError> {
        let payload = serde_json::to_vec_pretty(snapshot)?;

        let mut staging = self.path.clone();
        staging.set_extension("json.tmp");

        fs::write(&staging, payload).map_err(|source| PersistError::Io {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &self.path).map_err(|source| PersistError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(
            path = %self.path.display(),
            films = snapshot.films_processed,
            finished = snapshot.finished_at.is_some(),
            "checkpoint written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot<'a>(reports: &'a [FilmReport], finished: bool) -> BatchSnapshot<'a> {
        BatchSnapshot {
            batch_id: Uuid::new_v4(),
            profile_key: "default",
            started_at: Utc::now(),
            finished_at: finished.then(Utc::now),
            films_processed: reports.len(),
            reports,
        }
    }

    fn report(title: &str) -> FilmReport {
        FilmReport {
            film: FilmRecord::titled(title),
            total_unique_sources: 0,
            search_strategy_summary: BTreeMap::new(),
            sources: Vec::new(),
        }
    }

    #[tokio::test]
    async fn write_produces_stable_output_shape() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("results.json");
        let store = JsonFileStore::new(path.clone());
        let reports = vec![report("The Wizard of Oz")];

        store
            .write(&snapshot(&reports, true))
            .await
            .expect("write succeeds");

        let raw = fs::read_to_string(&path).expect("output readable");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
        assert_eq!(value["films_processed"], 1);
        assert_eq!(value["profile_key"], "default");
        assert!(value["finished_at"].is_string());
        let film_report = &value["reports"][0];
        assert_eq!(film_report["film"]["title"], "The Wizard of Oz");
        assert!(film_report["total_unique_sources"].is_number());
        assert!(film_report["search_strategy_summary"].is_object());
        assert!(film_report["sources"].is_array());
    }

    #[tokio::test]
    async fn later_checkpoints_replace_earlier_ones() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("results.json");
        let store = JsonFileStore::new(path.clone());

        let interim = vec![report("Stagecoach")];
        store
            .write(&snapshot(&interim, false))
            .await
            .expect("interim write");

        let full = vec![report("Stagecoach"), report("Rebecca")];
        store.write(&snapshot(&full, true)).await.expect("final write");

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).expect("readable")).expect("JSON");
        assert_eq!(value["reports"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn write_surfaces_io_failure() {
        let store = JsonFileStore::new(PathBuf::from("/nonexistent/dir/results.json"));
        let reports = Vec::new();

        let error = store
            .write(&snapshot(&reports, false))
            .await
            .expect_err("write fails");

        assert!(matches!(error, PersistError::Io { .. }));
    }
}
