//! Wires configuration into a ready-to-run batch controller.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::client::{CatalogClient, CatalogConfig};
use crate::config::Config;
use crate::pipeline::batch::BatchController;
use crate::pipeline::executor::SearchExecutor;
use crate::pipeline::orchestrator::SessionOrchestrator;
use crate::pipeline::persist::{CheckpointStore, JsonFileStore};
use crate::pipeline::ProgressObserver;
use crate::util::cancel::CancelFlag;
use crate::util::pace::{IntervalPacer, Pacer};

/// Build the full component stack for one batch run.
///
/// # Errors
/// Fails when the catalog client cannot be constructed from the configured
/// base URL.
pub fn build_batch_controller(
    config: &Config,
    output_path: PathBuf,
    observer: Arc<dyn ProgressObserver>,
    cancel: CancelFlag,
) -> Result<BatchController> {
    let client = CatalogClient::new(CatalogConfig {
        base_url: config.catalog_base_url().to_string(),
        connect_timeout: config.catalog_connect_timeout(),
        total_timeout: config.catalog_total_timeout(),
    })
    .context("failed to build catalog client")?;

    let executor = SearchExecutor::new(Arc::new(client), config.collections().to_vec());
    let pacer: Arc<dyn Pacer> = Arc::new(IntervalPacer::new(config.politeness_delay()));
    let orchestrator = SessionOrchestrator::new(executor, pacer, Arc::clone(&observer), cancel.clone())
        .with_max_strategies(config.max_strategies());
    let store: Arc<dyn CheckpointStore> = Arc::new(JsonFileStore::new(output_path));

    Ok(BatchController::new(
        orchestrator,
        store,
        observer,
        cancel,
        config.checkpoint_interval(),
    ))
}
