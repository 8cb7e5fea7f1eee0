use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tracing::{error, info};

use super::aggregate::RunReport;
use super::executor::CheckExecutor;
use crate::config::{EngineConfig, ExecutionMode};
use crate::error::EngineError;
use crate::monitor::{Batch, BatchResult};
use crate::observer::DiagnosticObserver;

/// Runs batches of monitors and collects exactly one result per monitor
pub struct Coordinator {
    executor: Arc<CheckExecutor>,
    mode: ExecutionMode,
    concurrency_limit: Option<usize>,
    payload_dir: PathBuf,
}

impl Coordinator {
    /// Create a coordinator and its executor from the engine configuration
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let executor = Arc::new(CheckExecutor::new(config)?);
        Ok(Self::with_executor(executor, config))
    }

    /// Create a coordinator around an existing executor
    pub fn with_executor(executor: Arc<CheckExecutor>, config: &EngineConfig) -> Self {
        Self {
            executor,
            mode: config.mode,
            concurrency_limit: config.concurrency_limit(),
            payload_dir: config.payload_dir.clone(),
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Run every batch, one batch after the other, and aggregate the results
    pub async fn run(
        &self,
        batches: &[Batch],
        observer: Option<Arc<dyn DiagnosticObserver>>,
    ) -> Result<RunReport, EngineError> {
        let mut names = HashSet::with_capacity(batches.len());
        if let Some(batch) = batches.iter().find(|batch| !names.insert(batch.name.as_str())) {
            return Err(EngineError::DuplicateBatch(batch.name.clone()));
        }

        let mut results = Vec::with_capacity(batches.len());
        for batch in batches {
            results.push(self.run_batch(batch, observer.clone()).await?);
        }

        let report = RunReport::new(results);
        info!(
            total = report.summary.total,
            success = report.summary.success,
            failure = report.summary.failure,
            "Run completed"
        );
        Ok(report)
    }

    /// Run one batch.
    ///
    /// A failing check never aborts the batch. In sequential mode results are
    /// in input order; in parallel mode they are in arrival order.
    pub async fn run_batch(
        &self,
        batch: &Batch,
        observer: Option<Arc<dyn DiagnosticObserver>>,
    ) -> Result<BatchResult, EngineError> {
        info!(batch = %batch.name, monitors = batch.len(), mode = %self.mode, "Running batch");

        let result = match self.mode {
            ExecutionMode::Sequential => self.run_sequential(batch, observer).await,
            ExecutionMode::Parallel => self.run_parallel(batch, observer).await?,
        };

        let summary = result.summary();
        info!(
            batch = %batch.name,
            success = summary.success,
            failure = summary.failure,
            "Batch completed"
        );
        Ok(result)
    }

    async fn run_sequential(
        &self,
        batch: &Batch,
        observer: Option<Arc<dyn DiagnosticObserver>>,
    ) -> BatchResult {
        let mut collected = BatchResult::new(&batch.name, batch.len());

        for monitor in &batch.monitors {
            let result = self
                .executor
                .execute(monitor.clone(), &self.payload_dir, observer.as_deref())
                .await;
            collected.push(result);
        }

        collected
    }

    async fn run_parallel(
        &self,
        batch: &Batch,
        observer: Option<Arc<dyn DiagnosticObserver>>,
    ) -> Result<BatchResult, EngineError> {
        let expected = batch.len();
        let mut collected = BatchResult::new(&batch.name, expected);
        if expected == 0 {
            return Ok(collected);
        }

        // sized so that no check ever waits on the reader
        let (result_tx, mut result_rx) = mpsc::channel(expected);
        let limiter = self.concurrency_limit.map(|limit| Arc::new(Semaphore::new(limit)));

        for monitor in &batch.monitors {
            let executor = self.executor.clone();
            let monitor = monitor.clone();
            let base_dir = self.payload_dir.clone();
            let observer = observer.clone();
            let limiter = limiter.clone();
            let result_tx = result_tx.clone();

            tokio::spawn(async move {
                let _permit = match limiter {
                    Some(limiter) => limiter.acquire_owned().await.ok(),
                    None => None,
                };

                let result = executor.execute(monitor, &base_dir, observer.as_deref()).await;

                if let Err(e) = result_tx.send(result).await {
                    error!("Failed to deliver check result: {}", e);
                }
            });
        }
        drop(result_tx);

        while collected.len() < expected {
            match result_rx.recv().await {
                Some(result) => collected.push(result),
                None => break,
            }
        }

        if collected.len() != expected {
            error!(batch = %batch.name, expected, received = collected.len(), "Lost check results");
            return Err(EngineError::MissingResults {
                batch: batch.name.clone(),
                expected,
                received: collected.len(),
            });
        }

        Ok(collected)
    }
}
