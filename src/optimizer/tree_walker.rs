//! # Tree Walker Module
//!
//! Orchestratore principale: replica la struttura del tree sorgente
//! nell'output e affida i file di ogni directory al `BatchScheduler`.
//!
//! ## Flusso di esecuzione:
//! 1. **Validazione**: la sorgente deve esistere ed essere una directory
//! 2. **Walk**: `walkdir` top-down, ordinato per nome
//! 3. **Mkdir**: ogni directory viene creata nell'output prima dei suoi file
//! 4. **Batch**: i file diretti della directory vanno al worker pool
//! 5. **Statistics**: i `BatchReport` confluiscono nel `RunSummary`
//!
//! Le sottodirectory sono batch indipendenti e i batch girano uno alla
//! volta. Una directory illeggibile viene riportata e saltata insieme al
//! suo sottoalbero. Un output dentro la sorgente viene rifiutato prima di
//! creare qualsiasi cosa.

use crate::{
    error::OptimizeError,
    file_manager::{FileManager, SourceEntry},
    gif_processor::GifOptimizer,
    optimizer::{
        batch_scheduler::{BatchFile, BatchScheduler},
        file_optimizer::FileOptimizer,
        file_task::FileTask,
        path_resolver::PathResolver,
    },
    outcome::RunSummary,
    report::ReportSink,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Mirrors a source tree into an output tree
pub struct TreeWalker {
    scheduler: BatchScheduler,
    reporter: Arc<dyn ReportSink>,
}

impl TreeWalker {
    pub fn new(
        optimizer: Arc<dyn GifOptimizer>,
        workers: usize,
        reporter: Arc<dyn ReportSink>,
    ) -> Self {
        let task = FileTask::new(FileOptimizer::new(optimizer));
        Self {
            scheduler: BatchScheduler::new(task, workers, reporter.clone()),
            reporter,
        }
    }

    /// Replicate `source_root` into `output_root`, directory by directory
    pub async fn replicate(
        &self,
        source_root: &Path,
        output_root: &Path,
    ) -> Result<RunSummary, OptimizeError> {
        let start_time = Instant::now();

        if !source_root.is_dir() {
            return Err(OptimizeError::SourceMissing(source_root.to_path_buf()));
        }
        if PathResolver::contains(source_root, output_root) {
            return Err(OptimizeError::Validation(format!(
                "output directory {} is inside source directory {}",
                output_root.display(),
                source_root.display()
            )));
        }
        tokio::fs::create_dir_all(output_root).await?;

        self.reporter.run_started(source_root, output_root);
        info!(
            "Replicating {} into {} with {} workers",
            source_root.display(),
            output_root.display(),
            self.scheduler.workers()
        );

        let mut summary = RunSummary::new();

        let mut entries = WalkDir::new(source_root).sort_by_file_name().into_iter();
        while let Some(entry) = entries.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| source_root.to_path_buf());
                    self.walk_error(&mut summary, &path, OptimizeError::Io(e.into()));
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }

            let relative_path = PathResolver::relative_to(source_root, entry.path());
            let output_dir = output_root.join(relative_path);
            if let Err(e) = tokio::fs::create_dir_all(&output_dir).await {
                self.walk_error(&mut summary, &output_dir, e.into());
                entries.skip_current_dir();
                continue;
            }

            let files = match FileManager::list_files(entry.path()) {
                Ok(files) => files,
                Err(e) => {
                    self.walk_error(&mut summary, entry.path(), e);
                    entries.skip_current_dir();
                    continue;
                }
            };

            let mut batch = Vec::with_capacity(files.len());
            for path in files {
                match SourceEntry::from_path(source_root, &path) {
                    Ok(source_entry) => {
                        let output = PathResolver::output_path(&output_dir, &path);
                        batch.push(BatchFile {
                            entry: source_entry,
                            output,
                        });
                    }
                    Err(e) => self.walk_error(&mut summary, &path, e),
                }
            }

            let label = PathResolver::label(relative_path);
            debug!("Dispatching {} files from {}", batch.len(), label);
            let report = self.scheduler.process_batch(&label, batch).await;
            summary.absorb(&report);
        }

        summary.elapsed = start_time.elapsed();
        self.reporter.run_finished(&summary);
        Ok(summary)
    }

    fn walk_error(&self, summary: &mut RunSummary, path: &Path, error: OptimizeError) {
        summary.walk_errors += 1;
        self.reporter.walk_error(path, &error);
    }
}
