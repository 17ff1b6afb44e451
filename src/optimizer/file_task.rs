//! # File Task Module
//!
//! Worker per un singolo file: le GIF passano dal ladder, tutto il resto
//! viene copiato byte per byte. Qualsiasi errore viene catturato e
//! registrato nel `TaskResult`, mai propagato al batch.

use crate::{
    error::OptimizeError,
    file_manager::{FileKind, FileManager, SourceEntry},
    optimizer::file_optimizer::FileOptimizer,
    outcome::{TaskResult, TaskStatus},
};
use std::path::Path;
use tracing::debug;

/// Routes one file to the ladder or to a verbatim copy
#[derive(Clone)]
pub struct FileTask {
    file_optimizer: FileOptimizer,
}

impl FileTask {
    pub fn new(file_optimizer: FileOptimizer) -> Self {
        Self { file_optimizer }
    }

    /// Process `entry`, reading `source` and writing `output`. Never fails.
    pub async fn run(&self, entry: &SourceEntry, source: &Path, output: &Path) -> TaskResult {
        let status = match self.process(entry.kind, source, output).await {
            Ok(status) => status,
            Err(e) => TaskStatus::Failed(OptimizeError::task(entry.display_name(), e)),
        };
        TaskResult::new(entry, status)
    }

    async fn process(
        &self,
        kind: FileKind,
        source: &Path,
        output: &Path,
    ) -> Result<TaskStatus, OptimizeError> {
        match kind {
            FileKind::Gif => {
                let outcome = self.file_optimizer.optimize(source, output).await?;
                Ok(TaskStatus::Gif(outcome))
            }
            FileKind::Other => {
                let bytes = FileManager::copy_verbatim(source, output).await?;
                Ok(TaskStatus::Copied { bytes })
            }
            FileKind::Directory | FileKind::Special => {
                debug!("Skipping non-regular file: {}", source.display());
                Ok(TaskStatus::Skipped)
            }
        }
    }
}
