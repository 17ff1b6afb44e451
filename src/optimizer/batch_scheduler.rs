//! # Batch Scheduler Module
//!
//! Esegue i file di una directory in parallelo su un worker pool limitato.
//!
//! ## Gestione concorrenza:
//! - Un `Semaphore` per batch, con tanti permessi quanti sono i worker
//! - Un task tokio per file; il permesso viene rilasciato a fine task
//! - Risultati raccolti in ordine di completamento (`FuturesUnordered`)
//! - Un task fallito o in panic non cancella gli altri
//!
//! Il batch ritorna solo quando tutti i task sono terminati.

use crate::{
    error::OptimizeError,
    file_manager::SourceEntry,
    optimizer::file_task::FileTask,
    outcome::{BatchReport, TaskResult, TaskStatus},
    report::ReportSink,
};
use futures::stream::{FuturesUnordered, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// One file of a batch and where its output goes
#[derive(Debug, Clone)]
pub struct BatchFile {
    pub entry: SourceEntry,
    pub output: PathBuf,
}

/// Fans a directory's files out to a bounded pool of workers
pub struct BatchScheduler {
    task: FileTask,
    workers: usize,
    reporter: Arc<dyn ReportSink>,
}

impl BatchScheduler {
    pub fn new(task: FileTask, workers: usize, reporter: Arc<dyn ReportSink>) -> Self {
        Self {
            task,
            workers: workers.max(1),
            reporter,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Process every file of one directory and wait for all of them
    pub async fn process_batch(&self, label: &str, files: Vec<BatchFile>) -> BatchReport {
        let mut report = BatchReport::new(label);
        self.reporter.batch_started(label, files.len());
        debug!(
            "Batch {}: {} files on {} workers",
            label,
            files.len(),
            self.workers
        );

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut pending = FuturesUnordered::new();

        for file in files {
            let entry = file.entry.clone();
            let semaphore = semaphore.clone();
            let task = self.task.clone();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return TaskResult::new(
                            &file.entry,
                            TaskStatus::Failed(OptimizeError::task(
                                file.entry.display_name(),
                                OptimizeError::Worker(e.to_string()),
                            )),
                        )
                    }
                };
                task.run(&file.entry, &file.entry.absolute_path, &file.output)
                    .await
            });

            pending.push(async move { (entry, handle.await) });
        }

        while let Some((entry, joined)) = pending.next().await {
            let result = match joined {
                Ok(result) => result,
                Err(e) => {
                    let name = entry.display_name();
                    warn!("Worker for {} did not complete: {}", name, e);
                    TaskResult::new(
                        &entry,
                        TaskStatus::Failed(OptimizeError::task(
                            name,
                            OptimizeError::Worker(e.to_string()),
                        )),
                    )
                }
            };
            self.reporter.file_finished(label, &result);
            report.results.push(result);
        }

        self.reporter.batch_finished(&report);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gif_processor::GifOptimizer;
    use crate::optimizer::file_optimizer::tests::{StubOptimizer, MIB};
    use crate::optimizer::file_optimizer::FileOptimizer;
    use crate::profile::OptimizationProfile;
    use crate::report::MemoryReporter;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn batch_files(root: &Path, out: &Path, names: &[&str]) -> Vec<BatchFile> {
        names
            .iter()
            .map(|name| {
                let path = root.join(name);
                BatchFile {
                    entry: SourceEntry::from_path(root, &path).unwrap(),
                    output: out.join(name),
                }
            })
            .collect()
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_batch() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let names = ["1.txt", "2.txt", "3.txt", "4.txt", "5.txt"];
        for name in names {
            std::fs::write(src.path().join(name), name.as_bytes()).unwrap();
        }
        let mut files = batch_files(src.path(), out.path(), &names);
        // Task #3 writes into a directory that does not exist
        files[2].output = out.path().join("nowhere").join("3.txt");

        let reporter = Arc::new(MemoryReporter::new());
        let task = FileTask::new(FileOptimizer::new(Arc::new(StubOptimizer::sizes(&[1; 5]))));
        let scheduler = BatchScheduler::new(task, 2, reporter.clone());
        let report = scheduler.process_batch(".", files).await;

        assert_eq!(report.total(), 5);
        assert_eq!(report.succeeded(), 4);
        assert_eq!(report.failed(), 1);
        let failure = report.failures().next().unwrap();
        assert_eq!(failure.file_name(), "3.txt");
        assert!(matches!(failure.error().unwrap().root(), OptimizeError::Io(_)));

        for name in ["1.txt", "2.txt", "4.txt", "5.txt"] {
            assert_eq!(std::fs::read(out.path().join(name)).unwrap(), name.as_bytes());
        }
        assert_eq!(reporter.progress(), vec![(".".to_string(), 5, 5)]);
    }

    #[tokio::test]
    async fn test_gifs_and_copies_share_the_batch() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        std::fs::File::create(src.path().join("a.gif"))
            .unwrap()
            .set_len(12 * MIB)
            .unwrap();
        std::fs::write(src.path().join("b.txt"), vec![7u8; 1024]).unwrap();

        let task = FileTask::new(FileOptimizer::new(Arc::new(StubOptimizer::sizes(&[
            10 * MIB,
            7 * MIB,
            1,
            1,
            1,
        ]))));
        let scheduler = BatchScheduler::new(task, 4, Arc::new(MemoryReporter::new()));
        let report = scheduler
            .process_batch(".", batch_files(src.path(), out.path(), &["a.gif", "b.txt"]))
            .await;

        assert_eq!(report.optimized(), 1);
        assert_eq!(report.copied(), 1);
        assert_eq!(report.bytes_saved(), 5 * MIB);
    }

    /// Tracks how many profiles run at the same time
    struct ConcurrencyProbe {
        running: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl GifOptimizer for ConcurrencyProbe {
        async fn run_profile(
            &self,
            _input: &Path,
            _output: &Path,
            _profile: &OptimizationProfile,
        ) -> Result<(), OptimizeError> {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            self.running.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_pool_is_bounded_by_workers() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let names = ["a.gif", "b.gif", "c.gif", "d.gif", "e.gif", "f.gif"];
        for name in names {
            std::fs::write(src.path().join(name), b"GIF89a").unwrap();
        }

        let probe = Arc::new(ConcurrencyProbe {
            running: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let task = FileTask::new(FileOptimizer::new(probe.clone()));
        let scheduler = BatchScheduler::new(task, 2, Arc::new(MemoryReporter::new()));
        let report = scheduler
            .process_batch(".", batch_files(src.path(), out.path(), &names))
            .await;

        assert_eq!(report.total(), 6);
        assert_eq!(report.fallbacks(), 6);
        assert!(probe.peak.load(Ordering::SeqCst) <= 2);
    }

    /// Panics on one file name, writes a small candidate otherwise
    struct PanicsOn(&'static str);

    #[async_trait]
    impl GifOptimizer for PanicsOn {
        async fn run_profile(
            &self,
            input: &Path,
            output: &Path,
            _profile: &OptimizationProfile,
        ) -> Result<(), OptimizeError> {
            if input.file_name().and_then(|n| n.to_str()) == Some(self.0) {
                panic!("optimizer crashed on {}", self.0);
            }
            std::fs::write(output, b"GIF")?;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_panicking_worker_is_reported_as_worker_error() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let names = ["a.gif", "boom.gif", "c.gif"];
        for name in names {
            std::fs::write(src.path().join(name), b"GIF89a source").unwrap();
        }

        let task = FileTask::new(FileOptimizer::new(Arc::new(PanicsOn("boom.gif"))));
        let reporter = Arc::new(MemoryReporter::new());
        let scheduler = BatchScheduler::new(task, 2, reporter.clone());
        let report = scheduler
            .process_batch(".", batch_files(src.path(), out.path(), &names))
            .await;

        assert_eq!(report.total(), 3);
        assert_eq!(report.optimized(), 2);
        let failure = report.find("boom.gif").unwrap();
        assert!(matches!(failure.error().unwrap().root(), OptimizeError::Worker(_)));
        assert_eq!(failure.kind, crate::file_manager::FileKind::Gif);
        assert_eq!(std::fs::read(out.path().join("a.gif")).unwrap(), b"GIF");
        assert_eq!(reporter.progress(), vec![(".".to_string(), 3, 3)]);
    }

    #[tokio::test]
    async fn test_empty_batch_completes() {
        let task = FileTask::new(FileOptimizer::new(Arc::new(StubOptimizer::sizes(&[1; 5]))));
        let reporter = Arc::new(MemoryReporter::new());
        let scheduler = BatchScheduler::new(task, 0, reporter.clone());

        let report = scheduler.process_batch("empty", Vec::new()).await;
        assert_eq!(report.total(), 0);
        assert_eq!(scheduler.workers(), 1);
        assert_eq!(reporter.progress(), vec![("empty".to_string(), 0, 0)]);
    }
}
