//! # Progress Tracking Module
//!
//! Questo modulo gestisce il feedback visuale durante la replica del tree.
//!
//! ## Responsabilità:
//! - Una progress bar `indicatif` per ogni directory, avanzata a ogni file
//! - Righe di stato via `tracing` (dimensione colorata, errori per file)
//! - Riepilogo finale con statistiche aggregate
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:00:12] [========================================] 12/12 (100%) Processing sub
//! ```

use crate::{
    error::OptimizeError,
    file_manager::FileManager,
    outcome::{BatchReport, RunSummary, TaskResult},
    report::{status_line, ReportSink, StatusLine},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, error, info, warn, Level};

/// Manages one progress bar per directory batch
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64, title: &str) -> Self {
        let bar = ProgressBar::new(total_files);

        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }

        bar.set_message(title.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Advance by one completed file
    pub fn inc(&self) {
        self.bar.inc(1);
    }

    /// Run `f` with the bar hidden so log lines do not tear it
    pub fn suspend<F: FnOnce()>(&self, f: F) {
        self.bar.suspend(f);
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    /// A hidden bar, for non-interactive runs
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

/// Terminal reporter: progress bars plus `tracing` status lines
#[derive(Default)]
pub struct ConsoleReporter {
    current: Mutex<Option<ProgressManager>>,
    show_progress: bool,
}

impl ConsoleReporter {
    pub fn new(show_progress: bool) -> Self {
        Self {
            current: Mutex::new(None),
            show_progress,
        }
    }

    fn current_bar(&self) -> Option<ProgressManager> {
        self.current.lock().ok().and_then(|bar| bar.clone())
    }

    fn log(line: &StatusLine) {
        if line.level == Level::ERROR {
            error!("{}", line.text);
        } else if line.level == Level::WARN {
            warn!("{}", line.text);
        } else if line.level == Level::INFO {
            info!("{}", line.text);
        } else {
            debug!("{}", line.text);
        }
    }
}

impl ReportSink for ConsoleReporter {
    fn run_started(&self, source: &Path, output: &Path) {
        info!(
            "Starting GIF optimization: {} -> {}",
            source.display(),
            output.display()
        );
    }

    fn batch_started(&self, label: &str, total: usize) {
        let bar = if self.show_progress {
            ProgressManager::new(total as u64, &format!("Processing {}", label))
        } else {
            ProgressManager::hidden()
        };
        if let Ok(mut current) = self.current.lock() {
            *current = Some(bar);
        }
    }

    fn file_finished(&self, _label: &str, result: &TaskResult) {
        let bar = self.current_bar();
        if let Some(line) = status_line(result) {
            match bar {
                Some(ref bar) => bar.suspend(|| Self::log(&line)),
                None => Self::log(&line),
            }
        }
        if let Some(bar) = bar {
            bar.inc();
        }
    }

    fn batch_finished(&self, report: &BatchReport) {
        let bar = self.current.lock().ok().and_then(|mut bar| bar.take());
        let message = format!(
            "{}: {} done, {} failed, {} saved",
            report.label,
            report.succeeded(),
            report.failed(),
            FileManager::format_size(report.bytes_saved())
        );
        if let Some(bar) = bar {
            bar.finish(&message);
        }
        if report.failed() > 0 {
            warn!("{} file(s) failed in {}", report.failed(), report.label);
        }
    }

    fn walk_error(&self, path: &Path, error: &OptimizeError) {
        error!("Error walking {}: {}", path.display(), error);
    }

    fn run_finished(&self, summary: &RunSummary) {
        info!("=== Optimization Complete ===");
        info!("{}", summary.format_summary());
        info!("Elapsed: {:.2}s", summary.elapsed.as_secs_f64());
    }
}
