//! # Reporting Port
//!
//! Il walker e lo scheduler non scrivono mai direttamente su console: ogni
//! evento passa per un `ReportSink` esplicito. Implementazioni:
//! - `progress::ConsoleReporter`: progress bar `indicatif` + righe `tracing`
//! - `json_output::JsonReporter`: un oggetto JSON per evento su stdout
//! - `MemoryReporter`: cattura in memoria, per i test

use crate::{
    error::OptimizeError,
    file_manager::FileManager,
    outcome::{BatchReport, RunSummary, TaskResult, TaskStatus},
    size_class::{format_size_diff, format_size_with_color},
};
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;

/// Receives progress and status events from a run.
///
/// Implementations must tolerate concurrent `file_finished` calls from
/// several workers of the same batch.
pub trait ReportSink: Send + Sync {
    fn run_started(&self, _source: &Path, _output: &Path) {}

    fn batch_started(&self, _label: &str, _total: usize) {}

    /// Called once per completed file, in completion order
    fn file_finished(&self, label: &str, result: &TaskResult);

    fn batch_finished(&self, _report: &BatchReport) {}

    /// A directory could not be read or created
    fn walk_error(&self, path: &Path, error: &OptimizeError);

    fn run_finished(&self, _summary: &RunSummary) {}
}

/// A rendered status line and the level it should be logged at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub level: Level,
    pub text: String,
}

/// Renders the human-readable line for a finished file
pub fn status_line(result: &TaskResult) -> Option<StatusLine> {
    let name = result.file_name();
    match &result.status {
        TaskStatus::Gif(outcome) if outcome.is_optimized() => Some(StatusLine {
            level: Level::INFO,
            text: format!(
                "File {} optimized to {} [-{}]",
                name,
                format_size_with_color(outcome.final_size),
                format_size_diff(outcome.bytes_saved())
            ),
        }),
        TaskStatus::Gif(outcome) => Some(StatusLine {
            level: Level::DEBUG,
            text: format!(
                "File {} kept original ({}), no reduction after {} profiles",
                name,
                FileManager::format_size(outcome.original_size),
                outcome.profiles_tried
            ),
        }),
        TaskStatus::Copied { bytes } => Some(StatusLine {
            level: Level::DEBUG,
            text: format!("File {} copied ({})", name, FileManager::format_size(*bytes)),
        }),
        TaskStatus::Skipped => None,
        TaskStatus::Failed(e) => Some(StatusLine {
            level: Level::ERROR,
            text: format!("Error processing {}: {}", name, e.root()),
        }),
    }
}

/// Records every event in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    lines: Mutex<Vec<StatusLine>>,
    progress: Mutex<Vec<(String, usize, usize)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status lines in the order they were reported
    pub fn lines(&self) -> Vec<StatusLine> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// `(label, completed, total)` for every batch seen
    pub fn progress(&self) -> Vec<(String, usize, usize)> {
        self.progress.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn push(&self, line: StatusLine) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }
}

impl ReportSink for MemoryReporter {
    fn batch_started(&self, label: &str, total: usize) {
        if let Ok(mut progress) = self.progress.lock() {
            progress.push((label.to_string(), 0, total));
        }
    }

    fn file_finished(&self, label: &str, result: &TaskResult) {
        if let Ok(mut progress) = self.progress.lock() {
            if let Some(entry) = progress.iter_mut().rev().find(|(l, _, _)| l == label) {
                entry.1 += 1;
            }
        }
        if let Some(line) = status_line(result) {
            self.push(line);
        }
    }

    fn walk_error(&self, path: &Path, error: &OptimizeError) {
        self.push(StatusLine {
            level: Level::ERROR,
            text: format!("Error walking {}: {}", path.display(), error),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_manager::{FileKind, SourceEntry};
    use crate::outcome::OptimizationOutcome;

    fn entry(name: &str, kind: FileKind) -> SourceEntry {
        SourceEntry::new(Path::new("/src"), name, 0, kind)
    }

    const MIB: u64 = 1024 * 1024;

    #[test]
    fn test_status_line_for_optimized_gif() {
        let result = TaskResult::new(
            &entry("sub/a.gif", FileKind::Gif),
            TaskStatus::Gif(OptimizationOutcome {
                original_size: 12 * MIB,
                final_size: 7 * MIB,
                profiles_tried: 2,
                standing_profile: Some(1),
                fell_back: false,
            }),
        );

        let line = status_line(&result).unwrap();
        assert_eq!(line.level, Level::INFO);
        assert!(line.text.starts_with("File a.gif optimized to "));
        assert!(line.text.contains("7.00 MB"));
        assert!(line.text.ends_with("[-5.00 MB]"));
    }

    #[test]
    fn test_status_line_for_failure_names_file_and_reason() {
        let result = TaskResult::new(
            &entry("bad.gif", FileKind::Gif),
            TaskStatus::Failed(OptimizeError::task(
                "bad.gif",
                OptimizeError::Optimizer("corrupt".into()),
            )),
        );

        let line = status_line(&result).unwrap();
        assert_eq!(line.level, Level::ERROR);
        assert_eq!(line.text, "Error processing bad.gif: Optimizer error: corrupt");
    }

    #[test]
    fn test_memory_reporter_tracks_progress() {
        let reporter = MemoryReporter::new();
        reporter.batch_started(".", 2);
        let copied = TaskResult::new(&entry("b.txt", FileKind::Other), TaskStatus::Copied { bytes: 1 });
        reporter.file_finished(".", &copied);
        let fifo = TaskResult::new(&entry("x", FileKind::Special), TaskStatus::Skipped);
        reporter.file_finished(".", &fifo);

        assert_eq!(reporter.progress(), vec![(".".to_string(), 2, 2)]);
        assert_eq!(reporter.lines().len(), 1);
    }
}
