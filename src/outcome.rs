//! # Outcome Types
//!
//! Risultati per-file, per-directory e per-run. Creati una volta per file a
//! ogni esecuzione e scartati dopo il report: nessuno stato persistito.

use crate::{
    error::OptimizeError,
    file_manager::{FileKind, FileManager, SourceEntry},
    size_class::SizeClass,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Result of running the ladder over one GIF
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizationOutcome {
    pub original_size: u64,
    /// Size of the file left at the output path
    pub final_size: u64,
    pub profiles_tried: usize,
    /// Ladder index whose candidate stood when the ladder stopped
    pub standing_profile: Option<usize>,
    /// The candidate was discarded and the source copied verbatim
    pub fell_back: bool,
}

impl OptimizationOutcome {
    /// Ladder index that produced the output, `None` after a fallback copy
    pub fn accepted_profile(&self) -> Option<usize> {
        if self.fell_back {
            None
        } else {
            self.standing_profile
        }
    }

    pub fn is_optimized(&self) -> bool {
        !self.fell_back
    }

    pub fn bytes_saved(&self) -> u64 {
        self.original_size.saturating_sub(self.final_size)
    }

    pub fn size_class(&self) -> SizeClass {
        SizeClass::classify(self.final_size)
    }
}

/// What happened to one source file
#[derive(Debug)]
pub enum TaskStatus {
    /// GIF run through the ladder
    Gif(OptimizationOutcome),
    /// Non-GIF copied verbatim
    Copied { bytes: u64 },
    /// Not a regular file, nothing written
    Skipped,
    Failed(OptimizeError),
}

/// Per-file outcome
#[derive(Debug)]
pub struct TaskResult {
    pub relative_path: PathBuf,
    pub kind: FileKind,
    /// Source size captured at walk time
    pub source_size: u64,
    pub status: TaskStatus,
}

impl TaskResult {
    pub fn new(entry: &SourceEntry, status: TaskStatus) -> Self {
        Self {
            relative_path: entry.relative_path.clone(),
            kind: entry.kind,
            source_size: entry.size,
            status,
        }
    }

    pub fn success(&self) -> bool {
        !matches!(self.status, TaskStatus::Failed(_))
    }

    pub fn error(&self) -> Option<&OptimizeError> {
        match &self.status {
            TaskStatus::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<&OptimizationOutcome> {
        match &self.status {
            TaskStatus::Gif(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Bytes left at the output path, `None` when nothing was written
    pub fn output_size(&self) -> Option<u64> {
        match &self.status {
            TaskStatus::Gif(outcome) => Some(outcome.final_size),
            TaskStatus::Copied { bytes } => Some(*bytes),
            TaskStatus::Skipped | TaskStatus::Failed(_) => None,
        }
    }

    /// File name for status lines
    pub fn file_name(&self) -> String {
        self.relative_path
            .file_name()
            .unwrap_or(self.relative_path.as_os_str())
            .to_string_lossy()
            .into_owned()
    }
}

/// All results of one directory batch, in completion order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub label: String,
    pub results: Vec<TaskResult>,
}

impl BatchReport {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            results: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &TaskResult> {
        self.results.iter().filter(|r| !r.success())
    }

    pub fn optimized(&self) -> usize {
        self.outcomes().filter(|o| o.is_optimized()).count()
    }

    pub fn fallbacks(&self) -> usize {
        self.outcomes().filter(|o| o.fell_back).count()
    }

    pub fn copied(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.status, TaskStatus::Copied { .. }))
            .count()
    }

    pub fn bytes_saved(&self) -> u64 {
        self.outcomes().map(|o| o.bytes_saved()).sum()
    }

    /// Result for a file name, if it was part of this batch
    pub fn find(&self, file_name: &str) -> Option<&TaskResult> {
        self.results.iter().find(|r| r.file_name() == file_name)
    }

    fn outcomes(&self) -> impl Iterator<Item = &OptimizationOutcome> {
        self.results.iter().filter_map(|r| r.outcome())
    }
}

/// Totals across every batch of a run
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub directories: usize,
    pub files_processed: usize,
    pub files_optimized: usize,
    pub files_fallback: usize,
    pub files_copied: usize,
    pub errors: usize,
    /// Directories or entries that could not be read or created
    pub walk_errors: usize,
    pub total_bytes_saved: u64,
    pub total_original_size: u64,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absorb(&mut self, report: &BatchReport) {
        self.directories += 1;
        self.files_processed += report.total();
        self.files_optimized += report.optimized();
        self.files_fallback += report.fallbacks();
        self.files_copied += report.copied();
        self.errors += report.failed();
        self.total_bytes_saved += report.bytes_saved();
        self.total_original_size += report
            .results
            .iter()
            .filter_map(|r| r.outcome())
            .map(|o| o.original_size)
            .sum::<u64>();
    }

    /// Percentage saved over all GIFs seen
    pub fn overall_reduction_percent(&self) -> f64 {
        if self.total_original_size > 0 {
            (self.total_bytes_saved as f64 / self.total_original_size as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Directories: {} | Processed: {} files | Optimized: {} | Kept original: {} | Copied: {} | Errors: {} | Walk errors: {} | Total saved: {} ({:.2}%)",
            self.directories,
            self.files_processed,
            self.files_optimized,
            self.files_fallback,
            self.files_copied,
            self.errors,
            self.walk_errors,
            FileManager::format_size(self.total_bytes_saved),
            self.overall_reduction_percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn entry(name: &str, size: u64, kind: FileKind) -> SourceEntry {
        SourceEntry::new(Path::new("/src"), name, size, kind)
    }

    fn gif(name: &str, original: u64, final_size: u64, fell_back: bool) -> TaskResult {
        TaskResult::new(
            &entry(name, original, FileKind::Gif),
            TaskStatus::Gif(OptimizationOutcome {
                original_size: original,
                final_size,
                profiles_tried: 5,
                standing_profile: Some(4),
                fell_back,
            }),
        )
    }

    #[test]
    fn test_accepted_profile_is_none_after_fallback() {
        let result = gif("a.gif", 100, 100, true);
        let outcome = result.outcome().unwrap();
        assert_eq!(outcome.accepted_profile(), None);
        assert_eq!(outcome.bytes_saved(), 0);
    }

    #[test]
    fn test_batch_report_counts() {
        let mut report = BatchReport::new("sub");
        report.results.push(gif("a.gif", 100, 60, false));
        report.results.push(gif("b.gif", 100, 100, true));
        report
            .results
            .push(TaskResult::new(&entry("c.txt", 3, FileKind::Other), TaskStatus::Copied { bytes: 3 }));
        report.results.push(TaskResult::new(
            &entry("d.gif", 50, FileKind::Gif),
            TaskStatus::Failed(OptimizeError::Optimizer("boom".into())),
        ));

        assert_eq!(report.total(), 4);
        assert_eq!(report.succeeded(), 3);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.optimized(), 1);
        assert_eq!(report.fallbacks(), 1);
        assert_eq!(report.copied(), 1);
        assert_eq!(report.bytes_saved(), 40);
        assert!(report.find("d.gif").unwrap().error().is_some());
        assert_eq!(report.find("a.gif").unwrap().output_size(), Some(60));
        assert_eq!(report.find("c.txt").unwrap().output_size(), Some(3));
        assert_eq!(report.find("d.gif").unwrap().output_size(), None);
        assert_eq!(report.find("d.gif").unwrap().source_size, 50);

        let mut summary = RunSummary::new();
        summary.absorb(&report);
        assert_eq!(summary.directories, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.total_original_size, 200);
        assert!((summary.overall_reduction_percent() - 20.0).abs() < f64::EPSILON);
    }
}
