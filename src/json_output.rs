//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per uso programmatico.
//!
//! ## Responsabilità:
//! - Emette un oggetto JSON per riga su stdout per ogni evento della run
//! - Riusa `OptimizationOutcome` e `RunSummary` così come sono
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio della replica
//! - `batch_start`: Inizio di una directory
//! - `file_complete`: Fine elaborazione di un file
//! - `batch_complete`: Fine di una directory
//! - `walk_error`: Directory o entry illeggibile
//! - `complete`: Fine processo con statistiche finali

use crate::{
    error::OptimizeError,
    file_manager::FileKind,
    outcome::{BatchReport, OptimizationOutcome, RunSummary, TaskResult, TaskStatus},
    report::ReportSink,
    size_class::SizeClass,
};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Stato finale di un file nel messaggio `file_complete`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileState {
    Optimized,
    KeptOriginal,
    Copied,
    Skipped,
    Failed,
}

/// Tipo di messaggio JSON
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum JsonMessage {
    #[serde(rename = "start")]
    Start { input_dir: PathBuf, output_dir: PathBuf },

    #[serde(rename = "batch_start")]
    BatchStart { directory: String, total_files: usize },

    #[serde(rename = "file_complete")]
    FileComplete {
        directory: String,
        path: PathBuf,
        kind: FileKind,
        source_size: u64,
        state: FileState,
        #[serde(skip_serializing_if = "Option::is_none")]
        outcome: Option<OptimizationOutcome>,
        /// Ladder step (1-based) that produced the output
        #[serde(skip_serializing_if = "Option::is_none")]
        profile: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        size_class: Option<SizeClass>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    #[serde(rename = "batch_complete")]
    BatchComplete {
        directory: String,
        succeeded: usize,
        failed: usize,
        bytes_saved: u64,
    },

    #[serde(rename = "walk_error")]
    WalkError { path: PathBuf, message: String },

    #[serde(rename = "complete")]
    Complete {
        #[serde(flatten)]
        summary: RunSummary,
        duration_seconds: f64,
    },
}

impl JsonMessage {
    pub fn file_complete(directory: &str, result: &TaskResult) -> Self {
        let (state, outcome, error) = match &result.status {
            TaskStatus::Gif(outcome) if outcome.is_optimized() => {
                (FileState::Optimized, Some(outcome.clone()), None)
            }
            TaskStatus::Gif(outcome) => (FileState::KeptOriginal, Some(outcome.clone()), None),
            TaskStatus::Copied { .. } => (FileState::Copied, None, None),
            TaskStatus::Skipped => (FileState::Skipped, None, None),
            TaskStatus::Failed(e) => (FileState::Failed, None, Some(e.root().to_string())),
        };

        Self::FileComplete {
            directory: directory.to_string(),
            path: result.relative_path.clone(),
            kind: result.kind,
            source_size: result.source_size,
            state,
            profile: outcome
                .as_ref()
                .and_then(|o| o.accepted_profile())
                .map(|index| index + 1),
            size_class: outcome.as_ref().map(|o| o.size_class()),
            outcome,
            error,
        }
    }

    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"type":"error","message":"serialization failed: {}"}}"#, e)
        })
    }
}

/// Writes one JSON message per line to stdout
#[derive(Debug, Default)]
pub struct JsonReporter;

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }

    fn emit(&self, message: JsonMessage) {
        let line = message.to_line();
        // The stdout lock keeps lines from concurrent workers whole
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{}", line);
        let _ = stdout.flush();
    }
}

impl ReportSink for JsonReporter {
    fn run_started(&self, source: &Path, output: &Path) {
        self.emit(JsonMessage::Start {
            input_dir: source.to_path_buf(),
            output_dir: output.to_path_buf(),
        });
    }

    fn batch_started(&self, label: &str, total: usize) {
        self.emit(JsonMessage::BatchStart {
            directory: label.to_string(),
            total_files: total,
        });
    }

    fn file_finished(&self, label: &str, result: &TaskResult) {
        self.emit(JsonMessage::file_complete(label, result));
    }

    fn batch_finished(&self, report: &BatchReport) {
        self.emit(JsonMessage::BatchComplete {
            directory: report.label.clone(),
            succeeded: report.succeeded(),
            failed: report.failed(),
            bytes_saved: report.bytes_saved(),
        });
    }

    fn walk_error(&self, path: &Path, error: &OptimizeError) {
        self.emit(JsonMessage::WalkError {
            path: path.to_path_buf(),
            message: error.to_string(),
        });
    }

    fn run_finished(&self, summary: &RunSummary) {
        self.emit(JsonMessage::Complete {
            summary: summary.clone(),
            duration_seconds: summary.elapsed.as_secs_f64(),
        });
    }
}
