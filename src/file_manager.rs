//! # File Management Module
//!
//! Questo modulo gestisce tutte le operazioni sui file del tree sorgente.
//!
//! ## Responsabilità:
//! - Snapshot delle entry sorgente (`SourceEntry`) al momento del walk
//! - Determinazione del tipo di file (directory, GIF, altro)
//! - Elenco dei file direttamente contenuti in una directory
//! - Copia byte-per-byte dei file non ottimizzati
//! - Formattazione human-readable delle dimensioni
//!
//! ## Esempio:
//! ```rust,ignore
//! let files = FileManager::list_files(Path::new("sources/sub"))?;
//! for file in files {
//!     if FileManager::is_gif(&file) {
//!         // ladder
//!     }
//! }
//! ```

use crate::error::OptimizeError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Kind of a source entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Directory,
    Gif,
    Other,
    /// Neither a regular file nor a directory (fifo, socket, device)
    Special,
}

/// A path under the source root, captured at walk time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub relative_path: PathBuf,
    pub absolute_path: PathBuf,
    pub size: u64,
    pub kind: FileKind,
}

impl SourceEntry {
    pub fn new(root: &Path, relative_path: impl Into<PathBuf>, size: u64, kind: FileKind) -> Self {
        let relative_path = relative_path.into();
        Self {
            absolute_path: root.join(&relative_path),
            relative_path,
            size,
            kind,
        }
    }

    /// Snapshot `path`, which must live under `root`
    pub fn from_path(root: &Path, path: &Path) -> Result<Self, OptimizeError> {
        let metadata = std::fs::metadata(path)?;
        let kind = if metadata.is_dir() {
            FileKind::Directory
        } else if !metadata.is_file() {
            FileKind::Special
        } else if FileManager::is_gif(path) {
            FileKind::Gif
        } else {
            FileKind::Other
        };
        let size = if kind == FileKind::Directory { 0 } else { metadata.len() };

        Ok(Self {
            relative_path: path.strip_prefix(root).unwrap_or(path).to_path_buf(),
            absolute_path: path.to_path_buf(),
            size,
            kind,
        })
    }

    /// File name for status messages
    pub fn display_name(&self) -> String {
        self.absolute_path
            .file_name()
            .unwrap_or(self.absolute_path.as_os_str())
            .to_string_lossy()
            .into_owned()
    }
}

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Check if a file is a GIF (by extension, case-insensitive)
    pub fn is_gif(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("gif"))
            .unwrap_or(false)
    }

    /// Files directly inside `dir`, sorted by name. Subdirectories are left out.
    pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>, OptimizeError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| OptimizeError::Io(e.into()))?;
            if !entry.file_type().is_dir() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Size of `path`, or `None` if it does not exist
    pub async fn file_size(path: &Path) -> Result<Option<u64>, OptimizeError> {
        match fs::metadata(path).await {
            Ok(metadata) => Ok(Some(metadata.len())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Byte-for-byte copy of `source` to `output`
    pub async fn copy_verbatim(source: &Path, output: &Path) -> Result<u64, OptimizeError> {
        Ok(fs::copy(source, output).await?)
    }

    /// Remove `path` if present
    pub async fn remove_if_exists(path: &Path) -> Result<(), OptimizeError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Calculate percentage reduction
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}
