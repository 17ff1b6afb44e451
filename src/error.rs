//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `OptimizeError` enum per categorizzare tutti gli errori possibili
//! - Fornisce messaggi di errore descrittivi e strutturati
//! - Integra con `thiserror` per automatic error conversion
//! - Separa gli errori per-file (`Task`) dagli errori fatali di setup
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (sorgente illeggibile, output non scrivibile, mkdir)
//! - `Optimizer`: gifsicle fallito o nessun output utilizzabile
//! - `MissingDependency`: Tool esterno mancante (gifsicle)
//! - `SourceMissing`: Directory sorgente inesistente
//! - `Validation`: Errori di validazione configurazione
//! - `Worker`: Task del worker pool terminato in panic
//! - `Task`: Errore di un singolo file, mai propagato oltre il batch
//!
//! ## Esempio:
//! ```rust,ignore
//! if tool_path.is_none() {
//!     return Err(OptimizeError::MissingDependency("gifsicle".to_string()));
//! }
//! ```

use std::path::PathBuf;

/// Custom error types for GIF tree optimization
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Optimizer error: {0}")]
    Optimizer(String),

    #[error("Dependency missing: {0}")]
    MissingDependency(String),

    #[error("Source directory does not exist: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Worker error: {0}")]
    Worker(String),

    #[error("{file}: {source}")]
    Task {
        file: String,
        #[source]
        source: Box<OptimizeError>,
    },
}

impl OptimizeError {
    /// Wraps an error raised while processing a single file
    pub fn task(file: impl Into<String>, source: OptimizeError) -> Self {
        Self::Task {
            file: file.into(),
            source: Box::new(source),
        }
    }

    /// Innermost error, skipping any `Task` wrappers
    pub fn root(&self) -> &OptimizeError {
        match self {
            Self::Task { source, .. } => source.root(),
            other => other,
        }
    }
}
