//! # GIF Tree Optimizer Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per i test
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore custom
//! - `size_class`: Bucket di dimensione per i messaggi colorati
//! - `profile`: Ladder fisso di profili gifsicle e budget di 9 MiB
//! - `gif_processor`: Trait `GifOptimizer` e backend `gifsicle`
//! - `tool_resolver`: Ricerca del binario gifsicle
//! - `file_manager`: Operazioni sui file e snapshot delle entry
//! - `optimizer`: Walker, scheduler, task e ladder
//! - `outcome`: Risultati per file, batch e run
//! - `report`, `progress`, `json_output`: Sink di report
//!
//! ## Utilizzo:
//! ```rust,ignore
//! use gif_tree_optimizer::{ConsoleReporter, Gifsicle, ToolPathResolver, TreeWalker};
//!
//! let gifsicle = Gifsicle::locate(&ToolPathResolver::new(None))?;
//! let walker = TreeWalker::new(Arc::new(gifsicle), 8, Arc::new(ConsoleReporter::new(true)));
//! let summary = walker.replicate(Path::new("sources"), Path::new("outputs")).await?;
//! ```

pub mod config;
pub mod error;
pub mod file_manager;
pub mod gif_processor;
pub mod json_output;
pub mod optimizer;
pub mod outcome;
pub mod profile;
pub mod progress;
pub mod report;
pub mod size_class;
pub mod tool_resolver;
pub mod utils;

pub use config::Config;
pub use error::OptimizeError;
pub use file_manager::{FileKind, SourceEntry};
pub use gif_processor::{GifOptimizer, Gifsicle};
pub use json_output::JsonReporter;
pub use optimizer::{BatchFile, BatchScheduler, FileOptimizer, FileTask, TreeWalker};
pub use outcome::{BatchReport, OptimizationOutcome, RunSummary, TaskResult, TaskStatus};
pub use profile::{OptimizationProfile, LADDER, SIZE_BUDGET};
pub use progress::ConsoleReporter;
pub use report::{MemoryReporter, ReportSink};
pub use size_class::SizeClass;
pub use tool_resolver::ToolPathResolver;
