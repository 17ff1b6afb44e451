//! # Optimizer Module
//!
//! Modulo che separa le responsabilità in sottomoduli:
//! - `tree_walker`: Orchestratore principale, una directory alla volta
//! - `batch_scheduler`: Worker pool per i file di una directory
//! - `file_task`: Worker per singoli file (ladder o copia)
//! - `file_optimizer`: Ladder progressivo su una GIF
//! - `path_resolver`: Logica di calcolo path centralizzata

pub mod batch_scheduler;
pub mod file_optimizer;
pub mod file_task;
pub mod path_resolver;
pub mod tree_walker;

pub use batch_scheduler::{BatchFile, BatchScheduler};
pub use file_optimizer::FileOptimizer;
pub use file_task::FileTask;
pub use path_resolver::PathResolver;
pub use tree_walker::TreeWalker;
