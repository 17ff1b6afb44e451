//! # GIF Tree Optimizer - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Caricamento e validazione della configurazione
//! - Ricerca di gifsicle e avvio del walker
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (sorgente, output, workers, etc.)
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose)
//! 3. Carica il file di configurazione, applica gli override CLI e valida
//! 4. Verifica che gifsicle sia disponibile
//! 5. Replica il tree; gli errori per-file non cambiano l'exit code
//!
//! ## Esempio di utilizzo:
//! ```bash
//! gif-tree-optimizer sources outputs --workers 8 --verbose
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gif_tree_optimizer::{
    Config, ConsoleReporter, Gifsicle, JsonReporter, ReportSink, ToolPathResolver, TreeWalker,
};

#[derive(Parser)]
#[command(name = "gif-tree-optimizer")]
#[command(about = "Mirror a directory tree, shrinking every GIF under 9 MiB")]
struct Args {
    /// Directory tree to mirror
    source: Option<PathBuf>,

    /// Where the mirrored tree is written
    output: Option<PathBuf>,

    /// Number of parallel workers per directory (default: CPU count)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Path to the gifsicle binary
    #[arg(long)]
    gifsicle: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit JSON events on stdout instead of progress bars
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    async fn into_config(self) -> Result<Config> {
        let config_path = self.config.clone().or_else(Config::default_path);
        let mut config = match config_path {
            Some(path) => Config::from_file(&path).await?,
            None => Config::default(),
        };

        if let Some(source) = self.source {
            config.source_dir = source;
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if self.gifsicle.is_some() {
            config.gifsicle_path = self.gifsicle;
        }
        config.json_output |= self.json;

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = args.into_config().await?;

    let resolver = ToolPathResolver::new(config.gifsicle_path.clone());
    let gifsicle = Gifsicle::locate(&resolver)?;

    let reporter: Arc<dyn ReportSink> = if config.json_output {
        Arc::new(JsonReporter::new())
    } else {
        Arc::new(ConsoleReporter::new(true))
    };

    let walker = TreeWalker::new(Arc::new(gifsicle), config.workers, reporter);
    let summary = walker
        .replicate(&config.source_dir, &config.output_dir)
        .await?;

    if summary.errors > 0 || summary.walk_errors > 0 {
        info!(
            "Finished with {} file error(s) and {} walk error(s)",
            summary.errors, summary.walk_errors
        );
    }

    Ok(())
}
