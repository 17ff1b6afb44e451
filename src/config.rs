//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con i parametri della replica
//! - Fornisce validazione dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `source_dir`: Directory sorgente (default: "sources")
//! - `output_dir`: Directory di output (default: "outputs")
//! - `workers`: Numero di worker paralleli per batch (default: numero di CPU)
//! - `gifsicle_path`: Path esplicito di gifsicle (default: None = ricerca)
//! - `json_output`: Eventi JSON su stdout invece delle progress bar
//!
//! Il ladder di ottimizzazione è fisso e non configurabile.
//!
//! ## Esempio:
//! ```rust,ignore
//! let config = Config {
//!     workers: 8,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use crate::optimizer::path_resolver::PathResolver;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for tree replication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the tree to mirror
    pub source_dir: PathBuf,
    /// Root of the mirrored tree
    pub output_dir: PathBuf,
    /// Number of parallel workers per directory batch
    pub workers: usize,
    /// Explicit gifsicle binary (None = TOOLS_DIR, then PATH)
    pub gifsicle_path: Option<PathBuf>,
    /// Output progress and status as JSON for programmatic use
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("sources"),
            output_dir: PathBuf::from("outputs"),
            workers: num_cpus::get(),
            gifsicle_path: None,
            json_output: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(anyhow::anyhow!("Number of workers must be greater than 0"));
        }

        let source = PathResolver::resolve(&self.source_dir);
        let output = PathResolver::resolve(&self.output_dir);

        if source == output {
            return Err(anyhow::anyhow!(
                "Output directory must differ from source directory: {}",
                self.source_dir.display()
            ));
        }

        if output.starts_with(&source) {
            return Err(anyhow::anyhow!(
                "Output directory {} must not be inside source directory {}",
                self.output_dir.display(),
                self.source_dir.display()
            ));
        }

        Ok(())
    }

    /// Default config file location (`<config dir>/gif-tree-optimizer/config.json`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gif-tree-optimizer").join("config.json"))
    }

    /// Load configuration from file; a missing file yields the defaults.
    /// Not validated here: CLI overrides are applied first.
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.workers = 0;
        assert!(config.validate().is_err());

        config.workers = 2;
        config.output_dir = config.source_dir.clone();
        assert!(config.validate().is_err());

        config.output_dir = config.source_dir.join("nested");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nested_output_is_rejected_regardless_of_spelling() {
        let config = Config {
            source_dir: PathBuf::from("./sources"),
            output_dir: PathBuf::from("sources/out"),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            source_dir: PathBuf::from("sources"),
            output_dir: std::env::current_dir().unwrap().join("sources"),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("gifs")).unwrap();
        let config = Config {
            source_dir: temp_dir.path().join("gifs"),
            output_dir: temp_dir.path().join("gifs").join("..").join("gifs").join("small"),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sibling_output_is_accepted() {
        let config = Config {
            source_dir: PathBuf::from("./sources"),
            output_dir: PathBuf::from("sources-small"),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.source_dir, PathBuf::from("sources"));
        assert_eq!(config.output_dir, PathBuf::from("outputs"));
        assert!(config.workers >= 1);
        assert!(config.gifsicle_path.is_none());
        assert!(!config.json_output);
    }

    #[tokio::test]
    async fn test_config_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.json");

        let original_config = Config {
            source_dir: PathBuf::from("/data/gifs"),
            output_dir: PathBuf::from("/data/small"),
            workers: 3,
            gifsicle_path: Some(PathBuf::from("/opt/bin/gifsicle")),
            json_output: true,
        };

        original_config.save_to_file(&config_path).await.unwrap();
        let loaded_config = Config::from_file(&config_path).await.unwrap();

        assert_eq!(loaded_config, original_config);
    }

    #[tokio::test]
    async fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        tokio::fs::write(&config_path, r#"{ "workers": 5 }"#).await.unwrap();

        let config = Config::from_file(&config_path).await.unwrap();
        assert_eq!(config.workers, 5);
        assert_eq!(config.source_dir, PathBuf::from("sources"));
    }

    #[tokio::test]
    async fn test_invalid_file_values_load_for_later_override() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        tokio::fs::write(&config_path, r#"{ "workers": 0 }"#).await.unwrap();

        let mut config = Config::from_file(&config_path).await.unwrap();
        assert!(config.validate().is_err());

        config.workers = 4;
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::from_file(&temp_dir.path().join("absent.json")).await.unwrap();
        assert_eq!(config, Config::default());
    }
}
