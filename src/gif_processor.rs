//! # GIF Processor Module
//!
//! Questo modulo incapsula l'invocazione del tool esterno di compressione GIF.
//!
//! ## Responsabilità:
//! - Definisce il trait `GifOptimizer`, l'unico punto di contatto con il tool
//! - Implementa `Gifsicle`, che lancia `gifsicle` con `tokio::process::Command`
//! - Converte exit code non-zero e spawn falliti in `OptimizeError::Optimizer`
//! - Verifica la presenza di gifsicle prima dell'avvio
//!
//! ## Contratto:
//! Il tool è una black box: il successo si osserva solo tramite l'esistenza e
//! la dimensione del file di output. Nessuna elaborazione in memoria.

use crate::{
    error::OptimizeError, profile::OptimizationProfile, tool_resolver::ToolPathResolver,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info};

/// Runs one ladder profile over a GIF, writing the candidate to `output`.
#[async_trait]
pub trait GifOptimizer: Send + Sync {
    async fn run_profile(
        &self,
        input: &Path,
        output: &Path,
        profile: &OptimizationProfile,
    ) -> Result<(), OptimizeError>;
}

/// `gifsicle` subprocess backend
#[derive(Debug, Clone)]
pub struct Gifsicle {
    tool_path: PathBuf,
}

impl Gifsicle {
    pub const TOOL_NAME: &'static str = "gifsicle";

    /// Use a known gifsicle binary
    pub fn new(tool_path: PathBuf) -> Self {
        Self { tool_path }
    }

    /// Locate gifsicle, failing with `MissingDependency` if it is nowhere to be found
    pub fn locate(resolver: &ToolPathResolver) -> Result<Self, OptimizeError> {
        let tool_path = resolver.resolve_tool(Self::TOOL_NAME).ok_or_else(|| {
            OptimizeError::MissingDependency(format!(
                "{} not found. Install it or pass --gifsicle <path>",
                Self::TOOL_NAME
            ))
        })?;
        info!("Using gifsicle at {}", tool_path.display());
        Ok(Self::new(tool_path))
    }

    pub fn tool_path(&self) -> &Path {
        &self.tool_path
    }
}

#[async_trait]
impl GifOptimizer for Gifsicle {
    async fn run_profile(
        &self,
        input: &Path,
        output: &Path,
        profile: &OptimizationProfile,
    ) -> Result<(), OptimizeError> {
        let args = profile.gifsicle_args(input, output);
        debug!("Command arguments: {:?}", args);

        let start_time = Instant::now();
        let result = Command::new(&self.tool_path)
            .args(&args)
            .output()
            .await
            .map_err(|e| {
                OptimizeError::Optimizer(format!(
                    "failed to launch {}: {}",
                    self.tool_path.display(),
                    e
                ))
            })?;
        let elapsed = start_time.elapsed();

        if result.status.success() {
            debug!("gifsicle finished {} in {:?}", input.display(), elapsed);
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&result.stderr);
            Err(OptimizeError::Optimizer(format!(
                "gifsicle exited with {} after {:?}: {}",
                result.status,
                elapsed,
                stderr.trim()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::LADDER;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_binary_is_optimizer_error() {
        let temp_dir = TempDir::new().unwrap();
        let gifsicle = Gifsicle::new(temp_dir.path().join("no-such-gifsicle"));

        let err = gifsicle
            .run_profile(
                &temp_dir.path().join("in.gif"),
                &temp_dir.path().join("out.gif"),
                &LADDER[0],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, OptimizeError::Optimizer(_)));
    }

    #[test]
    fn test_locate_without_gifsicle_is_missing_dependency() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = ToolPathResolver::new(Some(temp_dir.path().join("no-such-gifsicle")))
            .with_tools_dir(None)
            .with_system_path(Some(temp_dir.path().as_os_str().to_os_string()));

        let err = Gifsicle::locate(&resolver).unwrap_err();
        assert!(matches!(err, OptimizeError::MissingDependency(_)));
        assert!(err.to_string().contains("gifsicle not found"));
    }

    #[test]
    fn test_locate_with_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let tool = temp_dir.path().join("gifsicle");
        std::fs::write(&tool, b"").unwrap();

        let gifsicle = Gifsicle::locate(&ToolPathResolver::new(Some(tool.clone()))).unwrap();
        assert_eq!(gifsicle.tool_path(), tool.as_path());
    }
}
