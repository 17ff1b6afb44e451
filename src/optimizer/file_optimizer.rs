//! # File Optimizer Module
//!
//! Applica il ladder progressivo a una singola GIF.
//!
//! ## Algoritmo:
//! 1. Registra la dimensione sorgente `S`
//! 2. Per ogni profilo, in ordine: l'output viene svuotato e gifsicle scrive
//!    il nuovo candidato; se il candidato è ≤ 9 MiB il ladder si ferma
//! 3. A ladder esaurito resta l'ultimo candidato scritto
//! 4. `O` = dimensione del candidato, oppure `S` se non esiste
//! 5. Se `O >= S` il candidato viene scartato e si copia la sorgente
//! 6. Altrimenti il candidato resta e si riporta la riduzione
//!
//! Un profilo fallito chiude il ladder: l'eventuale candidato parziale viene
//! rimosso, quindi `O = S` e si copia la sorgente.

use crate::{
    error::OptimizeError,
    file_manager::FileManager,
    gif_processor::GifOptimizer,
    outcome::OptimizationOutcome,
    profile::{fits_budget, OptimizationProfile, LADDER},
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs the ladder over one GIF
#[derive(Clone)]
pub struct FileOptimizer {
    optimizer: Arc<dyn GifOptimizer>,
    ladder: &'static [OptimizationProfile],
}

impl FileOptimizer {
    pub fn new(optimizer: Arc<dyn GifOptimizer>) -> Self {
        Self {
            optimizer,
            ladder: &LADDER,
        }
    }

    /// Optimize `source` into `output`. The file left at `output` is never
    /// larger than `source`.
    pub async fn optimize(
        &self,
        source: &Path,
        output: &Path,
    ) -> Result<OptimizationOutcome, OptimizeError> {
        let source_size = tokio::fs::metadata(source).await?.len();

        let mut profiles_tried = 0;
        let mut standing_profile = None;

        for (index, profile) in self.ladder.iter().enumerate() {
            profiles_tried += 1;
            // A candidate at `output` must come from this profile
            FileManager::remove_if_exists(output).await?;

            if let Err(e) = self.optimizer.run_profile(source, output, profile).await {
                warn!(
                    "Profile {} failed for {}: {}",
                    index + 1,
                    source.display(),
                    e
                );
                FileManager::remove_if_exists(output).await?;
                standing_profile = None;
                break;
            }

            match FileManager::file_size(output).await? {
                Some(candidate_size) => {
                    standing_profile = Some(index);
                    debug!(
                        "Profile {} produced {} for {}",
                        index + 1,
                        FileManager::format_size(candidate_size),
                        source.display()
                    );
                    if fits_budget(candidate_size) {
                        break;
                    }
                }
                None => standing_profile = None,
            }
        }

        let output_size = FileManager::file_size(output)
            .await?
            .unwrap_or(source_size);

        if output_size >= source_size {
            debug!(
                "No reduction for {} ({} -> {}), copying original",
                source.display(),
                source_size,
                output_size
            );
            FileManager::copy_verbatim(source, output).await?;
            return Ok(OptimizationOutcome {
                original_size: source_size,
                final_size: source_size,
                profiles_tried,
                standing_profile,
                fell_back: true,
            });
        }

        debug!(
            "Reduced {} by {:.1}%",
            source.display(),
            FileManager::calculate_reduction(source_size, output_size)
        );
        Ok(OptimizationOutcome {
            original_size: source_size,
            final_size: output_size,
            profiles_tried,
            standing_profile,
            fell_back: false,
        })
    }
}
