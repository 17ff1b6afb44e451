//! # Optimization Ladder
//!
//! The fixed sequence of gifsicle profiles, from least to most aggressive.
//! A candidate at or under [`SIZE_BUDGET`] stops the ladder.

use crate::args;
use serde::Serialize;
use std::path::Path;

/// Acceptance threshold for a candidate (9 MiB)
pub const SIZE_BUDGET: u64 = 9 * 1024 * 1024;

/// One step of the ladder
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimizationProfile {
    pub scale: f32,
    pub optimize_level: u8,
    pub lossy: Option<u32>,
}

impl OptimizationProfile {
    const fn new(scale: f32, lossy: Option<u32>) -> Self {
        Self {
            scale,
            optimize_level: 3,
            lossy,
        }
    }

    /// Builds the gifsicle argument list for this profile
    pub fn gifsicle_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let mut args = args!["-w", format!("--optimize={}", self.optimize_level)];
        if let Some(lossy) = self.lossy {
            args.push(format!("--lossy={}", lossy));
        }
        args.extend(args![
            format!("--scale={}", self.scale),
            input.display(),
            "-o",
            output.display(),
        ]);
        args
    }
}

/// The ladder, in the order it is applied
pub const LADDER: [OptimizationProfile; 5] = [
    OptimizationProfile::new(0.9, None),
    OptimizationProfile::new(0.8, None),
    OptimizationProfile::new(0.7, Some(90)),
    OptimizationProfile::new(0.6, Some(70)),
    OptimizationProfile::new(0.5, Some(50)),
];

/// Candidates at or under the budget end the ladder
pub fn fits_budget(size_bytes: u64) -> bool {
    size_bytes <= SIZE_BUDGET
}
