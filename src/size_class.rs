//! # Size Classification Module
//!
//! Bucket semantici per la dimensione dei file ottimizzati, usati solo per
//! colorare i messaggi di stato. La soglia di accettazione del ladder
//! (`profile::SIZE_BUDGET`, 9 MiB) è una costante separata.

use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};

const MIB: u64 = 1024 * 1024;
const KIB: u64 = 1024;

/// Lower bound of the `Medium` bucket
pub const MEDIUM_THRESHOLD: u64 = 6 * MIB;
/// Lower bound of the `High` bucket
pub const HIGH_THRESHOLD: u64 = 8 * MIB;

/// Display bucket for a byte count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Low,
    Medium,
    High,
}

impl SizeClass {
    pub fn classify(size_bytes: u64) -> Self {
        if size_bytes < MEDIUM_THRESHOLD {
            Self::Low
        } else if size_bytes < HIGH_THRESHOLD {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Applies the bucket color to `text`
    pub fn paint(&self, text: &str) -> ColoredString {
        match self {
            Self::Low => text.bright_green(),
            Self::Medium => text.bright_yellow(),
            Self::High => text.bright_red(),
        }
    }
}

/// Formats a size in MB, colored by its bucket
pub fn format_size_with_color(size_bytes: u64) -> String {
    let text = format!("{:.2} MB", size_bytes as f64 / MIB as f64);
    SizeClass::classify(size_bytes).paint(&text).to_string()
}

/// Formats a size delta in MB from 1 MiB upwards, in KB below
pub fn format_size_diff(diff_bytes: u64) -> String {
    if diff_bytes >= MIB {
        format!("{:.2} MB", diff_bytes as f64 / MIB as f64)
    } else {
        format!("{:.2} KB", diff_bytes as f64 / KIB as f64)
    }
}
