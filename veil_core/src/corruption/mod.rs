//! Corruption - banded stat multipliers and the untamed threshold

use serde::{Deserialize, Serialize};

/// Lowest corruption value
pub const MIN_CORRUPTION: f64 = 0.0;
/// Highest corruption value
pub const MAX_CORRUPTION: f64 = 100.0;
/// At or above this value the monster ignores player commands
pub const UNTAMED_THRESHOLD: f64 = 80.0;

/// Named corruption band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptionBand {
    /// 0-10
    Ascended,
    /// 11-25
    Purified,
    /// 26-50
    Unstable,
    /// 51-75
    Corrupted,
    /// 76-79
    Abyssal,
    /// 80-100
    Untamed,
}

impl CorruptionBand {
    /// Band for a corruption value; out-of-range values are clamped first
    pub fn from_value(corruption: f64) -> Self {
        let c = clamp_corruption(corruption);
        if c <= 10.0 {
            CorruptionBand::Ascended
        } else if c <= 25.0 {
            CorruptionBand::Purified
        } else if c <= 50.0 {
            CorruptionBand::Unstable
        } else if c <= 75.0 {
            CorruptionBand::Corrupted
        } else if c < UNTAMED_THRESHOLD {
            CorruptionBand::Abyssal
        } else {
            CorruptionBand::Untamed
        }
    }

    /// Flat multiplier applied to every combat stat
    pub fn stat_multiplier(&self) -> f64 {
        match self {
            CorruptionBand::Ascended => 1.25,
            CorruptionBand::Purified => 1.10,
            CorruptionBand::Unstable => 1.0,
            CorruptionBand::Corrupted => 0.90,
            CorruptionBand::Abyssal | CorruptionBand::Untamed => 0.80,
        }
    }

    /// Whether the monster has stopped obeying
    pub fn is_untamed(&self) -> bool {
        matches!(self, CorruptionBand::Untamed)
    }
}

/// Clamp a value into the valid corruption range. NaN becomes 0.
pub fn clamp_corruption(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_CORRUPTION;
    }
    value.clamp(MIN_CORRUPTION, MAX_CORRUPTION)
}
