//! DamageResult - breakdown of one damage roll

use serde::{Deserialize, Serialize};

/// Outcome of a damage calculation, before guards, defend and shields
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageResult {
    /// Rounded damage, at least 1
    pub final_damage: f64,
    pub brand_multiplier: f64,
    pub synergy_multiplier: f64,
    /// Uniform roll in the configured variance range
    pub variance: f64,
    pub is_critical: bool,
    /// Offense / defense after clamping
    pub stat_ratio: f64,
    /// Outgoing bonus from effects such as berserk
    pub bonus_multiplier: f64,
}

impl DamageResult {
    /// Matchup favors the attacker
    pub fn is_super_effective(&self) -> bool {
        self.brand_multiplier >= crate::brand::STRONG_MULTIPLIER
    }

    pub fn is_resisted(&self) -> bool {
        self.brand_multiplier <= crate::brand::WEAK_MULTIPLIER
    }
}
