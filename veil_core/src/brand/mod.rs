//! Brand effectiveness - the 10x10 type matchup table
//!
//! Every brand is strong against exactly two brands (2.0x), weak against
//! exactly two (0.5x) and neutral against the rest. The lists below are the
//! source of truth; nothing is derived from symmetry.

mod synergy;

pub use synergy::{evaluate_synergy, path_strong_brands, path_weak_brands, SynergyTier, MAX_PARTY_SIZE};

use crate::types::Brand;

/// Multiplier for a strong matchup
pub const STRONG_MULTIPLIER: f64 = 2.0;
/// Multiplier for a weak matchup
pub const WEAK_MULTIPLIER: f64 = 0.5;
/// Multiplier for everything else
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

impl Brand {
    /// Brands this brand deals double damage to
    pub fn strong_against(&self) -> &'static [Brand] {
        match self {
            Brand::Savage => &[Brand::Venom, Brand::Dread],
            Brand::Iron => &[Brand::Surge, Brand::Leech],
            Brand::Venom => &[Brand::Dread, Brand::Grace],
            Brand::Surge => &[Brand::Leech, Brand::Mend],
            Brand::Dread => &[Brand::Grace, Brand::Ruin],
            Brand::Leech => &[Brand::Mend, Brand::Void],
            Brand::Grace => &[Brand::Ruin, Brand::Savage],
            Brand::Mend => &[Brand::Void, Brand::Iron],
            Brand::Ruin => &[Brand::Savage, Brand::Venom],
            Brand::Void => &[Brand::Iron, Brand::Surge],
            Brand::Unbranded => &[],
        }
    }

    /// Brands this brand deals half damage to
    pub fn weak_against(&self) -> &'static [Brand] {
        match self {
            Brand::Savage => &[Brand::Grace, Brand::Ruin],
            Brand::Iron => &[Brand::Mend, Brand::Void],
            Brand::Venom => &[Brand::Ruin, Brand::Savage],
            Brand::Surge => &[Brand::Void, Brand::Iron],
            Brand::Dread => &[Brand::Savage, Brand::Venom],
            Brand::Leech => &[Brand::Iron, Brand::Surge],
            Brand::Grace => &[Brand::Venom, Brand::Dread],
            Brand::Mend => &[Brand::Surge, Brand::Leech],
            Brand::Ruin => &[Brand::Dread, Brand::Grace],
            Brand::Void => &[Brand::Leech, Brand::Mend],
            Brand::Unbranded => &[],
        }
    }
}

/// Damage multiplier for `attacker` hitting `defender`
pub fn effectiveness(attacker: Brand, defender: Brand) -> f64 {
    if attacker.strong_against().contains(&defender) {
        STRONG_MULTIPLIER
    } else if attacker.weak_against().contains(&defender) {
        WEAK_MULTIPLIER
    } else {
        NEUTRAL_MULTIPLIER
    }
}

/// Whether `attacker` hits `defender` for at least double damage
pub fn has_advantage(attacker: Brand, defender: Brand) -> bool {
    effectiveness(attacker, defender) >= STRONG_MULTIPLIER
}

/// Whether `attacker` hits `defender` for at most half damage
pub fn has_disadvantage(attacker: Brand, defender: Brand) -> bool {
    effectiveness(attacker, defender) <= WEAK_MULTIPLIER
}

/// Audit the literal table: every pair where "A strong vs B" is not matched
/// by "B weak vs A", or the reverse.
///
/// Returned as (a, b) with `a` the brand whose list has the unmatched edge.
pub fn table_inconsistencies() -> Vec<(Brand, Brand)> {
    let mut out = Vec::new();
    for &a in Brand::all() {
        for &b in a.strong_against() {
            if !b.weak_against().contains(&a) {
                out.push((a, b));
            }
        }
        for &b in a.weak_against() {
            if !b.strong_against().contains(&a) {
                out.push((a, b));
            }
        }
    }
    out
}
