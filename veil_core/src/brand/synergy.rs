//! Party synergy against the champion's Path

use crate::types::{Brand, Path};
use serde::{Deserialize, Serialize};

/// Number of monsters that count toward synergy
pub const MAX_PARTY_SIZE: usize = 3;

/// Synergy level of the active party
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynergyTier {
    /// No party to evaluate
    None,
    Anti,
    Neutral,
    Partial,
    Full,
}

impl SynergyTier {
    /// Outgoing damage multiplier
    pub fn damage_multiplier(&self) -> f64 {
        match self {
            SynergyTier::Full => 1.08,
            SynergyTier::Partial => 1.05,
            _ => 1.0,
        }
    }

    /// Incoming damage is divided by this
    pub fn defense_multiplier(&self) -> f64 {
        self.damage_multiplier()
    }

    /// Scales corruption gained during battle
    pub fn corruption_rate_multiplier(&self) -> f64 {
        match self {
            SynergyTier::Full => 0.5,
            SynergyTier::Partial => 0.75,
            SynergyTier::Anti => 1.5,
            SynergyTier::Neutral | SynergyTier::None => 1.0,
        }
    }

    /// Combo attacks unlock only at full synergy
    pub fn combo_unlocked(&self) -> bool {
        matches!(self, SynergyTier::Full)
    }
}

/// Brands that build synergy with a Path
pub fn path_strong_brands(path: Path) -> &'static [Brand] {
    match path {
        Path::Ironbound => &[Brand::Iron, Brand::Mend, Brand::Grace],
        Path::Fangborn => &[Brand::Savage, Brand::Venom, Brand::Leech],
        Path::Voidtouched => &[Brand::Void, Brand::Dread, Brand::Ruin],
        Path::Stormbound => &[Brand::Surge, Brand::Savage, Brand::Ruin],
        Path::Unchained => &[],
    }
}

/// Brands that clash with a Path
pub fn path_weak_brands(path: Path) -> &'static [Brand] {
    match path {
        Path::Ironbound => &[Brand::Void, Brand::Venom],
        Path::Fangborn => &[Brand::Grace, Brand::Mend],
        Path::Voidtouched => &[Brand::Grace, Brand::Iron],
        Path::Stormbound => &[Brand::Leech, Brand::Dread],
        Path::Unchained => &[],
    }
}

/// Compute the synergy tier for a champion path and the active party brands.
///
/// Only the first [`MAX_PARTY_SIZE`] brands are considered. A single clashing
/// brand makes the whole party anti-synergistic regardless of matches.
pub fn evaluate_synergy(path: Path, party: &[Brand]) -> SynergyTier {
    if path == Path::Unchained {
        return SynergyTier::Neutral;
    }
    let party = &party[..party.len().min(MAX_PARTY_SIZE)];
    if party.is_empty() {
        return SynergyTier::None;
    }

    let weak = path_weak_brands(path);
    if party.iter().any(|b| weak.contains(b)) {
        return SynergyTier::Anti;
    }

    let strong = path_strong_brands(path);
    match party.iter().filter(|b| strong.contains(b)).count() {
        3 => SynergyTier::Full,
        2 => SynergyTier::Partial,
        _ => SynergyTier::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchained_always_neutral() {
        for &a in Brand::all() {
            for &b in Brand::all() {
                assert_eq!(evaluate_synergy(Path::Unchained, &[a, b]), SynergyTier::Neutral);
            }
        }
        assert_eq!(evaluate_synergy(Path::Unchained, &[]), SynergyTier::Neutral);
    }

    #[test]
    fn test_full_and_partial() {
        let full = evaluate_synergy(Path::Ironbound, &[Brand::Iron, Brand::Mend, Brand::Grace]);
        assert_eq!(full, SynergyTier::Full);
        assert!(full.combo_unlocked());

        let partial = evaluate_synergy(Path::Ironbound, &[Brand::Iron, Brand::Mend, Brand::Surge]);
        assert_eq!(partial, SynergyTier::Partial);
        assert!(!partial.combo_unlocked());

        let neutral = evaluate_synergy(Path::Ironbound, &[Brand::Iron, Brand::Surge, Brand::Dread]);
        assert_eq!(neutral, SynergyTier::Neutral);
    }

    #[test]
    fn test_repeated_brands_count() {
        let tier = evaluate_synergy(Path::Fangborn, &[Brand::Savage, Brand::Savage, Brand::Savage]);
        assert_eq!(tier, SynergyTier::Full);
    }

    #[test]
    fn test_weak_brand_overrides_matches() {
        // Two Voidtouched matches plus one clash
        let tier = evaluate_synergy(Path::Voidtouched, &[Brand::Void, Brand::Dread, Brand::Grace]);
        assert_eq!(tier, SynergyTier::Anti);
    }

    #[test]
    fn test_only_first_three_count() {
        let tier = evaluate_synergy(
            Path::Ironbound,
            &[Brand::Iron, Brand::Mend, Brand::Grace, Brand::Void],
        );
        assert_eq!(tier, SynergyTier::Full);
    }

    #[test]
    fn test_empty_party_is_none() {
        assert_eq!(evaluate_synergy(Path::Stormbound, &[]), SynergyTier::None);
    }

    #[test]
    fn test_tier_multipliers() {
        assert!((SynergyTier::Full.damage_multiplier() - 1.08).abs() < f64::EPSILON);
        assert!((SynergyTier::Partial.defense_multiplier() - 1.05).abs() < f64::EPSILON);
        assert!((SynergyTier::Anti.damage_multiplier() - 1.0).abs() < f64::EPSILON);
        assert!((SynergyTier::Full.corruption_rate_multiplier() - 0.5).abs() < f64::EPSILON);
        assert!((SynergyTier::Partial.corruption_rate_multiplier() - 0.75).abs() < f64::EPSILON);
        assert!((SynergyTier::Anti.corruption_rate_multiplier() - 1.5).abs() < f64::EPSILON);
        assert!((SynergyTier::Neutral.corruption_rate_multiplier() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_strong_and_weak_sets_disjoint() {
        for &path in Path::all() {
            for b in path_strong_brands(path) {
                assert!(!path_weak_brands(path).contains(b), "{:?} {:?}", path, b);
            }
        }
    }
}
