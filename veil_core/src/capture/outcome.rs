//! Capture outcome - captured, fled or berserk

use super::bind::BoundMonster;
use super::chance::CaptureCalculation;
use crate::config::CaptureConstants;
use crate::types::Rarity;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// What happened to a bound monster after the capture roll
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum CaptureOutcome {
    Captured,
    /// Leaves the battle; no penalty
    Fled,
    /// Breaks free enraged and combat resumes
    Berserk { damage_bonus: f64 },
}

impl CaptureOutcome {
    pub fn is_captured(&self) -> bool {
        matches!(self, CaptureOutcome::Captured)
    }
}

/// Chance a failed capture turns berserk instead of fleeing
pub fn berserk_chance(corruption: f64, rarity: Rarity, monster_level: u32, player_level: u32) -> f64 {
    let mut chance: f64 = if corruption <= 25.0 {
        0.30
    } else if corruption <= 50.0 {
        0.50
    } else {
        0.70
    };
    if rarity >= Rarity::Epic {
        chance += 0.20;
    }
    if player_level.checked_add(5).is_some_and(|floor| monster_level >= floor) {
        chance += 0.10;
    }
    chance.clamp(0.0, 1.0)
}

/// Roll a capture, then flee vs berserk on failure
pub fn roll_capture(
    calculation: &CaptureCalculation,
    bound: &BoundMonster,
    player_level: u32,
    constants: &CaptureConstants,
    rng: &mut impl Rng,
) -> CaptureOutcome {
    if rng.gen::<f64>() < calculation.final_chance {
        return CaptureOutcome::Captured;
    }

    let berserk = berserk_chance(bound.corruption, bound.rarity, bound.level, player_level);
    if rng.gen::<f64>() < berserk {
        let damage_bonus = if constants.berserk_min_bonus >= constants.berserk_max_bonus {
            constants.berserk_max_bonus
        } else {
            rng.gen_range(constants.berserk_min_bonus..=constants.berserk_max_bonus)
        };
        CaptureOutcome::Berserk { damage_bonus }
    } else {
        CaptureOutcome::Fled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::chance::{CaptureItem, QteGrade};
    use crate::types::{Brand, CombatantId};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bound(corruption: f64, rarity: Rarity) -> BoundMonster {
        BoundMonster {
            id: CombatantId(3),
            name: "wild".to_string(),
            brand: Brand::Ruin,
            rarity,
            level: 10,
            hp_percent: 0.2,
            corruption,
            threshold: 0.25,
            bound_at: 0.0,
        }
    }

    #[test]
    fn test_berserk_chance_table() {
        assert!((berserk_chance(10.0, Rarity::Common, 10, 10) - 0.30).abs() < 1e-9);
        assert!((berserk_chance(40.0, Rarity::Common, 10, 10) - 0.50).abs() < 1e-9);
        assert!((berserk_chance(90.0, Rarity::Common, 10, 10) - 0.70).abs() < 1e-9);
        assert!((berserk_chance(90.0, Rarity::Legendary, 20, 10) - 1.0).abs() < 1e-9);
        assert!((berserk_chance(10.0, Rarity::Epic, 15, 10) - 0.60).abs() < 1e-9);
    }

    #[test]
    fn test_berserk_chance_at_level_ceiling() {
        assert!((berserk_chance(10.0, Rarity::Common, u32::MAX, u32::MAX) - 0.30).abs() < 1e-9);
        assert!((berserk_chance(10.0, Rarity::Common, u32::MAX, u32::MAX - 5) - 0.40).abs() < 1e-9);
        assert!((berserk_chance(90.0, Rarity::Legendary, u32::MAX, 1) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_failures_split_between_flee_and_berserk() {
        let constants = CaptureConstants {
            max_chance: 0.01,
            ..Default::default()
        };
        let monster = bound(90.0, Rarity::Common);
        let calc = CaptureCalculation::compute(&monster, 10, CaptureItem::Crude, QteGrade::Miss, &constants);
        let mut rng = StdRng::seed_from_u64(77);

        let mut berserk = 0;
        let mut fled = 0;
        for _ in 0..1000 {
            match roll_capture(&calc, &monster, 10, &constants, &mut rng) {
                CaptureOutcome::Berserk { damage_bonus } => {
                    assert!((0.30..=0.50).contains(&damage_bonus));
                    berserk += 1;
                }
                CaptureOutcome::Fled => fled += 1,
                CaptureOutcome::Captured => {}
            }
        }
        // High corruption leans berserk (70/30)
        assert!(berserk > fled);
        assert!(fled > 0);
    }

    #[test]
    fn test_certain_capture() {
        let constants = CaptureConstants {
            min_chance: 1.0,
            max_chance: 1.0,
            ..Default::default()
        };
        let monster = bound(5.0, Rarity::Common);
        let calc = CaptureCalculation::compute(&monster, 10, CaptureItem::Master, QteGrade::Perfect, &constants);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(roll_capture(&calc, &monster, 10, &constants, &mut rng).is_captured());
    }
}
