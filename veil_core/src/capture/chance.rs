//! Post-battle capture chance

use super::bind::BoundMonster;
use crate::config::CaptureConstants;
use crate::types::Rarity;
use serde::{Deserialize, Serialize};

/// Capture item tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureItem {
    Crude,
    Standard,
    Greater,
    Master,
}

impl CaptureItem {
    pub fn all() -> &'static [CaptureItem] {
        &[CaptureItem::Crude, CaptureItem::Standard, CaptureItem::Greater, CaptureItem::Master]
    }

    /// Bonus against a given rarity; better items lose less on rare targets
    pub fn modifier(&self, rarity: Rarity) -> f64 {
        const TABLE: [[f64; 5]; 4] = [
            [0.05, 0.03, 0.01, 0.0, 0.0],
            [0.10, 0.08, 0.05, 0.02, 0.01],
            [0.20, 0.18, 0.15, 0.10, 0.05],
            [0.35, 0.33, 0.30, 0.25, 0.20],
        ];
        let row = match self {
            CaptureItem::Crude => 0,
            CaptureItem::Standard => 1,
            CaptureItem::Greater => 2,
            CaptureItem::Master => 3,
        };
        TABLE[row][rarity.tier()]
    }
}

/// Timing minigame result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QteGrade {
    Miss,
    Okay,
    Good,
    Perfect,
}

impl QteGrade {
    pub fn all() -> &'static [QteGrade] {
        &[QteGrade::Miss, QteGrade::Okay, QteGrade::Good, QteGrade::Perfect]
    }

    pub fn bonus(&self) -> f64 {
        match self {
            QteGrade::Miss => 0.0,
            QteGrade::Okay => 0.05,
            QteGrade::Good => 0.10,
            QteGrade::Perfect => 0.15,
        }
    }
}

/// Bonus for how close to death the monster was when bound
pub fn hp_bonus(hp_percent: f64) -> f64 {
    if hp_percent <= 0.05 {
        0.25
    } else if hp_percent <= 0.10 {
        0.20
    } else if hp_percent <= 0.15 {
        0.15
    } else if hp_percent <= 0.25 {
        0.10
    } else if hp_percent <= 0.35 {
        0.05
    } else {
        0.0
    }
}

pub fn corruption_capture_modifier(corruption: f64) -> f64 {
    if corruption <= 10.0 {
        0.20
    } else if corruption <= 25.0 {
        0.10
    } else if corruption <= 50.0 {
        0.0
    } else if corruption <= 75.0 {
        -0.10
    } else {
        -0.20
    }
}

pub fn rarity_capture_modifier(rarity: Rarity) -> f64 {
    match rarity {
        Rarity::Common => 0.0,
        Rarity::Uncommon => -0.10,
        Rarity::Rare => -0.25,
        Rarity::Epic => -0.45,
        Rarity::Legendary => -0.75,
    }
}

/// 3% per level of advantage, clamped to [-0.25, +0.15]
pub fn level_capture_modifier(player_level: u32, monster_level: u32) -> f64 {
    let diff = player_level as f64 - monster_level as f64;
    (diff * 0.03).clamp(-0.25, 0.15)
}

/// Per-term breakdown of a capture chance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptureCalculation {
    pub base: f64,
    pub hp_bonus: f64,
    pub corruption_mod: f64,
    pub rarity_mod: f64,
    pub level_mod: f64,
    pub item_mod: f64,
    pub qte_bonus: f64,
    /// Sum before clamping
    pub raw_chance: f64,
    pub final_chance: f64,
}

impl CaptureCalculation {
    pub fn compute(
        bound: &BoundMonster,
        player_level: u32,
        item: CaptureItem,
        qte: QteGrade,
        constants: &CaptureConstants,
    ) -> Self {
        let base = constants.base_chance;
        let hp_bonus = hp_bonus(bound.hp_percent);
        let corruption_mod = corruption_capture_modifier(bound.corruption);
        let rarity_mod = rarity_capture_modifier(bound.rarity);
        let level_mod = level_capture_modifier(player_level, bound.level);
        let item_mod = item.modifier(bound.rarity);
        let qte_bonus = qte.bonus();

        let raw_chance = base + hp_bonus + corruption_mod + rarity_mod + level_mod + item_mod + qte_bonus;
        CaptureCalculation {
            base,
            hp_bonus,
            corruption_mod,
            rarity_mod,
            level_mod,
            item_mod,
            qte_bonus,
            raw_chance,
            final_chance: raw_chance.clamp(constants.min_chance, constants.max_chance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Brand, CombatantId};

    fn bound(rarity: Rarity, hp_percent: f64, corruption: f64, level: u32) -> BoundMonster {
        BoundMonster {
            id: CombatantId(1),
            name: "wild".to_string(),
            brand: Brand::Venom,
            rarity,
            level,
            hp_percent,
            corruption,
            threshold: 0.25,
            bound_at: 0.0,
        }
    }

    #[test]
    fn test_breakdown() {
        let calc = CaptureCalculation::compute(
            &bound(Rarity::Rare, 0.08, 20.0, 10),
            12,
            CaptureItem::Greater,
            QteGrade::Good,
            &CaptureConstants::default(),
        );
        assert!((calc.hp_bonus - 0.20).abs() < 1e-9);
        assert!((calc.corruption_mod - 0.10).abs() < 1e-9);
        assert!((calc.rarity_mod + 0.25).abs() < 1e-9);
        assert!((calc.level_mod - 0.06).abs() < 1e-9);
        assert!((calc.item_mod - 0.15).abs() < 1e-9);
        // 0.5 + 0.2 + 0.1 - 0.25 + 0.06 + 0.15 + 0.1
        assert!((calc.final_chance - 0.86).abs() < 1e-9);
    }

    #[test]
    fn test_clamped_to_bounds() {
        let constants = CaptureConstants::default();
        let hopeless = CaptureCalculation::compute(
            &bound(Rarity::Legendary, 1.0, 100.0, 60),
            1,
            CaptureItem::Crude,
            QteGrade::Miss,
            &constants,
        );
        assert!((hopeless.final_chance - 0.01).abs() < 1e-9);
        assert!(hopeless.raw_chance < 0.0);

        let certain = CaptureCalculation::compute(
            &bound(Rarity::Common, 0.01, 0.0, 1),
            50,
            CaptureItem::Master,
            QteGrade::Perfect,
            &constants,
        );
        assert!((certain.final_chance - 0.99).abs() < 1e-9);
    }

    #[test]
    fn test_level_modifier_clamps() {
        assert!((level_capture_modifier(30, 10) - 0.15).abs() < 1e-9);
        assert!((level_capture_modifier(1, 40) + 0.25).abs() < 1e-9);
        assert!(level_capture_modifier(10, 10).abs() < 1e-9);
    }

    #[test]
    fn test_item_table_never_decreases_with_tier() {
        for rarity in Rarity::all() {
            let mods: Vec<f64> = CaptureItem::all().iter().map(|i| i.modifier(*rarity)).collect();
            assert!(mods.windows(2).all(|w| w[0] <= w[1]), "{:?}", rarity);
        }
    }

    #[test]
    fn test_qte_adds_exact_bonus() {
        let constants = CaptureConstants::default();
        let monster = bound(Rarity::Uncommon, 0.3, 40.0, 10);
        let miss = CaptureCalculation::compute(&monster, 10, CaptureItem::Standard, QteGrade::Miss, &constants);
        for grade in QteGrade::all() {
            let calc = CaptureCalculation::compute(&monster, 10, CaptureItem::Standard, *grade, &constants);
            assert!((calc.final_chance - miss.final_chance - grade.bonus()).abs() < 1e-9);
        }
    }
}
