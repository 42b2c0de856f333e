//! Bind threshold - the HP fraction at which a marked enemy can be bound

use crate::brand::{has_advantage, has_disadvantage};
use crate::combatant::Combatant;
use crate::config::CaptureConstants;
use crate::types::{Brand, CombatantId, Rarity};
use serde::{Deserialize, Serialize};

/// Inputs to the bind threshold, detached from live combatants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BindInputs {
    pub target_corruption: f64,
    pub target_rarity: Rarity,
    pub target_speed: f64,
    pub target_brand: Brand,
    pub binder_speed: f64,
    pub binder_brand: Brand,
    /// A strong enough ally is present
    pub intimidated: bool,
}

/// Threshold with its per-term breakdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BindThreshold {
    pub threshold: f64,
    pub corruption_adj: f64,
    pub rarity_adj: f64,
    pub speed_adj: f64,
    pub brand_adj: f64,
    pub intimidation_adj: f64,
}

pub fn corruption_bind_adjustment(corruption: f64) -> f64 {
    if corruption <= 10.0 {
        0.15
    } else if corruption <= 25.0 {
        0.10
    } else if corruption <= 50.0 {
        0.0
    } else if corruption <= 75.0 {
        -0.10
    } else {
        -0.15
    }
}

pub fn rarity_bind_adjustment(rarity: Rarity) -> f64 {
    match rarity {
        Rarity::Common => 0.0,
        Rarity::Uncommon => -0.03,
        Rarity::Rare => -0.06,
        Rarity::Epic => -0.10,
        Rarity::Legendary => -0.15,
    }
}

/// Faster targets slip away more easily
pub fn speed_bind_adjustment(target_speed: f64, binder_speed: f64) -> f64 {
    if target_speed > binder_speed * 1.25 {
        -0.05
    } else {
        0.0
    }
}

pub fn brand_bind_adjustment(binder: Brand, target: Brand) -> f64 {
    if has_disadvantage(binder, target) {
        0.10
    } else if has_advantage(binder, target) {
        -0.10
    } else {
        0.0
    }
}

/// Any ally far above the target in level or rarity, or at least its level
/// with a brand advantage
pub fn is_intimidated(target: &Combatant, allies: &[&Combatant]) -> bool {
    allies.iter().filter(|a| a.is_alive()).any(|ally| {
        target.level.checked_add(10).is_some_and(|floor| ally.level >= floor)
            || ally.rarity.tier() >= target.rarity.tier() + 2
            || (ally.level >= target.level && has_advantage(ally.brand, target.brand))
    })
}

/// `clamp(base + corruption + rarity + speed + brand + intimidation)`
pub fn compute_bind_threshold(inputs: &BindInputs, constants: &CaptureConstants) -> BindThreshold {
    let corruption_adj = corruption_bind_adjustment(inputs.target_corruption);
    let rarity_adj = rarity_bind_adjustment(inputs.target_rarity);
    let speed_adj = speed_bind_adjustment(inputs.target_speed, inputs.binder_speed);
    let brand_adj = brand_bind_adjustment(inputs.binder_brand, inputs.target_brand);
    let intimidation_adj = if inputs.intimidated { 0.10 } else { 0.0 };

    let raw = constants.base_bind_threshold + corruption_adj + rarity_adj + speed_adj + brand_adj + intimidation_adj;
    BindThreshold {
        threshold: raw.clamp(constants.bind_min, constants.bind_max),
        corruption_adj,
        rarity_adj,
        speed_adj,
        brand_adj,
        intimidation_adj,
    }
}

/// Threshold for `binder` trying to bind `target` with `allies` on the field
pub fn bind_threshold(
    target: &Combatant,
    binder: &Combatant,
    allies: &[&Combatant],
    constants: &CaptureConstants,
) -> BindThreshold {
    use crate::types::Stat;
    compute_bind_threshold(
        &BindInputs {
            target_corruption: target.corruption(),
            target_rarity: target.rarity,
            target_speed: target.effective_stat(Stat::Speed),
            target_brand: target.brand,
            binder_speed: binder.effective_stat(Stat::Speed),
            binder_brand: binder.brand,
            intimidated: is_intimidated(target, allies),
        },
        constants,
    )
}

/// Snapshot of an enemy taken when it is bound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundMonster {
    pub id: CombatantId,
    pub name: String,
    pub brand: Brand,
    pub rarity: Rarity,
    pub level: u32,
    pub hp_percent: f64,
    pub corruption: f64,
    pub threshold: f64,
    /// Battle time of the bind
    pub bound_at: f64,
}

impl BoundMonster {
    pub fn snapshot(monster: &Combatant, threshold: f64, now: f64) -> Self {
        BoundMonster {
            id: monster.id,
            name: monster.name.clone(),
            brand: monster.brand,
            rarity: monster.rarity,
            level: monster.level,
            hp_percent: monster.hp_percent(),
            corruption: monster.corruption(),
            threshold,
            bound_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::BaseStats;
    use crate::types::Side;

    fn inputs() -> BindInputs {
        BindInputs {
            target_corruption: 40.0,
            target_rarity: Rarity::Common,
            target_speed: 10.0,
            target_brand: Brand::Unbranded,
            binder_speed: 10.0,
            binder_brand: Brand::Unbranded,
            intimidated: false,
        }
    }

    #[test]
    fn test_base_threshold() {
        let t = compute_bind_threshold(&inputs(), &CaptureConstants::default());
        assert!((t.threshold - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_lower_corruption_binds_easier() {
        let constants = CaptureConstants::default();
        let pure = compute_bind_threshold(&BindInputs { target_corruption: 5.0, ..inputs() }, &constants);
        let vile = compute_bind_threshold(&BindInputs { target_corruption: 90.0, ..inputs() }, &constants);
        assert!((pure.threshold - 0.40).abs() < 1e-9);
        assert!((vile.threshold - 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_rarity_and_speed() {
        let constants = CaptureConstants::default();
        let t = compute_bind_threshold(
            &BindInputs {
                target_rarity: Rarity::Legendary,
                target_speed: 30.0,
                ..inputs()
            },
            &constants,
        );
        // 0.25 - 0.15 - 0.05
        assert!((t.threshold - 0.05).abs() < 1e-9);
        assert!((t.speed_adj + 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_clamped() {
        let constants = CaptureConstants::default();
        let easiest = compute_bind_threshold(
            &BindInputs {
                target_corruption: 0.0,
                binder_brand: Brand::Surge,
                target_brand: Brand::Iron,
                intimidated: true,
                ..inputs()
            },
            &constants,
        );
        assert!((easiest.threshold - 0.50).abs() < 1e-9);

        let hardest = compute_bind_threshold(
            &BindInputs {
                target_corruption: 100.0,
                target_rarity: Rarity::Legendary,
                target_speed: 100.0,
                binder_brand: Brand::Iron,
                target_brand: Brand::Surge,
                ..inputs()
            },
            &constants,
        );
        assert!((hardest.threshold - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_intimidation() {
        let target = Combatant::new(CombatantId(1), "wild", Brand::Surge, Side::Enemy, BaseStats::default()).with_level(10);
        let veteran = Combatant::new(CombatantId(2), "vet", Brand::Dread, Side::Player, BaseStats::default()).with_level(20);
        let peer = Combatant::new(CombatantId(3), "peer", Brand::Iron, Side::Player, BaseStats::default()).with_level(10);
        let rookie = Combatant::new(CombatantId(4), "rookie", Brand::Dread, Side::Player, BaseStats::default()).with_level(5);
        let rare = Combatant::new(CombatantId(5), "rare", Brand::Dread, Side::Player, BaseStats::default())
            .with_rarity(Rarity::Rare);

        assert!(is_intimidated(&target, &[&veteran]));
        assert!(is_intimidated(&target, &[&peer]));
        assert!(!is_intimidated(&target, &[&rookie]));
        assert!(is_intimidated(&target, &[&rare]));
    }

    #[test]
    fn test_snapshot() {
        let mut monster = Combatant::new(CombatantId(1), "wild", Brand::Venom, Side::Enemy, BaseStats::default())
            .with_corruption(33.0);
        monster.take_damage(80.0);
        let bound = BoundMonster::snapshot(&monster, 0.25, 12.5);
        assert!((bound.hp_percent - 0.2).abs() < 1e-9);
        assert!((bound.corruption - 33.0).abs() < f64::EPSILON);
        assert_eq!(bound.brand, Brand::Venom);
    }
}
