//! Damage calculation - turning a skill and two combatants into a number

use super::DamageResult;
use crate::brand::{effectiveness, SynergyTier};
use crate::combatant::Combatant;
use crate::config::DamageConstants;
use crate::types::{Brand, DamageType, Stat};
use rand::Rng;

/// Plain inputs to a damage roll
#[derive(Debug, Clone, Copy)]
pub struct DamageInputs {
    pub base_power: f64,
    pub offense: f64,
    pub defense: f64,
    pub attacker_brand: Brand,
    pub defender_brand: Brand,
    pub synergy: SynergyTier,
    /// Outgoing damage bonus on the attacker
    pub bonus_multiplier: f64,
}

/// `clamp(offense / defense)`, or the ceiling when defense is zero
pub fn stat_ratio(offense: f64, defense: f64, constants: &DamageConstants) -> f64 {
    if defense <= 0.0 {
        return constants.max_stat_ratio;
    }
    (offense / defense).clamp(constants.min_stat_ratio, constants.max_stat_ratio)
}

/// Calculate damage from attacker to defender using effective stats
pub fn calculate_damage(
    attacker: &Combatant,
    defender: &Combatant,
    base_power: f64,
    damage_type: DamageType,
    synergy: SynergyTier,
    constants: &DamageConstants,
    rng: &mut impl Rng,
) -> DamageResult {
    let (offense_stat, defense_stat) = match damage_type {
        DamageType::Physical | DamageType::True => (Stat::Attack, Stat::Defense),
        DamageType::Magical => (Stat::Magic, Stat::Resistance),
    };

    let defense = if damage_type == DamageType::True {
        0.0
    } else {
        defender.effective_stat(defense_stat)
    };

    roll_damage(
        &DamageInputs {
            base_power,
            offense: attacker.effective_stat(offense_stat),
            defense,
            attacker_brand: attacker.brand,
            defender_brand: defender.brand,
            synergy,
            bonus_multiplier: attacker.effects.damage_dealt_multiplier(),
        },
        constants,
        rng,
    )
}

/// Roll damage from plain inputs
pub fn roll_damage(inputs: &DamageInputs, constants: &DamageConstants, rng: &mut impl Rng) -> DamageResult {
    let ratio = stat_ratio(inputs.offense, inputs.defense, constants);
    let brand_multiplier = effectiveness(inputs.attacker_brand, inputs.defender_brand);
    let synergy_multiplier = inputs.synergy.damage_multiplier();
    let variance = roll_variance(constants, rng);
    let is_critical = rng.gen::<f64>() < constants.crit_chance;

    let mut damage =
        inputs.base_power * ratio * brand_multiplier * synergy_multiplier * inputs.bonus_multiplier * variance;
    if is_critical {
        damage *= constants.crit_multiplier;
    }

    DamageResult {
        final_damage: damage.round().max(1.0),
        brand_multiplier,
        synergy_multiplier,
        variance,
        is_critical,
        stat_ratio: ratio,
        bonus_multiplier: inputs.bonus_multiplier,
    }
}

/// `round(base_power * (1 + magic * scaling) * variance)`
pub fn calculate_heal(
    healer: &Combatant,
    base_power: f64,
    constants: &DamageConstants,
    rng: &mut impl Rng,
) -> f64 {
    let magic = healer.effective_stat(Stat::Magic);
    let variance = roll_variance(constants, rng);
    (base_power * (1.0 + magic * constants.heal_magic_scaling) * variance)
        .round()
        .max(0.0)
}

fn roll_variance(constants: &DamageConstants, rng: &mut impl Rng) -> f64 {
    if constants.variance_min >= constants.variance_max {
        constants.variance_max
    } else {
        rng.gen_range(constants.variance_min..=constants.variance_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::BaseStats;
    use crate::types::{CombatantId, Side};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fighter(id: u32, brand: Brand, attack: f64, defense: f64) -> Combatant {
        let base = BaseStats {
            attack,
            defense,
            ..Default::default()
        };
        Combatant::new(CombatantId(id), format!("{:?}", brand), brand, Side::Player, base)
    }

    #[test]
    fn test_iron_vs_surge() {
        let mut rng = StdRng::seed_from_u64(42);
        let constants = DamageConstants::default();
        let iron = fighter(1, Brand::Iron, 20.0, 10.0);
        let surge = fighter(2, Brand::Surge, 10.0, 15.0);

        let result = calculate_damage(&iron, &surge, 50.0, DamageType::Physical, SynergyTier::Neutral, &constants, &mut rng);
        assert!((result.brand_multiplier - 2.0).abs() < f64::EPSILON);
        assert!(result.final_damage >= 1.0);
        assert!(result.is_super_effective());
        assert!((0.9..=1.1).contains(&result.variance));

        let reverse = calculate_damage(&surge, &iron, 50.0, DamageType::Physical, SynergyTier::Neutral, &constants, &mut rng);
        assert!((reverse.brand_multiplier - 0.5).abs() < f64::EPSILON);
        assert!(reverse.final_damage >= 1.0);
        assert!(reverse.is_resisted());
    }

    #[test]
    fn test_true_damage_ignores_defense() {
        let mut rng = StdRng::seed_from_u64(1);
        let constants = DamageConstants::default();
        let attacker = fighter(1, Brand::Savage, 5.0, 10.0);
        let wall = fighter(2, Brand::Iron, 10.0, 1000.0);

        let result = calculate_damage(&attacker, &wall, 50.0, DamageType::True, SynergyTier::Neutral, &constants, &mut rng);
        assert!((result.stat_ratio - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ratio_clamps() {
        let constants = DamageConstants::default();
        assert!((stat_ratio(10.0, 0.0, &constants) - 2.0).abs() < f64::EPSILON);
        assert!((stat_ratio(100.0, 10.0, &constants) - 2.0).abs() < f64::EPSILON);
        assert!((stat_ratio(1.0, 10.0, &constants) - 0.5).abs() < f64::EPSILON);
        assert!((stat_ratio(15.0, 10.0, &constants) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_minimum_one_damage() {
        let mut rng = StdRng::seed_from_u64(3);
        let constants = DamageConstants {
            crit_chance: 0.0,
            ..Default::default()
        };
        let inputs = DamageInputs {
            base_power: 1.0,
            offense: 1.0,
            defense: 100.0,
            attacker_brand: Brand::Iron,
            defender_brand: Brand::Void,
            synergy: SynergyTier::Neutral,
            bonus_multiplier: 1.0,
        };
        let result = roll_damage(&inputs, &constants, &mut rng);
        assert!((result.final_damage - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fixed_roll_is_exact() {
        let mut rng = StdRng::seed_from_u64(9);
        let constants = DamageConstants {
            variance_min: 1.0,
            variance_max: 1.0,
            crit_chance: 1.0,
            ..Default::default()
        };
        let inputs = DamageInputs {
            base_power: 50.0,
            offense: 15.0,
            defense: 10.0,
            attacker_brand: Brand::Unbranded,
            defender_brand: Brand::Iron,
            synergy: SynergyTier::Full,
            bonus_multiplier: 1.0,
        };
        let result = roll_damage(&inputs, &constants, &mut rng);
        // 50 * 1.5 * 1.0 * 1.08 * 1.5 = 121.5 -> 122
        assert!(result.is_critical);
        assert!((result.final_damage - 122.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_heal_scales_with_magic() {
        let mut rng = StdRng::seed_from_u64(5);
        let constants = DamageConstants {
            variance_min: 1.0,
            variance_max: 1.0,
            ..Default::default()
        };
        let healer = fighter(1, Brand::Grace, 10.0, 10.0);
        // 40 * (1 + 10 * 0.01) = 44
        assert!((calculate_heal(&healer, 40.0, &constants, &mut rng) - 44.0).abs() < f64::EPSILON);
    }
}
