//! Game constants configuration

use super::ConfigError;
use serde::{Deserialize, Serialize};

/// Tunable game constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConstants {
    pub damage: DamageConstants,
    pub combat: CombatConstants,
    pub corruption: CorruptionConstants,
    pub capture: CaptureConstants,
}

impl GameConstants {
    /// Reject values that would break the formulas
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.damage;
        if d.variance_min <= 0.0 || d.variance_min > d.variance_max {
            return Err(ConfigError::ValidationError(format!(
                "damage variance range [{}, {}] is invalid",
                d.variance_min, d.variance_max
            )));
        }
        if !(0.0..=1.0).contains(&d.crit_chance) {
            return Err(ConfigError::ValidationError(format!(
                "crit_chance {} must be within 0..=1",
                d.crit_chance
            )));
        }
        if d.min_stat_ratio <= 0.0 || d.min_stat_ratio > d.max_stat_ratio {
            return Err(ConfigError::ValidationError(format!(
                "stat ratio range [{}, {}] is invalid",
                d.min_stat_ratio, d.max_stat_ratio
            )));
        }
        if self.combat.think_interval <= 0.0 {
            return Err(ConfigError::ValidationError(
                "think_interval must be positive".to_string(),
            ));
        }
        let c = &self.capture;
        if c.min_chance > c.max_chance || c.bind_min > c.bind_max {
            return Err(ConfigError::ValidationError(
                "capture clamps are inverted".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageConstants {
    /// Lower bound of the uniform damage roll
    pub variance_min: f64,
    /// Upper bound of the uniform damage roll
    pub variance_max: f64,
    /// Base critical hit chance (0.05 = 5%)
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub min_stat_ratio: f64,
    /// Also used when the defending stat is zero
    pub max_stat_ratio: f64,
    /// Heal bonus per point of magic
    pub heal_magic_scaling: f64,
}

impl Default for DamageConstants {
    fn default() -> Self {
        DamageConstants {
            variance_min: 0.9,
            variance_max: 1.1,
            crit_chance: 0.05,
            crit_multiplier: 1.5,
            min_stat_ratio: 0.5,
            max_stat_ratio: 2.0,
            heal_magic_scaling: 0.01,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConstants {
    /// Fraction of damage removed while defending self
    pub defend_reduction: f64,
    /// Fraction of an ally's hit redirected to its guard
    pub guard_ally_redirect: f64,
    /// Fraction of the champion's hit redirected to its guard
    pub guard_champion_redirect: f64,
    /// Seconds between AI decisions at zero speed
    pub think_interval: f64,
    /// Speed points that halve the think interval
    pub speed_scale: f64,
    /// Seconds the player has to redirect a ready ultimate
    pub ultimate_override_window: f64,
    /// HP fraction below which an ally counts as critical
    pub ally_critical_threshold: f64,
    /// HP fraction below which a target counts as low
    pub low_hp_threshold: f64,
    /// MP fraction below which the AI conserves mana
    pub low_mana_threshold: f64,
    pub low_mana_multiplier: f64,
    /// Per-level stat growth (0.1 = +10% per level)
    pub level_growth: f64,
    /// Utility bonus for attacking a brand-weak target
    pub advantage_multiplier: f64,
    /// Utility bonus for damage while ahead (momentum brands)
    pub momentum_multiplier: f64,
    /// HP fraction below which auto-defend brands favor defending
    pub auto_defend_threshold: f64,
    pub auto_defend_multiplier: f64,
    /// Chance an untamed monster picks targets among its own allies
    pub untamed_betrayal_chance: f64,
}

impl Default for CombatConstants {
    fn default() -> Self {
        CombatConstants {
            defend_reduction: 0.5,
            guard_ally_redirect: 0.75,
            guard_champion_redirect: 1.0,
            think_interval: 1.0,
            speed_scale: 100.0,
            ultimate_override_window: 5.0,
            ally_critical_threshold: 0.25,
            low_hp_threshold: 0.30,
            low_mana_threshold: 0.20,
            low_mana_multiplier: 0.5,
            level_growth: 0.1,
            advantage_multiplier: 1.25,
            momentum_multiplier: 1.15,
            auto_defend_threshold: 0.30,
            auto_defend_multiplier: 1.5,
            untamed_betrayal_chance: 0.25,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorruptionConstants {
    /// Corruption a player monster gains per kill, before synergy scaling
    pub gain_per_kill: f64,
}

impl Default for CorruptionConstants {
    fn default() -> Self {
        CorruptionConstants { gain_per_kill: 2.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConstants {
    pub base_bind_threshold: f64,
    pub bind_min: f64,
    pub bind_max: f64,
    pub base_chance: f64,
    pub min_chance: f64,
    pub max_chance: f64,
    /// Seconds the berserk buff lasts
    pub berserk_duration: f64,
    pub berserk_min_bonus: f64,
    pub berserk_max_bonus: f64,
}

impl Default for CaptureConstants {
    fn default() -> Self {
        CaptureConstants {
            base_bind_threshold: 0.25,
            bind_min: 0.05,
            bind_max: 0.50,
            base_chance: 0.50,
            min_chance: 0.01,
            max_chance: 0.99,
            berserk_duration: 20.0,
            berserk_min_bonus: 0.30,
            berserk_max_bonus: 0.50,
        }
    }
}
