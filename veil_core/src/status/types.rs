//! Status effect type definitions

use crate::types::{Brand, CombatantId};
use serde::{Deserialize, Serialize};

/// Broad family an effect belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectCategory {
    /// Damage over time
    Damage,
    /// Crowd control
    Control,
    Buff,
    Debuff,
}

impl EffectCategory {
    /// Harmful to the target; blocked by Immunity and removed by Cleanse
    pub fn is_negative(&self) -> bool {
        !matches!(self, EffectCategory::Buff)
    }
}

/// Unique effect type; at most one instance of each per target unless stackable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    // Damage over time
    Burn,
    Poison,
    Bleed,
    // Control
    Stun,
    Sleep,
    Silence,
    // Buffs
    AttackUp,
    DefenseUp,
    SpeedUp,
    Regen,
    Shield,
    Immunity,
    Berserk,
    // Debuffs
    AttackDown,
    DefenseDown,
    SpeedDown,
    Exhausted,
}

impl EffectKind {
    pub fn category(&self) -> EffectCategory {
        match self {
            EffectKind::Burn | EffectKind::Poison | EffectKind::Bleed => EffectCategory::Damage,
            EffectKind::Stun | EffectKind::Sleep | EffectKind::Silence => EffectCategory::Control,
            EffectKind::AttackUp
            | EffectKind::DefenseUp
            | EffectKind::SpeedUp
            | EffectKind::Regen
            | EffectKind::Shield
            | EffectKind::Immunity
            | EffectKind::Berserk => EffectCategory::Buff,
            EffectKind::AttackDown
            | EffectKind::DefenseDown
            | EffectKind::SpeedDown
            | EffectKind::Exhausted => EffectCategory::Debuff,
        }
    }

    /// Deals its potency as damage every tick
    pub fn is_damage_over_time(&self) -> bool {
        matches!(self.category(), EffectCategory::Damage)
    }

    /// Fires on the tick interval (DoTs and Regen)
    pub fn is_periodic(&self) -> bool {
        self.is_damage_over_time() || matches!(self, EffectKind::Regen)
    }

    /// Target cannot act at all
    pub fn prevents_action(&self) -> bool {
        matches!(self, EffectKind::Stun | EffectKind::Sleep)
    }
}

/// Rank of the skill applying an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillRank {
    Rank1,
    Rank2,
    Rank3,
    Rank4,
    Rank5,
    Ultimate,
}

/// Potency multiplier for ultimate-tier effects
pub const ULTIMATE_RANK_MULTIPLIER: f64 = 2.5;

impl SkillRank {
    /// Rank from a 1-based number; anything above 5 counts as rank 5
    pub fn from_level(level: u8) -> Self {
        match level {
            0 | 1 => SkillRank::Rank1,
            2 => SkillRank::Rank2,
            3 => SkillRank::Rank3,
            4 => SkillRank::Rank4,
            _ => SkillRank::Rank5,
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            SkillRank::Rank1 => 1.0,
            SkillRank::Rank2 => 1.2,
            SkillRank::Rank3 => 1.4,
            SkillRank::Rank4 => 1.6,
            SkillRank::Rank5 => 2.0,
            SkillRank::Ultimate => ULTIMATE_RANK_MULTIPLIER,
        }
    }

    /// How many effects a cleanse or dispel of this rank removes
    pub fn cleanse_count(&self) -> CleanseCount {
        match self {
            SkillRank::Rank1 | SkillRank::Rank2 => CleanseCount::Count(1),
            SkillRank::Rank3 | SkillRank::Rank4 => CleanseCount::Count(2),
            SkillRank::Rank5 => CleanseCount::Count(3),
            SkillRank::Ultimate => CleanseCount::All,
        }
    }
}

/// Number of effects removed by a cleanse/dispel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanseCount {
    Count(usize),
    All,
}

/// Static definition of an effect, loaded from content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectDefinition {
    /// Lookup id (e.g. "burn", "shield")
    pub id: String,
    /// Display name
    pub name: String,
    pub kind: EffectKind,
    /// Base potency before scaling
    #[serde(default)]
    pub base_value: f64,
    /// Base duration in seconds
    pub base_duration: f64,
    /// Seconds between periodic ticks
    #[serde(default = "default_tick_interval")]
    pub tick_interval: f64,
    #[serde(default)]
    pub can_stack: bool,
    #[serde(default = "default_max_stacks")]
    pub max_stacks: u32,
    /// Reapplying resets the timer instead of being rejected
    #[serde(default)]
    pub refresh_on_reapply: bool,
    /// Removed the moment the target takes damage
    #[serde(default)]
    pub breaks_on_damage: bool,
    /// Higher is removed first by cleanse/dispel
    #[serde(default)]
    pub cleanse_priority: i32,
}

fn default_tick_interval() -> f64 {
    1.0
}

fn default_max_stacks() -> u32 {
    1
}

impl EffectDefinition {
    /// Minimal definition with default flags
    pub fn new(id: impl Into<String>, kind: EffectKind, base_value: f64, base_duration: f64) -> Self {
        let id = id.into();
        EffectDefinition {
            name: id.clone(),
            id,
            kind,
            base_value,
            base_duration,
            tick_interval: default_tick_interval(),
            can_stack: false,
            max_stacks: 1,
            refresh_on_reapply: false,
            breaks_on_damage: false,
            cleanse_priority: 0,
        }
    }

    pub fn refreshing(mut self) -> Self {
        self.refresh_on_reapply = true;
        self
    }

    pub fn stacking(mut self, max_stacks: u32) -> Self {
        self.can_stack = true;
        self.max_stacks = max_stacks.max(1);
        self
    }

    pub fn breaking_on_damage(mut self) -> Self {
        self.breaks_on_damage = true;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.cleanse_priority = priority;
        self
    }

    pub fn category(&self) -> EffectCategory {
        self.kind.category()
    }

    /// `base_value * (1 + stat_modifier) * rank * brand_effectiveness`
    pub fn potency(&self, application: &EffectApplication) -> f64 {
        if let Some(fixed) = application.potency_override {
            return fixed;
        }
        self.base_value
            * (1.0 + application.stat_modifier)
            * application.rank.multiplier()
            * application.brand_effectiveness
    }

    /// `base_duration * (1 + potency_stat * 0.1)`
    pub fn duration(&self, application: &EffectApplication) -> f64 {
        (self.base_duration * (1.0 + application.potency_stat * 0.1)).max(0.0)
    }
}

/// Caster-side inputs for applying an effect
#[derive(Debug, Clone)]
pub struct EffectApplication {
    /// Bonus from the caster's scaling stat (0.1 = +10%)
    pub stat_modifier: f64,
    pub rank: SkillRank,
    /// Caster brand vs target brand, from the matchup table
    pub brand_effectiveness: f64,
    /// Extends duration by 10% per point
    pub potency_stat: f64,
    pub source: Option<CombatantId>,
    pub source_brand: Brand,
    /// Bypass the potency formula (e.g. a rolled berserk bonus)
    pub potency_override: Option<f64>,
}

impl Default for EffectApplication {
    fn default() -> Self {
        EffectApplication {
            stat_modifier: 0.0,
            rank: SkillRank::Rank1,
            brand_effectiveness: 1.0,
            potency_stat: 0.0,
            source: None,
            source_brand: Brand::Unbranded,
            potency_override: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_multipliers() {
        assert!((SkillRank::Rank1.multiplier() - 1.0).abs() < f64::EPSILON);
        assert!((SkillRank::Rank3.multiplier() - 1.4).abs() < f64::EPSILON);
        assert!((SkillRank::Rank5.multiplier() - 2.0).abs() < f64::EPSILON);
        assert_eq!(SkillRank::from_level(9), SkillRank::Rank5);
    }

    #[test]
    fn test_cleanse_count_by_rank() {
        assert_eq!(SkillRank::Rank1.cleanse_count(), CleanseCount::Count(1));
        assert_eq!(SkillRank::Rank4.cleanse_count(), CleanseCount::Count(2));
        assert_eq!(SkillRank::Rank5.cleanse_count(), CleanseCount::Count(3));
        assert_eq!(SkillRank::Ultimate.cleanse_count(), CleanseCount::All);
    }

    #[test]
    fn test_potency_formula() {
        let def = EffectDefinition::new("burn", EffectKind::Burn, 10.0, 6.0);
        let app = EffectApplication {
            stat_modifier: 0.5,
            rank: SkillRank::Rank2,
            brand_effectiveness: 2.0,
            ..Default::default()
        };
        // 10 * 1.5 * 1.2 * 2.0 = 36
        assert!((def.potency(&app) - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_duration_formula() {
        let def = EffectDefinition::new("stun", EffectKind::Stun, 0.0, 2.0);
        let app = EffectApplication {
            potency_stat: 5.0,
            ..Default::default()
        };
        // 2 * (1 + 0.5) = 3
        assert!((def.duration(&app) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_categories() {
        assert!(EffectKind::Burn.is_damage_over_time());
        assert!(EffectKind::Regen.is_periodic());
        assert!(!EffectKind::Shield.is_periodic());
        assert!(EffectKind::Sleep.prevents_action());
        assert!(EffectKind::Exhausted.category().is_negative());
        assert!(!EffectKind::Immunity.category().is_negative());
    }
}
