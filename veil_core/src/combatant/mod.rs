//! Combatant - a unit on the battlefield
//!
//! Owns its HP/MP pools, defense mode, corruption, ability loadout and active
//! status effects. Stats are always derived from base stats and level.

mod abilities;
mod guard;
mod snapshot;

pub use abilities::{AbilityInstance, AbilityLoadout};
pub use guard::{resolve_guard, DefenseMode, GuardIntercept};
pub use snapshot::{AbilityRecord, CombatantRecord, RestoreError};

use crate::corruption::{clamp_corruption, CorruptionBand};
use crate::status::{EffectKind, StatusEffects};
use crate::types::{Brand, CombatantId, Rarity, Side, Stat};
use serde::{Deserialize, Serialize};

/// Fraction of damage removed while defending self, unless configured otherwise
pub const DEFAULT_DEFEND_REDUCTION: f64 = 0.5;
/// Per-level stat growth, unless configured otherwise
pub const DEFAULT_LEVEL_GROWTH: f64 = 0.1;
/// Starting corruption; sits in the neutral band
pub const DEFAULT_CORRUPTION: f64 = 50.0;

/// Stat line before level growth and modifiers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub max_hp: f64,
    pub max_mp: f64,
    pub attack: f64,
    pub defense: f64,
    pub magic: f64,
    pub resistance: f64,
    pub speed: f64,
}

impl Default for BaseStats {
    fn default() -> Self {
        BaseStats {
            max_hp: 100.0,
            max_mp: 50.0,
            attack: 10.0,
            defense: 10.0,
            magic: 10.0,
            resistance: 10.0,
            speed: 10.0,
        }
    }
}

impl BaseStats {
    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::MaxHp => self.max_hp,
            Stat::MaxMp => self.max_mp,
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::Magic => self.magic,
            Stat::Resistance => self.resistance,
            Stat::Speed => self.speed,
        }
    }

    /// `round(base * (1 + growth * (level - 1)))` for every stat
    pub fn at_level(&self, level: u32, growth: f64) -> BaseStats {
        let factor = 1.0 + growth * (level.max(1) - 1) as f64;
        let grow = |value: f64| (value * factor).round().max(0.0);
        BaseStats {
            max_hp: grow(self.max_hp).max(1.0),
            max_mp: grow(self.max_mp),
            attack: grow(self.attack),
            defense: grow(self.defense),
            magic: grow(self.magic),
            resistance: grow(self.resistance),
            speed: grow(self.speed),
        }
    }
}

/// Result of a hit landing on a combatant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DamageTaken {
    /// Damage before defend and shields
    pub incoming: f64,
    /// Removed by defending self
    pub reduced_by_defend: f64,
    pub absorbed_by_shield: f64,
    /// Actual HP lost
    pub hp_lost: f64,
    /// Effects broken by the hit (e.g. sleep)
    pub broken_effects: Vec<EffectKind>,
    pub is_killing_blow: bool,
}

/// A unit in battle
#[derive(Debug, Clone)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub brand: Brand,
    pub side: Side,
    /// Position within its party; used for guard proximity
    pub slot: usize,
    pub level: u32,
    pub rarity: Rarity,
    pub player_controlled: bool,
    pub is_champion: bool,
    pub abilities: AbilityLoadout,
    pub effects: StatusEffects,

    base: BaseStats,
    /// Base stats after level growth
    stats: BaseStats,
    level_growth: f64,
    current_hp: f64,
    current_mp: f64,
    alive: bool,
    defense_mode: DefenseMode,
    corruption: f64,
}

impl Combatant {
    /// Create a combatant at full HP/MP
    pub fn new(id: CombatantId, name: impl Into<String>, brand: Brand, side: Side, base: BaseStats) -> Self {
        let stats = base.at_level(1, DEFAULT_LEVEL_GROWTH);
        Combatant {
            id,
            name: name.into(),
            brand,
            side,
            slot: 0,
            level: 1,
            rarity: Rarity::Common,
            player_controlled: side == Side::Player,
            is_champion: false,
            abilities: AbilityLoadout::basic(),
            effects: StatusEffects::new(),
            base,
            stats,
            level_growth: DEFAULT_LEVEL_GROWTH,
            current_hp: stats.max_hp,
            current_mp: stats.max_mp,
            alive: true,
            defense_mode: DefenseMode::None,
            corruption: DEFAULT_CORRUPTION,
        }
    }

    // === Builders ===

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self.recalculate_stats();
        self.current_hp = self.stats.max_hp;
        self.current_mp = self.stats.max_mp;
        self
    }

    pub fn with_level_growth(mut self, growth: f64) -> Self {
        self.level_growth = growth.max(0.0);
        self.recalculate_stats();
        self.current_hp = self.stats.max_hp;
        self.current_mp = self.stats.max_mp;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_corruption(mut self, corruption: f64) -> Self {
        self.corruption = clamp_corruption(corruption);
        self
    }

    pub fn with_abilities(mut self, abilities: AbilityLoadout) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn as_champion(mut self) -> Self {
        self.is_champion = true;
        self
    }

    pub fn ai_controlled(mut self) -> Self {
        self.player_controlled = false;
        self
    }

    // === Stats ===

    /// Re-derive level-scaled stats, keeping HP/MP fractions
    pub fn recalculate_stats(&mut self) {
        let hp_fraction = self.hp_percent();
        let mp_fraction = self.mp_percent();
        self.stats = self.base.at_level(self.level, self.level_growth);
        self.current_hp = (self.stats.max_hp * hp_fraction).clamp(0.0, self.stats.max_hp);
        self.current_mp = (self.stats.max_mp * mp_fraction).clamp(0.0, self.stats.max_mp);
        if self.current_hp <= 0.0 {
            self.alive = false;
        }
    }

    pub fn base_stats(&self) -> &BaseStats {
        &self.base
    }

    /// Level-scaled stats, before corruption and effects
    pub fn stats(&self) -> &BaseStats {
        &self.stats
    }

    pub fn level_growth(&self) -> f64 {
        self.level_growth
    }

    /// Stat after level growth, corruption band and status modifiers.
    /// HP/MP pools are not scaled by corruption.
    pub fn effective_stat(&self, stat: Stat) -> f64 {
        let value = self.stats.get(stat);
        match stat {
            Stat::MaxHp | Stat::MaxMp => value,
            _ => value * self.corruption_band().stat_multiplier() * self.effects.stat_multiplier(stat),
        }
    }

    pub fn max_hp(&self) -> f64 {
        self.stats.max_hp
    }

    pub fn max_mp(&self) -> f64 {
        self.stats.max_mp
    }

    pub fn current_hp(&self) -> f64 {
        self.current_hp
    }

    pub fn current_mp(&self) -> f64 {
        self.current_mp
    }

    pub fn hp_percent(&self) -> f64 {
        if self.stats.max_hp <= 0.0 {
            return 0.0;
        }
        self.current_hp / self.stats.max_hp
    }

    pub fn mp_percent(&self) -> f64 {
        if self.stats.max_mp <= 0.0 {
            return 0.0;
        }
        self.current_mp / self.stats.max_mp
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Alive and not stunned or asleep
    pub fn can_act(&self) -> bool {
        self.alive && !self.effects.prevents_action()
    }

    // === Defense modes ===

    pub fn defense_mode(&self) -> DefenseMode {
        self.defense_mode
    }

    /// Change defense mode; dead units and self-guards are refused
    pub fn set_defense_mode(&mut self, mode: DefenseMode) -> bool {
        if !self.alive || mode.guarded() == Some(self.id) {
            return false;
        }
        self.defense_mode = mode;
        true
    }

    pub fn is_defending(&self) -> bool {
        self.defense_mode == DefenseMode::DefendSelf
    }

    // === HP / MP ===

    /// Apply a hit with the default defend reduction
    pub fn take_damage(&mut self, amount: f64) -> DamageTaken {
        self.take_damage_with(amount, DEFAULT_DEFEND_REDUCTION)
    }

    /// Apply a hit: defend reduction, then shields, then HP
    pub fn take_damage_with(&mut self, amount: f64, defend_reduction: f64) -> DamageTaken {
        let mut result = DamageTaken {
            incoming: amount.max(0.0),
            ..Default::default()
        };
        if !self.alive || result.incoming <= 0.0 {
            return result;
        }

        let mut remaining = result.incoming;
        if self.is_defending() {
            result.reduced_by_defend = remaining * defend_reduction.clamp(0.0, 1.0);
            remaining -= result.reduced_by_defend;
        }

        let absorb = self.effects.absorb(remaining);
        result.absorbed_by_shield = absorb.absorbed;
        remaining = absorb.passed_through;

        self.apply_hp_loss(remaining, &mut result);
        result
    }

    /// Damage from effects ticking: shields apply, defending does not
    pub fn take_effect_damage(&mut self, amount: f64) -> DamageTaken {
        self.take_damage_with(amount, 0.0)
    }

    fn apply_hp_loss(&mut self, amount: f64, result: &mut DamageTaken) {
        if amount > 0.0 {
            result.broken_effects = self.effects.on_damage_taken();
        }
        let before = self.current_hp;
        self.current_hp = (self.current_hp - amount).max(0.0);
        result.hp_lost = before - self.current_hp;

        if self.current_hp <= 0.0 {
            self.die();
            result.is_killing_blow = true;
        }
    }

    fn die(&mut self) {
        self.current_hp = 0.0;
        self.alive = false;
        self.defense_mode = DefenseMode::None;
        self.effects.clear();
    }

    /// Restore HP up to max; returns the amount actually healed
    pub fn heal(&mut self, amount: f64) -> f64 {
        if !self.alive || amount <= 0.0 {
            return 0.0;
        }
        let before = self.current_hp;
        self.current_hp = (self.current_hp + amount).min(self.stats.max_hp);
        self.current_hp - before
    }

    /// Spend MP; all or nothing
    pub fn use_mp(&mut self, cost: f64) -> bool {
        if cost < 0.0 || self.current_mp < cost {
            return false;
        }
        self.current_mp -= cost;
        true
    }

    /// Restore MP up to max; returns the amount restored
    pub fn restore_mp(&mut self, amount: f64) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }
        let before = self.current_mp;
        self.current_mp = (self.current_mp + amount).min(self.stats.max_mp);
        self.current_mp - before
    }

    /// Bring a dead combatant back at a fraction of max HP
    pub fn revive(&mut self, percent: f64) -> bool {
        if self.alive {
            return false;
        }
        self.current_hp = (self.stats.max_hp * percent.clamp(0.0, 1.0)).round().max(1.0);
        self.alive = true;
        true
    }

    pub fn tick_cooldowns(&mut self, delta: f64) {
        self.abilities.tick(delta);
    }

    // === Corruption ===

    pub fn corruption(&self) -> f64 {
        self.corruption
    }

    pub fn set_corruption(&mut self, value: f64) {
        self.corruption = clamp_corruption(value);
    }

    /// Adjust corruption, clamped; returns the new value
    pub fn add_corruption(&mut self, amount: f64) -> f64 {
        self.corruption = clamp_corruption(self.corruption + amount);
        self.corruption
    }

    pub fn corruption_band(&self) -> CorruptionBand {
        CorruptionBand::from_value(self.corruption)
    }

    /// Ignores player commands
    pub fn is_untamed(&self) -> bool {
        self.corruption_band().is_untamed()
    }

    // === Restore helpers ===

    pub(crate) fn restore_pools(&mut self, hp: f64, mp: f64, alive: bool) {
        self.current_hp = hp.clamp(0.0, self.stats.max_hp);
        self.current_mp = mp.clamp(0.0, self.stats.max_mp);
        self.alive = alive && self.current_hp > 0.0;
        if !self.alive {
            self.die();
        }
    }
}
