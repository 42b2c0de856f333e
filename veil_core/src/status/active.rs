//! StatusEffectInstance - an effect currently applied to a combatant

use super::types::{EffectCategory, EffectDefinition, EffectKind};
use crate::types::{Brand, CombatantId};
use serde::{Deserialize, Serialize};

/// Identifier of an effect instance, unique per target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectInstanceId(pub u64);

/// An active effect on a combatant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEffectInstance {
    pub id: EffectInstanceId,
    /// Definition id this came from
    pub effect_id: String,
    pub kind: EffectKind,
    /// Brand of whoever applied it
    pub source_brand: Brand,
    /// Who applied it (not owned)
    pub source: Option<CombatantId>,
    /// Scaled strength; meaning depends on kind
    pub potency: f64,
    pub remaining: f64,
    /// Full duration, restored on refresh
    pub total_duration: f64,
    pub tick_interval: f64,
    /// Time until the next periodic tick
    pub time_until_tick: f64,
    pub stacks: u32,
    /// Absorption left, shields only
    pub shield_remaining: f64,
    pub breaks_on_damage: bool,
    pub cleanse_priority: i32,
}

impl StatusEffectInstance {
    pub(crate) fn new(
        id: EffectInstanceId,
        definition: &EffectDefinition,
        potency: f64,
        duration: f64,
        source: Option<CombatantId>,
        source_brand: Brand,
    ) -> Self {
        let tick_interval = if definition.tick_interval > 0.0 {
            definition.tick_interval
        } else {
            1.0
        };
        StatusEffectInstance {
            id,
            effect_id: definition.id.clone(),
            kind: definition.kind,
            source_brand,
            source,
            potency,
            remaining: duration,
            total_duration: duration,
            tick_interval,
            time_until_tick: tick_interval,
            stacks: 1,
            shield_remaining: if definition.kind == EffectKind::Shield {
                potency.max(0.0)
            } else {
                0.0
            },
            breaks_on_damage: definition.breaks_on_damage,
            cleanse_priority: definition.cleanse_priority,
        }
    }

    pub fn category(&self) -> EffectCategory {
        self.kind.category()
    }

    pub fn is_active(&self) -> bool {
        if self.kind == EffectKind::Shield && self.shield_remaining <= 0.0 {
            return false;
        }
        self.remaining > 0.0 && self.stacks > 0
    }

    /// Periodic amount per tick, scaled by stacks
    pub fn amount_per_tick(&self) -> f64 {
        if !self.kind.is_periodic() {
            return 0.0;
        }
        self.potency * self.stacks as f64
    }

    /// Percentage of duration remaining
    pub fn duration_percent(&self) -> f64 {
        if self.total_duration <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.total_duration * 100.0).clamp(0.0, 100.0)
    }

    /// Reset the timer; keep the stronger potency
    pub fn refresh(&mut self, new_duration: f64, new_potency: f64) {
        if new_potency > self.potency {
            self.potency = new_potency;
        }
        self.total_duration = new_duration;
        self.remaining = new_duration;
    }
}
