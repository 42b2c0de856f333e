//! StatusEffects - per-combatant effect list: application rules, ticking,
//! shield absorption and cleansing

use super::active::{EffectInstanceId, StatusEffectInstance};
use super::types::{CleanseCount, EffectApplication, EffectDefinition, EffectKind};
use crate::types::Stat;
use serde::{Deserialize, Serialize};

/// Slack for float comparisons on timers
const TIMER_EPSILON: f64 = 1e-9;

/// Why an application was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyRejection {
    /// Same kind already present and it neither stacks nor refreshes
    AlreadyActive,
    /// An Immunity absorbed the application (and was consumed)
    BlockedByImmunity,
    /// Exhausted targets cannot receive buffs
    BlockedByExhaustion,
}

/// Result of trying to apply an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A new instance was created
    Applied(EffectInstanceId),
    /// An existing instance gained a stack
    Stacked(EffectInstanceId),
    /// An existing instance had its timer reset
    Refreshed(EffectInstanceId),
    Rejected(ApplyRejection),
}

impl ApplyOutcome {
    pub fn instance_id(&self) -> Option<EffectInstanceId> {
        match self {
            ApplyOutcome::Applied(id) | ApplyOutcome::Stacked(id) | ApplyOutcome::Refreshed(id) => Some(*id),
            ApplyOutcome::Rejected(_) => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, ApplyOutcome::Rejected(_))
    }
}

/// Result of damage meeting active shields
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShieldAbsorb {
    pub absorbed: f64,
    pub passed_through: f64,
    /// At least one shield was used up
    pub shield_broken: bool,
}

/// Result of advancing effects by one tick
#[derive(Debug, Clone, Default)]
pub struct StatusTickResult {
    /// DoT damage dealt this tick
    pub damage: f64,
    /// Regen healing this tick
    pub healing: f64,
    /// Kinds that expired this tick
    pub expired: Vec<EffectKind>,
}

/// All effects currently on one combatant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusEffects {
    effects: Vec<StatusEffectInstance>,
    next_id: u64,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an effect, enforcing exhaustion, immunity and the no-stack rule
    pub fn apply(&mut self, definition: &EffectDefinition, application: &EffectApplication) -> ApplyOutcome {
        let category = definition.category();

        if !category.is_negative() && self.has(EffectKind::Exhausted) {
            return ApplyOutcome::Rejected(ApplyRejection::BlockedByExhaustion);
        }

        if category.is_negative() && self.has(EffectKind::Immunity) {
            self.effects.retain(|e| e.kind != EffectKind::Immunity);
            return ApplyOutcome::Rejected(ApplyRejection::BlockedByImmunity);
        }

        let potency = definition.potency(application);
        let duration = definition.duration(application);

        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == definition.kind) {
            if definition.can_stack && existing.stacks < definition.max_stacks {
                existing.stacks += 1;
                existing.refresh(duration, potency);
                return ApplyOutcome::Stacked(existing.id);
            }
            if definition.refresh_on_reapply {
                existing.refresh(duration, potency);
                if existing.kind == EffectKind::Shield {
                    existing.shield_remaining = existing.potency;
                }
                return ApplyOutcome::Refreshed(existing.id);
            }
            return ApplyOutcome::Rejected(ApplyRejection::AlreadyActive);
        }

        let id = EffectInstanceId(self.next_id);
        self.next_id += 1;
        self.effects.push(StatusEffectInstance::new(
            id,
            definition,
            potency,
            duration,
            application.source,
            application.source_brand,
        ));
        ApplyOutcome::Applied(id)
    }

    /// Advance all timers; periodic effects fire once per elapsed interval
    pub fn tick(&mut self, delta: f64) -> StatusTickResult {
        let mut result = StatusTickResult::default();

        for effect in self.effects.iter_mut() {
            if effect.kind.is_periodic() {
                // Never tick past the end of the effect
                effect.time_until_tick -= delta.min(effect.remaining.max(0.0));
                while effect.time_until_tick <= TIMER_EPSILON {
                    let amount = effect.amount_per_tick();
                    if effect.kind.is_damage_over_time() {
                        result.damage += amount;
                    } else {
                        result.healing += amount;
                    }
                    effect.time_until_tick += effect.tick_interval;
                }
            }
            effect.remaining -= delta;
        }

        result.expired = self
            .effects
            .iter()
            .filter(|e| e.remaining <= TIMER_EPSILON)
            .map(|e| e.kind)
            .collect();
        self.effects.retain(|e| e.remaining > TIMER_EPSILON);

        result
    }

    /// Run incoming damage through shields, oldest first
    pub fn absorb(&mut self, amount: f64) -> ShieldAbsorb {
        let mut result = ShieldAbsorb {
            passed_through: amount.max(0.0),
            ..Default::default()
        };

        for shield in self.effects.iter_mut().filter(|e| e.kind == EffectKind::Shield) {
            if result.passed_through <= 0.0 {
                break;
            }
            let taken = result.passed_through.min(shield.shield_remaining);
            shield.shield_remaining -= taken;
            result.absorbed += taken;
            result.passed_through -= taken;
            if shield.shield_remaining <= 0.0 {
                result.shield_broken = true;
            }
        }

        self.effects
            .retain(|e| e.kind != EffectKind::Shield || e.shield_remaining > 0.0);
        result
    }

    /// Remove effects that break when the target is hit
    pub fn on_damage_taken(&mut self) -> Vec<EffectKind> {
        let broken: Vec<EffectKind> = self
            .effects
            .iter()
            .filter(|e| e.breaks_on_damage)
            .map(|e| e.kind)
            .collect();
        self.effects.retain(|e| !e.breaks_on_damage);
        broken
    }

    /// Remove the highest-priority negative effects
    pub fn cleanse(&mut self, count: CleanseCount) -> Vec<EffectKind> {
        self.remove_by_priority(count, true)
    }

    /// Remove the highest-priority buffs
    pub fn dispel(&mut self, count: CleanseCount) -> Vec<EffectKind> {
        self.remove_by_priority(count, false)
    }

    fn remove_by_priority(&mut self, count: CleanseCount, negative: bool) -> Vec<EffectKind> {
        let mut candidates: Vec<(usize, i32)> = self
            .effects
            .iter()
            .enumerate()
            .filter(|(_, e)| e.category().is_negative() == negative)
            .map(|(i, e)| (i, e.cleanse_priority))
            .collect();
        // Stable: equal priorities keep application order
        candidates.sort_by(|a, b| b.1.cmp(&a.1));

        let limit = match count {
            CleanseCount::Count(n) => n,
            CleanseCount::All => candidates.len(),
        };
        let mut doomed: Vec<usize> = candidates.into_iter().take(limit).map(|(i, _)| i).collect();
        doomed.sort_unstable();

        let mut removed = Vec::with_capacity(doomed.len());
        for index in doomed.into_iter().rev() {
            removed.push(self.effects.remove(index).kind);
        }
        removed.reverse();
        removed
    }

    /// Combined multiplier from stat buffs/debuffs
    pub fn stat_multiplier(&self, stat: Stat) -> f64 {
        let mut mult = 1.0;
        for effect in &self.effects {
            let p = effect.potency;
            mult *= match (effect.kind, stat) {
                (EffectKind::AttackUp, Stat::Attack | Stat::Magic) => 1.0 + p,
                (EffectKind::AttackDown, Stat::Attack | Stat::Magic) => 1.0 - p,
                (EffectKind::DefenseUp, Stat::Defense | Stat::Resistance) => 1.0 + p,
                (EffectKind::DefenseDown, Stat::Defense | Stat::Resistance) => 1.0 - p,
                (EffectKind::SpeedUp, Stat::Speed) => 1.0 + p,
                (EffectKind::SpeedDown, Stat::Speed) => 1.0 - p,
                _ => 1.0,
            };
        }
        mult.clamp(0.1, 5.0)
    }

    /// Outgoing damage bonus (berserk)
    pub fn damage_dealt_multiplier(&self) -> f64 {
        self.effects
            .iter()
            .filter(|e| e.kind == EffectKind::Berserk)
            .map(|e| 1.0 + e.potency)
            .product()
    }

    /// Stunned or asleep
    pub fn prevents_action(&self) -> bool {
        self.effects.iter().any(|e| e.kind.prevents_action())
    }

    /// Restricted to basic attack and defend
    pub fn is_silenced(&self) -> bool {
        self.has(EffectKind::Silence)
    }

    pub fn has(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: EffectKind) -> Option<&StatusEffectInstance> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn get_mut(&mut self, kind: EffectKind) -> Option<&mut StatusEffectInstance> {
        self.effects.iter_mut().find(|e| e.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffectInstance> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Total shield absorption available
    pub fn shield_total(&self) -> f64 {
        self.effects
            .iter()
            .filter(|e| e.kind == EffectKind::Shield)
            .map(|e| e.shield_remaining)
            .sum()
    }
}
