//! Per-combatant battle tallies

use super::events::BattleOutcome;
use crate::brand::SynergyTier;
use crate::capture::BoundMonster;
use crate::status::{EffectKind, StatusEffectInstance, StatusEffects};
use crate::types::{Brand, CombatantId, Side};
use serde::{Deserialize, Serialize};

/// Running totals for one combatant
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatantTally {
    pub damage_dealt: f64,
    pub damage_taken: f64,
    pub healing_done: f64,
    /// Damage soaked while guarding someone else
    pub damage_guarded: f64,
    pub kills: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantSummary {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub brand: Brand,
    pub alive: bool,
    pub current_hp: f64,
    pub max_hp: f64,
    pub corruption: f64,
    pub tally: CombatantTally,
    /// Effects still running when the summary was taken
    #[serde(default)]
    pub effects: Vec<EffectSummary>,
}

/// An effect still running on a combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSummary {
    pub kind: EffectKind,
    pub stacks: u32,
    /// Share of the full duration left, 0-100
    pub remaining_percent: f64,
}

impl EffectSummary {
    pub fn from_instance(effect: &StatusEffectInstance) -> Self {
        EffectSummary {
            kind: effect.kind,
            stacks: effect.stacks,
            remaining_percent: effect.duration_percent(),
        }
    }

    /// Active effects only; spent shields and expired timers are left out
    pub fn collect(effects: &StatusEffects) -> Vec<Self> {
        effects
            .iter()
            .filter(|e| e.is_active())
            .map(Self::from_instance)
            .collect()
    }
}

/// End-of-battle report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSummary {
    pub outcome: Option<BattleOutcome>,
    pub ticks: u64,
    pub elapsed: f64,
    pub synergy: SynergyTier,
    pub combatants: Vec<CombatantSummary>,
    pub bound: Vec<BoundMonster>,
    pub captured: Vec<CombatantId>,
}

impl BattleSummary {
    pub fn get(&self, id: CombatantId) -> Option<&CombatantSummary> {
        self.combatants.iter().find(|c| c.id == id)
    }

    /// Total damage dealt by one side
    pub fn side_damage(&self, side: Side) -> f64 {
        self.combatants
            .iter()
            .filter(|c| c.side == side)
            .map(|c| c.tally.damage_dealt)
            .sum()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
