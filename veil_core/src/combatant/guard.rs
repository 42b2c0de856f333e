//! Defense modes and guard interception

use super::Combatant;
use crate::types::CombatantId;
use serde::{Deserialize, Serialize};

/// What a combatant is doing defensively; one mode at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "target")]
pub enum DefenseMode {
    #[default]
    None,
    /// Reduce own incoming damage
    DefendSelf,
    /// Take part of an ally's incoming hits
    GuardAlly(CombatantId),
    /// Take all of the champion's incoming hits
    GuardChampion(CombatantId),
}

impl DefenseMode {
    /// Who this mode protects, if anyone
    pub fn guarded(&self) -> Option<CombatantId> {
        match self {
            DefenseMode::GuardAlly(id) | DefenseMode::GuardChampion(id) => Some(*id),
            DefenseMode::None | DefenseMode::DefendSelf => None,
        }
    }
}

/// A guard stepping in front of a hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuardIntercept {
    pub guard: CombatantId,
    /// Fraction of the hit the guard takes
    pub redirect: f64,
}

impl GuardIntercept {
    /// (guard share, target share) of an amount
    pub fn split(&self, amount: f64) -> (f64, f64) {
        let to_guard = amount * self.redirect;
        (to_guard, amount - to_guard)
    }
}

/// Pick the guard for a hit on `target`.
///
/// Champion guards take precedence; otherwise the nearest ally guard by party
/// slot wins, lower slot on ties. At most one guard intercepts a hit, and
/// never the attacker itself.
pub fn resolve_guard(
    target: &Combatant,
    attacker: CombatantId,
    party: &[&Combatant],
    ally_redirect: f64,
    champion_redirect: f64,
) -> Option<GuardIntercept> {
    let guards = party
        .iter()
        .filter(|c| c.is_alive() && c.id != target.id && c.id != attacker && c.side == target.side);

    if target.is_champion {
        let champion_guard = guards
            .clone()
            .find(|c| c.defense_mode() == DefenseMode::GuardChampion(target.id));
        if let Some(guard) = champion_guard {
            return Some(GuardIntercept {
                guard: guard.id,
                redirect: champion_redirect.clamp(0.0, 1.0),
            });
        }
    }

    guards
        .filter(|c| c.defense_mode() == DefenseMode::GuardAlly(target.id))
        .min_by_key(|c| (c.slot.abs_diff(target.slot), c.slot))
        .map(|guard| GuardIntercept {
            guard: guard.id,
            redirect: ally_redirect.clamp(0.0, 1.0),
        })
}
