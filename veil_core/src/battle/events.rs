//! Battle events and observers

use crate::brand::SynergyTier;
use crate::capture::CaptureOutcome;
use crate::combatant::DefenseMode;
use crate::corruption::CorruptionBand;
use crate::status::{ApplyRejection, EffectKind};
use crate::types::CombatantId;
use serde::{Deserialize, Serialize};

/// How a battle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    Victory,
    Defeat,
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum BattleEvent {
    BattleStarted {
        synergy: SynergyTier,
    },
    AbilityUsed {
        actor: CombatantId,
        skill_id: String,
        targets: Vec<CombatantId>,
    },
    DefenseModeChanged {
        actor: CombatantId,
        mode: DefenseMode,
    },
    /// `source` is None for damage over time
    DamageDealt {
        source: Option<CombatantId>,
        target: CombatantId,
        amount: f64,
        critical: bool,
        brand_multiplier: f64,
    },
    GuardIntercepted {
        guard: CombatantId,
        protected: CombatantId,
        amount: f64,
    },
    ShieldAbsorbed {
        target: CombatantId,
        amount: f64,
    },
    HealApplied {
        source: Option<CombatantId>,
        target: CombatantId,
        amount: f64,
    },
    EffectApplied {
        target: CombatantId,
        kind: EffectKind,
        source: Option<CombatantId>,
    },
    EffectRejected {
        target: CombatantId,
        kind: EffectKind,
        reason: ApplyRejection,
    },
    /// Cleansed, dispelled or broken by damage
    EffectsRemoved {
        target: CombatantId,
        kinds: Vec<EffectKind>,
    },
    EffectExpired {
        target: CombatantId,
        kind: EffectKind,
    },
    CombatantDefeated {
        id: CombatantId,
        killer: Option<CombatantId>,
    },
    SynergyChanged {
        from: SynergyTier,
        to: SynergyTier,
    },
    CorruptionChanged {
        id: CombatantId,
        corruption: f64,
        band: CorruptionBand,
    },
    UltimateReady {
        id: CombatantId,
        expires_at: f64,
    },
    UltimateFired {
        id: CombatantId,
        target: CombatantId,
        overridden: bool,
    },
    ActionSkipped {
        actor: CombatantId,
        reason: String,
    },
    /// An untamed unit attacked its own side
    Betrayal {
        actor: CombatantId,
        target: CombatantId,
    },
    MarkedForCapture {
        target: CombatantId,
        binder: CombatantId,
    },
    MonsterBound {
        id: CombatantId,
        threshold: f64,
    },
    CaptureResolved {
        id: CombatantId,
        chance: f64,
        outcome: CaptureOutcome,
    },
    /// A berserk monster rejoined and the battle is live again
    CombatResumed {
        berserker: CombatantId,
    },
    BattleEnded {
        outcome: BattleOutcome,
    },
}

/// Fire-and-forget event subscriber
pub trait BattleObserver {
    fn on_event(&mut self, event: &BattleEvent);
}

impl<F: FnMut(&BattleEvent)> BattleObserver for F {
    fn on_event(&mut self, event: &BattleEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = BattleEvent::DamageDealt {
            source: Some(CombatantId(1)),
            target: CombatantId(2),
            amount: 42.0,
            critical: false,
            brand_multiplier: 2.0,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.starts_with("{\"event\":\"damage_dealt\""));
        let back: BattleEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = 0;
        {
            let mut observer = |_: &BattleEvent| seen += 1;
            observer.on_event(&BattleEvent::BattleStarted {
                synergy: SynergyTier::Neutral,
            });
        }
        assert_eq!(seen, 1);
    }
}
