//! Status effect system - DoTs, crowd control, buffs and debuffs

mod active;
pub mod tick;
mod types;

pub use active::{EffectInstanceId, StatusEffectInstance};
pub use tick::{ApplyOutcome, ApplyRejection, ShieldAbsorb, StatusEffects, StatusTickResult};
pub use types::{
    CleanseCount, EffectApplication, EffectCategory, EffectDefinition, EffectKind, SkillRank,
    ULTIMATE_RANK_MULTIPLIER,
};

use std::collections::HashMap;

/// Effect definition registry
#[derive(Debug, Clone, Default)]
pub struct EffectRegistry {
    /// Mapping from effect id to definition
    definitions: HashMap<String, EffectDefinition>,
}

impl EffectRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        EffectRegistry {
            definitions: HashMap::new(),
        }
    }

    /// Register (or replace) a definition
    pub fn register(&mut self, definition: EffectDefinition) {
        self.definitions.insert(definition.id.clone(), definition);
    }

    pub fn get(&self, id: &str) -> Option<&EffectDefinition> {
        self.definitions.get(id)
    }

    /// First definition of the given kind
    pub fn by_kind(&self, kind: EffectKind) -> Option<&EffectDefinition> {
        self.definitions.values().find(|d| d.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Load the default effect catalogue
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // Damage over time
        registry.register(EffectDefinition::new("burn", EffectKind::Burn, 6.0, 6.0).refreshing().with_priority(3));
        registry.register(EffectDefinition::new("poison", EffectKind::Poison, 4.0, 8.0).stacking(3).with_priority(4));
        registry.register(EffectDefinition::new("bleed", EffectKind::Bleed, 5.0, 5.0).with_priority(2));

        // Control
        registry.register(EffectDefinition::new("stun", EffectKind::Stun, 0.0, 2.0).with_priority(10));
        registry.register(
            EffectDefinition::new("sleep", EffectKind::Sleep, 0.0, 6.0)
                .breaking_on_damage()
                .with_priority(8),
        );
        registry.register(EffectDefinition::new("silence", EffectKind::Silence, 0.0, 5.0).with_priority(6));

        // Buffs (potency is a fraction for stat modifiers)
        registry.register(EffectDefinition::new("attack_up", EffectKind::AttackUp, 0.20, 10.0).refreshing().with_priority(5));
        registry.register(EffectDefinition::new("defense_up", EffectKind::DefenseUp, 0.20, 10.0).refreshing().with_priority(5));
        registry.register(EffectDefinition::new("speed_up", EffectKind::SpeedUp, 0.15, 8.0).refreshing().with_priority(4));
        registry.register(EffectDefinition::new("regen", EffectKind::Regen, 5.0, 10.0).refreshing().with_priority(3));
        registry.register(EffectDefinition::new("shield", EffectKind::Shield, 60.0, 15.0).with_priority(7));
        registry.register(EffectDefinition::new("immunity", EffectKind::Immunity, 0.0, 20.0).with_priority(9));
        registry.register(EffectDefinition::new("berserk", EffectKind::Berserk, 0.40, 20.0).with_priority(6));

        // Debuffs
        registry.register(EffectDefinition::new("attack_down", EffectKind::AttackDown, 0.20, 10.0).refreshing().with_priority(5));
        registry.register(EffectDefinition::new("defense_down", EffectKind::DefenseDown, 0.20, 10.0).refreshing().with_priority(5));
        registry.register(EffectDefinition::new("speed_down", EffectKind::SpeedDown, 0.15, 8.0).refreshing().with_priority(4));
        registry.register(EffectDefinition::new("exhausted", EffectKind::Exhausted, 0.0, 6.0).with_priority(7));

        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_kind() {
        let registry = EffectRegistry::with_defaults();
        for kind in [
            EffectKind::Burn,
            EffectKind::Poison,
            EffectKind::Bleed,
            EffectKind::Stun,
            EffectKind::Sleep,
            EffectKind::Silence,
            EffectKind::AttackUp,
            EffectKind::DefenseUp,
            EffectKind::SpeedUp,
            EffectKind::Regen,
            EffectKind::Shield,
            EffectKind::Immunity,
            EffectKind::Berserk,
            EffectKind::AttackDown,
            EffectKind::DefenseDown,
            EffectKind::SpeedDown,
            EffectKind::Exhausted,
        ] {
            assert!(registry.by_kind(kind).is_some(), "missing {:?}", kind);
        }
    }

    #[test]
    fn test_sleep_breaks_on_damage_by_default() {
        let registry = EffectRegistry::with_defaults();
        assert!(registry.get("sleep").unwrap().breaks_on_damage);
        assert!(!registry.get("stun").unwrap().breaks_on_damage);
    }
}
