//! AbilityLoadout - the six fixed ability slots and their cooldowns

use crate::skill::SkillDefinition;
use crate::types::AbilitySlot;
use serde::{Deserialize, Serialize};

/// A skill equipped in a slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityInstance {
    pub skill_id: String,
    pub slot: AbilitySlot,
    /// Seconds until usable again
    pub cooldown_remaining: f64,
    pub max_cooldown: f64,
}

impl AbilityInstance {
    pub fn new(skill_id: impl Into<String>, slot: AbilitySlot, max_cooldown: f64) -> Self {
        AbilityInstance {
            skill_id: skill_id.into(),
            slot,
            cooldown_remaining: 0.0,
            max_cooldown: max_cooldown.max(0.0),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }

    /// Start the cooldown
    pub fn trigger(&mut self) {
        self.cooldown_remaining = self.max_cooldown;
    }

    pub fn tick(&mut self, delta: f64) {
        self.cooldown_remaining = (self.cooldown_remaining - delta).max(0.0);
    }

    /// Set remaining cooldown, clamped to `0..=max_cooldown`
    pub fn set_remaining(&mut self, remaining: f64) {
        self.cooldown_remaining = remaining.clamp(0.0, self.max_cooldown);
    }
}

/// Equipped abilities, at most one per slot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbilityLoadout {
    slots: [Option<AbilityInstance>; 6],
}

impl AbilityLoadout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loadout with only the basic attack and defend slots filled
    pub fn basic() -> Self {
        let mut loadout = Self::new();
        loadout.slots[AbilitySlot::BasicAttack.index()] =
            Some(AbilityInstance::new("basic_attack", AbilitySlot::BasicAttack, 0.0));
        loadout.slots[AbilitySlot::Defend.index()] =
            Some(AbilityInstance::new("defend", AbilitySlot::Defend, 0.0));
        loadout
    }

    /// Put a skill into a slot, replacing whatever was there
    pub fn equip(&mut self, slot: AbilitySlot, skill: &SkillDefinition) {
        self.slots[slot.index()] = Some(AbilityInstance::new(skill.id.clone(), slot, skill.cooldown));
    }

    pub fn unequip(&mut self, slot: AbilitySlot) -> Option<AbilityInstance> {
        self.slots[slot.index()].take()
    }

    pub fn get(&self, slot: AbilitySlot) -> Option<&AbilityInstance> {
        self.slots[slot.index()].as_ref()
    }

    pub fn get_mut(&mut self, slot: AbilitySlot) -> Option<&mut AbilityInstance> {
        self.slots[slot.index()].as_mut()
    }

    /// Equipped and off cooldown
    pub fn is_ready(&self, slot: AbilitySlot) -> bool {
        self.get(slot).map(|a| a.is_ready()).unwrap_or(false)
    }

    /// Start the cooldown on a slot; false if nothing is equipped
    pub fn trigger(&mut self, slot: AbilitySlot) -> bool {
        match self.get_mut(slot) {
            Some(ability) => {
                ability.trigger();
                true
            }
            None => false,
        }
    }

    pub fn tick(&mut self, delta: f64) {
        for ability in self.slots.iter_mut().flatten() {
            ability.tick(delta);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AbilityInstance> {
        self.slots.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(cooldown: f64) -> SkillDefinition {
        let mut skill = SkillDefinition::basic_attack();
        skill.id = "iron_bash".to_string();
        skill.cooldown = cooldown;
        skill
    }

    #[test]
    fn test_trigger_and_tick() {
        let mut loadout = AbilityLoadout::basic();
        loadout.equip(AbilitySlot::Skill1, &skill(4.0));
        assert!(loadout.is_ready(AbilitySlot::Skill1));

        assert!(loadout.trigger(AbilitySlot::Skill1));
        assert!(!loadout.is_ready(AbilitySlot::Skill1));

        loadout.tick(3.0);
        let remaining = loadout.get(AbilitySlot::Skill1).unwrap().cooldown_remaining;
        assert!((remaining - 1.0).abs() < 1e-9);

        loadout.tick(5.0);
        let ability = loadout.get(AbilitySlot::Skill1).unwrap();
        assert!(ability.is_ready());
        assert!(ability.cooldown_remaining.abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_slot_is_never_ready() {
        let mut loadout = AbilityLoadout::basic();
        assert!(!loadout.is_ready(AbilitySlot::Ultimate));
        assert!(!loadout.trigger(AbilitySlot::Ultimate));
        assert_eq!(loadout.iter().count(), 2);
    }

    #[test]
    fn test_set_remaining_clamps() {
        let mut ability = AbilityInstance::new("x", AbilitySlot::Skill2, 5.0);
        ability.set_remaining(12.0);
        assert!((ability.cooldown_remaining - 5.0).abs() < f64::EPSILON);
        ability.set_remaining(-1.0);
        assert!(ability.is_ready());
    }
}
