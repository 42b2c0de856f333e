//! Flat save records for combatants
//!
//! Records hold identity, base stats, level and pools only. Derived stats are
//! recomputed on restore.

use super::{AbilityLoadout, BaseStats, Combatant};
use crate::skill::SkillDatabase;
use crate::types::{AbilitySlot, Brand, CombatantId, Rarity, Side};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure restoring a record
#[derive(Error, Debug)]
pub enum RestoreError {
    #[error("Unknown skill '{0}' in saved loadout")]
    UnknownSkill(String),
    #[error("Invalid saved value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },
    #[error("Record JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One equipped ability in a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityRecord {
    pub slot: AbilitySlot,
    pub skill_id: String,
    #[serde(default)]
    pub cooldown_remaining: f64,
}

/// Serializable combatant state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantRecord {
    pub id: CombatantId,
    pub name: String,
    pub brand: Brand,
    pub side: Side,
    pub slot: usize,
    pub level: u32,
    pub rarity: Rarity,
    pub base: BaseStats,
    pub current_hp: f64,
    pub current_mp: f64,
    pub alive: bool,
    pub corruption: f64,
    pub player_controlled: bool,
    pub is_champion: bool,
    pub abilities: Vec<AbilityRecord>,
}

impl CombatantRecord {
    pub fn to_json(&self) -> Result<String, RestoreError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RestoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Combatant {
    /// Snapshot into a flat record
    pub fn to_record(&self) -> CombatantRecord {
        CombatantRecord {
            id: self.id,
            name: self.name.clone(),
            brand: self.brand,
            side: self.side,
            slot: self.slot,
            level: self.level,
            rarity: self.rarity,
            base: self.base,
            current_hp: self.current_hp,
            current_mp: self.current_mp,
            alive: self.alive,
            corruption: self.corruption,
            player_controlled: self.player_controlled,
            is_champion: self.is_champion,
            abilities: self
                .abilities
                .iter()
                .map(|a| AbilityRecord {
                    slot: a.slot,
                    skill_id: a.skill_id.clone(),
                    cooldown_remaining: a.cooldown_remaining,
                })
                .collect(),
        }
    }

    /// Rebuild from a record, recomputing stats from base + level
    pub fn from_record(
        record: &CombatantRecord,
        skills: &SkillDatabase,
        level_growth: f64,
    ) -> Result<Combatant, RestoreError> {
        for (field, value) in [
            ("current_hp", record.current_hp),
            ("current_mp", record.current_mp),
            ("corruption", record.corruption),
        ] {
            if !value.is_finite() {
                return Err(RestoreError::InvalidValue { field, value });
            }
        }

        let mut abilities = AbilityLoadout::new();
        for saved in &record.abilities {
            let skill = skills
                .get(&saved.skill_id)
                .ok_or_else(|| RestoreError::UnknownSkill(saved.skill_id.clone()))?;
            abilities.equip(saved.slot, skill);
            if let Some(ability) = abilities.get_mut(saved.slot) {
                ability.set_remaining(saved.cooldown_remaining);
            }
        }

        let mut combatant = Combatant::new(record.id, record.name.clone(), record.brand, record.side, record.base)
            .with_level_growth(level_growth)
            .with_level(record.level)
            .with_rarity(record.rarity)
            .with_corruption(record.corruption)
            .with_abilities(abilities);
        combatant.slot = record.slot;
        combatant.player_controlled = record.player_controlled;
        combatant.is_champion = record.is_champion;
        combatant.restore_pools(record.current_hp, record.current_mp, record.alive);
        Ok(combatant)
    }
}
