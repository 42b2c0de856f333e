//! Skill definitions - the read-only ability database

use crate::status::SkillRank;
use crate::types::{DamageType, SkillType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Who a skill can be aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillTarget {
    SingleEnemy,
    AllEnemies,
    SingleAlly,
    AllAllies,
    /// Caster only
    Caster,
}

impl SkillTarget {
    pub fn targets_enemies(&self) -> bool {
        matches!(self, SkillTarget::SingleEnemy | SkillTarget::AllEnemies)
    }

    pub fn is_area(&self) -> bool {
        matches!(self, SkillTarget::AllEnemies | SkillTarget::AllAllies)
    }
}

/// Describes what a skill does; loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDefinition {
    /// Unique skill identifier
    pub id: String,
    /// Display name
    pub name: String,
    pub skill_type: SkillType,
    #[serde(default = "default_damage_type")]
    pub damage_type: DamageType,
    #[serde(default)]
    pub base_power: u32,
    #[serde(default)]
    pub mp_cost: u32,
    /// Cooldown in seconds
    #[serde(default)]
    pub cooldown: f64,
    #[serde(default = "default_target")]
    pub target: SkillTarget,
    /// Effect id applied on hit/cast
    #[serde(default)]
    pub effect: Option<String>,
    /// Skill rank, 1-5
    #[serde(default = "default_rank")]
    pub rank: u8,
    /// Ultimate-tier skill (uses the ultimate rank multiplier)
    #[serde(default)]
    pub ultimate: bool,
}

fn default_damage_type() -> DamageType {
    DamageType::Physical
}

fn default_target() -> SkillTarget {
    SkillTarget::SingleEnemy
}

fn default_rank() -> u8 {
    1
}

impl SkillDefinition {
    /// Basic physical attack, used when content is missing
    pub fn basic_attack() -> Self {
        SkillDefinition {
            id: "basic_attack".to_string(),
            name: "Attack".to_string(),
            skill_type: SkillType::Attack,
            damage_type: DamageType::Physical,
            base_power: 40,
            mp_cost: 0,
            cooldown: 0.0,
            target: SkillTarget::SingleEnemy,
            effect: None,
            rank: 1,
            ultimate: false,
        }
    }

    pub fn skill_rank(&self) -> SkillRank {
        if self.ultimate {
            SkillRank::Ultimate
        } else {
            SkillRank::from_level(self.rank)
        }
    }

    /// Whether the skill deals damage
    pub fn is_offensive(&self) -> bool {
        matches!(self.skill_type, SkillType::Attack | SkillType::Debuff | SkillType::Control | SkillType::Dispel)
    }
}

/// Read-only skill lookup by id
#[derive(Debug, Clone, Default)]
pub struct SkillDatabase {
    skills: HashMap<String, SkillDefinition>,
}

impl SkillDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, skill: SkillDefinition) {
        self.skills.insert(skill.id.clone(), skill);
    }

    pub fn get(&self, id: &str) -> Option<&SkillDefinition> {
        self.skills.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.skills.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.skills.values()
    }
}

impl FromIterator<SkillDefinition> for SkillDatabase {
    fn from_iter<I: IntoIterator<Item = SkillDefinition>>(iter: I) -> Self {
        let mut db = SkillDatabase::new();
        for skill in iter {
            db.insert(skill);
        }
        db
    }
}
