//! Core types shared across the combat engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a combatant within a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombatantId(pub u32);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for CombatantId {
    fn from(id: u32) -> Self {
        CombatantId(id)
    }
}

/// Elemental/archetypal brand of a monster or hero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Brand {
    Savage,
    Iron,
    Venom,
    Surge,
    Dread,
    Leech,
    Grace,
    Mend,
    Ruin,
    Void,
    /// No brand; neutral against everything
    Unbranded,
}

impl Brand {
    /// The ten real brands, in table order
    pub fn all() -> &'static [Brand] {
        &[
            Brand::Savage,
            Brand::Iron,
            Brand::Venom,
            Brand::Surge,
            Brand::Dread,
            Brand::Leech,
            Brand::Grace,
            Brand::Mend,
            Brand::Ruin,
            Brand::Void,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Brand::Savage => "Savage",
            Brand::Iron => "Iron",
            Brand::Venom => "Venom",
            Brand::Surge => "Surge",
            Brand::Dread => "Dread",
            Brand::Leech => "Leech",
            Brand::Grace => "Grace",
            Brand::Mend => "Mend",
            Brand::Ruin => "Ruin",
            Brand::Void => "Void",
            Brand::Unbranded => "Unbranded",
        }
    }
}

/// Champion allegiance; decides which brands synergize with the party
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Path {
    Ironbound,
    Fangborn,
    Voidtouched,
    Stormbound,
    /// Flex path: never grants or loses synergy
    Unchained,
}

impl Path {
    pub fn all() -> &'static [Path] {
        &[
            Path::Ironbound,
            Path::Fangborn,
            Path::Voidtouched,
            Path::Stormbound,
            Path::Unchained,
        ]
    }
}

/// Monster rarity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn all() -> &'static [Rarity] {
        &[
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::Epic,
            Rarity::Legendary,
        ]
    }

    /// Tier index, 0 (Common) through 4 (Legendary)
    pub fn tier(&self) -> usize {
        match self {
            Rarity::Common => 0,
            Rarity::Uncommon => 1,
            Rarity::Rare => 2,
            Rarity::Epic => 3,
            Rarity::Legendary => 4,
        }
    }
}

/// How damage is mitigated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    /// Attack vs Defense
    Physical,
    /// Magic vs Resistance
    Magical,
    /// Ignores the defender's mitigation stat
    True,
}

/// What a skill does when it resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillType {
    Attack,
    Heal,
    Buff,
    Debuff,
    Control,
    Cleanse,
    Dispel,
    Defend,
}

/// Fixed ability slots on every combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilitySlot {
    BasicAttack,
    Defend,
    Skill1,
    Skill2,
    Skill3,
    Ultimate,
}

impl AbilitySlot {
    pub fn all() -> &'static [AbilitySlot] {
        &[
            AbilitySlot::BasicAttack,
            AbilitySlot::Defend,
            AbilitySlot::Skill1,
            AbilitySlot::Skill2,
            AbilitySlot::Skill3,
            AbilitySlot::Ultimate,
        ]
    }

    pub fn index(&self) -> usize {
        match self {
            AbilitySlot::BasicAttack => 0,
            AbilitySlot::Defend => 1,
            AbilitySlot::Skill1 => 2,
            AbilitySlot::Skill2 => 3,
            AbilitySlot::Skill3 => 4,
            AbilitySlot::Ultimate => 5,
        }
    }
}

/// Which side of the battle a combatant fights on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

/// Numeric stats a combatant carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    MaxHp,
    MaxMp,
    Attack,
    Defense,
    Magic,
    Resistance,
    Speed,
}
