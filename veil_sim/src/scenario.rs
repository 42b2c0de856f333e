//! Scenario files - parties, content overrides and scripted player input
//!
//! A scenario is a TOML file:
//!
//! ```toml
//! path = "ironbound"
//! seed = 7
//!
//! [[combatant]]
//! id = 1
//! name = "Warden"
//! brand = "iron"
//! side = "player"
//! level = 5
//! skills = { skill1 = "iron_bash" }
//!
//! [[command]]
//! at_tick = 1
//! issuer = 1
//! action = "skill1"
//! target = 10
//!
//! [[capture]]
//! target = 10
//! item = "greater"
//! qte = "good"
//! ```

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path as FsPath, PathBuf};
use thiserror::Error;
use tracing::debug;
use veil_core::ai::BrandProfiles;
use veil_core::config::{load_constants, load_effect_registry, load_skill_database, ConfigError};
use veil_core::{
    AbilityLoadout, AbilitySlot, BaseStats, BattleOrchestrator, Brand, CaptureAttempt, Combatant, CombatantId,
    Command, CommandError, Path, Rarity, Side, SkillDatabase,
};

/// Scenario loading and simulation errors
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Failed to read scenario: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Content error: {0}")]
    Content(#[from] ConfigError),
    #[error("Combatant {combatant} uses unknown skill '{skill}'")]
    UnknownSkill { combatant: u32, skill: String },
    #[error("Invalid scenario: {0}")]
    Invalid(String),
    #[error("Capture failed: {0}")]
    Capture(#[from] CommandError),
    #[error("Failed to encode report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Optional content files, relative to the scenario file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentFiles {
    pub skills: Option<PathBuf>,
    pub effects: Option<PathBuf>,
    pub profiles: Option<PathBuf>,
    pub constants: Option<PathBuf>,
}

/// Partial stat line; missing stats use the defaults
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct StatsSpec {
    pub max_hp: Option<f64>,
    pub max_mp: Option<f64>,
    pub attack: Option<f64>,
    pub defense: Option<f64>,
    pub magic: Option<f64>,
    pub resistance: Option<f64>,
    pub speed: Option<f64>,
}

impl StatsSpec {
    pub fn to_base_stats(&self) -> BaseStats {
        let d = BaseStats::default();
        BaseStats {
            max_hp: self.max_hp.unwrap_or(d.max_hp),
            max_mp: self.max_mp.unwrap_or(d.max_mp),
            attack: self.attack.unwrap_or(d.attack),
            defense: self.defense.unwrap_or(d.defense),
            magic: self.magic.unwrap_or(d.magic),
            resistance: self.resistance.unwrap_or(d.resistance),
            speed: self.speed.unwrap_or(d.speed),
        }
    }
}

/// Skill ids for the configurable slots
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SkillSlots {
    pub skill1: Option<String>,
    pub skill2: Option<String>,
    pub skill3: Option<String>,
    pub ultimate: Option<String>,
}

impl SkillSlots {
    fn iter(&self) -> impl Iterator<Item = (AbilitySlot, &str)> {
        [
            (AbilitySlot::Skill1, &self.skill1),
            (AbilitySlot::Skill2, &self.skill2),
            (AbilitySlot::Skill3, &self.skill3),
            (AbilitySlot::Ultimate, &self.ultimate),
        ]
        .into_iter()
        .filter_map(|(slot, id)| id.as_deref().map(|id| (slot, id)))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CombatantSpec {
    pub id: u32,
    pub name: String,
    pub brand: Brand,
    pub side: Side,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default = "default_rarity")]
    pub rarity: Rarity,
    #[serde(default)]
    pub champion: bool,
    /// Player-side unit left to its gambits
    #[serde(default)]
    pub ai: bool,
    #[serde(default)]
    pub corruption: Option<f64>,
    #[serde(default)]
    pub level_growth: Option<f64>,
    #[serde(default)]
    pub stats: StatsSpec,
    #[serde(default)]
    pub skills: SkillSlots,
}

fn default_level() -> u32 {
    1
}

fn default_rarity() -> Rarity {
    Rarity::Common
}

impl CombatantSpec {
    /// Build the combatant, equipping its skills from `skills`
    pub fn build(&self, skills: &SkillDatabase) -> Result<Combatant, ScenarioError> {
        let mut loadout = AbilityLoadout::basic();
        for (slot, skill_id) in self.skills.iter() {
            let skill = skills.get(skill_id).ok_or_else(|| ScenarioError::UnknownSkill {
                combatant: self.id,
                skill: skill_id.to_string(),
            })?;
            loadout.equip(slot, skill);
        }

        let mut combatant = Combatant::new(
            CombatantId(self.id),
            self.name.clone(),
            self.brand,
            self.side,
            self.stats.to_base_stats(),
        );
        if let Some(growth) = self.level_growth {
            combatant = combatant.with_level_growth(growth);
        }
        combatant = combatant
            .with_level(self.level)
            .with_rarity(self.rarity)
            .with_abilities(loadout);
        if let Some(corruption) = self.corruption {
            combatant = combatant.with_corruption(corruption);
        }
        if self.champion {
            combatant = combatant.as_champion();
        }
        if self.ai {
            combatant = combatant.ai_controlled();
        }
        Ok(combatant)
    }
}

/// Player input a scripted command stands in for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptedAction {
    Attack,
    Skill1,
    Skill2,
    Skill3,
    Ultimate,
    Defend,
    GuardAlly,
    GuardChampion,
    UltimateOverride,
    MarkForCapture,
}

/// A command submitted just before the given tick runs
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptedCommand {
    pub at_tick: u64,
    pub issuer: u32,
    pub action: ScriptedAction,
    #[serde(default)]
    pub target: Option<u32>,
}

impl ScriptedCommand {
    pub fn to_command(&self) -> Result<Command, ScenarioError> {
        let issuer = CombatantId(self.issuer);
        let target = || {
            self.target.map(CombatantId).ok_or_else(|| {
                ScenarioError::Invalid(format!("{:?} at tick {} needs a target", self.action, self.at_tick))
            })
        };
        let ability = |slot| Ok::<_, ScenarioError>(Command::ability(issuer, slot, target()?));

        match self.action {
            ScriptedAction::Attack => ability(AbilitySlot::BasicAttack),
            ScriptedAction::Skill1 => ability(AbilitySlot::Skill1),
            ScriptedAction::Skill2 => ability(AbilitySlot::Skill2),
            ScriptedAction::Skill3 => ability(AbilitySlot::Skill3),
            ScriptedAction::Ultimate => ability(AbilitySlot::Ultimate),
            ScriptedAction::Defend => Ok(Command::defend(issuer)),
            ScriptedAction::GuardAlly => Ok(Command::guard_ally(issuer, target()?)),
            ScriptedAction::GuardChampion => Ok(Command::guard_champion(issuer, target()?)),
            ScriptedAction::UltimateOverride => Ok(Command::ultimate_override(issuer, target()?)),
            ScriptedAction::MarkForCapture => Ok(Command::mark_for_capture(issuer, target()?)),
        }
    }
}

/// A complete battle setup
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub path: Path,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub content: ContentFiles,
    #[serde(rename = "combatant")]
    pub combatants: Vec<CombatantSpec>,
    #[serde(default, rename = "command")]
    pub commands: Vec<ScriptedCommand>,
    /// Attempted once the battle is won
    #[serde(default, rename = "capture")]
    pub captures: Vec<CaptureAttempt>,
    /// Directory content paths are resolved against
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Scenario {
    pub fn load(path: &FsPath) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path)?;
        let mut scenario = Self::parse(&content)?;
        scenario.base_dir = path.parent().map(FsPath::to_path_buf).unwrap_or_default();
        Ok(scenario)
    }

    pub fn parse(content: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Both sides present, ids unique, commands aimed at known combatants
    pub fn validate(&self) -> Result<(), ScenarioError> {
        for side in [Side::Player, Side::Enemy] {
            if !self.combatants.iter().any(|c| c.side == side) {
                return Err(ScenarioError::Invalid(format!("no {:?} combatants", side)));
            }
        }

        let mut ids = HashSet::new();
        for spec in &self.combatants {
            if !ids.insert(spec.id) {
                return Err(ScenarioError::Invalid(format!("duplicate combatant id {}", spec.id)));
            }
        }

        for command in &self.commands {
            let unknown = std::iter::once(command.issuer)
                .chain(command.target)
                .find(|id| !ids.contains(id));
            if let Some(id) = unknown {
                return Err(ScenarioError::Invalid(format!(
                    "command at tick {} names unknown combatant {}",
                    command.at_tick, id
                )));
            }
            command.to_command()?;
        }
        Ok(())
    }

    fn resolve(&self, path: &FsPath) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Set up a battle ready to tick
    pub fn build(&self, seed: u64) -> Result<BattleOrchestrator, ScenarioError> {
        let mut battle = BattleOrchestrator::new(self.path, seed);
        if let Some(path) = &self.content.constants {
            battle = battle.with_constants(load_constants(&self.resolve(path))?);
        }
        if let Some(path) = &self.content.skills {
            battle = battle.with_skills(load_skill_database(&self.resolve(path))?);
        }
        if let Some(path) = &self.content.effects {
            battle = battle.with_effects(load_effect_registry(&self.resolve(path))?);
        }
        if let Some(path) = &self.content.profiles {
            battle = battle.with_profiles(BrandProfiles::load(&self.resolve(path))?);
        }

        for spec in &self.combatants {
            let combatant = spec.build(battle.skills())?;
            battle.add_combatant(combatant);
        }
        debug!(path = ?self.path, seed, combatants = self.combatants.len(), "scenario built");
        Ok(battle)
    }

    /// Commands scheduled for `tick`, in file order
    pub fn commands_at(&self, tick: u64) -> impl Iterator<Item = Command> + '_ {
        self.commands
            .iter()
            .filter(move |c| c.at_tick == tick)
            .filter_map(|c| c.to_command().ok())
    }
}
