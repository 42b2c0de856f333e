//! Skill database loading

use crate::skill::{SkillDatabase, SkillDefinition};
use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container for skill definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsConfig {
    pub skills: Vec<SkillDefinition>,
}

/// Load the skill database from a TOML file
pub fn load_skill_database(path: &Path) -> Result<SkillDatabase, ConfigError> {
    let config: SkillsConfig = super::load_toml(path)?;
    Ok(config.skills.into_iter().collect())
}

/// Load the skill database from a TOML string
pub fn parse_skill_database(content: &str) -> Result<SkillDatabase, ConfigError> {
    let config: SkillsConfig = super::parse_toml(content)?;
    Ok(config.skills.into_iter().collect())
}

/// Bundled skill database
pub fn default_skills() -> SkillDatabase {
    let toml = include_str!("../../config/skills.toml");
    parse_skill_database(toml).unwrap_or_else(|_| {
        let mut db = SkillDatabase::new();
        db.insert(SkillDefinition::basic_attack());
        db
    })
}
