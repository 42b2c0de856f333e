//! Status effect catalogue loading

use crate::status::{EffectDefinition, EffectRegistry};
use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Container for effect definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectsConfig {
    pub effects: Vec<EffectDefinition>,
}

impl EffectsConfig {
    /// Reject bad timings, zero stack caps and repeated ids or kinds
    fn into_registry(self) -> Result<EffectRegistry, ConfigError> {
        let mut registry = EffectRegistry::new();
        let mut ids = HashSet::new();
        let mut kinds = HashSet::new();
        for effect in self.effects {
            let problem = if effect.base_duration < 0.0 {
                Some("has a negative duration".to_string())
            } else if !(effect.tick_interval > 0.0 && effect.tick_interval.is_finite()) {
                Some(format!("has a non-positive tick interval ({})", effect.tick_interval))
            } else if effect.max_stacks == 0 {
                Some("has max_stacks = 0".to_string())
            } else if !ids.insert(effect.id.clone()) {
                Some("is defined twice".to_string())
            } else if !kinds.insert(effect.kind) {
                Some(format!("repeats kind {:?}", effect.kind))
            } else {
                None
            };
            if let Some(problem) = problem {
                return Err(ConfigError::ValidationError(format!("effect '{}' {}", effect.id, problem)));
            }
            registry.register(effect);
        }
        Ok(registry)
    }
}

/// Load the effect catalogue from a TOML file
pub fn load_effect_registry(path: &Path) -> Result<EffectRegistry, ConfigError> {
    let config: EffectsConfig = super::load_toml(path)?;
    config.into_registry()
}

/// Load the effect catalogue from a TOML string
pub fn parse_effect_registry(content: &str) -> Result<EffectRegistry, ConfigError> {
    let config: EffectsConfig = super::parse_toml(content)?;
    config.into_registry()
}
