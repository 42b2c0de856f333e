//! Brand AI personalities - category weights, flags and multipliers

use super::gambit::TargetSelector;
use crate::config::ConfigError;
use crate::types::Brand;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Total every profile's weights must reach
pub const WEIGHT_TOTAL: f64 = 100.0;

/// Broad purpose of an action, scored by the matching weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    Damage,
    Survival,
    TeamValue,
    Positioning,
    Control,
}

/// Five category weights summing to 100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub damage: f64,
    pub survival: f64,
    pub team_value: f64,
    pub positioning: f64,
    pub control: f64,
}

impl CategoryWeights {
    pub const fn new(damage: f64, survival: f64, team_value: f64, positioning: f64, control: f64) -> Self {
        CategoryWeights {
            damage,
            survival,
            team_value,
            positioning,
            control,
        }
    }

    pub fn total(&self) -> f64 {
        self.damage + self.survival + self.team_value + self.positioning + self.control
    }

    pub fn get(&self, category: ActionCategory) -> f64 {
        match category {
            ActionCategory::Damage => self.damage,
            ActionCategory::Survival => self.survival,
            ActionCategory::TeamValue => self.team_value,
            ActionCategory::Positioning => self.positioning,
            ActionCategory::Control => self.control,
        }
    }

    /// `weight / 20`, so an even split scores 1.0
    pub fn multiplier(&self, category: ActionCategory) -> f64 {
        self.get(category) / (WEIGHT_TOTAL / 5.0)
    }
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_ultimate_target() -> TargetSelector {
    TargetSelector::Auto
}

/// AI personality for one brand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandProfile {
    pub brand: Brand,
    pub weights: CategoryWeights,
    #[serde(default)]
    pub can_auto_defend: bool,
    #[serde(default)]
    pub tracks_momentum: bool,
    /// Damage utility grows as allies lose HP
    #[serde(default)]
    pub desperation_bonus: bool,
    #[serde(default = "default_multiplier")]
    pub low_hp_target_multiplier: f64,
    #[serde(default = "default_multiplier")]
    pub tank_target_multiplier: f64,
    #[serde(default = "default_multiplier")]
    pub ally_critical_multiplier: f64,
    /// Who the ultimate hits when nobody overrides it
    #[serde(default = "default_ultimate_target")]
    pub ultimate_target: TargetSelector,
}

impl BrandProfile {
    /// Neutral profile with an even weight split
    pub fn balanced(brand: Brand) -> Self {
        BrandProfile {
            brand,
            weights: CategoryWeights::new(20.0, 20.0, 20.0, 20.0, 20.0),
            can_auto_defend: false,
            tracks_momentum: false,
            desperation_bonus: false,
            low_hp_target_multiplier: 1.0,
            tank_target_multiplier: 1.0,
            ally_critical_multiplier: 1.0,
            ultimate_target: TargetSelector::Auto,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let total = self.weights.total();
        if (total - WEIGHT_TOTAL).abs() > 1e-6 {
            return Err(ConfigError::ValidationError(format!(
                "{} weights sum to {}, expected {}",
                self.brand.name(),
                total,
                WEIGHT_TOTAL
            )));
        }
        let w = &self.weights;
        if [w.damage, w.survival, w.team_value, w.positioning, w.control]
            .iter()
            .any(|v| *v < 0.0)
        {
            return Err(ConfigError::ValidationError(format!(
                "{} has a negative weight",
                self.brand.name()
            )));
        }
        Ok(())
    }

    /// `1 + (1 - ally_average_hp)` when the brand fights harder while losing
    pub fn desperation_multiplier(&self, ally_average_hp: f64) -> f64 {
        if self.desperation_bonus {
            1.0 + (1.0 - ally_average_hp.clamp(0.0, 1.0))
        } else {
            1.0
        }
    }
}

/// Profiles for every brand
#[derive(Debug, Clone)]
pub struct BrandProfiles {
    profiles: HashMap<Brand, BrandProfile>,
    fallback: BrandProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProfilesConfig {
    profiles: Vec<BrandProfile>,
}

impl BrandProfiles {
    pub fn new() -> Self {
        BrandProfiles {
            profiles: HashMap::new(),
            fallback: BrandProfile::balanced(Brand::Unbranded),
        }
    }

    pub fn insert(&mut self, profile: BrandProfile) {
        self.profiles.insert(profile.brand, profile);
    }

    /// Profile for a brand; unknown brands get the balanced profile
    pub fn get(&self, brand: Brand) -> &BrandProfile {
        self.profiles.get(&brand).unwrap_or(&self.fallback)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.profiles.values().try_for_each(BrandProfile::validate)
    }

    /// Defaults overridden by any profiles in a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Self::from_config(crate::config::parse_toml(content)?)
    }

    /// Defaults overridden by any profiles in a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_config(crate::config::load_toml(path)?)
    }

    fn from_config(config: ProfilesConfig) -> Result<Self, ConfigError> {
        let mut profiles = Self::with_defaults();
        for profile in config.profiles {
            profile.validate()?;
            profiles.insert(profile);
        }
        Ok(profiles)
    }

    /// Built-in personalities
    pub fn with_defaults() -> Self {
        let mut profiles = Self::new();
        let mut add = |brand, weights, tweak: fn(&mut BrandProfile)| {
            let mut profile = BrandProfile::balanced(brand);
            profile.weights = weights;
            tweak(&mut profile);
            profiles.insert(profile);
        };

        add(Brand::Savage, CategoryWeights::new(50.0, 10.0, 5.0, 10.0, 25.0), |p| {
            p.tracks_momentum = true;
            p.low_hp_target_multiplier = 1.5;
            p.tank_target_multiplier = 0.7;
            p.ultimate_target = TargetSelector::LowestHpEnemy;
        });
        add(Brand::Iron, CategoryWeights::new(20.0, 30.0, 10.0, 30.0, 10.0), |p| {
            p.can_auto_defend = true;
            p.tank_target_multiplier = 1.3;
            p.ally_critical_multiplier = 1.2;
            p.ultimate_target = TargetSelector::HighestHpEnemy;
        });
        add(Brand::Venom, CategoryWeights::new(30.0, 10.0, 5.0, 10.0, 45.0), |p| {
            p.low_hp_target_multiplier = 1.2;
            p.ultimate_target = TargetSelector::HighestHpEnemy;
        });
        add(Brand::Surge, CategoryWeights::new(45.0, 10.0, 10.0, 10.0, 25.0), |p| {
            p.tracks_momentum = true;
            p.low_hp_target_multiplier = 1.3;
        });
        add(Brand::Dread, CategoryWeights::new(25.0, 10.0, 5.0, 10.0, 50.0), |p| {
            p.tank_target_multiplier = 0.8;
            p.ultimate_target = TargetSelector::HighestHpEnemy;
        });
        add(Brand::Leech, CategoryWeights::new(35.0, 25.0, 15.0, 10.0, 15.0), |p| {
            p.can_auto_defend = true;
            p.low_hp_target_multiplier = 1.2;
            p.ultimate_target = TargetSelector::LowestHpEnemy;
        });
        add(Brand::Grace, CategoryWeights::new(10.0, 15.0, 55.0, 10.0, 10.0), |p| {
            p.ally_critical_multiplier = 1.8;
            p.ultimate_target = TargetSelector::LowestHpAlly;
        });
        add(Brand::Mend, CategoryWeights::new(10.0, 20.0, 50.0, 10.0, 10.0), |p| {
            p.can_auto_defend = true;
            p.ally_critical_multiplier = 1.6;
            p.ultimate_target = TargetSelector::LowestHpAlly;
        });
        add(Brand::Ruin, CategoryWeights::new(50.0, 5.0, 5.0, 10.0, 30.0), |p| {
            p.tracks_momentum = true;
            p.low_hp_target_multiplier = 1.4;
            p.ultimate_target = TargetSelector::HighestHpEnemy;
        });
        add(Brand::Void, CategoryWeights::new(35.0, 15.0, 10.0, 15.0, 25.0), |p| {
            p.desperation_bonus = true;
        });

        profiles
    }
}

impl Default for BrandProfiles {
    fn default() -> Self {
        Self::with_defaults()
    }
}
