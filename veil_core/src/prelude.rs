//! Prelude module for convenient imports
//!
//! ```rust
//! use veil_core::prelude::*;
//! ```

// Core types
pub use crate::types::{AbilitySlot, Brand, CombatantId, DamageType, Path, Rarity, Side, SkillType, Stat};

// Combatants
pub use crate::combatant::{AbilityLoadout, BaseStats, Combatant, CombatantRecord, DefenseMode};

// Content
pub use crate::config::{default_skills, GameConstants};
pub use crate::skill::{SkillDatabase, SkillDefinition};
pub use crate::status::{EffectKind, EffectRegistry};

// AI
pub use crate::ai::{BrandProfiles, GambitRule, GambitSet, PriorityBucket};

// Battle
pub use crate::battle::{BattleEvent, BattleObserver, BattleOrchestrator, BattleState, Command};

// Capture
pub use crate::capture::{CaptureAttempt, CaptureItem, QteGrade};
