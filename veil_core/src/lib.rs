//! veil_core - Combat resolution, AI and capture rules for VeilBreakers battles
//!
//! This library provides:
//! - Brand matchups and party synergy against a champion Path
//! - Corruption bands and status effects (DoTs, crowd control, buffs, shields)
//! - Damage and heal calculation with injected RNG
//! - Combatants with defend/guard modes, cooldowns and save records
//! - Gambit AI: bucketed utility scoring with brand personalities
//! - Bind thresholds and post-battle capture rolls
//! - BattleOrchestrator: the tick loop tying it all together

pub mod ai;
pub mod battle;
pub mod brand;
pub mod capture;
pub mod combatant;
pub mod config;
pub mod corruption;
pub mod damage;
pub mod prelude;
pub mod skill;
pub mod status;
pub mod types;

// Re-export core types for convenience
pub use battle::{
    BattleEvent, BattleObserver, BattleOrchestrator, BattleOutcome, BattleState, BattleSummary, Command,
    CommandError, CommandKind,
};
pub use brand::{effectiveness, evaluate_synergy, SynergyTier};
pub use capture::{CaptureAttempt, CaptureItem, CaptureOutcome, CaptureReport, QteGrade};
pub use combatant::{AbilityLoadout, BaseStats, Combatant, CombatantRecord, DefenseMode};
pub use config::{default_skills, ConfigError, GameConstants};
pub use corruption::CorruptionBand;
pub use damage::{calculate_damage, DamageResult};
pub use skill::{SkillDatabase, SkillDefinition, SkillTarget};
pub use status::{EffectKind, EffectRegistry, StatusEffects};
pub use types::{AbilitySlot, Brand, CombatantId, DamageType, Path, Rarity, Side, SkillType, Stat};
