//! Gambit AI - rule buckets scored by brand personality

pub mod evaluator;
pub mod gambit;
pub mod profile;
pub mod ultimate;
mod view;

pub use evaluator::{evaluate, resolve_target, usable_skill, Decision, TargetScope};
pub use gambit::{ActionKind, ConditionKind, GambitCondition, GambitRule, GambitSet, PriorityBucket, TargetSelector};
pub use profile::{ActionCategory, BrandProfile, BrandProfiles, CategoryWeights};
pub use ultimate::{ultimate_target, UltimateWindow};
pub use view::BattleView;
