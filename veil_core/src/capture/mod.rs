//! Capture engine - bind during battle, roll after it

mod bind;
mod chance;
mod outcome;

pub use bind::{
    bind_threshold, brand_bind_adjustment, compute_bind_threshold, corruption_bind_adjustment, is_intimidated,
    rarity_bind_adjustment, speed_bind_adjustment, BindInputs, BindThreshold, BoundMonster,
};
pub use chance::{
    corruption_capture_modifier, hp_bonus, level_capture_modifier, rarity_capture_modifier, CaptureCalculation,
    CaptureItem, QteGrade,
};
pub use outcome::{berserk_chance, roll_capture, CaptureOutcome};

use crate::types::CombatantId;
use serde::{Deserialize, Serialize};

/// Player choices for one post-battle capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureAttempt {
    pub target: CombatantId,
    pub item: CaptureItem,
    pub qte: QteGrade,
}

/// Result of one capture attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureReport {
    pub target: CombatantId,
    pub calculation: CaptureCalculation,
    pub outcome: CaptureOutcome,
}
