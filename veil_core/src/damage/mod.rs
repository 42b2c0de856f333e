//! Damage system - stat ratio, brand, synergy, variance and crit

mod calculation;
mod result;

pub use calculation::{calculate_damage, calculate_heal, roll_damage, stat_ratio, DamageInputs};
pub use result::DamageResult;
