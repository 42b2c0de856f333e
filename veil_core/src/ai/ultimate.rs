//! Ultimate override window
//!
//! When a player-side ultimate comes off cooldown the player gets a short
//! window to pick its target. If the window lapses the brand's auto-target
//! rule picks instead.

use super::evaluator::{resolve_target, TargetScope};
use super::gambit::TargetSelector;
use super::profile::BrandProfile;
use super::view::BattleView;
use crate::combatant::Combatant;
use crate::skill::SkillDefinition;
use crate::types::CombatantId;
use serde::{Deserialize, Serialize};

/// An open override window for one combatant's ultimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UltimateWindow {
    pub combatant: CombatantId,
    /// Battle time the window opened
    pub opened_at: f64,
    pub expires_at: f64,
    override_target: Option<CombatantId>,
}

impl UltimateWindow {
    pub fn open(combatant: CombatantId, now: f64, duration: f64) -> Self {
        UltimateWindow {
            combatant,
            opened_at: now,
            expires_at: now + duration.max(0.0),
            override_target: None,
        }
    }

    /// Player directive; the ultimate fires at this target next tick
    pub fn set_override(&mut self, target: CombatantId) {
        self.override_target = Some(target);
    }

    pub fn override_target(&self) -> Option<CombatantId> {
        self.override_target
    }

    pub fn is_expired(&self, now: f64) -> bool {
        now >= self.expires_at
    }

    /// Overridden or timed out
    pub fn should_fire(&self, now: f64) -> bool {
        self.override_target.is_some() || self.is_expired(now)
    }

    pub fn remaining(&self, now: f64) -> f64 {
        (self.expires_at - now).max(0.0)
    }
}

/// Target the brand's auto rule picks for an ultimate. Falls back to `Auto`
/// when the brand's preferred selector doesn't fit the skill.
pub fn ultimate_target(
    me: &Combatant,
    profile: &BrandProfile,
    skill: &SkillDefinition,
    view: &BattleView,
) -> Option<CombatantId> {
    let scope = TargetScope::for_skill(skill);
    resolve_target(me, profile.ultimate_target, scope, Some(skill), view)
        .or_else(|| resolve_target(me, TargetSelector::Auto, scope, Some(skill), view))
        .map(|c| c.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::profile::BrandProfiles;
    use crate::combatant::BaseStats;
    use crate::config::{default_skills, CombatConstants};
    use crate::status::EffectRegistry;
    use crate::types::{Brand, Side};

    #[test]
    fn test_window_lifecycle() {
        let mut window = UltimateWindow::open(CombatantId(1), 10.0, 5.0);
        assert!(!window.should_fire(12.0));
        assert!((window.remaining(12.0) - 3.0).abs() < 1e-9);
        assert!(window.should_fire(15.0));

        window.set_override(CombatantId(9));
        assert!(window.should_fire(11.0));
        assert_eq!(window.override_target(), Some(CombatantId(9)));
    }

    #[test]
    fn test_brand_auto_targets() {
        let skills = default_skills();
        let effects = EffectRegistry::with_defaults();
        let constants = CombatConstants::default();
        let profiles = BrandProfiles::with_defaults();

        let savage = Combatant::new(CombatantId(1), "fang", Brand::Savage, Side::Player, BaseStats::default());
        let mut grace = Combatant::new(CombatantId(2), "halo", Brand::Grace, Side::Player, BaseStats::default());
        grace.take_damage(30.0);
        let healthy = Combatant::new(CombatantId(3), "a", Brand::Iron, Side::Enemy, BaseStats::default());
        let mut weak = Combatant::new(CombatantId(4), "b", Brand::Iron, Side::Enemy, BaseStats::default());
        weak.take_damage(70.0);
        let roster = vec![&savage, &grace, &healthy, &weak];

        let view = BattleView::new(&savage, roster.clone(), &skills, &effects, &constants);
        let apex = skills.get("apex_strike").unwrap();
        assert_eq!(ultimate_target(&savage, profiles.get(Brand::Savage), apex, &view), Some(CombatantId(4)));

        let view = BattleView::new(&grace, roster, &skills, &effects, &constants);
        let sanctuary = skills.get("sanctuary").unwrap();
        assert_eq!(ultimate_target(&grace, profiles.get(Brand::Grace), sanctuary, &view), Some(CombatantId(2)));
    }
}
