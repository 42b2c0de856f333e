//! BattleView - read-only battlefield as seen by one combatant

use crate::combatant::Combatant;
use crate::config::CombatConstants;
use crate::skill::SkillDatabase;
use crate::status::EffectRegistry;
use crate::types::CombatantId;

/// Live combatants split into allies and enemies of the deciding unit.
/// Lists keep roster order, which is the tie-break order for target scans.
#[derive(Debug, Clone)]
pub struct BattleView<'a> {
    /// Includes the deciding combatant
    pub allies: Vec<&'a Combatant>,
    pub enemies: Vec<&'a Combatant>,
    pub skills: &'a SkillDatabase,
    pub effects: &'a EffectRegistry,
    pub constants: &'a CombatConstants,
}

impl<'a> BattleView<'a> {
    /// Split a roster around `me`; dead combatants are left out
    pub fn new(
        me: &Combatant,
        roster: impl IntoIterator<Item = &'a Combatant>,
        skills: &'a SkillDatabase,
        effects: &'a EffectRegistry,
        constants: &'a CombatConstants,
    ) -> Self {
        let mut allies = Vec::new();
        let mut enemies = Vec::new();
        for combatant in roster.into_iter().filter(|c| c.is_alive()) {
            if combatant.side == me.side {
                allies.push(combatant);
            } else {
                enemies.push(combatant);
            }
        }
        BattleView {
            allies,
            enemies,
            skills,
            effects,
            constants,
        }
    }

    /// View for an untamed unit turning on its own side
    pub fn betrayed(mut self, me: CombatantId) -> Self {
        let (own, others): (Vec<&Combatant>, Vec<&Combatant>) =
            self.allies.into_iter().partition(|c| c.id == me);
        self.allies = own;
        self.enemies = others;
        self
    }

    pub fn find(&self, id: CombatantId) -> Option<&'a Combatant> {
        self.allies
            .iter()
            .chain(self.enemies.iter())
            .find(|c| c.id == id)
            .copied()
    }

    pub fn is_enemy(&self, id: CombatantId) -> bool {
        self.enemies.iter().any(|c| c.id == id)
    }

    pub fn is_ally(&self, id: CombatantId) -> bool {
        self.allies.iter().any(|c| c.id == id)
    }

    pub fn champion(&self) -> Option<&'a Combatant> {
        self.allies.iter().find(|c| c.is_champion).copied()
    }

    /// Mean HP fraction of living allies (1.0 with none)
    pub fn ally_average_hp(&self) -> f64 {
        average_hp(&self.allies)
    }

    pub fn enemy_average_hp(&self) -> f64 {
        average_hp(&self.enemies)
    }

    /// Our side is healthier than theirs
    pub fn has_momentum(&self) -> bool {
        !self.enemies.is_empty() && self.ally_average_hp() > self.enemy_average_hp()
    }
}

fn average_hp(group: &[&Combatant]) -> f64 {
    if group.is_empty() {
        return 1.0;
    }
    group.iter().map(|c| c.hp_percent()).sum::<f64>() / group.len() as f64
}
