//! Player commands and their validation

use super::BattleOrchestrator;
use crate::ai::{usable_skill, TargetScope};
use crate::combatant::Combatant;
use crate::types::{AbilitySlot, CombatantId, Side};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// What the player wants a unit to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "slot")]
pub enum CommandKind {
    UseAbility(AbilitySlot),
    Defend,
    GuardAlly,
    GuardChampion,
    /// Redirect a ready ultimate during its override window
    UltimateOverride,
    /// Start tracking an enemy's bind threshold
    MarkForCapture,
}

/// A player directive for one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub kind: CommandKind,
    pub issuer: CombatantId,
    #[serde(default)]
    pub target: Option<CombatantId>,
}

impl Command {
    pub fn ability(issuer: CombatantId, slot: AbilitySlot, target: CombatantId) -> Self {
        Command {
            kind: CommandKind::UseAbility(slot),
            issuer,
            target: Some(target),
        }
    }

    pub fn defend(issuer: CombatantId) -> Self {
        Command {
            kind: CommandKind::Defend,
            issuer,
            target: None,
        }
    }

    pub fn guard_ally(issuer: CombatantId, ally: CombatantId) -> Self {
        Command {
            kind: CommandKind::GuardAlly,
            issuer,
            target: Some(ally),
        }
    }

    pub fn guard_champion(issuer: CombatantId, champion: CombatantId) -> Self {
        Command {
            kind: CommandKind::GuardChampion,
            issuer,
            target: Some(champion),
        }
    }

    pub fn ultimate_override(issuer: CombatantId, target: CombatantId) -> Self {
        Command {
            kind: CommandKind::UltimateOverride,
            issuer,
            target: Some(target),
        }
    }

    pub fn mark_for_capture(issuer: CombatantId, target: CombatantId) -> Self {
        Command {
            kind: CommandKind::MarkForCapture,
            issuer,
            target: Some(target),
        }
    }
}

/// Why a command was refused; nothing is mutated on refusal
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Battle is not in progress")]
    BattleOver,
    #[error("No combatant {0} in this battle")]
    UnknownCombatant(CombatantId),
    #[error("{0} is not under player control")]
    NotPlayerControlled(CombatantId),
    #[error("{0} is untamed and ignores commands")]
    Untamed(CombatantId),
    #[error("{0} cannot act")]
    Incapacitated(CombatantId),
    #[error("{issuer} has nothing equipped in {slot:?}")]
    NoAbility { issuer: CombatantId, slot: AbilitySlot },
    #[error("Unknown skill '{0}'")]
    UnknownSkill(String),
    #[error("{slot:?} is on cooldown for {remaining:.1}s")]
    OnCooldown { slot: AbilitySlot, remaining: f64 },
    #[error("Not enough MP: need {needed}, have {available}")]
    InsufficientMp { needed: f64, available: f64 },
    #[error("{0} is silenced")]
    Silenced(CombatantId),
    #[error("Command needs a target")]
    MissingTarget,
    #[error("{0} is not a valid target")]
    InvalidTarget(CombatantId),
    #[error("Target {0} is defeated or out of play")]
    TargetDefeated(CombatantId),
    #[error("{0} has no open ultimate window")]
    NoUltimateWindow(CombatantId),
    #[error("{0} is not bound")]
    NotBound(CombatantId),
    #[error("Captures can only be attempted after a victory")]
    NotWon,
}

impl BattleOrchestrator {
    /// Validate and queue a command for the next commit phase.
    /// Marks and ultimate overrides take effect immediately.
    pub fn submit_command(&mut self, command: Command) -> Result<(), CommandError> {
        if let Err(err) = self.validate_command(&command) {
            warn!(issuer = %command.issuer, error = %err, "command rejected");
            return Err(err);
        }

        match command.kind {
            CommandKind::MarkForCapture => {
                if let Some(target) = command.target {
                    self.mark_for_capture(command.issuer, target);
                }
            }
            CommandKind::UltimateOverride | CommandKind::UseAbility(AbilitySlot::Ultimate) => {
                if let (Some(window), Some(target)) =
                    (self.ultimate_windows.get_mut(&command.issuer), command.target)
                {
                    window.set_override(target);
                }
            }
            _ => {
                self.pending_commands.retain(|c| c.issuer != command.issuer);
                self.pending_commands.push(command);
            }
        }
        debug!(issuer = %command.issuer, kind = ?command.kind, "command accepted");
        Ok(())
    }

    /// Check a command against the current battle state without applying it
    pub fn validate_command(&self, command: &Command) -> Result<(), CommandError> {
        if !self.is_active() {
            return Err(CommandError::BattleOver);
        }
        let issuer = self
            .combatant(command.issuer)
            .ok_or(CommandError::UnknownCombatant(command.issuer))?;
        if issuer.side != Side::Player || !issuer.player_controlled {
            return Err(CommandError::NotPlayerControlled(issuer.id));
        }
        if !issuer.is_alive() || !self.in_play(issuer.id) {
            return Err(CommandError::Incapacitated(issuer.id));
        }
        if issuer.is_untamed() {
            return Err(CommandError::Untamed(issuer.id));
        }

        let target_id = command.target;
        match command.kind {
            CommandKind::MarkForCapture => {
                let target = self.live_target(target_id)?;
                if target.side != Side::Enemy {
                    return Err(CommandError::InvalidTarget(target.id));
                }
                Ok(())
            }
            CommandKind::GuardAlly | CommandKind::GuardChampion => {
                let target = self.live_target(target_id)?;
                let champion_needed = command.kind == CommandKind::GuardChampion;
                if target.side != issuer.side || target.id == issuer.id || (champion_needed && !target.is_champion) {
                    return Err(CommandError::InvalidTarget(target.id));
                }
                Ok(())
            }
            CommandKind::Defend => self.check_slot(issuer.id, AbilitySlot::Defend).map(|_| ()),
            CommandKind::UltimateOverride | CommandKind::UseAbility(AbilitySlot::Ultimate) => {
                if !self.ultimate_windows.contains_key(&issuer.id) {
                    return Err(CommandError::NoUltimateWindow(issuer.id));
                }
                let scope = self.check_slot(issuer.id, AbilitySlot::Ultimate)?;
                let target = self.live_target(target_id)?;
                self.check_scope(issuer.id, target.id, scope)
            }
            CommandKind::UseAbility(slot) => {
                let scope = self.check_slot(issuer.id, slot)?;
                if scope == TargetScope::Caster {
                    return Ok(());
                }
                let target = self.live_target(target_id)?;
                self.check_scope(issuer.id, target.id, scope)
            }
        }
    }

    fn live_target(&self, id: Option<CombatantId>) -> Result<&Combatant, CommandError> {
        let id = id.ok_or(CommandError::MissingTarget)?;
        let target = self.combatant(id).ok_or(CommandError::UnknownCombatant(id))?;
        if !target.is_alive() || !self.in_play(id) {
            return Err(CommandError::TargetDefeated(id));
        }
        Ok(target)
    }

    /// Resource checks for a slot; returns the skill's target scope
    fn check_slot(&self, issuer_id: CombatantId, slot: AbilitySlot) -> Result<TargetScope, CommandError> {
        let issuer = self
            .combatant(issuer_id)
            .ok_or(CommandError::UnknownCombatant(issuer_id))?;
        let ability = issuer
            .abilities
            .get(slot)
            .ok_or(CommandError::NoAbility { issuer: issuer_id, slot })?;
        let skill = self
            .skills
            .get(&ability.skill_id)
            .ok_or_else(|| CommandError::UnknownSkill(ability.skill_id.clone()))?;
        if !ability.is_ready() {
            return Err(CommandError::OnCooldown {
                slot,
                remaining: ability.cooldown_remaining,
            });
        }
        if issuer.current_mp() < skill.mp_cost as f64 {
            return Err(CommandError::InsufficientMp {
                needed: skill.mp_cost as f64,
                available: issuer.current_mp(),
            });
        }
        if !issuer.can_act() {
            return Err(CommandError::Incapacitated(issuer_id));
        }
        let view = self.view_for(issuer);
        if usable_skill(issuer, slot, &view).is_none() {
            return Err(CommandError::Silenced(issuer_id));
        }
        Ok(if slot == AbilitySlot::Defend {
            TargetScope::Caster
        } else {
            TargetScope::for_skill(skill)
        })
    }

    fn check_scope(&self, issuer: CombatantId, target: CombatantId, scope: TargetScope) -> Result<(), CommandError> {
        let (Some(issuer), Some(target)) = (self.combatant(issuer), self.combatant(target)) else {
            return Err(CommandError::InvalidTarget(target));
        };
        let ok = match scope {
            TargetScope::Enemy => target.side != issuer.side,
            TargetScope::Ally => target.side == issuer.side,
            TargetScope::OtherAlly => target.side == issuer.side && target.id != issuer.id,
            TargetScope::Caster => target.id == issuer.id,
        };
        if ok {
            Ok(())
        } else {
            Err(CommandError::InvalidTarget(target.id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{AbilityLoadout, BaseStats, Combatant};
    use crate::config::default_skills;
    use crate::types::{Brand, Path};

    fn setup() -> (BattleOrchestrator, CombatantId, CombatantId, CombatantId) {
        let skills = default_skills();
        let mut loadout = AbilityLoadout::basic();
        loadout.equip(AbilitySlot::Skill1, skills.get("arc_bolt").unwrap());
        loadout.equip(AbilitySlot::Skill2, skills.get("radiant_mend").unwrap());

        let mut battle = BattleOrchestrator::new(Path::Unchained, 1);
        let hero = battle.add_combatant(
            Combatant::new(CombatantId(1), "hero", Brand::Surge, Side::Player, BaseStats::default())
                .with_abilities(loadout),
        );
        let ally = battle.add_combatant(Combatant::new(
            CombatantId(2),
            "ally",
            Brand::Iron,
            Side::Player,
            BaseStats::default(),
        ));
        let foe = battle.add_combatant(Combatant::new(
            CombatantId(3),
            "foe",
            Brand::Leech,
            Side::Enemy,
            BaseStats::default(),
        ));
        battle.start();
        (battle, hero, ally, foe)
    }

    #[test]
    fn test_valid_command_is_queued() {
        let (mut battle, hero, _, foe) = setup();
        assert!(battle.submit_command(Command::ability(hero, AbilitySlot::Skill1, foe)).is_ok());
        assert_eq!(battle.pending_commands.len(), 1);
        // A newer command replaces the queued one
        assert!(battle.submit_command(Command::defend(hero)).is_ok());
        assert_eq!(battle.pending_commands.len(), 1);
        assert_eq!(battle.pending_commands[0].kind, CommandKind::Defend);
    }

    #[test]
    fn test_rejections() {
        let (mut battle, hero, ally, foe) = setup();

        assert_eq!(
            battle.submit_command(Command::defend(CombatantId(99))),
            Err(CommandError::UnknownCombatant(CombatantId(99)))
        );
        assert_eq!(
            battle.submit_command(Command::defend(foe)),
            Err(CommandError::NotPlayerControlled(foe))
        );
        assert_eq!(
            battle.submit_command(Command::ability(hero, AbilitySlot::Skill3, foe)),
            Err(CommandError::NoAbility {
                issuer: hero,
                slot: AbilitySlot::Skill3
            })
        );
        assert_eq!(
            battle.submit_command(Command::ability(hero, AbilitySlot::Skill1, ally)),
            Err(CommandError::InvalidTarget(ally))
        );
        assert_eq!(
            battle.submit_command(Command::ability(hero, AbilitySlot::Skill2, foe)),
            Err(CommandError::InvalidTarget(foe))
        );
        assert_eq!(
            battle.submit_command(Command::guard_ally(hero, hero)),
            Err(CommandError::InvalidTarget(hero))
        );
        assert_eq!(
            battle.submit_command(Command::guard_champion(hero, ally)),
            Err(CommandError::InvalidTarget(ally))
        );
        assert_eq!(
            battle.submit_command(Command::ultimate_override(hero, foe)),
            Err(CommandError::NoUltimateWindow(hero))
        );
        assert_eq!(
            battle.submit_command(Command::mark_for_capture(hero, ally)),
            Err(CommandError::InvalidTarget(ally))
        );
        assert!(battle.pending_commands.is_empty());
    }

    #[test]
    fn test_resource_rejections() {
        let (mut battle, hero, _, foe) = setup();

        battle
            .combatant_mut(hero)
            .unwrap()
            .abilities
            .trigger(AbilitySlot::Skill1);
        assert!(matches!(
            battle.submit_command(Command::ability(hero, AbilitySlot::Skill1, foe)),
            Err(CommandError::OnCooldown { .. })
        ));

        let unit = battle.combatant_mut(hero).unwrap();
        let mp = unit.current_mp();
        unit.use_mp(mp);
        assert!(matches!(
            battle.submit_command(Command::ability(hero, AbilitySlot::Skill2, hero)),
            Err(CommandError::InsufficientMp { .. })
        ));
    }

    #[test]
    fn test_untamed_and_dead_issuers() {
        let (mut battle, hero, ally, foe) = setup();
        battle.combatant_mut(ally).unwrap().set_corruption(90.0);
        assert_eq!(battle.submit_command(Command::defend(ally)), Err(CommandError::Untamed(ally)));

        battle.combatant_mut(foe).unwrap().take_damage(1000.0);
        assert_eq!(
            battle.submit_command(Command::ability(hero, AbilitySlot::BasicAttack, foe)),
            Err(CommandError::TargetDefeated(foe))
        );
    }

    #[test]
    fn test_commands_refused_once_over() {
        let (mut battle, hero, _, foe) = setup();
        battle.combatant_mut(foe).unwrap().take_damage(1000.0);
        battle.tick(0.1);
        assert!(battle.is_over());
        assert_eq!(battle.submit_command(Command::defend(hero)), Err(CommandError::BattleOver));
    }
}
