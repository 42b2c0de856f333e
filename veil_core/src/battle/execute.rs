//! Commit phase - running planned actions against the roster

use super::{ActionOrigin, BattleEvent, BattleOrchestrator, PlannedAction};
use crate::ai::{usable_skill, ActionKind, TargetScope};
use crate::brand::{effectiveness, SynergyTier};
use crate::combatant::{resolve_guard, Combatant, DamageTaken, DefenseMode};
use crate::damage::{calculate_damage, calculate_heal};
use crate::skill::SkillDefinition;
use crate::status::{ApplyOutcome, CleanseCount, EffectApplication};
use crate::types::{AbilitySlot, CombatantId, Side, SkillType, Stat};
use tracing::{debug, warn};

impl BattleOrchestrator {
    /// Revalidate and run one planned action
    pub(super) fn execute(&mut self, plan: PlannedAction) {
        let Some(actor_index) = self.index_of(plan.actor) else {
            return;
        };
        // Died or was bound earlier in this commit
        if !self.is_live(plan.actor) {
            return;
        }
        if !self.combatants[actor_index].can_act() {
            self.skip(plan.actor, "cannot act");
            return;
        }

        match plan.action {
            ActionKind::GuardAlly => self.execute_guard(actor_index, plan.target, false),
            ActionKind::GuardChampion => self.execute_guard(actor_index, plan.target, true),
            ActionKind::Ability(slot) => self.execute_ability(actor_index, slot, plan.target, plan.origin),
        }
    }

    fn skip(&mut self, actor: CombatantId, reason: &str) {
        debug!(%actor, reason, "action skipped");
        self.emit(BattleEvent::ActionSkipped {
            actor,
            reason: reason.to_string(),
        });
    }

    fn execute_guard(&mut self, actor_index: usize, target: CombatantId, champion: bool) {
        let actor = &self.combatants[actor_index];
        let actor_id = actor.id;
        let valid = self.is_live(target)
            && self.combatant(target).is_some_and(|t| {
                t.side == actor.side && t.id != actor_id && (!champion || t.is_champion)
            });
        if !valid {
            self.skip(actor_id, "guard target unavailable");
            return;
        }

        let mode = if champion {
            DefenseMode::GuardChampion(target)
        } else {
            DefenseMode::GuardAlly(target)
        };
        if self.combatants[actor_index].defense_mode() == mode {
            return;
        }
        if self.combatants[actor_index].set_defense_mode(mode) {
            self.emit(BattleEvent::DefenseModeChanged { actor: actor_id, mode });
        }
    }

    fn execute_ability(&mut self, actor_index: usize, slot: AbilitySlot, target: CombatantId, origin: ActionOrigin) {
        let actor_id = self.combatants[actor_index].id;
        let skill = {
            let me = &self.combatants[actor_index];
            let view = self.view_for(me);
            usable_skill(me, slot, &view).cloned()
        };
        let Some(skill) = skill else {
            self.skip(actor_id, "ability unavailable");
            return;
        };

        let targets = self.resolve_targets(actor_index, &skill, slot, target);
        if targets.is_empty() {
            self.skip(actor_id, "no valid target");
            return;
        }

        let is_defend = slot == AbilitySlot::Defend || skill.skill_type == SkillType::Defend;
        let actor = &mut self.combatants[actor_index];
        if !actor.use_mp(skill.mp_cost as f64) {
            self.skip(actor_id, "insufficient mp");
            return;
        }
        actor.abilities.trigger(slot);
        // Acting drops a defend stance; guards persist
        if !is_defend && actor.is_defending() {
            actor.set_defense_mode(DefenseMode::None);
        }

        if let ActionOrigin::Ultimate { overridden } = origin {
            self.emit(BattleEvent::UltimateFired {
                id: actor_id,
                target,
                overridden,
            });
        }
        if origin == ActionOrigin::Betrayal && skill.target.targets_enemies() {
            let actor_side = self.combatants[actor_index].side;
            if self.combatant(target).is_some_and(|t| t.side == actor_side) {
                warn!(actor = %actor_id, %target, "untamed monster turned on its allies");
                self.emit(BattleEvent::Betrayal { actor: actor_id, target });
            }
        }
        self.emit(BattleEvent::AbilityUsed {
            actor: actor_id,
            skill_id: skill.id.clone(),
            targets: targets.iter().map(|&i| self.combatants[i].id).collect(),
        });

        if is_defend {
            if self.combatants[actor_index].set_defense_mode(DefenseMode::DefendSelf) {
                self.emit(BattleEvent::DefenseModeChanged {
                    actor: actor_id,
                    mode: DefenseMode::DefendSelf,
                });
            }
            return;
        }

        for target_index in targets {
            if !self.combatants[target_index].is_alive() {
                continue;
            }
            match skill.skill_type {
                SkillType::Attack | SkillType::Debuff | SkillType::Control | SkillType::Dispel => {
                    if skill.base_power > 0 {
                        self.strike(actor_index, target_index, &skill);
                    }
                }
                SkillType::Heal => self.mend(actor_index, target_index, &skill),
                SkillType::Cleanse => self.purge(target_index, skill.skill_rank().cleanse_count(), true),
                SkillType::Buff | SkillType::Defend => {}
            }
            if skill.skill_type == SkillType::Dispel && self.combatants[target_index].is_alive() {
                self.purge(target_index, skill.skill_rank().cleanse_count(), false);
            }
            if let Some(effect_id) = &skill.effect {
                if self.combatants[target_index].is_alive() {
                    self.apply_skill_effect(actor_index, target_index, effect_id, &skill);
                }
            }
        }
    }

    /// Indices hit by a skill aimed at `primary`. Area skills cover the
    /// primary target's whole side, so a betrayal aims them at allies.
    fn resolve_targets(
        &self,
        actor_index: usize,
        skill: &SkillDefinition,
        slot: AbilitySlot,
        primary: CombatantId,
    ) -> Vec<usize> {
        let scope = if slot == AbilitySlot::Defend {
            TargetScope::Caster
        } else {
            TargetScope::for_skill(skill)
        };
        if scope == TargetScope::Caster {
            return vec![actor_index];
        }

        let Some(primary_index) = self.index_of(primary).filter(|_| self.is_live(primary)) else {
            return Vec::new();
        };
        if !skill.target.is_area() {
            return vec![primary_index];
        }

        // Offensive area skills never hit the caster, even when aimed at its own side
        let spare_caster = skill.target.targets_enemies();
        let side = self.combatants[primary_index].side;
        self.combatants
            .iter()
            .enumerate()
            .filter(|&(i, _)| !(spare_caster && i == actor_index))
            .filter(|(_, c)| c.side == side && c.is_alive() && self.in_play(c.id))
            .map(|(i, _)| i)
            .collect()
    }

    /// Roll damage, let a guard intercept, then land the rest
    fn strike(&mut self, actor_index: usize, target_index: usize, skill: &SkillDefinition) {
        let attacker = &self.combatants[actor_index];
        let attacker_id = attacker.id;
        let synergy = if attacker.side == Side::Player {
            self.synergy
        } else {
            SynergyTier::Neutral
        };
        let result = calculate_damage(
            attacker,
            &self.combatants[target_index],
            skill.base_power as f64,
            skill.damage_type,
            synergy,
            &self.constants.damage,
            &mut self.rng,
        );

        let mut amount = result.final_damage;
        if self.combatants[target_index].side == Side::Player {
            amount = (amount / self.synergy.defense_multiplier()).round().max(1.0);
        }

        let intercept = {
            let target = &self.combatants[target_index];
            let party: Vec<&Combatant> = self.roster().filter(|c| c.side == target.side).collect();
            resolve_guard(
                target,
                attacker_id,
                &party,
                self.constants.combat.guard_ally_redirect,
                self.constants.combat.guard_champion_redirect,
            )
        };
        let defend_reduction = self.constants.combat.defend_reduction;

        if let Some(intercept) = intercept {
            let (guard_share, target_share) = intercept.split(amount);
            if let Some(guard_index) = self.index_of(intercept.guard) {
                if guard_share > 0.0 {
                    let protected = self.combatants[target_index].id;
                    self.emit(BattleEvent::GuardIntercepted {
                        guard: intercept.guard,
                        protected,
                        amount: guard_share,
                    });
                    let taken = self.combatants[guard_index].take_damage_with(guard_share, defend_reduction);
                    self.tally_mut(intercept.guard).damage_guarded += taken.hp_lost;
                    self.record_hit(
                        Some(attacker_id),
                        guard_index,
                        &taken,
                        result.is_critical,
                        result.brand_multiplier,
                    );
                }
                amount = target_share;
            }
        }

        if amount > 0.0 {
            let taken = self.combatants[target_index].take_damage_with(amount, defend_reduction);
            self.record_hit(
                Some(attacker_id),
                target_index,
                &taken,
                result.is_critical,
                result.brand_multiplier,
            );
        }
    }

    fn mend(&mut self, actor_index: usize, target_index: usize, skill: &SkillDefinition) {
        let amount = calculate_heal(
            &self.combatants[actor_index],
            skill.base_power as f64,
            &self.constants.damage,
            &mut self.rng,
        );
        let healed = self.combatants[target_index].heal(amount);
        let source = self.combatants[actor_index].id;
        self.tally_mut(source).healing_done += healed;
        self.emit(BattleEvent::HealApplied {
            source: Some(source),
            target: self.combatants[target_index].id,
            amount: healed,
        });
    }

    /// Cleanse negatives or dispel buffs
    fn purge(&mut self, target_index: usize, count: CleanseCount, negative: bool) {
        let target = &mut self.combatants[target_index];
        let removed = if negative {
            target.effects.cleanse(count)
        } else {
            target.effects.dispel(count)
        };
        if !removed.is_empty() {
            let target = target.id;
            self.emit(BattleEvent::EffectsRemoved { target, kinds: removed });
        }
    }

    fn apply_skill_effect(&mut self, actor_index: usize, target_index: usize, effect_id: &str, skill: &SkillDefinition) {
        let Some(definition) = self.effects.get(effect_id).cloned() else {
            warn!(effect = %effect_id, skill = %skill.id, "unknown effect id");
            return;
        };

        let actor = &self.combatants[actor_index];
        let target = &self.combatants[target_index];
        let application = EffectApplication {
            stat_modifier: actor.effective_stat(Stat::Magic) * self.constants.damage.heal_magic_scaling,
            rank: skill.skill_rank(),
            brand_effectiveness: if definition.category().is_negative() {
                effectiveness(actor.brand, target.brand)
            } else {
                1.0
            },
            potency_stat: 0.0,
            source: Some(actor.id),
            source_brand: actor.brand,
            potency_override: None,
        };
        let source = actor.id;
        let target_id = target.id;

        let outcome = self.combatants[target_index].effects.apply(&definition, &application);
        match outcome {
            ApplyOutcome::Rejected(reason) => {
                debug!(target_id = %target_id, effect = %effect_id, ?reason, "effect rejected");
                self.emit(BattleEvent::EffectRejected {
                    target: target_id,
                    kind: definition.kind,
                    reason,
                });
            }
            _ => self.emit(BattleEvent::EffectApplied {
                target: target_id,
                kind: definition.kind,
                source: Some(source),
            }),
        }
    }

    /// Log a landed hit and follow up on broken effects and kills
    pub(super) fn record_hit(
        &mut self,
        source: Option<CombatantId>,
        target_index: usize,
        taken: &DamageTaken,
        critical: bool,
        brand_multiplier: f64,
    ) {
        let target = self.combatants[target_index].id;
        if taken.absorbed_by_shield > 0.0 {
            self.emit(BattleEvent::ShieldAbsorbed {
                target,
                amount: taken.absorbed_by_shield,
            });
        }
        if taken.incoming > 0.0 {
            self.emit(BattleEvent::DamageDealt {
                source,
                target,
                amount: taken.hp_lost,
                critical,
                brand_multiplier,
            });
        }
        self.tally_mut(target).damage_taken += taken.hp_lost;
        if let Some(source) = source {
            self.tally_mut(source).damage_dealt += taken.hp_lost;
        }
        if !taken.broken_effects.is_empty() {
            self.emit(BattleEvent::EffectsRemoved {
                target,
                kinds: taken.broken_effects.clone(),
            });
        }
        if taken.is_killing_blow {
            self.handle_defeat(target_index, source);
        } else if taken.hp_lost > 0.0 {
            self.check_bind_on_hit(target);
        }
    }
}
