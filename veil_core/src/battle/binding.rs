//! In-battle binding and the post-battle capture flow

use super::{BattleEvent, BattleOrchestrator, BattleState, CommandError, ScheduledAction};
use crate::capture::{bind_threshold, roll_capture, BoundMonster, CaptureAttempt, CaptureCalculation, CaptureOutcome, CaptureReport};
use crate::combatant::{Combatant, CombatantRecord, DefenseMode};
use crate::status::{EffectApplication, EffectDefinition, EffectKind};
use crate::types::{CombatantId, Side};
use std::collections::HashSet;
use tracing::{debug, info};

impl BattleOrchestrator {
    /// Start tracking `target`'s bind threshold against `binder`
    pub(super) fn mark_for_capture(&mut self, binder: CombatantId, target: CombatantId) {
        self.capture_marks.retain(|(t, _)| *t != target);
        self.capture_marks.push((target, binder));
        debug!(%target, %binder, "marked for capture");
        self.emit(BattleEvent::MarkedForCapture { target, binder });
        self.try_bind(target, binder);
    }

    /// Enemies currently marked for capture
    pub fn capture_marks(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.capture_marks.iter().map(|(target, _)| *target)
    }

    pub fn bound(&self) -> &[BoundMonster] {
        &self.bound
    }

    pub fn captured(&self) -> &[CombatantId] {
        &self.captured
    }

    /// Bind every marked enemy whose HP has fallen to its threshold
    pub(super) fn check_binds(&mut self) {
        let marks = self.capture_marks.clone();
        for (target, binder) in marks {
            self.try_bind(target, binder);
        }
    }

    /// Re-check one enemy right after it was hit
    pub(super) fn check_bind_on_hit(&mut self, target: CombatantId) {
        if let Some(&(_, binder)) = self.capture_marks.iter().find(|(t, _)| *t == target) {
            self.try_bind(target, binder);
        }
    }

    fn try_bind(&mut self, target: CombatantId, binder: CombatantId) -> bool {
        let Some(target_index) = self.index_of(target).filter(|_| self.is_live(target)) else {
            self.capture_marks.retain(|(t, _)| *t != target);
            return false;
        };
        // A fallen binder hands the bind to the first live party member
        let binder_index = self
            .index_of(binder)
            .filter(|_| self.is_live(binder))
            .or_else(|| {
                self.combatants
                    .iter()
                    .position(|c| c.side == Side::Player && c.is_alive() && self.in_play(c.id))
            });
        let Some(binder_index) = binder_index else {
            return false;
        };

        let threshold = {
            let allies: Vec<&Combatant> = self.roster().filter(|c| c.side == Side::Player).collect();
            bind_threshold(
                &self.combatants[target_index],
                &self.combatants[binder_index],
                &allies,
                &self.constants.capture,
            )
        };
        let hp_percent = self.combatants[target_index].hp_percent();
        if hp_percent > threshold.threshold {
            return false;
        }

        let snapshot = BoundMonster::snapshot(&self.combatants[target_index], threshold.threshold, self.time);
        self.combatants[target_index].set_defense_mode(DefenseMode::None);
        self.out_of_play.insert(target);
        self.capture_marks.retain(|(t, _)| *t != target);
        self.ultimate_windows.remove(&target);
        self.pending_commands.retain(|c| c.issuer != target);
        info!(%target, threshold = threshold.threshold, hp_percent, "monster bound");
        self.emit(BattleEvent::MonsterBound {
            id: target,
            threshold: threshold.threshold,
        });
        self.bound.push(snapshot);
        true
    }

    /// Champion's level, else the highest party level
    pub fn player_level(&self) -> u32 {
        let party = self.combatants.iter().filter(|c| c.side == Side::Player);
        party
            .clone()
            .find(|c| c.is_champion)
            .map(|c| c.level)
            .or_else(|| party.map(|c| c.level).max())
            .unwrap_or(1)
    }

    /// Resolve capture attempts on bound monsters after a victory.
    ///
    /// Every attempt is checked before any is rolled. A berserk result puts
    /// the monster back in the fight with a damage buff and reopens the battle.
    pub fn attempt_captures(&mut self, attempts: &[CaptureAttempt]) -> Result<Vec<CaptureReport>, CommandError> {
        if self.state != BattleState::Victory {
            return Err(CommandError::NotWon);
        }
        let mut seen = HashSet::new();
        for attempt in attempts {
            if !seen.insert(attempt.target) || !self.bound.iter().any(|b| b.id == attempt.target) {
                return Err(CommandError::NotBound(attempt.target));
            }
        }

        let player_level = self.player_level();
        let mut reports = Vec::with_capacity(attempts.len());
        let mut resumed = false;

        for attempt in attempts {
            let Some(pos) = self.bound.iter().position(|b| b.id == attempt.target) else {
                continue;
            };
            let bound = self.bound.remove(pos);
            let calculation =
                CaptureCalculation::compute(&bound, player_level, attempt.item, attempt.qte, &self.constants.capture);
            let outcome = roll_capture(&calculation, &bound, player_level, &self.constants.capture, &mut self.rng);

            info!(
                target_id = %bound.id,
                chance = calculation.final_chance,
                outcome = ?outcome,
                "capture resolved"
            );
            self.emit(BattleEvent::CaptureResolved {
                id: bound.id,
                chance: calculation.final_chance,
                outcome,
            });

            match outcome {
                CaptureOutcome::Captured => self.captured.push(bound.id),
                CaptureOutcome::Fled => {}
                CaptureOutcome::Berserk { damage_bonus } => {
                    self.enrage(bound.id, damage_bonus);
                    resumed = true;
                }
            }
            reports.push(CaptureReport {
                target: bound.id,
                calculation,
                outcome,
            });
        }

        if resumed {
            self.state = BattleState::Active;
        }
        Ok(reports)
    }

    /// Buff a failed capture and schedule its return next tick
    fn enrage(&mut self, id: CombatantId, damage_bonus: f64) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        let duration = self.constants.capture.berserk_duration;
        let mut definition = self
            .effects
            .by_kind(EffectKind::Berserk)
            .cloned()
            .unwrap_or_else(|| EffectDefinition::new("berserk", EffectKind::Berserk, damage_bonus, duration));
        definition.base_duration = duration;

        let brand = self.combatants[index].brand;
        let application = EffectApplication {
            source: Some(id),
            source_brand: brand,
            potency_override: Some(damage_bonus),
            ..Default::default()
        };
        if !self.combatants[index].effects.apply(&definition, &application).is_rejected() {
            self.emit(BattleEvent::EffectApplied {
                target: id,
                kind: EffectKind::Berserk,
                source: Some(id),
            });
        }
        self.scheduler.schedule(self.tick_count + 1, ScheduledAction::Rejoin(id));
    }

    /// Save records for captured monsters, ready to join the player's roster
    pub fn captured_records(&self) -> Vec<CombatantRecord> {
        self.captured
            .iter()
            .filter_map(|&id| self.combatant(id))
            .map(|monster| {
                let mut record = monster.to_record();
                record.side = Side::Player;
                record.player_controlled = true;
                record.slot = 0;
                record
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::Command;
    use super::*;
    use crate::capture::{CaptureItem, QteGrade};
    use crate::combatant::BaseStats;
    use crate::types::{Brand, Path, Rarity};

    fn unit(id: u32, brand: Brand, side: Side) -> Combatant {
        Combatant::new(CombatantId(id), format!("unit{}", id), brand, side, BaseStats::default())
    }

    /// Player vs one marked enemy already at 10% HP
    fn bound_battle(seed: u64) -> (BattleOrchestrator, CombatantId) {
        let mut battle = BattleOrchestrator::new(Path::Unchained, seed);
        let hero = battle.add_combatant(unit(1, Brand::Iron, Side::Player));
        let wild = battle.add_combatant(unit(2, Brand::Venom, Side::Enemy).with_rarity(Rarity::Common));
        battle.start();
        battle.combatant_mut(wild).unwrap().take_damage(90.0);
        battle.submit_command(Command::mark_for_capture(hero, wild)).unwrap();
        assert!(!battle.in_play(wild));
        battle.tick(0.01);
        (battle, wild)
    }

    #[test]
    fn test_marked_enemy_binds_and_ends_battle() {
        let (battle, wild) = bound_battle(1);
        assert_eq!(battle.state(), BattleState::Victory);
        assert!(!battle.in_play(wild));
        assert_eq!(battle.bound().len(), 1);
        assert_eq!(battle.bound()[0].id, wild);
        assert!(battle
            .events()
            .iter()
            .any(|e| matches!(e, BattleEvent::MonsterBound { id, .. } if *id == wild)));
    }

    #[test]
    fn test_capture_requires_victory_and_bound_target() {
        let mut battle = BattleOrchestrator::new(Path::Unchained, 1);
        battle.add_combatant(unit(1, Brand::Iron, Side::Player));
        battle.add_combatant(unit(2, Brand::Venom, Side::Enemy));
        let attempt = CaptureAttempt {
            target: CombatantId(2),
            item: CaptureItem::Master,
            qte: QteGrade::Perfect,
        };
        assert_eq!(battle.attempt_captures(&[attempt]), Err(CommandError::NotWon));

        let (mut battle, _) = bound_battle(1);
        let stray = CaptureAttempt {
            target: CombatantId(1),
            ..attempt
        };
        assert_eq!(battle.attempt_captures(&[stray]), Err(CommandError::NotBound(CombatantId(1))));
        // Rejected batches leave the bound list alone
        assert_eq!(battle.bound().len(), 1);
    }

    #[test]
    fn test_capture_reports_every_attempt() {
        for seed in 0..20 {
            let (mut battle, wild) = bound_battle(seed);
            let reports = battle
                .attempt_captures(&[CaptureAttempt {
                    target: wild,
                    item: CaptureItem::Master,
                    qte: QteGrade::Perfect,
                }])
                .unwrap();
            assert_eq!(reports.len(), 1);
            assert!(battle.bound().is_empty());
            match reports[0].outcome {
                CaptureOutcome::Captured => {
                    assert_eq!(battle.captured(), &[wild]);
                    let records = battle.captured_records();
                    assert_eq!(records[0].side, Side::Player);
                }
                CaptureOutcome::Fled => assert_eq!(battle.state(), BattleState::Victory),
                CaptureOutcome::Berserk { damage_bonus } => {
                    assert!((0.30..=0.50).contains(&damage_bonus));
                    assert_eq!(battle.state(), BattleState::Active);
                    let events = battle.tick(0.01).to_vec();
                    assert!(events
                        .iter()
                        .any(|e| matches!(e, BattleEvent::CombatResumed { berserker } if *berserker == wild)));
                    assert!(battle.in_play(wild));
                }
            }
        }
    }

    #[test]
    fn test_player_level_prefers_champion() {
        let mut battle = BattleOrchestrator::new(Path::Unchained, 1);
        battle.add_combatant(unit(1, Brand::Iron, Side::Player).with_level(12));
        assert_eq!(battle.player_level(), 12);
        battle.add_combatant(unit(2, Brand::Mend, Side::Player).with_level(4).as_champion());
        assert_eq!(battle.player_level(), 4);
    }
}
