//! End-to-end battle scenarios
//!
//! Drives a full BattleOrchestrator through the public API: party setup,
//! observers, player commands, the end-of-battle summary and captures.

use std::cell::RefCell;
use std::rc::Rc;

use veil_core::prelude::*;
use veil_core::{BattleOutcome, CaptureOutcome, CommandError, SynergyTier};

fn member(id: u32, brand: Brand, side: Side, level: u32) -> Combatant {
    Combatant::new(CombatantId(id), format!("{:?}{}", brand, id), brand, side, BaseStats::default()).with_level(level)
}

/// Full Ironbound party against two Surge enemies
fn ironbound_skirmish(seed: u64) -> BattleOrchestrator {
    let mut battle = BattleOrchestrator::new(Path::Ironbound, seed);
    battle.add_combatant(member(1, Brand::Iron, Side::Player, 5));
    battle.add_combatant(member(2, Brand::Mend, Side::Player, 5));
    battle.add_combatant(member(3, Brand::Grace, Side::Player, 5));
    battle.add_combatant(member(10, Brand::Surge, Side::Enemy, 1));
    battle.add_combatant(member(11, Brand::Surge, Side::Enemy, 1));
    battle
}

fn run_to_end(battle: &mut BattleOrchestrator, max_ticks: usize) {
    for _ in 0..max_ticks {
        battle.tick(0.1);
        if battle.is_over() {
            return;
        }
    }
}

#[test]
fn test_skirmish_reaches_victory_with_full_synergy() {
    let mut battle = ironbound_skirmish(3);
    run_to_end(&mut battle, 5000);

    assert_eq!(battle.state(), BattleState::Victory);
    assert_eq!(battle.synergy(), SynergyTier::Full);
    assert!(matches!(
        battle.events().last(),
        Some(BattleEvent::BattleEnded {
            outcome: BattleOutcome::Victory
        })
    ));
}

#[test]
fn test_observer_sees_every_logged_event() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    let mut battle = ironbound_skirmish(11);
    battle.add_observer(move |event: &BattleEvent| sink.borrow_mut().push(event.clone()));
    run_to_end(&mut battle, 5000);

    let seen = seen.borrow();
    assert_eq!(seen.len(), battle.events().len());
    assert_eq!(seen.as_slice(), battle.events());
}

#[test]
fn test_summary_matches_battle() {
    let mut battle = ironbound_skirmish(5);
    run_to_end(&mut battle, 5000);
    let summary = battle.summary();

    assert_eq!(summary.outcome, Some(BattleOutcome::Victory));
    assert_eq!(summary.ticks, battle.tick_count());
    assert!((summary.elapsed - battle.time()).abs() < 1e-9);
    assert_eq!(summary.combatants.len(), 5);
    assert!(summary.side_damage(Side::Player) > 0.0);

    let kills: u32 = summary.combatants.iter().map(|c| c.tally.kills).sum();
    assert_eq!(kills, 2);
    for enemy in [CombatantId(10), CombatantId(11)] {
        let entry = summary.get(enemy).unwrap();
        assert!(!entry.alive);
        assert!(entry.tally.damage_taken > 0.0);
    }

    let json = summary.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["outcome"], "victory");
}

#[test]
fn test_same_seed_replays_identically() {
    let mut first = ironbound_skirmish(42);
    let mut second = ironbound_skirmish(42);
    run_to_end(&mut first, 5000);
    run_to_end(&mut second, 5000);
    assert_eq!(first.events(), second.events());
}

#[test]
fn test_player_command_overrides_gambits() {
    let skills = default_skills();
    let mut loadout = AbilityLoadout::basic();
    loadout.equip(AbilitySlot::Skill1, skills.get("iron_bash").unwrap());

    let mut battle = BattleOrchestrator::new(Path::Unchained, 9);
    let hero = battle.add_combatant(member(1, Brand::Iron, Side::Player, 5).with_abilities(loadout));
    let foe = battle.add_combatant(member(2, Brand::Venom, Side::Enemy, 5));
    battle.start();
    battle
        .submit_command(Command::ability(hero, AbilitySlot::Skill1, foe))
        .unwrap();

    let events = battle.tick(0.1).to_vec();
    let used = events.iter().find_map(|e| match e {
        BattleEvent::AbilityUsed { actor, skill_id, targets } if *actor == hero => Some((skill_id.clone(), targets.clone())),
        _ => None,
    });
    assert_eq!(used, Some(("iron_bash".to_string(), vec![foe])));

    // Cooldown now blocks a second cast
    assert!(matches!(
        battle.submit_command(Command::ability(hero, AbilitySlot::Skill1, foe)),
        Err(CommandError::OnCooldown { .. })
    ));
}

#[test]
fn test_bind_then_capture_flow() {
    let mut battle = BattleOrchestrator::new(Path::Fangborn, 2);
    let hero = battle.add_combatant(member(1, Brand::Savage, Side::Player, 10).as_champion());
    let wild = battle.add_combatant(member(2, Brand::Venom, Side::Enemy, 3));
    battle.start();

    let max_hp = battle.combatant(wild).unwrap().max_hp();
    battle.combatant_mut(wild).unwrap().take_damage(max_hp * 0.95);
    battle.submit_command(Command::mark_for_capture(hero, wild)).unwrap();
    battle.tick(0.1);

    assert_eq!(battle.state(), BattleState::Victory);
    assert_eq!(battle.bound().len(), 1);

    let reports = battle
        .attempt_captures(&[CaptureAttempt {
            target: wild,
            item: CaptureItem::Greater,
            qte: QteGrade::Good,
        }])
        .unwrap();
    assert_eq!(reports.len(), 1);
    let calc = reports[0].calculation;
    assert!((calc.qte_bonus - 0.10).abs() < 1e-9);
    assert!(calc.final_chance > 0.5);

    match reports[0].outcome {
        CaptureOutcome::Captured => {
            let records = battle.captured_records();
            assert_eq!(records.len(), 1);
            assert!(records[0].player_controlled);
        }
        CaptureOutcome::Fled => assert!(battle.captured().is_empty()),
        CaptureOutcome::Berserk { .. } => assert_eq!(battle.state(), BattleState::Active),
    }
    assert!(battle
        .events()
        .iter()
        .any(|e| matches!(e, BattleEvent::CaptureResolved { id, .. } if *id == wild)));
}
