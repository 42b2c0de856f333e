//! Human-readable rendering of battle events and summaries

use veil_core::battle::EffectSummary;
use veil_core::{BattleEvent, BattleSummary, CaptureOutcome};

/// One-line description of an event
pub fn describe(event: &BattleEvent) -> String {
    match event {
        BattleEvent::BattleStarted { synergy } => format!("battle started (synergy {:?})", synergy),
        BattleEvent::AbilityUsed {
            actor,
            skill_id,
            targets,
        } => {
            let targets: Vec<String> = targets.iter().map(|t| t.to_string()).collect();
            format!("{} uses {} on [{}]", actor, skill_id, targets.join(", "))
        }
        BattleEvent::DefenseModeChanged { actor, mode } => format!("{} switches to {:?}", actor, mode),
        BattleEvent::DamageDealt {
            source,
            target,
            amount,
            critical,
            brand_multiplier,
        } => {
            let source = source.map_or_else(|| "effect".to_string(), |s| s.to_string());
            let crit = if *critical { " CRIT" } else { "" };
            format!("{} hits {} for {:.0} (x{:.2}){}", source, target, amount, brand_multiplier, crit)
        }
        BattleEvent::GuardIntercepted {
            guard,
            protected,
            amount,
        } => format!("{} guards {} and takes {:.0}", guard, protected, amount),
        BattleEvent::ShieldAbsorbed { target, amount } => format!("{}'s shield absorbs {:.0}", target, amount),
        BattleEvent::HealApplied { source, target, amount } => match source {
            Some(source) => format!("{} heals {} for {:.0}", source, target, amount),
            None => format!("{} regenerates {:.0}", target, amount),
        },
        BattleEvent::EffectApplied { target, kind, .. } => format!("{} gains {:?}", target, kind),
        BattleEvent::EffectRejected { target, kind, reason } => {
            format!("{} resists {:?} ({:?})", target, kind, reason)
        }
        BattleEvent::EffectsRemoved { target, kinds } => format!("{} loses {:?}", target, kinds),
        BattleEvent::EffectExpired { target, kind } => format!("{}'s {:?} wears off", target, kind),
        BattleEvent::CombatantDefeated { id, killer } => match killer {
            Some(killer) => format!("{} is defeated by {}", id, killer),
            None => format!("{} is defeated", id),
        },
        BattleEvent::SynergyChanged { from, to } => format!("synergy {:?} -> {:?}", from, to),
        BattleEvent::CorruptionChanged { id, corruption, band } => {
            format!("{} corruption {:.0} ({:?})", id, corruption, band)
        }
        BattleEvent::UltimateReady { id, expires_at } => {
            format!("{} ultimate ready (fires at {:.1}s)", id, expires_at)
        }
        BattleEvent::UltimateFired { id, target, overridden } => {
            let how = if *overridden { "player" } else { "auto" };
            format!("{} unleashes ultimate on {} ({})", id, target, how)
        }
        BattleEvent::ActionSkipped { actor, reason } => format!("{} skips: {}", actor, reason),
        BattleEvent::Betrayal { actor, target } => format!("{} turns on {}!", actor, target),
        BattleEvent::MarkedForCapture { target, binder } => format!("{} marks {} for capture", binder, target),
        BattleEvent::MonsterBound { id, threshold } => {
            format!("{} is bound (threshold {:.0}%)", id, threshold * 100.0)
        }
        BattleEvent::CaptureResolved { id, chance, outcome } => {
            let result = match outcome {
                CaptureOutcome::Captured => "captured".to_string(),
                CaptureOutcome::Fled => "fled".to_string(),
                CaptureOutcome::Berserk { damage_bonus } => format!("went berserk (+{:.0}%)", damage_bonus * 100.0),
            };
            format!("capture {} at {:.0}%: {}", id, chance * 100.0, result)
        }
        BattleEvent::CombatResumed { berserker } => format!("{} rejoins the fight", berserker),
        BattleEvent::BattleEnded { outcome } => format!("battle ended: {:?}", outcome),
    }
}

fn describe_effect(effect: &EffectSummary) -> String {
    let stacks = if effect.stacks > 1 { format!(" x{}", effect.stacks) } else { String::new() };
    format!("{:?}{} {:.0}% left", effect.kind, stacks, effect.remaining_percent)
}

/// Multi-line text summary
pub fn render_summary(summary: &BattleSummary) -> String {
    let mut out = String::new();
    let outcome = summary
        .outcome
        .map_or_else(|| "unfinished".to_string(), |o| format!("{:?}", o));
    out.push_str(&format!(
        "=== {} after {} ticks ({:.1}s), synergy {:?} ===\n",
        outcome, summary.ticks, summary.elapsed, summary.synergy
    ));
    for c in &summary.combatants {
        out.push_str(&format!(
            "{:>4} {:<14} {:?}/{:?} hp {:>5.0}/{:<5.0} corr {:>3.0} | dealt {:>6.0} taken {:>6.0} healed {:>5.0} guarded {:>5.0} kills {}{}\n",
            c.id.to_string(),
            c.name,
            c.side,
            c.brand,
            c.current_hp,
            c.max_hp,
            c.corruption,
            c.tally.damage_dealt,
            c.tally.damage_taken,
            c.tally.healing_done,
            c.tally.damage_guarded,
            c.tally.kills,
            if c.alive { "" } else { " (down)" },
        ));
        if !c.effects.is_empty() {
            let effects: Vec<String> = c.effects.iter().map(describe_effect).collect();
            out.push_str(&format!("     effects: {}\n", effects.join(", ")));
        }
    }
    for bound in &summary.bound {
        out.push_str(&format!("bound: {} {} at {:.0}% hp\n", bound.id, bound.name, bound.hp_percent * 100.0));
    }
    for id in &summary.captured {
        out.push_str(&format!("captured: {}\n", id));
    }
    out
}
