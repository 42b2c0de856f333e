//! Gambit evaluation - bucket gating and utility scoring

use super::gambit::{ActionKind, GambitRule, GambitSet, PriorityBucket, TargetSelector};
use super::profile::{ActionCategory, BrandProfile};
use super::view::BattleView;
use crate::brand::has_advantage;
use crate::combatant::{Combatant, DefenseMode};
use crate::skill::{SkillDefinition, SkillTarget};
use crate::status::EffectKind;
use crate::types::{AbilitySlot, CombatantId, SkillType};
use tracing::debug;

/// The action chosen for one think tick
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Index of the winning rule in its set
    pub rule_index: usize,
    pub rule_name: String,
    pub action: ActionKind,
    pub target: CombatantId,
    pub utility: f64,
    pub combined_priority: i64,
}

/// Which side a target must come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetScope {
    Enemy,
    Ally,
    /// Ally other than the actor
    OtherAlly,
    Caster,
}

impl TargetScope {
    pub fn for_skill(skill: &SkillDefinition) -> Self {
        match skill.target {
            SkillTarget::SingleEnemy | SkillTarget::AllEnemies => TargetScope::Enemy,
            SkillTarget::SingleAlly | SkillTarget::AllAllies => TargetScope::Ally,
            SkillTarget::Caster => TargetScope::Caster,
        }
    }
}

/// Skill in a slot if it can be used right now: equipped, known, off
/// cooldown, affordable and not blocked by silence
pub fn usable_skill<'a>(me: &Combatant, slot: AbilitySlot, view: &BattleView<'a>) -> Option<&'a SkillDefinition> {
    let ability = me.abilities.get(slot)?;
    let Some(skill) = view.skills.get(&ability.skill_id) else {
        debug!(combatant = %me.id, skill = %ability.skill_id, "unknown skill id in loadout");
        return None;
    };
    if !ability.is_ready() || me.current_mp() < skill.mp_cost as f64 {
        return None;
    }
    if me.effects.is_silenced() && !matches!(slot, AbilitySlot::BasicAttack | AbilitySlot::Defend) {
        return None;
    }
    Some(skill)
}

/// Category an action is scored under
pub fn action_category(action: ActionKind, skill: Option<&SkillDefinition>) -> ActionCategory {
    match action {
        ActionKind::GuardAlly | ActionKind::GuardChampion => ActionCategory::Positioning,
        ActionKind::Ability(AbilitySlot::Defend) => ActionCategory::Survival,
        ActionKind::Ability(_) => match skill.map(|s| s.skill_type) {
            Some(SkillType::Heal | SkillType::Buff | SkillType::Cleanse) => ActionCategory::TeamValue,
            Some(SkillType::Debuff | SkillType::Control | SkillType::Dispel) => ActionCategory::Control,
            Some(SkillType::Defend) => ActionCategory::Survival,
            Some(SkillType::Attack) | None => ActionCategory::Damage,
        },
    }
}

/// Resolve a selector within a scope. Scans are first-in-list on ties.
pub fn resolve_target<'a>(
    me: &'a Combatant,
    selector: TargetSelector,
    scope: TargetScope,
    skill: Option<&SkillDefinition>,
    view: &BattleView<'a>,
) -> Option<&'a Combatant> {
    if scope == TargetScope::Caster {
        return Some(me);
    }
    let pool: Vec<&'a Combatant> = match scope {
        TargetScope::Enemy => view.enemies.clone(),
        TargetScope::Ally => view.allies.clone(),
        TargetScope::OtherAlly => view.allies.iter().copied().filter(|c| c.id != me.id).collect(),
        TargetScope::Caster => Vec::new(),
    };

    match selector {
        TargetSelector::SelfTarget => (scope == TargetScope::Ally).then_some(me),
        TargetSelector::LowestHpEnemy if scope == TargetScope::Enemy => lowest_hp(&pool),
        TargetSelector::HighestHpEnemy if scope == TargetScope::Enemy => highest_hp(&pool),
        TargetSelector::LowestHpAlly if scope != TargetScope::Enemy => lowest_hp(&pool),
        TargetSelector::Champion if scope != TargetScope::Enemy => pool.iter().copied().find(|c| c.is_champion),
        TargetSelector::Auto => match scope {
            TargetScope::Enemy => pool
                .iter()
                .copied()
                .find(|e| has_advantage(me.brand, e.brand))
                .or_else(|| pool.first().copied()),
            _ if skill.map(|s| s.skill_type) == Some(SkillType::Cleanse) => pool
                .iter()
                .copied()
                .find(|a| a.effects.iter().any(|e| e.category().is_negative()))
                .or_else(|| lowest_hp(&pool)),
            _ => lowest_hp(&pool),
        },
        _ => None,
    }
}

fn lowest_hp<'a>(pool: &[&'a Combatant]) -> Option<&'a Combatant> {
    let mut best: Option<&'a Combatant> = None;
    for candidate in pool {
        if best.map_or(true, |b| candidate.hp_percent() < b.hp_percent()) {
            best = Some(*candidate);
        }
    }
    best
}

fn highest_hp<'a>(pool: &[&'a Combatant]) -> Option<&'a Combatant> {
    let mut best: Option<&'a Combatant> = None;
    for candidate in pool {
        if best.map_or(true, |b| candidate.hp_percent() > b.hp_percent()) {
            best = Some(*candidate);
        }
    }
    best
}

/// Guarding, defending or shored up with a defense buff
fn is_tank(target: &Combatant) -> bool {
    target.defense_mode() != DefenseMode::None || target.effects.has(EffectKind::DefenseUp)
}

/// `base_utility * product(multipliers)` for a resolved candidate
pub fn score(
    rule: &GambitRule,
    skill: Option<&SkillDefinition>,
    me: &Combatant,
    target: &Combatant,
    profile: &BrandProfile,
    view: &BattleView,
) -> f64 {
    let constants = view.constants;
    let category = action_category(rule.action, skill);
    let mut utility = rule.base_utility * profile.weights.multiplier(category);

    if view.is_enemy(target.id) {
        if has_advantage(me.brand, target.brand)
            && matches!(category, ActionCategory::Damage | ActionCategory::Control)
        {
            utility *= constants.advantage_multiplier;
        }
        if target.hp_percent() < constants.low_hp_threshold {
            utility *= profile.low_hp_target_multiplier;
        }
        if is_tank(target) {
            utility *= profile.tank_target_multiplier;
        }
    } else if category == ActionCategory::TeamValue && target.hp_percent() < constants.ally_critical_threshold {
        utility *= profile.ally_critical_multiplier;
    }

    if skill.map_or(false, |s| s.mp_cost > 0) && me.mp_percent() < constants.low_mana_threshold {
        utility *= constants.low_mana_multiplier;
    }

    if category == ActionCategory::Damage {
        if profile.tracks_momentum && view.has_momentum() {
            utility *= constants.momentum_multiplier;
        }
        utility *= profile.desperation_multiplier(view.ally_average_hp());
    }

    if profile.can_auto_defend
        && rule.action == ActionKind::Ability(AbilitySlot::Defend)
        && me.hp_percent() < constants.auto_defend_threshold
    {
        utility *= constants.auto_defend_multiplier;
    }

    utility
}

/// Resolve one rule into a scored candidate, or None if it cannot fire
fn candidate(
    index: usize,
    rule: &GambitRule,
    me: &Combatant,
    profile: &BrandProfile,
    view: &BattleView,
) -> Option<Decision> {
    if !rule.enabled {
        return None;
    }

    let (skill, scope) = match rule.action {
        // Ultimates run through the override window, never through gambits
        ActionKind::Ability(AbilitySlot::Ultimate) => return None,
        ActionKind::Ability(slot) => {
            let skill = usable_skill(me, slot, view)?;
            let scope = if slot == AbilitySlot::Defend {
                TargetScope::Caster
            } else {
                TargetScope::for_skill(skill)
            };
            (Some(skill), scope)
        }
        ActionKind::GuardAlly => (None, TargetScope::OtherAlly),
        ActionKind::GuardChampion => (None, TargetScope::OtherAlly),
    };

    let target = resolve_target(me, rule.target, scope, skill, view)?;
    if rule.action == ActionKind::GuardChampion && !target.is_champion {
        return None;
    }
    if !rule.condition.evaluate(me, Some(target), view) {
        return None;
    }

    Some(Decision {
        rule_index: index,
        rule_name: rule.name.clone(),
        action: rule.action,
        target: target.id,
        utility: score(rule, skill, me, target, profile, view),
        combined_priority: rule.combined_priority(),
    })
}

/// Pick an action for `me`.
///
/// Buckets are walked Critical to Low; the first bucket with any valid
/// candidate decides. Within it the highest utility wins, then the lower
/// combined priority, then the earlier rule.
pub fn evaluate(me: &Combatant, gambits: &GambitSet, profile: &BrandProfile, view: &BattleView) -> Option<Decision> {
    for bucket in PriorityBucket::all() {
        let mut best: Option<Decision> = None;
        for (index, rule) in gambits.rules.iter().enumerate() {
            if rule.bucket != *bucket {
                continue;
            }
            let Some(found) = candidate(index, rule, me, profile, view) else {
                continue;
            };
            let better = match &best {
                None => true,
                Some(current) => {
                    found.utility > current.utility
                        || (found.utility == current.utility && found.combined_priority < current.combined_priority)
                }
            };
            if better {
                best = Some(found);
            }
        }
        if best.is_some() {
            return best;
        }
    }
    None
}
