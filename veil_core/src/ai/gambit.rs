//! Gambit rules - condition + action + target, grouped into priority buckets

use super::view::BattleView;
use crate::brand::has_advantage;
use crate::combatant::Combatant;
use crate::skill::SkillDatabase;
use crate::status::{EffectCategory, EffectKind, EffectRegistry};
use crate::types::{AbilitySlot, SkillType};
use serde::{Deserialize, Serialize};

/// Evaluation tier; a bucket with any valid rule shadows the ones after it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityBucket {
    Critical,
    High,
    Standard,
    Low,
}

impl PriorityBucket {
    pub fn all() -> &'static [PriorityBucket] {
        &[
            PriorityBucket::Critical,
            PriorityBucket::High,
            PriorityBucket::Standard,
            PriorityBucket::Low,
        ]
    }

    pub fn index(&self) -> i64 {
        match self {
            PriorityBucket::Critical => 0,
            PriorityBucket::High => 1,
            PriorityBucket::Standard => 2,
            PriorityBucket::Low => 3,
        }
    }
}

/// Condition vocabulary. Thresholds are HP/MP fractions (0.25 = 25%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum ConditionKind {
    Always,
    Never,
    SelfHpBelow(f64),
    SelfHpAbove(f64),
    SelfMpBelow(f64),
    /// Any living enemy below the threshold
    EnemyHpBelow(f64),
    TargetHpBelow(f64),
    /// Another ally is under the critical threshold
    AllyCritical,
    SelfHasStatus(EffectKind),
    TargetHasStatus(EffectKind),
    /// Target carries any damage, control or debuff effect
    TargetHasNegativeStatus,
    TargetHasBuff,
    EnemyCountAtLeast(usize),
    AbilityReady(AbilitySlot),
    /// Our brand hits the target for double damage
    TargetWeakToSelf,
}

/// A condition with optional negation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GambitCondition {
    pub kind: ConditionKind,
    #[serde(default)]
    pub negate: bool,
}

impl GambitCondition {
    pub fn new(kind: ConditionKind) -> Self {
        GambitCondition { kind, negate: false }
    }

    pub fn not(kind: ConditionKind) -> Self {
        GambitCondition { kind, negate: true }
    }

    /// Check against the deciding unit, the resolved target and the battlefield
    pub fn evaluate(&self, me: &Combatant, target: Option<&Combatant>, view: &BattleView) -> bool {
        let raw = match self.kind {
            ConditionKind::Always => true,
            ConditionKind::Never => false,
            ConditionKind::SelfHpBelow(x) => me.hp_percent() < x,
            ConditionKind::SelfHpAbove(x) => me.hp_percent() > x,
            ConditionKind::SelfMpBelow(x) => me.mp_percent() < x,
            ConditionKind::EnemyHpBelow(x) => view.enemies.iter().any(|e| e.hp_percent() < x),
            ConditionKind::TargetHpBelow(x) => match target {
                Some(t) => t.hp_percent() < x,
                None => return false,
            },
            ConditionKind::AllyCritical => view
                .allies
                .iter()
                .any(|a| a.id != me.id && a.hp_percent() < view.constants.ally_critical_threshold),
            ConditionKind::SelfHasStatus(kind) => me.effects.has(kind),
            ConditionKind::TargetHasStatus(kind) => match target {
                Some(t) => t.effects.has(kind),
                None => return false,
            },
            ConditionKind::TargetHasNegativeStatus => match target {
                Some(t) => t.effects.iter().any(|e| e.category().is_negative()),
                None => return false,
            },
            ConditionKind::TargetHasBuff => match target {
                Some(t) => t.effects.iter().any(|e| e.category() == EffectCategory::Buff),
                None => return false,
            },
            ConditionKind::EnemyCountAtLeast(n) => view.enemies.len() >= n,
            ConditionKind::AbilityReady(slot) => me.abilities.is_ready(slot),
            ConditionKind::TargetWeakToSelf => match target {
                Some(t) => has_advantage(me.brand, t.brand),
                None => return false,
            },
        };
        raw != self.negate
    }
}

/// What a rule does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "slot")]
pub enum ActionKind {
    /// Use the skill in a slot (the Defend slot switches to defend-self)
    Ability(AbilitySlot),
    GuardAlly,
    GuardChampion,
}

/// How the rule picks its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSelector {
    SelfTarget,
    LowestHpEnemy,
    HighestHpEnemy,
    LowestHpAlly,
    Champion,
    /// Depends on the action: brand-advantaged enemy for offense,
    /// lowest-HP ally for support, an afflicted ally for cleanses
    Auto,
}

/// Immutable AI rule template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GambitRule {
    pub name: String,
    pub condition: GambitCondition,
    pub action: ActionKind,
    pub target: TargetSelector,
    pub bucket: PriorityBucket,
    /// Rank within the bucket; lower is preferred on ties
    pub priority: i64,
    pub base_utility: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl GambitRule {
    /// Always-true rule in the standard bucket
    pub fn new(name: impl Into<String>, action: ActionKind, target: TargetSelector) -> Self {
        GambitRule {
            name: name.into(),
            condition: GambitCondition::new(ConditionKind::Always),
            action,
            target,
            bucket: PriorityBucket::Standard,
            priority: 50,
            base_utility: 50.0,
            enabled: true,
        }
    }

    pub fn when(mut self, condition: GambitCondition) -> Self {
        self.condition = condition;
        self
    }

    pub fn in_bucket(mut self, bucket: PriorityBucket, priority: i64) -> Self {
        self.bucket = bucket;
        self.priority = priority;
        self
    }

    pub fn utility(mut self, base_utility: f64) -> Self {
        self.base_utility = base_utility;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// `bucket * 1000 + priority`; lower wins
    pub fn combined_priority(&self) -> i64 {
        self.bucket.index() * 1000 + self.priority
    }
}

/// Ordered rule list for one combatant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GambitSet {
    pub rules: Vec<GambitRule>,
}

impl GambitSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, rule: GambitRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: GambitRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Default rules generated from a combatant's loadout
    pub fn standard(me: &Combatant, skills: &SkillDatabase, effects: &EffectRegistry) -> Self {
        let mut set = GambitSet::new();

        set.push(
            GambitRule::new("emergency_defend", ActionKind::Ability(AbilitySlot::Defend), TargetSelector::SelfTarget)
                .when(GambitCondition::new(ConditionKind::SelfHpBelow(0.25)))
                .in_bucket(PriorityBucket::Critical, 20)
                .utility(60.0),
        );

        for (offset, slot) in [AbilitySlot::Skill1, AbilitySlot::Skill2, AbilitySlot::Skill3]
            .into_iter()
            .enumerate()
        {
            let offset = offset as i64;
            let Some(skill) = me.abilities.get(slot).and_then(|a| skills.get(&a.skill_id)) else {
                continue;
            };
            let action = ActionKind::Ability(slot);
            let effect_kind = skill
                .effect
                .as_deref()
                .and_then(|id| effects.get(id))
                .map(|d| d.kind);

            match skill.skill_type {
                SkillType::Heal => {
                    set.push(
                        GambitRule::new(format!("rescue_{}", skill.id), action, TargetSelector::LowestHpAlly)
                            .when(GambitCondition::new(ConditionKind::TargetHpBelow(0.25)))
                            .in_bucket(PriorityBucket::Critical, 10 + offset)
                            .utility(90.0),
                    );
                    set.push(
                        GambitRule::new(format!("mend_{}", skill.id), action, TargetSelector::LowestHpAlly)
                            .when(GambitCondition::new(ConditionKind::TargetHpBelow(0.6)))
                            .in_bucket(PriorityBucket::High, 10 + offset)
                            .utility(70.0),
                    );
                }
                SkillType::Cleanse => set.push(
                    GambitRule::new(format!("cleanse_{}", skill.id), action, TargetSelector::Auto)
                        .when(GambitCondition::new(ConditionKind::TargetHasNegativeStatus))
                        .in_bucket(PriorityBucket::High, 20 + offset)
                        .utility(75.0),
                ),
                SkillType::Buff => {
                    let condition = match effect_kind {
                        Some(kind) => GambitCondition::not(ConditionKind::TargetHasStatus(kind)),
                        None => GambitCondition::new(ConditionKind::Always),
                    };
                    set.push(
                        GambitRule::new(format!("buff_{}", skill.id), action, TargetSelector::Auto)
                            .when(condition)
                            .in_bucket(PriorityBucket::Standard, 30 + offset)
                            .utility(60.0),
                    );
                }
                SkillType::Attack => set.push(
                    GambitRule::new(format!("attack_{}", skill.id), action, TargetSelector::Auto)
                        .when(GambitCondition::new(ConditionKind::AbilityReady(slot)))
                        .in_bucket(PriorityBucket::Standard, 10 + offset)
                        .utility(100.0),
                ),
                SkillType::Debuff | SkillType::Control => {
                    let condition = match effect_kind {
                        Some(kind) => GambitCondition::not(ConditionKind::TargetHasStatus(kind)),
                        None => GambitCondition::new(ConditionKind::Always),
                    };
                    set.push(
                        GambitRule::new(format!("hinder_{}", skill.id), action, TargetSelector::Auto)
                            .when(condition)
                            .in_bucket(PriorityBucket::Standard, 20 + offset)
                            .utility(85.0),
                    );
                }
                SkillType::Dispel => set.push(
                    GambitRule::new(format!("dispel_{}", skill.id), action, TargetSelector::Auto)
                        .when(GambitCondition::new(ConditionKind::TargetHasBuff))
                        .in_bucket(PriorityBucket::Standard, 25 + offset)
                        .utility(80.0),
                ),
                SkillType::Defend => {}
            }
        }

        if !me.is_champion {
            set.push(
                GambitRule::new("protect_champion", ActionKind::GuardChampion, TargetSelector::Champion)
                    .when(GambitCondition::new(ConditionKind::TargetHpBelow(0.5)))
                    .in_bucket(PriorityBucket::Standard, 40)
                    .utility(90.0),
            );
        }

        set.push(
            GambitRule::new("basic_attack", ActionKind::Ability(AbilitySlot::BasicAttack), TargetSelector::Auto)
                .in_bucket(PriorityBucket::Standard, 90)
                .utility(50.0),
        );
        set.push(
            GambitRule::new("fallback_defend", ActionKind::Ability(AbilitySlot::Defend), TargetSelector::SelfTarget)
                .in_bucket(PriorityBucket::Low, 99)
                .utility(10.0),
        );

        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{AbilityLoadout, BaseStats};
    use crate::config::{default_skills, CombatConstants};
    use crate::types::{Brand, CombatantId, Side};

    #[test]
    fn test_combined_priority() {
        let worst_critical = GambitRule::new("a", ActionKind::GuardAlly, TargetSelector::Auto)
            .in_bucket(PriorityBucket::Critical, 999);
        let best_high = GambitRule::new("b", ActionKind::GuardAlly, TargetSelector::Auto)
            .in_bucket(PriorityBucket::High, 0);
        assert_eq!(worst_critical.combined_priority(), 999);
        assert_eq!(best_high.combined_priority(), 1000);
        assert!(worst_critical.combined_priority() < best_high.combined_priority());
    }

    #[test]
    fn test_condition_negation() {
        let skills = SkillDatabase::new();
        let effects = EffectRegistry::new();
        let constants = CombatConstants::default();
        let mut me = Combatant::new(CombatantId(1), "me", Brand::Savage, Side::Player, BaseStats::default());
        me.take_damage(80.0);
        let foe = Combatant::new(CombatantId(2), "foe", Brand::Venom, Side::Enemy, BaseStats::default());
        let roster = vec![&me, &foe];
        let view = BattleView::new(&me, roster, &skills, &effects, &constants);

        let low = GambitCondition::new(ConditionKind::SelfHpBelow(0.25));
        assert!(low.evaluate(&me, None, &view));
        assert!(!GambitCondition::not(ConditionKind::SelfHpBelow(0.25)).evaluate(&me, None, &view));
        assert!(GambitCondition::new(ConditionKind::TargetWeakToSelf).evaluate(&me, Some(&foe), &view));
        assert!(!GambitCondition::new(ConditionKind::TargetHpBelow(0.5)).evaluate(&me, None, &view));
        assert!(GambitCondition::new(ConditionKind::EnemyCountAtLeast(1)).evaluate(&me, None, &view));
        assert!(!GambitCondition::new(ConditionKind::Never).evaluate(&me, None, &view));
    }

    #[test]
    fn test_standard_set_from_loadout() {
        let skills = default_skills();
        let effects = EffectRegistry::with_defaults();
        let mut loadout = AbilityLoadout::basic();
        loadout.equip(AbilitySlot::Skill1, skills.get("radiant_mend").unwrap());
        loadout.equip(AbilitySlot::Skill2, skills.get("iron_bash").unwrap());
        loadout.equip(AbilitySlot::Skill3, skills.get("lullaby").unwrap());
        loadout.equip(AbilitySlot::Ultimate, skills.get("sanctuary").unwrap());
        let me = Combatant::new(CombatantId(1), "cleric", Brand::Grace, Side::Player, BaseStats::default())
            .with_abilities(loadout);

        let set = GambitSet::standard(&me, &skills, &effects);
        let names: Vec<&str> = set.rules.iter().map(|r| r.name.as_str()).collect();
        assert!(names.contains(&"rescue_radiant_mend"));
        assert!(names.contains(&"attack_iron_bash"));
        assert!(names.contains(&"hinder_lullaby"));
        assert!(names.contains(&"protect_champion"));
        assert!(set
            .rules
            .iter()
            .all(|r| r.action != ActionKind::Ability(AbilitySlot::Ultimate)));

        let hinder = set.rules.iter().find(|r| r.name == "hinder_lullaby").unwrap();
        assert_eq!(hinder.condition, GambitCondition::not(ConditionKind::TargetHasStatus(EffectKind::Sleep)));
    }

    #[test]
    fn test_rule_serde() {
        let rule = GambitRule::new("finisher", ActionKind::Ability(AbilitySlot::Skill1), TargetSelector::LowestHpEnemy)
            .when(GambitCondition::new(ConditionKind::EnemyHpBelow(0.2)))
            .in_bucket(PriorityBucket::High, 5);
        let json = serde_json::to_string(&rule).unwrap();
        let back: GambitRule = serde_json::from_str(&json).unwrap();
        assert_eq!(back.combined_priority(), 1005);
        assert_eq!(back.condition, rule.condition);
    }
}
