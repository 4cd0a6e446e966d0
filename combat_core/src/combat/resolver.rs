//! Action resolution - Basic attacks, skills, and monster attacks

use super::error::CombatError;
use super::result::{Action, ActionResult};
use super::session::CombatSession;
use crate::formula::{apply_magical_damage, apply_physical_damage, crit_damage, DamageRange};
use crate::skill::SkillEffect;
use crate::tactics::{tactics_from_action, ActionOutcome};
use crate::types::{Side, SkillId};
use rand::Rng;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Amounts accumulated while applying a skill's effects
#[derive(Debug, Default)]
struct EffectTotals {
    damage: Option<u32>,
    magical_damage: Option<u32>,
    heal: Option<u32>,
}

fn add(total: &mut Option<u32>, amount: u32) {
    *total = Some(total.unwrap_or(0) + amount);
}

impl CombatSession {
    /// Character weapon attack
    ///
    /// Rolls the physical range, then a crit against the character's crit
    /// chance, then the monster's flat defense.
    pub(super) fn resolve_basic_attack(&mut self) -> ActionResult {
        let base = self.character_stats.physical_damage.sample(&mut self.rng);
        let critical = self.rng.gen_range(0.0..100.0) < self.character_stats.crit_chance;
        let raw = if critical { crit_damage(base) } else { base };
        let damage = apply_physical_damage(raw, self.monster.physical_defense);

        self.monster_health.damage(damage);
        let warning = self.persist_health(Side::Monster);

        let mut tactics_gained = BTreeMap::new();
        for (kind, amount) in tactics_from_action(ActionOutcome::Attack {
            blocked: false,
            critical,
        }) {
            self.tactics.add_tactic(kind, amount);
            *tactics_gained.entry(kind).or_insert(0) += amount;
        }

        let message = if critical {
            format!("You dealt {} damage (CRITICAL!)", damage)
        } else {
            format!("You dealt {} damage", damage)
        };

        let mut result = self.result_for(Side::Character, Action::Basic, message);
        result.damage = Some(damage);
        result.critical = critical;
        result.tactics_gained = tactics_gained;
        result.warnings.extend(warning);
        result
    }

    /// Character skill use
    ///
    /// Preconditions are checked in order and nothing is spent unless all
    /// of them hold.
    pub(super) fn resolve_skill(&mut self, id: &SkillId) -> Result<ActionResult, CombatError> {
        let skills = Arc::clone(&self.skills);
        let skill = skills.get(id).ok_or_else(|| CombatError::SkillUnknown(id.clone()))?;

        if !self.character.knows(id) {
            return Err(CombatError::SkillNotLearned(id.clone()));
        }

        let available = self.character_mana.current();
        if available < skill.mana_cost {
            return Err(CombatError::InsufficientMana {
                required: skill.mana_cost,
                available,
            });
        }

        if let Some((kind, required, available)) = self.tactics.first_shortfall(&skill.tactics_cost) {
            return Err(CombatError::InsufficientTactics {
                kind,
                required,
                available,
            });
        }

        self.character_mana.spend(skill.mana_cost);
        self.tactics.use_tactics(&skill.tactics_cost);

        // A multiplier replaces any flat physical amount on the same skill
        let scaled = skill
            .effects
            .iter()
            .any(|effect| matches!(effect, SkillEffect::DamageMultiplier { .. }));

        let mut totals = EffectTotals::default();
        let mut warnings = Vec::new();
        for effect in &skill.effects {
            match *effect {
                SkillEffect::Damage { .. } if scaled => {}
                SkillEffect::Damage { amount } => {
                    let dealt = apply_physical_damage(amount, self.monster.physical_defense);
                    self.monster_health.damage(dealt);
                    add(&mut totals.damage, dealt);
                    warnings.extend(self.persist_health(Side::Monster));
                }
                SkillEffect::DamageMultiplier { multiplier } => {
                    let average = self.character_stats.physical_damage.average() as f64;
                    let raw = (average * multiplier).floor() as u32;
                    let dealt = apply_physical_damage(raw, self.monster.physical_defense);
                    self.monster_health.damage(dealt);
                    add(&mut totals.damage, dealt);
                    warnings.extend(self.persist_health(Side::Monster));
                }
                SkillEffect::MagicalDamage { amount } => {
                    let dealt = apply_magical_damage(amount, self.monster.magical_defense);
                    self.monster_health.damage(dealt);
                    add(&mut totals.magical_damage, dealt);
                    warnings.extend(self.persist_health(Side::Monster));
                }
                SkillEffect::Heal { amount } => {
                    let restored = self.character_health.restore(amount);
                    add(&mut totals.heal, restored);
                    warnings.extend(self.persist_health(Side::Character));
                }
            }
        }

        let mut message = format!("You used {}!", skill.name);
        if let Some(damage) = totals.damage {
            message.push_str(&format!(" Dealt {} damage.", damage));
        }
        if let Some(magical) = totals.magical_damage {
            message.push_str(&format!(" Dealt {} magical damage.", magical));
        }
        if let Some(heal) = totals.heal {
            message.push_str(&format!(" Restored {} HP.", heal));
        }

        let mut result = self.result_for(Side::Character, Action::Skill(id.clone()), message);
        result.skill_name = Some(skill.name.clone());
        result.damage = totals.damage;
        result.magical_damage = totals.magical_damage;
        result.heal = totals.heal;
        result.turn_consumed = skill.consumes_turn;
        result.warnings = warnings;
        Ok(result)
    }

    /// Monster basic attack against the character's flat defense
    pub(super) fn resolve_monster_attack(&mut self) -> ActionResult {
        let range = DamageRange::new(self.monster.physical_damage_min, self.monster.physical_damage_max);
        let raw = range.sample(&mut self.rng);
        let damage = apply_physical_damage(raw, self.character_stats.physical_defense);

        self.character_health.damage(damage);
        let warning = self.persist_health(Side::Character);

        let message = format!("{} dealt {} damage", self.monster.name, damage);
        let mut result = self.result_for(Side::Monster, Action::Basic, message);
        result.damage = Some(damage);
        result.warnings.extend(warning);
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::combat::{Action, CombatError, CombatSession, SessionEnv};
    use crate::config::CombatConstants;
    use crate::skill::{Skill, SkillCatalog, SkillEffect};
    use crate::store::{CombatantStore, InMemoryStore, StoreError};
    use crate::tactics::TacticKind;
    use crate::turn::ManualClock;
    use crate::types::{Attributes, CombatantSnapshot, MonsterRecord, Side, SkillId};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    struct FailingStore;

    impl CombatantStore for FailingStore {
        fn persist_health(&self, _side: Side, _id: u64, _health: u32) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }
    }

    fn troll() -> MonsterRecord {
        MonsterRecord {
            id: 7,
            name: "Troll".to_string(),
            level: 3,
            location_id: None,
            max_health: 80,
            current_health: 80,
            physical_damage_min: 8,
            physical_damage_max: 15,
            physical_defense: 5,
            magical_defense: 3.0,
            speed: 9,
        }
    }

    /// Agility 20 gives speed 14, enough to act before the troll
    fn hero() -> CombatantSnapshot {
        let mut hero = CombatantSnapshot::new(1, "Hero");
        hero.attributes = Attributes {
            agility: 20,
            ..Attributes::default()
        };
        hero
    }

    fn catalog() -> SkillCatalog {
        [
            Skill::new("combo_strike", "Combo Strike")
                .with_mana_cost(5)
                .with_tactic_cost(TacticKind::Attack, 1)
                .with_effect(SkillEffect::Damage { amount: 30 }),
            Skill::new("heavy", "Heavy")
                .with_mana_cost(4)
                .with_effect(SkillEffect::DamageMultiplier { multiplier: 1.5 }),
            Skill::new("crushing", "Crushing Blow")
                .with_mana_cost(4)
                .with_effect(SkillEffect::Damage { amount: 30 })
                .with_effect(SkillEffect::DamageMultiplier { multiplier: 1.5 }),
            Skill::new("bolt", "Bolt")
                .with_mana_cost(8)
                .with_effect(SkillEffect::MagicalDamage { amount: 20 }),
            Skill::new("feint", "Feint")
                .with_effect(SkillEffect::Damage { amount: 6 })
                .free_action(),
            Skill::new("mend", "Mend")
                .with_mana_cost(10)
                .with_effect(SkillEffect::Heal { amount: 25 }),
            Skill::new("drain", "Drain")
                .with_mana_cost(500)
                .with_effect(SkillEffect::MagicalDamage { amount: 5 }),
        ]
        .into_iter()
        .collect()
    }

    fn env_with(store: Arc<dyn CombatantStore>) -> (SessionEnv, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let env = SessionEnv::new(Arc::new(catalog()), CombatConstants::default(), store, clock.clone());
        (env, clock)
    }

    fn session(character: CombatantSnapshot, monster: MonsterRecord) -> (CombatSession, Arc<ManualClock>) {
        let store = Arc::new(InMemoryStore::new());
        store.insert_character(character.clone());
        store.insert_monster(monster.clone());
        let (env, clock) = env_with(store);
        let session = CombatSession::new(character, monster, &env, ChaCha8Rng::seed_from_u64(42));
        (session, clock)
    }

    #[test]
    fn test_basic_attack_damages_monster() {
        let (mut session, _) = session(hero(), troll());
        assert_eq!(session.current_actor(), Side::Character);

        let result = session.act(Side::Character, Action::Basic).unwrap();
        let damage = result.damage.unwrap();

        // Range [17, 23] against 5 defense, crit at most 41 - 5
        assert!((12..=36).contains(&damage));
        assert_eq!(result.monster_health, 80 - damage);
        assert_eq!(session.monster_health().current(), 80 - damage);
        assert_eq!(session.tactics().get(TacticKind::Attack), 1);
        assert!(result.turn_consumed);
        assert!(session.turn().action_taken);
    }

    #[test]
    fn test_basic_attack_is_reproducible_per_seed() {
        let (mut a, _) = session(hero(), troll());
        let (mut b, _) = session(hero(), troll());
        let first = a.act(Side::Character, Action::Basic).unwrap();
        let second = b.act(Side::Character, Action::Basic).unwrap();
        assert_eq!(first.damage, second.damage);
        assert_eq!(first.critical, second.critical);
    }

    #[test]
    fn test_second_action_refused() {
        let (mut session, _) = session(hero(), troll());
        session.act(Side::Character, Action::Basic).unwrap();
        let health = session.monster_health();

        let err = session.act(Side::Character, Action::Basic).unwrap_err();
        assert_eq!(err, CombatError::ActionAlreadyTaken);
        assert_eq!(session.monster_health(), health);
    }

    #[test]
    fn test_skill_blocked_by_empty_ledger() {
        let mut character = hero();
        character.learn("combo_strike");
        let (mut session, _) = session(character, troll());
        let mana = session.character_mana();

        let err = session
            .act(Side::Character, Action::Skill(SkillId::from("combo_strike")))
            .unwrap_err();

        assert_eq!(
            err,
            CombatError::InsufficientTactics {
                kind: TacticKind::Attack,
                required: 1,
                available: 0,
            }
        );
        assert_eq!(session.character_mana(), mana);
        assert_eq!(session.monster_health().current(), 80);
        assert!(!session.turn().action_taken);
    }

    #[test]
    fn test_skill_spends_mana_and_tactics() {
        let mut character = hero();
        character.learn("combo_strike");
        let (mut session, _) = session(character, troll());
        session.tactics_mut().add_tactic(TacticKind::Attack, 2);
        let mana = session.character_mana().current();

        let result = session
            .act(Side::Character, Action::Skill(SkillId::from("combo_strike")))
            .unwrap();

        assert_eq!(result.damage, Some(25));
        assert_eq!(result.character_mana, mana - 5);
        assert_eq!(session.tactics().get(TacticKind::Attack), 1);
        assert!(result.tactics_gained.is_empty());
        assert_eq!(result.skill_name.as_deref(), Some("Combo Strike"));
    }

    #[test]
    fn test_skill_check_order() {
        let (mut session, _) = session(hero(), troll());

        let unknown = session
            .act(Side::Character, Action::Skill(SkillId::from("meteor")))
            .unwrap_err();
        assert_eq!(unknown, CombatError::SkillUnknown(SkillId::from("meteor")));

        let unlearned = session
            .act(Side::Character, Action::Skill(SkillId::from("drain")))
            .unwrap_err();
        assert_eq!(unlearned, CombatError::SkillNotLearned(SkillId::from("drain")));
    }

    #[test]
    fn test_insufficient_mana() {
        let mut character = hero();
        character.learn("drain");
        let (mut session, _) = session(character, troll());
        let available = session.character_mana().current();

        let err = session
            .act(Side::Character, Action::Skill(SkillId::from("drain")))
            .unwrap_err();
        assert_eq!(err, CombatError::InsufficientMana { required: 500, available });
    }

    #[test]
    fn test_multiplier_and_magical_effects() {
        let mut character = hero();
        character.learn("heavy");
        character.learn("bolt");
        let (mut session, _) = session(character, troll());

        // Average of [17, 23] is 20; 20 * 1.5 = 30, minus 5 defense
        let heavy = session.act(Side::Character, Action::Skill(SkillId::from("heavy"))).unwrap();
        assert_eq!(heavy.damage, Some(25));

        session.end_turn().unwrap();
        session.act(Side::Monster, Action::Basic).unwrap();
        session.end_turn().unwrap();

        // 20 * 0.97 = 19.4
        let bolt = session.act(Side::Character, Action::Skill(SkillId::from("bolt"))).unwrap();
        assert_eq!(bolt.magical_damage, Some(19));
        assert_eq!(bolt.damage, None);
        assert_eq!(session.monster_health().current(), 80 - 25 - 19);
    }

    #[test]
    fn test_multiplier_replaces_flat_damage() {
        let mut character = hero();
        character.learn("crushing");
        let mut unarmored = troll();
        unarmored.physical_defense = 0;
        let (mut session, _) = session(character, unarmored);

        // One hit of 20 * 1.5; the flat 30 is not added on top
        let result = session
            .act(Side::Character, Action::Skill(SkillId::from("crushing")))
            .unwrap();
        assert_eq!(result.damage, Some(30));
        assert_eq!(result.message, "You used Crushing Blow! Dealt 30 damage.");
        assert_eq!(session.monster_health().current(), 50);
    }

    #[test]
    fn test_heal_reports_restored_amount() {
        let mut character = hero();
        character.learn("mend");
        let (mut session, _) = session(character, troll());
        session.end_turn().unwrap();
        let hit = session.act(Side::Monster, Action::Basic).unwrap().damage.unwrap();
        session.end_turn().unwrap();

        let result = session.act(Side::Character, Action::Skill(SkillId::from("mend"))).unwrap();
        assert_eq!(result.heal, Some(hit.min(25)));
        assert_eq!(result.character_health, result.character_max_health - hit + hit.min(25));
    }

    #[test]
    fn test_free_skill_keeps_turn() {
        let mut character = hero();
        character.learn("feint");
        let (mut session, _) = session(character, troll());

        let first = session.act(Side::Character, Action::Skill(SkillId::from("feint"))).unwrap();
        assert!(!first.turn_consumed);
        assert!(!session.turn().action_taken);

        session.act(Side::Character, Action::Skill(SkillId::from("feint"))).unwrap();
        session.act(Side::Character, Action::Basic).unwrap();
        assert!(session.turn().action_taken);
        assert_eq!(session.turn_number(), 1);
    }

    #[test]
    fn test_monster_attack_range() {
        let (mut session, _) = session(CombatantSnapshot::new(1, "Hero"), troll());
        // Speed 7 against 9: the troll opens
        assert_eq!(session.current_actor(), Side::Monster);

        let result = session.act(Side::Monster, Action::Basic).unwrap();
        // [8, 15] against 15 defense floors at 1
        assert_eq!(result.damage, Some(1));
        assert_eq!(result.character_health, 119);
        assert!(result.tactics_gained.is_empty());
    }

    #[test]
    fn test_monster_cannot_use_skills() {
        let (mut session, _) = session(CombatantSnapshot::new(1, "Hero"), troll());
        let err = session
            .act(Side::Monster, Action::Skill(SkillId::from("bolt")))
            .unwrap_err();
        assert!(matches!(err, CombatError::UnsupportedAction { actor: Side::Monster, .. }));
        assert!(!session.turn().action_taken);
    }

    #[test]
    fn test_lethal_attack_ends_combat() {
        let mut character = hero();
        character.weapon_bonus = 200;
        let (mut session, _) = session(character, troll());

        let result = session.act(Side::Character, Action::Basic).unwrap();
        assert_eq!(result.monster_health, 0);
        assert!(result.combat_over);
        assert_eq!(result.winner, Some(Side::Character));
        assert!(session.is_over());

        let err = session.end_turn().unwrap_err();
        assert_eq!(err, CombatError::CombatOver { winner: Some(Side::Character) });
        let err = session.act(Side::Monster, Action::Basic).unwrap_err();
        assert_eq!(err, CombatError::CombatOver { winner: Some(Side::Character) });
        assert_eq!(session.character_health().current(), session.character_health().max());
    }

    #[test]
    fn test_expired_turn_refuses_action() {
        let (mut session, clock) = session(hero(), troll());
        clock.advance_secs(15.0);

        let err = session.act(Side::Character, Action::Basic).unwrap_err();
        assert!(matches!(err, CombatError::TurnExpired { .. }));
        assert_eq!(session.monster_health().current(), 80);
    }

    #[test]
    fn test_store_failure_becomes_warning() {
        let (env, _) = env_with(Arc::new(FailingStore));
        let mut session = CombatSession::new(hero(), troll(), &env, ChaCha8Rng::seed_from_u64(1));

        let result = session.act(Side::Character, Action::Basic).unwrap();
        assert!(result.has_warnings());
        assert!(result.warnings[0].contains("offline"));
        assert_eq!(session.monster_health().current(), 80 - result.damage.unwrap());
    }
}
