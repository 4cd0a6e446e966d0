//! CombatSession - One character against one monster

use super::error::CombatError;
use super::pool::Pool;
use super::result::{Action, ActionResult, CombatStateView, LogEntry};
use crate::config::{default_skills, CombatConstants};
use crate::skill::SkillCatalog;
use crate::stats::DerivedStats;
use crate::store::CombatantStore;
use crate::tactics::TacticsLedger;
use crate::turn::{Clock, SystemClock, Turn, TurnController, TurnInfo};
use crate::types::{CombatantSnapshot, MonsterRecord, Side};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Collaborators shared by every session a host creates
#[derive(Clone)]
pub struct SessionEnv {
    pub skills: Arc<SkillCatalog>,
    pub constants: CombatConstants,
    pub store: Arc<dyn CombatantStore>,
    pub clock: Arc<dyn Clock>,
}

impl SessionEnv {
    pub fn new(
        skills: Arc<SkillCatalog>,
        constants: CombatConstants,
        store: Arc<dyn CombatantStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        SessionEnv {
            skills,
            constants,
            store,
            clock,
        }
    }

    /// Built-in skills, default constants, and the wall clock
    pub fn with_defaults(store: Arc<dyn CombatantStore>) -> Self {
        Self::new(
            Arc::new(default_skills()),
            CombatConstants::default(),
            store,
            Arc::new(SystemClock::new()),
        )
    }
}

/// Live state of an encounter
///
/// Owns the turn controller and tactics ledger. Health changes are written
/// through to the store after every mutation.
pub struct CombatSession {
    pub(super) character: CombatantSnapshot,
    pub(super) monster: MonsterRecord,
    pub(super) character_stats: DerivedStats,
    pub(super) character_health: Pool,
    pub(super) character_mana: Pool,
    pub(super) monster_health: Pool,
    pub(super) tactics: TacticsLedger,
    pub(super) turns: TurnController,
    pub(super) skills: Arc<SkillCatalog>,
    store: Arc<dyn CombatantStore>,
    pub(super) rng: ChaCha8Rng,
    log: Vec<LogEntry>,
    recent_log_entries: usize,
}

impl CombatSession {
    /// Start an encounter with both sides at full health
    ///
    /// The faster side takes turn 1; ties go to the character.
    pub fn new(character: CombatantSnapshot, monster: MonsterRecord, env: &SessionEnv, rng: ChaCha8Rng) -> Self {
        let character_stats = DerivedStats::from_snapshot(&character);
        let first = if character_stats.speed >= monster.speed {
            Side::Character
        } else {
            Side::Monster
        };

        let mut session = CombatSession {
            character_health: Pool::full(character_stats.max_health),
            character_mana: Pool::full(character_stats.max_mana),
            monster_health: Pool::full(monster.max_health),
            tactics: TacticsLedger::with_cap(env.constants.tactics.cap),
            turns: TurnController::start(first, env.constants.turn.clone(), Arc::clone(&env.clock)),
            skills: Arc::clone(&env.skills),
            store: Arc::clone(&env.store),
            rng,
            log: Vec::new(),
            recent_log_entries: env.constants.log.recent_entries,
            character_stats,
            character,
            monster,
        };

        let opening = format!(
            "{} engages {} ({} acts first)",
            session.character.name,
            session.monster.name,
            first
        );
        tracing::info!(
            character = session.character.id,
            monster = session.monster.id,
            first = %first,
            "combat started"
        );
        session.push_log(first, opening);
        session
    }

    // === Accessors ===

    pub fn character(&self) -> &CombatantSnapshot {
        &self.character
    }

    pub fn monster(&self) -> &MonsterRecord {
        &self.monster
    }

    pub fn character_stats(&self) -> &DerivedStats {
        &self.character_stats
    }

    pub fn character_health(&self) -> Pool {
        self.character_health
    }

    pub fn character_mana(&self) -> Pool {
        self.character_mana
    }

    pub fn monster_health(&self) -> Pool {
        self.monster_health
    }

    pub fn tactics(&self) -> &TacticsLedger {
        &self.tactics
    }

    /// Mutable ledger access for hosts that award tactics from outside
    /// the resolver, such as scripted encounters
    pub fn tactics_mut(&mut self) -> &mut TacticsLedger {
        &mut self.tactics
    }

    pub fn turn(&self) -> &Turn {
        self.turns.current()
    }

    pub fn current_actor(&self) -> Side {
        self.turns.actor()
    }

    pub fn turn_number(&self) -> u32 {
        self.turns.turn_number()
    }

    pub fn time_remaining(&self) -> f64 {
        self.turns.time_remaining()
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    // === Win detection ===

    /// True once either side is out of health
    pub fn is_over(&self) -> bool {
        self.character_health.is_depleted() || self.monster_health.is_depleted()
    }

    pub fn winner(&self) -> Option<Side> {
        if self.character_health.is_depleted() {
            Some(Side::Monster)
        } else if self.monster_health.is_depleted() {
            Some(Side::Character)
        } else {
            None
        }
    }

    fn ensure_running(&self) -> Result<(), CombatError> {
        if self.is_over() {
            return Err(CombatError::CombatOver { winner: self.winner() });
        }
        Ok(())
    }

    // === Operations ===

    /// Attempt an action for `actor`
    ///
    /// Fails without touching any state if the encounter is over, it is not
    /// `actor`'s turn, the turn's action is already spent, the turn has
    /// expired, or the action's own preconditions are not met.
    pub fn act(&mut self, actor: Side, action: Action) -> Result<ActionResult, CombatError> {
        self.ensure_running()?;
        self.turns.ensure_can_act(actor)?;

        let result = match (actor, &action) {
            (Side::Character, Action::Basic) => self.resolve_basic_attack(),
            (Side::Character, Action::Skill(id)) => self.resolve_skill(id)?,
            (Side::Monster, Action::Basic) => self.resolve_monster_attack(),
            (Side::Monster, Action::Skill(_)) => {
                return Err(CombatError::UnsupportedAction {
                    actor,
                    action: action.to_string(),
                });
            }
        };

        self.turns.record_action(action.clone());
        if !result.turn_consumed {
            self.turns.release_action();
        }
        self.turns.record_result(result.clone());

        tracing::debug!(
            turn = self.turns.turn_number(),
            actor = %actor,
            action = %action,
            damage = result.total_damage(),
            critical = result.critical,
            "action resolved"
        );
        self.push_log(actor, result.message.clone());

        if let Some(winner) = result.winner {
            tracing::info!(
                character = self.character.id,
                monster = self.monster.id,
                winner = %winner,
                turns = self.turns.turn_number(),
                "combat finished"
            );
            self.push_log(winner, format!("{} wins", winner));
        }

        Ok(result)
    }

    /// Hand the turn to the other side
    pub fn end_turn(&mut self) -> Result<TurnInfo, CombatError> {
        self.ensure_running()?;
        let info = self.turns.end_turn();
        tracing::info!(
            turn = info.turn_number,
            actor = %info.actor,
            budget = info.turn_time,
            "turn started"
        );
        self.push_log(info.actor, format!("Turn {}: {}'s move", info.turn_number, info.actor));
        Ok(info)
    }

    /// Snapshot for rendering
    pub fn state(&self) -> CombatStateView {
        let skip = self.log.len().saturating_sub(self.recent_log_entries);
        CombatStateView {
            turn_number: self.turns.turn_number(),
            current_actor: self.turns.actor(),
            time_remaining: self.turns.time_remaining(),
            action_taken: self.turns.current().action_taken,
            character_health: self.character_health.current(),
            character_max_health: self.character_health.max(),
            character_mana: self.character_mana.current(),
            character_max_mana: self.character_mana.max(),
            monster_health: self.monster_health.current(),
            monster_max_health: self.monster_health.max(),
            tactics: self.tactics.snapshot(),
            log: self.log[skip..].to_vec(),
            combat_over: self.is_over(),
            winner: self.winner(),
        }
    }

    // === Internals shared with the resolver ===

    fn push_log(&mut self, actor: Side, message: String) {
        self.log.push(LogEntry {
            turn_number: self.turns.turn_number(),
            actor,
            message,
        });
    }

    /// Write one side's health to the store. A failure becomes a warning.
    pub(super) fn persist_health(&self, side: Side) -> Option<String> {
        let (id, health) = match side {
            Side::Character => (self.character.id, self.character_health.current()),
            Side::Monster => (self.monster.id, self.monster_health.current()),
        };
        match self.store.persist_health(side, id, health) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(side = %side, id, health, "failed to persist health: {}", e);
                Some(format!("failed to persist {} health: {}", side, e))
            }
        }
    }

    /// Result skeleton carrying the current pools and outcome
    pub(super) fn result_for(&self, actor: Side, action: Action, message: String) -> ActionResult {
        ActionResult {
            success: true,
            actor,
            action,
            skill_name: None,
            damage: None,
            magical_damage: None,
            heal: None,
            critical: false,
            character_health: self.character_health.current(),
            character_max_health: self.character_health.max(),
            character_mana: self.character_mana.current(),
            character_max_mana: self.character_mana.max(),
            monster_health: self.monster_health.current(),
            monster_max_health: self.monster_health.max(),
            tactics_gained: BTreeMap::new(),
            turn_consumed: true,
            message,
            warnings: Vec::new(),
            combat_over: self.is_over(),
            winner: self.winner(),
        }
    }
}
