//! SessionRegistry - Active encounters keyed by character and monster
//!
//! The host surface over [`CombatSession`]: starts encounters, routes
//! character actions, runs the monster's reply, and reclaims idle sessions.

use crate::combat::{Action, ActionResult, CombatError, CombatSession, CombatStateView, SessionEnv};
use crate::turn::TurnInfo;
use crate::types::{CombatantSnapshot, MonsterRecord, Side};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Key of an active encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionHandle {
    pub character_id: u64,
    pub monster_id: u64,
}

impl SessionHandle {
    pub fn new(character_id: u64, monster_id: u64) -> Self {
        SessionHandle {
            character_id,
            monster_id,
        }
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.character_id, self.monster_id)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Combat already in progress for {0}")]
    AlreadyActive(SessionHandle),

    #[error("Monster is not in the same location as character ({character:?} vs {monster:?})")]
    LocationMismatch {
        character: Option<u64>,
        monster: Option<u64>,
    },

    #[error("Combat not found: {0}")]
    SessionNotFound(SessionHandle),

    #[error("Combat still in progress for {0}")]
    CombatInProgress(SessionHandle),

    #[error(transparent)]
    Combat(#[from] CombatError),
}

/// A new encounter, with the monster's opening attack when it moved first
#[derive(Debug, Clone, Serialize)]
pub struct StartOutcome {
    pub handle: SessionHandle,
    pub monster_response: Option<ActionResult>,
    /// Store writes that failed while preparing the encounter
    pub warnings: Vec<String>,
    pub state: CombatStateView,
}

/// Resolved action plus the monster's automatic reply, if any
#[derive(Debug, Clone, Serialize)]
pub struct ActOutcome {
    pub result: ActionResult,
    pub monster_response: Option<ActionResult>,
    pub state: CombatStateView,
}

/// Turn hand-off plus the monster's automatic reply
#[derive(Debug, Clone, Serialize)]
pub struct EndTurnOutcome {
    /// The turn now in progress
    pub turn: TurnInfo,
    pub monster_response: Option<ActionResult>,
    pub state: CombatStateView,
}

struct Slot {
    session: CombatSession,
    last_access: Duration,
}

/// Owns every active session
///
/// Requests take `&mut self`; hosts serving concurrent callers wrap the
/// registry in a mutex.
pub struct SessionRegistry {
    env: SessionEnv,
    sessions: HashMap<SessionHandle, Slot>,
    seed: Option<u64>,
    started: u64,
}

impl SessionRegistry {
    /// Registry whose sessions draw fresh randomness
    pub fn new(env: SessionEnv) -> Self {
        SessionRegistry {
            env,
            sessions: HashMap::new(),
            seed: None,
            started: 0,
        }
    }

    /// Registry whose sessions are seeded from `seed` in start order
    pub fn with_seed(env: SessionEnv, seed: u64) -> Self {
        SessionRegistry {
            seed: Some(seed),
            ..Self::new(env)
        }
    }

    pub fn env(&self) -> &SessionEnv {
        &self.env
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn contains(&self, handle: SessionHandle) -> bool {
        self.sessions.contains_key(&handle)
    }

    /// Read-only access to a live session
    pub fn session(&self, handle: SessionHandle) -> Option<&CombatSession> {
        self.sessions.get(&handle).map(|slot| &slot.session)
    }

    fn next_rng(&mut self) -> ChaCha8Rng {
        self.started += 1;
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(self.started)),
            None => ChaCha8Rng::seed_from_u64(rand::random()),
        }
    }

    fn slot_mut(&mut self, handle: SessionHandle) -> Result<&mut Slot, RegistryError> {
        let now = self.env.clock.now();
        let slot = self
            .sessions
            .get_mut(&handle)
            .ok_or(RegistryError::SessionNotFound(handle))?;
        slot.last_access = now;
        Ok(slot)
    }

    /// Begin an encounter
    ///
    /// A monster record with no health left is restored to full and
    /// persisted before the session starts. When the monster is faster and
    /// automatic monster turns are enabled, its opening attack resolves
    /// immediately and is returned with the outcome.
    pub fn start(
        &mut self,
        character: CombatantSnapshot,
        mut monster: MonsterRecord,
    ) -> Result<StartOutcome, RegistryError> {
        self.evict_idle();

        let handle = SessionHandle::new(character.id, monster.id);
        if self.sessions.contains_key(&handle) {
            return Err(RegistryError::AlreadyActive(handle));
        }
        if character.location_id != monster.location_id {
            return Err(RegistryError::LocationMismatch {
                character: character.location_id,
                monster: monster.location_id,
            });
        }

        let mut warnings = Vec::new();
        if !monster.is_alive() {
            monster.current_health = monster.max_health;
            if let Err(e) = self
                .env
                .store
                .persist_health(Side::Monster, monster.id, monster.max_health)
            {
                tracing::warn!(monster = monster.id, "failed to restore monster health: {}", e);
                warnings.push(format!("failed to restore monster health: {}", e));
            }
        }

        let rng = self.next_rng();
        let mut session = CombatSession::new(character, monster, &self.env, rng);
        let monster_response =
            if self.env.constants.sessions.auto_monster_turn && session.current_actor() == Side::Monster {
                Some(run_monster_turn(&mut session)?)
            } else {
                None
            };

        let state = session.state();
        let last_access = self.env.clock.now();
        self.sessions.insert(handle, Slot { session, last_access });
        Ok(StartOutcome {
            handle,
            monster_response,
            warnings,
            state,
        })
    }

    /// Resolve a character action
    ///
    /// If the action used up the turn and the fight goes on, the monster
    /// replies within the same call (when automatic monster turns are on).
    pub fn act(&mut self, handle: SessionHandle, action: Action) -> Result<ActOutcome, RegistryError> {
        let auto = self.env.constants.sessions.auto_monster_turn;
        let slot = self.slot_mut(handle)?;
        let session = &mut slot.session;

        let result = session.act(Side::Character, action)?;
        let monster_response = if auto && result.turn_consumed && !session.is_over() {
            session.end_turn()?;
            Some(run_monster_turn(session)?)
        } else {
            None
        };

        Ok(ActOutcome {
            result,
            monster_response,
            state: session.state(),
        })
    }

    /// Resolve the monster's attack on its own turn
    ///
    /// For hosts running without automatic monster turns. The turn stays
    /// with the monster until [`end_turn`](Self::end_turn) hands it back.
    pub fn monster_turn(&mut self, handle: SessionHandle) -> Result<ActOutcome, RegistryError> {
        let slot = self.slot_mut(handle)?;
        let session = &mut slot.session;

        let result = session.act(Side::Monster, Action::Basic)?;
        Ok(ActOutcome {
            result,
            monster_response: None,
            state: session.state(),
        })
    }

    /// End the current turn
    ///
    /// With automatic monster turns, handing the turn to the monster runs
    /// its attack and returns the turn to the character.
    pub fn end_turn(&mut self, handle: SessionHandle) -> Result<EndTurnOutcome, RegistryError> {
        let auto = self.env.constants.sessions.auto_monster_turn;
        let slot = self.slot_mut(handle)?;
        let session = &mut slot.session;

        let mut turn = session.end_turn()?;
        let mut monster_response = None;
        if auto && turn.actor == Side::Monster {
            let response = session.act(Side::Monster, Action::Basic)?;
            if !session.is_over() {
                turn = session.end_turn()?;
            }
            monster_response = Some(response);
        }

        Ok(EndTurnOutcome {
            turn,
            monster_response,
            state: session.state(),
        })
    }

    pub fn state(&mut self, handle: SessionHandle) -> Result<CombatStateView, RegistryError> {
        Ok(self.slot_mut(handle)?.session.state())
    }

    /// Remove a concluded encounter and report the winner
    pub fn finish(&mut self, handle: SessionHandle) -> Result<Side, RegistryError> {
        let slot = self
            .sessions
            .get(&handle)
            .ok_or(RegistryError::SessionNotFound(handle))?;
        let winner = slot
            .session
            .winner()
            .ok_or(RegistryError::CombatInProgress(handle))?;

        self.sessions.remove(&handle);
        tracing::info!(session = %handle, winner = %winner, "session finished");
        Ok(winner)
    }

    /// Drop an encounter whether or not it has concluded
    pub fn abandon(&mut self, handle: SessionHandle) -> Result<(), RegistryError> {
        if self.sessions.remove(&handle).is_none() {
            return Err(RegistryError::SessionNotFound(handle));
        }
        tracing::info!(session = %handle, "session abandoned");
        Ok(())
    }

    /// Remove sessions untouched for longer than the idle timeout
    ///
    /// Returns how many were removed.
    pub fn evict_idle(&mut self) -> usize {
        let now = self.env.clock.now();
        let timeout = Duration::from_secs(self.env.constants.sessions.idle_timeout_seconds);
        let before = self.sessions.len();

        self.sessions.retain(|handle, slot| {
            let idle = now.saturating_sub(slot.last_access);
            let keep = idle <= timeout;
            if !keep {
                tracing::warn!(session = %handle, idle_secs = idle.as_secs(), "evicting idle session");
            }
            keep
        });

        before - self.sessions.len()
    }
}

/// The monster's attack on its own turn, then the hand-back unless the
/// attack ended the fight
fn run_monster_turn(session: &mut CombatSession) -> Result<ActionResult, CombatError> {
    let response = session.act(Side::Monster, Action::Basic)?;
    if !session.is_over() {
        session.end_turn()?;
    }
    Ok(response)
}
