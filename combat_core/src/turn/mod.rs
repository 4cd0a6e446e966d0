//! Turn controller - Whose turn it is, the turn deadline, and the action flag

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use crate::combat::{Action, ActionResult, CombatError};
use crate::config::TurnConstants;
use crate::types::Side;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Time budget in seconds for a 1-indexed turn number
///
/// `max(minimum, base · (1 − reduction·(n − 1)))`
pub fn turn_budget(turn_number: u32, timing: &TurnConstants) -> f64 {
    let elapsed_turns = turn_number.saturating_sub(1) as f64;
    let budget = timing.base_seconds * (1.0 - timing.reduction_per_turn * elapsed_turns);
    budget.max(timing.minimum_seconds)
}

/// One combatant's opportunity to act
#[derive(Debug, Clone)]
pub struct Turn {
    pub actor: Side,
    /// 1-indexed position in the encounter
    pub number: u32,
    /// Seconds available for this turn
    pub budget: f64,
    started_at: Duration,
    pub action_taken: bool,
    pub last_action: Option<Action>,
    pub last_result: Option<ActionResult>,
}

/// Summary of a newly started turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnInfo {
    pub turn_number: u32,
    pub actor: Side,
    /// Seconds the new actor has to act
    pub turn_time: f64,
}

/// Tracks the active turn and its countdown
pub struct TurnController {
    timing: TurnConstants,
    clock: Arc<dyn Clock>,
    current: Turn,
}

impl TurnController {
    /// Begin the encounter with turn 1 for `first`
    pub fn start(first: Side, timing: TurnConstants, clock: Arc<dyn Clock>) -> Self {
        let current = Turn {
            actor: first,
            number: 1,
            budget: turn_budget(1, &timing),
            started_at: clock.now(),
            action_taken: false,
            last_action: None,
            last_result: None,
        };
        TurnController { timing, clock, current }
    }

    pub fn current(&self) -> &Turn {
        &self.current
    }

    pub fn actor(&self) -> Side {
        self.current.actor
    }

    pub fn turn_number(&self) -> u32 {
        self.current.number
    }

    fn elapsed(&self) -> f64 {
        self.clock.now().saturating_sub(self.current.started_at).as_secs_f64()
    }

    /// Whether the turn's budget has run out
    pub fn is_expired(&self) -> bool {
        self.elapsed() >= self.current.budget
    }

    /// Seconds left before the turn expires
    pub fn time_remaining(&self) -> f64 {
        (self.current.budget - self.elapsed()).max(0.0)
    }

    /// Check that `actor` may act right now
    pub fn ensure_can_act(&self, actor: Side) -> Result<(), CombatError> {
        if self.current.actor != actor {
            return Err(CombatError::NotYourTurn {
                actor,
                current: self.current.actor,
            });
        }
        if self.current.action_taken {
            return Err(CombatError::ActionAlreadyTaken);
        }
        if self.is_expired() {
            return Err(CombatError::TurnExpired {
                budget: self.current.budget,
            });
        }
        Ok(())
    }

    /// Mark this turn's action as spent
    pub fn record_action(&mut self, action: Action) {
        self.current.action_taken = true;
        self.current.last_action = Some(action);
    }

    /// Keep the outcome of the latest action on the turn
    pub fn record_result(&mut self, result: ActionResult) {
        self.current.last_result = Some(result);
    }

    /// Let the same actor act again within the current deadline
    pub fn release_action(&mut self) {
        self.current.action_taken = false;
    }

    /// Hand the turn to the other side with a fresh countdown
    pub fn end_turn(&mut self) -> TurnInfo {
        let number = self.current.number + 1;
        self.current = Turn {
            actor: self.current.actor.opponent(),
            number,
            budget: turn_budget(number, &self.timing),
            started_at: self.clock.now(),
            action_taken: false,
            last_action: None,
            last_result: None,
        };
        TurnInfo {
            turn_number: number,
            actor: self.current.actor,
            turn_time: self.current.budget,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn controller(first: Side) -> (TurnController, ManualClock) {
        let clock = ManualClock::new();
        let turns = TurnController::start(first, TurnConstants::default(), Arc::new(clock.clone()));
        (turns, clock)
    }

    #[test]
    fn test_budget_schedule() {
        let timing = TurnConstants::default();
        assert!((turn_budget(1, &timing) - 15.0).abs() < 1e-9);
        assert!((turn_budget(2, &timing) - 13.5).abs() < 1e-9);
        assert!((turn_budget(5, &timing) - 9.0).abs() < 1e-9);
        assert!((turn_budget(8, &timing) - 5.0).abs() < 1e-9);
        assert!((turn_budget(50, &timing) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_end_turn_flips_actor() {
        let (mut turns, _) = controller(Side::Character);
        let info = turns.end_turn();
        assert_eq!(info.actor, Side::Monster);
        assert_eq!(info.turn_number, 2);
        assert_eq!(turns.end_turn().actor, Side::Character);
    }

    #[test]
    fn test_wrong_actor() {
        let (turns, _) = controller(Side::Monster);
        assert!(matches!(
            turns.ensure_can_act(Side::Character),
            Err(CombatError::NotYourTurn { .. })
        ));
    }

    #[test]
    fn test_action_already_taken() {
        let (mut turns, _) = controller(Side::Character);
        turns.record_action(Action::Basic);
        assert!(matches!(
            turns.ensure_can_act(Side::Character),
            Err(CombatError::ActionAlreadyTaken)
        ));
        turns.release_action();
        assert!(turns.ensure_can_act(Side::Character).is_ok());
    }

    #[test]
    fn test_expiry() {
        let (turns, clock) = controller(Side::Character);
        clock.advance_secs(14.9);
        assert!(!turns.is_expired());
        assert!(turns.time_remaining() > 0.0);
        clock.advance_secs(0.1);
        assert!(turns.is_expired());
        assert_eq!(turns.time_remaining(), 0.0);
        assert!(matches!(
            turns.ensure_can_act(Side::Character),
            Err(CombatError::TurnExpired { .. })
        ));
    }

    #[test]
    fn test_new_turn_resets_countdown() {
        let (mut turns, clock) = controller(Side::Character);
        clock.advance_secs(20.0);
        assert!(turns.is_expired());
        turns.end_turn();
        assert!(!turns.is_expired());
        assert!((turns.time_remaining() - 13.5).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn budget_non_increasing_with_floor(n in 1u32..500) {
            let timing = TurnConstants::default();
            let here = turn_budget(n, &timing);
            prop_assert!(here >= 5.0);
            prop_assert!(turn_budget(n + 1, &timing) <= here);
        }
    }
}
