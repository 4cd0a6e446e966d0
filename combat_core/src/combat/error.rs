//! Combat errors

use crate::tactics::TacticKind;
use crate::types::{Side, SkillId};
use thiserror::Error;

/// Why an action or turn transition was refused
///
/// Every variant is recoverable and leaves the session unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CombatError {
    #[error("Not {actor}'s turn (current turn: {current})")]
    NotYourTurn { actor: Side, current: Side },

    #[error("Turn time expired ({budget:.1}s budget)")]
    TurnExpired { budget: f64 },

    #[error("Action already taken this turn")]
    ActionAlreadyTaken,

    #[error("Skill not found: {0}")]
    SkillUnknown(SkillId),

    #[error("Skill not learned: {0}")]
    SkillNotLearned(SkillId),

    #[error("Not enough MP (need {required}, have {available})")]
    InsufficientMana { required: u32, available: u32 },

    #[error("Not enough {kind} tactics (need {required}, have {available})")]
    InsufficientTactics {
        kind: TacticKind,
        required: u32,
        available: u32,
    },

    #[error("{actor} cannot perform {action}")]
    UnsupportedAction { actor: Side, action: String },

    #[error("Combat is over")]
    CombatOver { winner: Option<Side> },
}

/// Broad class of a combat error, for deciding how a caller recovers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Retry with a valid action or end the turn
    Sequencing,
    /// Not enough mana or tactics
    Resource,
    /// The requested skill or action is not available
    Reference,
}

impl CombatError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CombatError::NotYourTurn { .. }
            | CombatError::TurnExpired { .. }
            | CombatError::ActionAlreadyTaken
            | CombatError::CombatOver { .. } => ErrorCategory::Sequencing,
            CombatError::InsufficientMana { .. } | CombatError::InsufficientTactics { .. } => {
                ErrorCategory::Resource
            }
            CombatError::SkillUnknown(_)
            | CombatError::SkillNotLearned(_)
            | CombatError::UnsupportedAction { .. } => ErrorCategory::Reference,
        }
    }
}
