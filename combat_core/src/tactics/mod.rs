//! Tactics - Capped per-kind counters earned in combat and spent by skills

mod generation;
mod ledger;

pub use generation::{tactics_from_action, ActionOutcome};
pub use ledger::TacticsLedger;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default cap for every tactic kind
pub const DEFAULT_TACTIC_CAP: u32 = 10;

/// Kinds of tactic a combatant can accumulate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TacticKind {
    /// Earned by a successful unblocked attack
    Attack,
    /// Earned by a successful block
    Block,
    /// Earned by a critical hit
    CriticalAttack,
    /// Earned by a successful block
    Counter,
    /// Earned by a successful dodge
    Dodge,
    /// Earned by a critical hit
    Combo,
    DefensiveStance,
    AggressiveStance,
}

impl TacticKind {
    /// Get all tactic kinds
    pub fn all() -> &'static [TacticKind] {
        &[
            TacticKind::Attack,
            TacticKind::Block,
            TacticKind::CriticalAttack,
            TacticKind::Counter,
            TacticKind::Dodge,
            TacticKind::Combo,
            TacticKind::DefensiveStance,
            TacticKind::AggressiveStance,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TacticKind::Attack => "attack",
            TacticKind::Block => "block",
            TacticKind::CriticalAttack => "critical_attack",
            TacticKind::Counter => "counter",
            TacticKind::Dodge => "dodge",
            TacticKind::Combo => "combo",
            TacticKind::DefensiveStance => "defensive_stance",
            TacticKind::AggressiveStance => "aggressive_stance",
        }
    }
}

impl fmt::Display for TacticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised tactic name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid tactic type: {0}")]
pub struct UnknownTactic(pub String);

impl FromStr for TacticKind {
    type Err = UnknownTactic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TacticKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownTactic(s.to_string()))
    }
}
