//! Tactic rewards for combat outcomes

use super::TacticKind;
use serde::{Deserialize, Serialize};

/// A combat outcome that can earn tactics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// An attack landed
    Attack { blocked: bool, critical: bool },
    /// An incoming attack was blocked
    Block,
    /// An incoming attack was dodged
    Dodge,
}

/// Tactics awarded for an outcome
pub fn tactics_from_action(outcome: ActionOutcome) -> Vec<(TacticKind, u32)> {
    match outcome {
        ActionOutcome::Attack { blocked: true, .. } => Vec::new(),
        ActionOutcome::Attack { critical, .. } => {
            let mut gained = vec![(TacticKind::Attack, 1)];
            if critical {
                gained.push((TacticKind::CriticalAttack, 1));
                gained.push((TacticKind::Combo, 1));
            }
            gained
        }
        ActionOutcome::Block => vec![(TacticKind::Block, 1), (TacticKind::Counter, 1)],
        ActionOutcome::Dodge => vec![(TacticKind::Dodge, 1)],
    }
}
