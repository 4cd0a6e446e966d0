//! Combat constants configuration

use super::ConfigError;
use crate::tactics::DEFAULT_TACTIC_CAP;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable combat constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatConstants {
    #[serde(default)]
    pub turn: TurnConstants,
    #[serde(default)]
    pub tactics: TacticsConstants,
    #[serde(default)]
    pub log: LogConstants,
    #[serde(default)]
    pub sessions: SessionConstants,
}

impl CombatConstants {
    /// Load constants from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let constants: CombatConstants = super::load_toml(path)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Parse constants from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let constants: CombatConstants = super::parse_toml(content)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Reject values that would break turn timing
    pub fn validate(&self) -> Result<(), ConfigError> {
        let turn = &self.turn;
        if !(turn.base_seconds.is_finite() && turn.base_seconds > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "turn.base_seconds must be positive, got {}",
                turn.base_seconds
            )));
        }
        if !(turn.minimum_seconds.is_finite() && turn.minimum_seconds > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "turn.minimum_seconds must be positive, got {}",
                turn.minimum_seconds
            )));
        }
        if !(turn.reduction_per_turn.is_finite() && turn.reduction_per_turn >= 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "turn.reduction_per_turn must be non-negative, got {}",
                turn.reduction_per_turn
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnConstants {
    /// Budget for the first turn, in seconds
    #[serde(default = "default_base_seconds")]
    pub base_seconds: f64,
    /// Fraction of the base budget removed per elapsed turn
    #[serde(default = "default_reduction_per_turn")]
    pub reduction_per_turn: f64,
    /// Floor for the shrinking budget
    #[serde(default = "default_minimum_seconds")]
    pub minimum_seconds: f64,
}

impl Default for TurnConstants {
    fn default() -> Self {
        TurnConstants {
            base_seconds: 15.0,
            reduction_per_turn: 0.1,
            minimum_seconds: 5.0,
        }
    }
}

fn default_base_seconds() -> f64 {
    15.0
}
fn default_reduction_per_turn() -> f64 {
    0.1
}
fn default_minimum_seconds() -> f64 {
    5.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TacticsConstants {
    /// Maximum balance per tactic kind
    #[serde(default = "default_cap")]
    pub cap: u32,
}

impl Default for TacticsConstants {
    fn default() -> Self {
        TacticsConstants {
            cap: DEFAULT_TACTIC_CAP,
        }
    }
}

fn default_cap() -> u32 {
    DEFAULT_TACTIC_CAP
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConstants {
    /// Log entries included in a state view
    #[serde(default = "default_recent_entries")]
    pub recent_entries: usize,
}

impl Default for LogConstants {
    fn default() -> Self {
        LogConstants { recent_entries: 10 }
    }
}

fn default_recent_entries() -> usize {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConstants {
    /// Sessions untouched for this long are evicted
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Resolve the monster's reply as soon as the character's turn ends
    #[serde(default = "default_auto_monster_turn")]
    pub auto_monster_turn: bool,
}

impl Default for SessionConstants {
    fn default() -> Self {
        SessionConstants {
            idle_timeout_seconds: 300,
            auto_monster_turn: true,
        }
    }
}

fn default_idle_timeout() -> u64 {
    300
}
fn default_auto_monster_turn() -> bool {
    true
}
