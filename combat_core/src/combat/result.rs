//! ActionResult - Outcome of a resolved action, and the session state view

use crate::tactics::TacticKind;
use crate::types::{Side, SkillId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// An action a combatant can attempt
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Weapon attack with the physical damage range
    Basic,
    /// Use a skill from the catalog
    Skill(SkillId),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Basic => f.write_str("basic attack"),
            Action::Skill(id) => write!(f, "skill {}", id),
        }
    }
}

/// Result of a successfully resolved action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub actor: Side,
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_name: Option<String>,

    // === Amounts ===
    /// Physical damage dealt after defense
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<u32>,
    /// Magical damage dealt after defense
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magical_damage: Option<u32>,
    /// Health actually restored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heal: Option<u32>,
    pub critical: bool,

    // === Pools after the action ===
    pub character_health: u32,
    pub character_max_health: u32,
    pub character_mana: u32,
    pub character_max_mana: u32,
    pub monster_health: u32,
    pub monster_max_health: u32,

    // === Turn bookkeeping ===
    /// Tactics earned by this action
    #[serde(default)]
    pub tactics_gained: BTreeMap<TacticKind, u32>,
    /// False when the actor may act again this turn
    pub turn_consumed: bool,

    pub message: String,
    /// Store writes that failed; in-memory values remain authoritative
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    // === Outcome ===
    pub combat_over: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Side>,
}

impl ActionResult {
    /// Total damage dealt, physical and magical
    pub fn total_damage(&self) -> u32 {
        self.damage.unwrap_or(0).saturating_add(self.magical_damage.unwrap_or(0))
    }

    /// Whether a store write failed while resolving
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        let mut parts = vec![self.message.clone()];

        if !self.tactics_gained.is_empty() {
            let gained: Vec<String> = self
                .tactics_gained
                .iter()
                .map(|(kind, amount)| format!("+{} {}", amount, kind))
                .collect();
            parts.push(gained.join(" "));
        }

        if let Some(winner) = self.winner {
            parts.push(format!("{} wins", winner));
        }

        parts.join(", ")
    }
}

/// A line in the combat log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub turn_number: u32,
    pub actor: Side,
    pub message: String,
}

/// Read-only view of a session for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatStateView {
    pub turn_number: u32,
    pub current_actor: Side,
    /// Seconds left in the current turn
    pub time_remaining: f64,
    pub action_taken: bool,
    pub character_health: u32,
    pub character_max_health: u32,
    pub character_mana: u32,
    pub character_max_mana: u32,
    pub monster_health: u32,
    pub monster_max_health: u32,
    pub tactics: BTreeMap<TacticKind, u32>,
    /// Most recent log entries, oldest first
    pub log: Vec<LogEntry>,
    pub combat_over: bool,
    pub winner: Option<Side>,
}

impl CombatStateView {
    /// Render as JSON for the transport layer
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> ActionResult {
        ActionResult {
            success: true,
            actor: Side::Character,
            action: Action::Basic,
            skill_name: None,
            damage: Some(35),
            magical_damage: None,
            heal: None,
            critical: true,
            character_health: 120,
            character_max_health: 120,
            character_mana: 85,
            character_max_mana: 85,
            monster_health: 0,
            monster_max_health: 80,
            tactics_gained: BTreeMap::from([(TacticKind::Attack, 1), (TacticKind::Combo, 1)]),
            turn_consumed: true,
            message: "You dealt 35 damage (CRITICAL!)".to_string(),
            warnings: Vec::new(),
            combat_over: true,
            winner: Some(Side::Character),
        }
    }

    #[test]
    fn test_total_damage() {
        let mut result = sample_result();
        result.magical_damage = Some(10);
        assert_eq!(result.total_damage(), 45);
    }

    #[test]
    fn test_summary() {
        let summary = sample_result().summary();
        assert!(summary.contains("35 damage"));
        assert!(summary.contains("+1 attack"));
        assert!(summary.contains("character wins"));
    }

    #[test]
    fn test_summary_mentions_magical_damage_once() {
        let mut result = sample_result();
        result.magical_damage = Some(19);
        result.tactics_gained.clear();
        result.winner = None;
        result.message = "You used Void Lance! Dealt 35 damage. Dealt 19 magical damage.".to_string();

        assert_eq!(result.summary(), result.message);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(sample_result()).unwrap();
        assert_eq!(json["action"], "basic");
        assert_eq!(json["winner"], "character");
        assert_eq!(json["tactics_gained"]["combo"], 1);
        assert!(json.get("warnings").is_none());
        assert!(json.get("heal").is_none());
    }

    #[test]
    fn test_skill_action_serialization() {
        let json = serde_json::to_value(Action::Skill(SkillId::from("mend"))).unwrap();
        assert_eq!(json["skill"], "mend");
        assert_eq!(Action::Skill(SkillId::from("mend")).to_string(), "skill mend");
    }
}
