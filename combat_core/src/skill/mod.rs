//! Skills - Typed skill definitions, effects, and learn requirements

mod catalog;
mod requirements;

pub use catalog::SkillCatalog;
pub use requirements::{LearnError, SkillRequirements};

use crate::tactics::TacticKind;
use crate::types::{CombatantSnapshot, SkillId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Broad category of a skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    #[default]
    Attack,
    Defense,
    Heal,
    Buff,
    Debuff,
}

/// A single effect applied when a skill resolves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SkillEffect {
    /// Flat physical damage, reduced by physical defense
    Damage { amount: u32 },
    /// Multiple of the caster's average physical damage, reduced by physical defense
    DamageMultiplier { multiplier: f64 },
    /// Flat magical damage, reduced by magical defense
    MagicalDamage { amount: u32 },
    /// Restores the caster's health, capped at max
    Heal { amount: u32 },
}

/// A skill as resolved in combat
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub description: String,
    pub kind: SkillKind,
    pub mana_cost: u32,
    /// Tactics spent on use, all-or-nothing
    pub tactics_cost: BTreeMap<TacticKind, u32>,
    /// Applied in order
    pub effects: Vec<SkillEffect>,
    /// When false the caster may act again in the same turn
    pub consumes_turn: bool,
    pub requirements: SkillRequirements,
}

impl Skill {
    /// Create a turn-consuming skill with no costs and no effects
    pub fn new(id: impl Into<SkillId>, name: impl Into<String>) -> Self {
        Skill {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            kind: SkillKind::default(),
            mana_cost: 0,
            tactics_cost: BTreeMap::new(),
            effects: Vec::new(),
            consumes_turn: true,
            requirements: SkillRequirements::default(),
        }
    }

    pub fn with_mana_cost(mut self, cost: u32) -> Self {
        self.mana_cost = cost;
        self
    }

    pub fn with_tactic_cost(mut self, kind: TacticKind, amount: u32) -> Self {
        self.tactics_cost.insert(kind, amount);
        self
    }

    pub fn with_effect(mut self, effect: SkillEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn free_action(mut self) -> Self {
        self.consumes_turn = false;
        self
    }

    /// First requirement `character` does not meet, if any
    pub fn check_requirements(&self, character: &CombatantSnapshot) -> Result<(), LearnError> {
        self.requirements.check(character)
    }

    /// Whether any effect damages the opponent
    pub fn is_offensive(&self) -> bool {
        self.effects.iter().any(|effect| {
            matches!(
                effect,
                SkillEffect::Damage { .. } | SkillEffect::DamageMultiplier { .. } | SkillEffect::MagicalDamage { .. }
            )
        })
    }
}
