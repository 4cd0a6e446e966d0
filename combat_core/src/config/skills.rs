//! Skill catalog loading

use super::ConfigError;
use crate::skill::{Skill, SkillCatalog, SkillEffect, SkillKind, SkillRequirements};
use crate::tactics::TacticKind;
use crate::types::SkillId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Container for skill definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsConfig {
    #[serde(rename = "skills", default)]
    pub skills: Vec<SkillDefinition>,
}

/// A skill as written in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kind: SkillKind,
    #[serde(default)]
    pub mana_cost: u32,
    /// Tactic name -> amount
    #[serde(default)]
    pub tactics_cost: BTreeMap<String, u32>,
    #[serde(default)]
    pub effects: Vec<SkillEffect>,
    #[serde(default = "default_consumes_turn")]
    pub consumes_turn: bool,
    #[serde(default)]
    pub requirements: SkillRequirements,
}

fn default_consumes_turn() -> bool {
    true
}

impl TryFrom<SkillDefinition> for Skill {
    type Error = ConfigError;

    fn try_from(def: SkillDefinition) -> Result<Self, Self::Error> {
        let mut tactics_cost = BTreeMap::new();
        for (name, amount) in &def.tactics_cost {
            let kind: TacticKind = name
                .parse()
                .map_err(|e| ConfigError::ValidationError(format!("skill '{}': {}", def.id, e)))?;
            if *amount > 0 {
                tactics_cost.insert(kind, *amount);
            }
        }

        for effect in &def.effects {
            if let SkillEffect::DamageMultiplier { multiplier } = effect {
                if !multiplier.is_finite() || *multiplier < 0.0 {
                    return Err(ConfigError::ValidationError(format!(
                        "skill '{}': damage multiplier must be a non-negative number, got {}",
                        def.id, multiplier
                    )));
                }
            }
        }

        Ok(Skill {
            id: SkillId(def.id),
            name: def.name,
            description: def.description,
            kind: def.kind,
            mana_cost: def.mana_cost,
            tactics_cost,
            effects: def.effects,
            consumes_turn: def.consumes_turn,
            requirements: def.requirements,
        })
    }
}

fn build_catalog(config: SkillsConfig) -> Result<SkillCatalog, ConfigError> {
    let mut catalog = SkillCatalog::new();
    for def in config.skills {
        if catalog.contains(&SkillId(def.id.clone())) {
            return Err(ConfigError::ValidationError(format!("duplicate skill id '{}'", def.id)));
        }
        catalog.insert(Skill::try_from(def)?);
    }
    Ok(catalog)
}

/// Load a skill catalog from a TOML file
pub fn load_skill_catalog(path: &Path) -> Result<SkillCatalog, ConfigError> {
    let config: SkillsConfig = super::load_toml(path)?;
    build_catalog(config)
}

/// Load a skill catalog from a TOML string
pub fn parse_skill_catalog(content: &str) -> Result<SkillCatalog, ConfigError> {
    let config: SkillsConfig = super::parse_toml(content)?;
    build_catalog(config)
}

/// Get the built-in skill catalog
pub fn default_skills() -> SkillCatalog {
    let toml = include_str!("../../config/skills.toml");
    parse_skill_catalog(toml).unwrap_or_else(|e| {
        tracing::warn!("built-in skill catalog failed to load: {}", e);
        let mut catalog = SkillCatalog::new();
        catalog.insert(
            Skill::new("basic_strike", "Basic Strike")
                .with_effect(SkillEffect::DamageMultiplier { multiplier: 1.0 }),
        );
        catalog
    })
}
