//! Learn requirements for skills

use crate::types::{CharacterClass, CombatantSnapshot};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum level and attributes, plus optional class restriction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRequirements {
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub strength: u32,
    #[serde(default)]
    pub agility: u32,
    #[serde(default)]
    pub intelligence: u32,
    #[serde(default)]
    pub endurance: u32,
    #[serde(default)]
    pub wisdom: u32,
    /// Classes allowed to learn the skill. Empty allows every class.
    #[serde(default)]
    pub classes: Vec<CharacterClass>,
}

fn default_level() -> u32 {
    1
}

impl Default for SkillRequirements {
    fn default() -> Self {
        SkillRequirements {
            level: 1,
            strength: 0,
            agility: 0,
            intelligence: 0,
            endurance: 0,
            wisdom: 0,
            classes: Vec::new(),
        }
    }
}

/// First unmet requirement
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LearnError {
    #[error("Requires level {required} (have {actual})")]
    Level { required: u32, actual: u32 },
    #[error("Requires {attribute} {required} (have {actual})")]
    Attribute {
        attribute: &'static str,
        required: u32,
        actual: u32,
    },
    #[error("Only available to classes: {}", join_classes(.allowed))]
    Class { allowed: Vec<CharacterClass> },
}

fn join_classes(classes: &[CharacterClass]) -> String {
    classes.iter().map(|class| class.as_str()).collect::<Vec<_>>().join(", ")
}

impl SkillRequirements {
    /// Check a character against these requirements
    ///
    /// Level is checked first, then attributes in STR, AGI, INT, END, WIS
    /// order, then the class list.
    pub fn check(&self, character: &CombatantSnapshot) -> Result<(), LearnError> {
        if character.level < self.level {
            return Err(LearnError::Level {
                required: self.level,
                actual: character.level,
            });
        }

        let attrs = &character.attributes;
        let checks = [
            ("STR", self.strength, attrs.strength),
            ("AGI", self.agility, attrs.agility),
            ("INT", self.intelligence, attrs.intelligence),
            ("END", self.endurance, attrs.endurance),
            ("WIS", self.wisdom, attrs.wisdom),
        ];
        for (attribute, required, actual) in checks {
            if actual < required {
                return Err(LearnError::Attribute {
                    attribute,
                    required,
                    actual,
                });
            }
        }

        if !self.classes.is_empty() && !self.classes.contains(&character.class) {
            return Err(LearnError::Class {
                allowed: self.classes.clone(),
            });
        }

        Ok(())
    }
}
