//! Core types shared across the combat engine

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Which side of an encounter is acting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Character,
    Monster,
}

impl Side {
    /// The other side of the encounter
    pub fn opponent(self) -> Side {
        match self {
            Side::Character => Side::Monster,
            Side::Monster => Side::Character,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Character => "character",
            Side::Monster => "monster",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Character class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    BoneKnight,
    VoidMage,
    DreamWalker,
    #[default]
    Adventurer,
}

impl CharacterClass {
    pub fn as_str(self) -> &'static str {
        match self {
            CharacterClass::BoneKnight => "bone_knight",
            CharacterClass::VoidMage => "void_mage",
            CharacterClass::DreamWalker => "dream_walker",
            CharacterClass::Adventurer => "adventurer",
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier for a skill in the catalog
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(pub String);

impl From<&str> for SkillId {
    fn from(s: &str) -> Self {
        SkillId(s.to_string())
    }
}

impl From<String> for SkillId {
    fn from(s: String) -> Self {
        SkillId(s)
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The six base attributes, already including equipment bonuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: u32,
    pub agility: u32,
    pub intelligence: u32,
    pub endurance: u32,
    pub wisdom: u32,
    pub luck: u32,
}

impl Default for Attributes {
    /// New characters start with 10 in every attribute
    fn default() -> Self {
        Attributes {
            strength: 10,
            agility: 10,
            intelligence: 10,
            endurance: 10,
            wisdom: 10,
            luck: 10,
        }
    }
}

/// Session-constant copy of a character, sourced once when combat starts
///
/// Attribute totals and the weapon/armour bonuses are resolved by the
/// caller's equipment aggregation before the snapshot is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantSnapshot {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub class: CharacterClass,
    pub level: u32,
    #[serde(default)]
    pub attributes: Attributes,
    /// Flat physical damage from the equipped weapon
    #[serde(default)]
    pub weapon_bonus: u32,
    /// Flat physical defense from equipped armour
    #[serde(default)]
    pub armor_bonus: u32,
    #[serde(default)]
    pub location_id: Option<u64>,
    /// Skills this character has learned
    #[serde(default)]
    pub known_skills: BTreeSet<SkillId>,
}

impl CombatantSnapshot {
    /// Create a level-1 snapshot with default attributes
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        CombatantSnapshot {
            id,
            name: name.into(),
            class: CharacterClass::default(),
            level: 1,
            attributes: Attributes::default(),
            weapon_bonus: 0,
            armor_bonus: 0,
            location_id: None,
            known_skills: BTreeSet::new(),
        }
    }

    pub fn knows(&self, skill: &SkillId) -> bool {
        self.known_skills.contains(skill)
    }

    /// Mark a skill as learned
    pub fn learn(&mut self, skill: impl Into<SkillId>) {
        self.known_skills.insert(skill.into());
    }
}

/// Monster record as held by the external store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterRecord {
    pub id: u64,
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub location_id: Option<u64>,
    pub max_health: u32,
    pub current_health: u32,
    pub physical_damage_min: u32,
    pub physical_damage_max: u32,
    #[serde(default)]
    pub physical_defense: u32,
    /// Percentage reduction against magical damage
    #[serde(default)]
    pub magical_defense: f64,
    #[serde(default = "default_speed")]
    pub speed: u32,
}

fn default_level() -> u32 {
    1
}

fn default_speed() -> u32 {
    10
}

impl MonsterRecord {
    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Character.opponent(), Side::Monster);
        assert_eq!(Side::Monster.opponent(), Side::Character);
    }

    #[test]
    fn test_snapshot_learn() {
        let mut hero = CombatantSnapshot::new(1, "Hero");
        assert!(!hero.knows(&SkillId::from("quick_strike")));
        hero.learn("quick_strike");
        assert!(hero.knows(&SkillId::from("quick_strike")));
    }

    #[test]
    fn test_class_serde_names() {
        let json = serde_json::to_string(&CharacterClass::BoneKnight).unwrap();
        assert_eq!(json, "\"bone_knight\"");
    }
}
