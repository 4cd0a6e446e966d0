//! Derived combat stats, computed once per session from a snapshot

use crate::formula::{
    crit_chance_pct, magical_damage_range, magical_defense_pct, max_health, max_mana, physical_damage_range,
    physical_defense, speed, DamageRange,
};
use crate::types::CombatantSnapshot;
use serde::{Deserialize, Serialize};

/// Combat values derived from a character's attributes and gear bonuses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub max_health: u32,
    pub max_mana: u32,
    pub physical_damage: DamageRange,
    pub magical_damage: DamageRange,
    /// Flat reduction against physical hits
    pub physical_defense: u32,
    /// Percentage reduction against magical hits
    pub magical_defense: f64,
    /// Percentage chance to crit
    pub crit_chance: f64,
    pub speed: u32,
}

impl DerivedStats {
    pub fn from_snapshot(character: &CombatantSnapshot) -> Self {
        let attrs = &character.attributes;
        DerivedStats {
            max_health: max_health(character.level, attrs.strength, attrs.endurance),
            max_mana: max_mana(character.level, attrs.intelligence, attrs.wisdom),
            physical_damage: physical_damage_range(attrs.strength, character.weapon_bonus),
            magical_damage: magical_damage_range(attrs.intelligence, 0),
            physical_defense: physical_defense(attrs.endurance, character.armor_bonus),
            magical_defense: magical_defense_pct(attrs.wisdom, 0.0),
            crit_chance: crit_chance_pct(attrs.agility, attrs.luck, 0.0),
            speed: speed(attrs.agility, 0),
        }
    }
}
