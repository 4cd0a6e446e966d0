//! Combatants used by the simulator

use combat_core::skill::SkillCatalog;
use combat_core::types::{Attributes, CombatantSnapshot, MonsterRecord};

/// Location shared by every simulated combatant
pub const ARENA: u64 = 1;

/// A level-scaled adventurer that has learned every skill it qualifies for
pub fn hero(level: u32, skills: &SkillCatalog) -> CombatantSnapshot {
    let level = level.max(1);
    let growth = level - 1;

    let mut hero = CombatantSnapshot::new(1, "Simulated Hero");
    hero.level = level;
    hero.location_id = Some(ARENA);
    hero.weapon_bonus = 2 * growth;
    hero.armor_bonus = growth;
    hero.attributes = Attributes {
        strength: 10 + growth,
        agility: 10 + growth,
        intelligence: 10 + growth / 2,
        endurance: 10 + growth,
        wisdom: 10 + growth / 2,
        luck: 10,
    };

    for skill in skills.iter() {
        match skill.check_requirements(&hero) {
            Ok(()) => {
                tracing::debug!(skill = %skill.id, "learned");
                hero.learn(skill.id.clone());
            }
            Err(e) => tracing::debug!(skill = %skill.id, "not learned: {}", e),
        }
    }
    hero
}

/// Monsters fought in rotation
pub fn monsters() -> Vec<MonsterRecord> {
    vec![
        monster(101, "Cave Rat", 1, 30, (3, 6), 1, 0.0, 12),
        monster(102, "Goblin Scout", 2, 55, (6, 11), 3, 2.0, 8),
        monster(103, "Rotting Troll", 3, 80, (8, 15), 5, 3.0, 9),
        monster(104, "Barrow Wight", 5, 120, (12, 20), 6, 15.0, 7),
    ]
}

#[allow(clippy::too_many_arguments)]
fn monster(
    id: u64,
    name: &str,
    level: u32,
    max_health: u32,
    damage: (u32, u32),
    physical_defense: u32,
    magical_defense: f64,
    speed: u32,
) -> MonsterRecord {
    MonsterRecord {
        id,
        name: name.to_string(),
        level,
        location_id: Some(ARENA),
        max_health,
        current_health: max_health,
        physical_damage_min: damage.0,
        physical_damage_max: damage.1,
        physical_defense,
        magical_defense,
        speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::config::default_skills;
    use combat_core::types::SkillId;

    #[test]
    fn test_level_one_hero() {
        let hero = hero(1, &default_skills());
        assert_eq!(hero.attributes, Attributes::default());
        assert!(hero.knows(&SkillId::from("basic_strike")));
        assert!(!hero.knows(&SkillId::from("quick_strike")));
    }

    #[test]
    fn test_higher_level_learns_more() {
        let skills = default_skills();
        let novice = hero(1, &skills);
        let veteran = hero(5, &skills);
        assert!(veteran.known_skills.len() > novice.known_skills.len());
        assert!(veteran.knows(&SkillId::from("quick_strike")));
        assert!(!veteran.knows(&SkillId::from("void_lance")));
    }

    #[test]
    fn test_monsters_share_the_arena() {
        assert!(monsters().iter().all(|m| m.location_id == Some(ARENA) && m.is_alive()));
    }
}
