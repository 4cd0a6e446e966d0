//! Defense - Flat physical reduction and percentage magical reduction

use super::constants::{DEFENSE_PER_ENDURANCE, MAGICAL_DEFENSE_PER_WISDOM, MINIMUM_DAMAGE};

/// Physical defense, subtracted directly from incoming physical damage
pub fn physical_defense(endurance: u32, armor_bonus: u32) -> u32 {
    (endurance as f64 * DEFENSE_PER_ENDURANCE + armor_bonus as f64).floor() as u32
}

/// Magical defense as a percentage reduction (12.0 = 12%)
pub fn magical_defense_pct(wisdom: u32, bonus: f64) -> f64 {
    wisdom as f64 * MAGICAL_DEFENSE_PER_WISDOM + bonus
}

/// Physical damage after flat defense. Never below the minimum damage.
pub fn apply_physical_damage(damage: u32, defense: u32) -> u32 {
    damage.saturating_sub(defense).max(MINIMUM_DAMAGE)
}

/// Magical damage after percentage defense. Never below the minimum damage.
pub fn apply_magical_damage(damage: u32, defense_pct: f64) -> u32 {
    let reduced = (damage as f64 * (1.0 - defense_pct / 100.0)).floor();
    if reduced.is_nan() || reduced < MINIMUM_DAMAGE as f64 {
        MINIMUM_DAMAGE
    } else {
        reduced as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_physical_defense() {
        assert_eq!(physical_defense(10, 0), 15);
        assert_eq!(physical_defense(7, 4), 14);
    }

    #[test]
    fn test_magical_defense() {
        assert!((magical_defense_pct(10, 0.0) - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_apply_physical_damage() {
        assert_eq!(apply_physical_damage(50, 15), 35);
    }

    #[test]
    fn test_physical_minimum_damage() {
        assert_eq!(apply_physical_damage(10, 20), 1);
        assert_eq!(apply_physical_damage(0, 0), 1);
    }

    #[test]
    fn test_apply_magical_damage() {
        // 50 * 0.88 = 44
        assert_eq!(apply_magical_damage(50, 12.0), 44);
    }

    #[test]
    fn test_magical_minimum_damage() {
        assert_eq!(apply_magical_damage(10, 100.0), 1);
        assert_eq!(apply_magical_damage(10, 250.0), 1);
    }

    proptest! {
        #[test]
        fn physical_never_below_one(damage in 0u32..100_000, defense in 0u32..100_000) {
            prop_assert!(apply_physical_damage(damage, defense) >= 1);
        }

        #[test]
        fn magical_never_below_one(damage in 0u32..100_000, pct in 0.0f64..500.0) {
            prop_assert!(apply_magical_damage(damage, pct) >= 1);
        }

        #[test]
        fn magical_without_defense_is_identity(damage in 1u32..100_000) {
            prop_assert_eq!(apply_magical_damage(damage, 0.0), damage);
        }
    }
}
