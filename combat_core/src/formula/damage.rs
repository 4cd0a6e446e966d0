//! Damage ranges, critical strikes and speed

use super::constants::{
    CRIT_MULTIPLIER, CRIT_PER_AGILITY, CRIT_PER_LUCK, MAGICAL_PER_INTELLIGENCE, MAGICAL_SPREAD_HIGH,
    MAGICAL_SPREAD_LOW, PHYSICAL_SPREAD_HIGH, PHYSICAL_SPREAD_LOW, SPEED_PER_AGILITY,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive integer damage range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRange {
    pub min: u32,
    pub max: u32,
}

impl DamageRange {
    pub fn new(min: u32, max: u32) -> Self {
        DamageRange { min, max }
    }

    /// Integer mean of the bounds (rounded down)
    pub fn average(&self) -> u32 {
        ((self.min as u64 + self.max as u64) / 2) as u32
    }

    /// Roll a value uniformly in `[min, max]`
    pub fn sample(&self, rng: &mut impl Rng) -> u32 {
        if self.min >= self.max {
            self.max
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

/// Physical damage: `base = 2·strength + weapon_bonus`, spread ±15%
pub fn physical_damage_range(strength: u32, weapon_bonus: u32) -> DamageRange {
    let base = strength.saturating_mul(2).saturating_add(weapon_bonus) as f64;
    DamageRange {
        min: (base * PHYSICAL_SPREAD_LOW).floor() as u32,
        max: (base * PHYSICAL_SPREAD_HIGH).floor() as u32,
    }
}

/// Magical damage: `base = 1.8·intelligence + bonus`, spread ±10%
pub fn magical_damage_range(intelligence: u32, bonus: u32) -> DamageRange {
    let base = intelligence as f64 * MAGICAL_PER_INTELLIGENCE + bonus as f64;
    DamageRange {
        min: (base * MAGICAL_SPREAD_LOW).floor() as u32,
        max: (base * MAGICAL_SPREAD_HIGH).floor() as u32,
    }
}

/// Critical strike chance as a percentage (5.0 = 5%)
///
/// Rolled against a uniform value in `[0, 100)`.
pub fn crit_chance_pct(agility: u32, luck: u32, bonus: f64) -> f64 {
    agility as f64 * CRIT_PER_AGILITY + luck as f64 * CRIT_PER_LUCK + bonus
}

/// Damage dealt by a critical hit
pub fn crit_damage(base_damage: u32) -> u32 {
    (base_damage as f64 * CRIT_MULTIPLIER).floor() as u32
}

/// Turn order speed. Higher acts first.
pub fn speed(agility: u32, bonus: u32) -> u32 {
    ((agility as f64 * SPEED_PER_AGILITY).floor() as u32).saturating_add(bonus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_physical_damage_range() {
        // base 20 -> [17, 23]
        let range = physical_damage_range(10, 0);
        assert_eq!(range, DamageRange::new(17, 23));
        assert!(range.max > range.min);
    }

    #[test]
    fn test_physical_damage_with_weapon() {
        // base 2*12 + 6 = 30 -> [25, 34]
        let range = physical_damage_range(12, 6);
        assert_eq!(range, DamageRange::new(25, 34));
    }

    #[test]
    fn test_magical_damage_range() {
        // base 18 -> [16, 19]
        let range = magical_damage_range(10, 0);
        assert_eq!(range, DamageRange::new(16, 19));
    }

    #[test]
    fn test_crit_chance() {
        assert!((crit_chance_pct(10, 10, 0.0) - 1.5).abs() < f64::EPSILON);
        assert!((crit_chance_pct(20, 0, 2.0) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_crit_damage() {
        assert_eq!(crit_damage(100), 180);
        assert_eq!(crit_damage(17), 30);
        assert_eq!(crit_damage(0), 0);
    }

    #[test]
    fn test_speed() {
        assert_eq!(speed(10, 0), 7);
        assert_eq!(speed(15, 2), 12);
    }

    #[test]
    fn test_average() {
        assert_eq!(DamageRange::new(17, 23).average(), 20);
        assert_eq!(DamageRange::new(8, 15).average(), 11);
    }

    #[test]
    fn test_extreme_inputs_saturate() {
        let range = physical_damage_range(u32::MAX, u32::MAX);
        assert_eq!(range.max, u32::MAX);
        assert!(range.min <= range.max);
        assert_eq!(speed(u32::MAX, u32::MAX), u32::MAX);
        assert_eq!(DamageRange::new(u32::MAX - 1, u32::MAX).average(), u32::MAX - 1);
    }

    #[test]
    fn test_sample_stays_in_range() {
        let range = DamageRange::new(8, 15);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let roll = range.sample(&mut rng);
            assert!((8..=15).contains(&roll));
        }
    }

    #[test]
    fn test_sample_degenerate_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(DamageRange::new(5, 5).sample(&mut rng), 5);
        assert_eq!(DamageRange::new(0, 0).sample(&mut rng), 0);
    }
}
