//! Formula library - Pure conversions from attributes to combat values
//!
//! Every function here is total. Floating point operations are evaluated in a
//! fixed order so results stay stable for pinned expectations.

mod damage;
mod defense;
mod resources;

pub use damage::{crit_chance_pct, crit_damage, magical_damage_range, physical_damage_range, speed, DamageRange};
pub use defense::{apply_magical_damage, apply_physical_damage, magical_defense_pct, physical_defense};
pub use resources::{max_health, max_mana};

/// Formula coefficients
pub mod constants {
    /// Spread applied around physical base damage (±15%)
    pub const PHYSICAL_SPREAD_LOW: f64 = 0.85;
    pub const PHYSICAL_SPREAD_HIGH: f64 = 1.15;

    /// Spread applied around magical base damage (±10%)
    pub const MAGICAL_SPREAD_LOW: f64 = 0.9;
    pub const MAGICAL_SPREAD_HIGH: f64 = 1.1;

    /// Magical base damage per point of intelligence
    pub const MAGICAL_PER_INTELLIGENCE: f64 = 1.8;

    /// Critical hits deal 180% damage
    pub const CRIT_MULTIPLIER: f64 = 1.8;

    /// Physical defense per point of endurance
    pub const DEFENSE_PER_ENDURANCE: f64 = 1.5;

    /// Magical defense percent per point of wisdom
    pub const MAGICAL_DEFENSE_PER_WISDOM: f64 = 0.8;

    pub const CRIT_PER_AGILITY: f64 = 0.1;
    pub const CRIT_PER_LUCK: f64 = 0.05;

    pub const SPEED_PER_AGILITY: f64 = 0.7;

    /// Every hit that lands deals at least this much
    pub const MINIMUM_DAMAGE: u32 = 1;
}
