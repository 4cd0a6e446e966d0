//! Health and mana pools

/// Maximum health: `30 + 10·level + 3·strength + 5·endurance`
///
/// Saturates at `u32::MAX`.
pub fn max_health(level: u32, strength: u32, endurance: u32) -> u32 {
    30u32
        .saturating_add(level.saturating_mul(10))
        .saturating_add(strength.saturating_mul(3))
        .saturating_add(endurance.saturating_mul(5))
}

/// Maximum mana: `20 + 5·level + 4·intelligence + 2·wisdom`
///
/// Saturates at `u32::MAX`.
pub fn max_mana(level: u32, intelligence: u32, wisdom: u32) -> u32 {
    20u32
        .saturating_add(level.saturating_mul(5))
        .saturating_add(intelligence.saturating_mul(4))
        .saturating_add(wisdom.saturating_mul(2))
}
