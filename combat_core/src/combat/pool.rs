//! Pool - A resource clamped to `[0, max]`

use serde::{Deserialize, Serialize};

/// Current/maximum pair for health or mana
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    current: u32,
    max: u32,
}

impl Pool {
    /// A pool filled to its maximum
    pub fn full(max: u32) -> Self {
        Pool { current: max, max }
    }

    /// A pool at `current`, clamped to `max`
    pub fn with_current(current: u32, max: u32) -> Self {
        Pool {
            current: current.min(max),
            max,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Remove up to `amount`. Returns what was actually removed.
    pub fn damage(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.current);
        self.current -= removed;
        removed
    }

    /// Add up to `amount` without passing max. Returns what was actually added.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.max - self.current);
        self.current += added;
        added
    }

    /// Deduct exactly `amount`, or nothing if the pool is short
    pub fn spend(&mut self, amount: u32) -> bool {
        if self.current >= amount {
            self.current -= amount;
            true
        } else {
            false
        }
    }
}
