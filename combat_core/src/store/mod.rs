//! CombatantStore - Seam to the external record store

mod memory;

pub use memory::InMemoryStore;

use crate::types::Side;
use thiserror::Error;

/// Store write failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{side} record {id} not found")]
    NotFound { side: Side, id: u64 },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persists live health so external readers see current values
pub trait CombatantStore: Send + Sync {
    /// Write the current health of one combatant
    fn persist_health(&self, side: Side, id: u64, health: u32) -> Result<(), StoreError>;
}
