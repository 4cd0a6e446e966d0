//! InMemoryStore - Process-local combatant records

use super::{CombatantStore, StoreError};
use crate::types::{CombatantSnapshot, MonsterRecord, Side};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Records {
    characters: HashMap<u64, CombatantSnapshot>,
    character_health: HashMap<u64, u32>,
    monsters: HashMap<u64, MonsterRecord>,
}

/// Combatant records held in memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<Records>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Each write is a single map insert; a poisoned lock still holds whole records
    fn read(&self) -> RwLockReadGuard<'_, Records> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Records> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_character(&self, character: CombatantSnapshot) {
        self.write().characters.insert(character.id, character);
    }

    pub fn insert_monster(&self, monster: MonsterRecord) {
        self.write().monsters.insert(monster.id, monster);
    }

    pub fn character(&self, id: u64) -> Option<CombatantSnapshot> {
        self.read().characters.get(&id).cloned()
    }

    pub fn monster(&self, id: u64) -> Option<MonsterRecord> {
        self.read().monsters.get(&id).cloned()
    }

    /// Last persisted health for a character, if any was written
    pub fn character_health(&self, id: u64) -> Option<u32> {
        self.read().character_health.get(&id).copied()
    }
}

impl CombatantStore for InMemoryStore {
    fn persist_health(&self, side: Side, id: u64, health: u32) -> Result<(), StoreError> {
        let mut records = self.write();

        match side {
            Side::Character => {
                if !records.characters.contains_key(&id) {
                    return Err(StoreError::NotFound { side, id });
                }
                records.character_health.insert(id, health);
            }
            Side::Monster => {
                let monster = records
                    .monsters
                    .get_mut(&id)
                    .ok_or(StoreError::NotFound { side, id })?;
                monster.current_health = health.min(monster.max_health);
            }
        }
        Ok(())
    }
}
