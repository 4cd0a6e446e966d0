//! SkillCatalog - Read-only skill lookup

use super::Skill;
use crate::types::SkillId;
use std::collections::BTreeMap;

/// Skills available to the engine, keyed by id
#[derive(Debug, Clone, Default)]
pub struct SkillCatalog {
    skills: BTreeMap<SkillId, Skill>,
}

impl SkillCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a skill, replacing any skill with the same id
    pub fn insert(&mut self, skill: Skill) {
        self.skills.insert(skill.id.clone(), skill);
    }

    pub fn get(&self, id: &SkillId) -> Option<&Skill> {
        self.skills.get(id)
    }

    pub fn contains(&self, id: &SkillId) -> bool {
        self.skills.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values()
    }
}

impl FromIterator<Skill> for SkillCatalog {
    fn from_iter<I: IntoIterator<Item = Skill>>(iter: I) -> Self {
        let mut catalog = SkillCatalog::new();
        for skill in iter {
            catalog.insert(skill);
        }
        catalog
    }
}
