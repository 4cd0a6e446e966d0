//! Prelude module for convenient imports
//!
//! ```rust
//! use combat_core::prelude::*;
//! ```

// Core types
pub use crate::types::{Attributes, CharacterClass, CombatantSnapshot, MonsterRecord, Side, SkillId};
pub use crate::stats::DerivedStats;

// Combat
pub use crate::combat::{Action, ActionResult, CombatError, CombatSession, CombatStateView, SessionEnv};
pub use crate::registry::{RegistryError, SessionHandle, SessionRegistry};

// Skills and tactics
pub use crate::skill::{Skill, SkillCatalog, SkillEffect};
pub use crate::tactics::{TacticKind, TacticsLedger};

// Collaborators
pub use crate::store::{CombatantStore, InMemoryStore};
pub use crate::turn::{Clock, ManualClock, SystemClock};

// Config
pub use crate::config::{default_skills, CombatConstants};
