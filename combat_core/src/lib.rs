//! combat_core - Turn-based combat engine for character vs monster encounters
//!
//! This library provides:
//! - Formula: Derived stats, damage ranges, crits, and defense
//! - TacticsLedger: Capped tactic counters earned in combat and spent by skills
//! - TurnController: Alternating turns with a shrinking time budget
//! - CombatSession: One encounter with its action resolver
//! - SessionRegistry: Host surface that keys sessions by character and monster

pub mod combat;
pub mod config;
pub mod formula;
pub mod prelude;
pub mod registry;
pub mod skill;
pub mod stats;
pub mod store;
pub mod tactics;
pub mod turn;
pub mod types;

// Re-export core types for convenience
pub use combat::{Action, ActionResult, CombatError, CombatSession, CombatStateView, ErrorCategory, SessionEnv};
pub use config::{default_skills, CombatConstants, ConfigError};
pub use registry::{ActOutcome, EndTurnOutcome, RegistryError, SessionHandle, SessionRegistry, StartOutcome};
pub use skill::{Skill, SkillCatalog, SkillEffect};
pub use stats::DerivedStats;
pub use store::{CombatantStore, InMemoryStore, StoreError};
pub use tactics::{TacticKind, TacticsLedger};
pub use turn::{Clock, ManualClock, SystemClock, TurnInfo};
pub use types::{Attributes, CharacterClass, CombatantSnapshot, MonsterRecord, Side, SkillId};
