//! Combat - Sessions, action resolution, and results

mod error;
mod pool;
mod resolver;
mod result;
mod session;

pub use error::{CombatError, ErrorCategory};
pub use pool::Pool;
pub use result::{Action, ActionResult, CombatStateView, LogEntry};
pub use session::{CombatSession, SessionEnv};
