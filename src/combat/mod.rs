//! Combat resolution: block, pierce, vulnerability, counters and multi-hit.
//!
//! ## Key Types
//!
//! - `CombatResolver`: applies one scheduled card to both combatants
//! - `ResolveContext`: configuration plus the random port for jam rolls
//! - `ApplyOutcome`: damage dealt/taken, hits completed and the event batch
//! - `BattleEvent` / `EventKind`: structured output for the presentation layer

pub mod event;
pub mod resolver;

pub use event::{BattleEvent, EventBatch, EventKind};
pub use resolver::{ApplyOutcome, CombatResolver, ResolveContext};
