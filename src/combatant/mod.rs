//! Combatant state: health, budgets, defenses, ether and status tokens.
//!
//! ## Key Types
//!
//! - `Combatant`: one side's mutable battle record
//! - `StatusToken` / `TokenScope`: stackable statuses with a lifetime
//! - `TurnCarryEffects`: what one turn hands to the next

pub mod record;
pub mod status;
pub mod carry;

pub use record::Combatant;
pub use status::{StatusToken, TokenScope, BURN, EMPOWER, NO_ETHER};
pub use carry::TurnCarryEffects;
