//! Status tokens.
//!
//! A token is a named stack counter with a lifetime scope. The engine gives
//! meaning to a few well-known ids; any other id a host supplies is carried
//! through untouched.

use serde::{Deserialize, Serialize};

/// Burn stacks: deal that much damage at turn end, then lose one stack.
pub const BURN: &str = "burn";
/// Empower stacks: bonus damage on the next attack card, then consumed.
pub const EMPOWER: &str = "empower";
/// Ether gains are forced to zero for the turn.
pub const NO_ETHER: &str = "no_ether";

/// How long a token survives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenScope {
    /// Removed when its effect is consumed.
    PerUse,
    /// Removed at turn end.
    PerTurn,
    /// Stays until its stacks run out.
    Permanent,
}

/// An active status token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusToken {
    pub id: String,
    pub stacks: u32,
    pub scope: TokenScope,
}

impl StatusToken {
    /// Create a new token.
    pub fn new(id: impl Into<String>, stacks: u32, scope: TokenScope) -> Self {
        Self {
            id: id.into(),
            stacks,
            scope,
        }
    }
}
