//! Turn phases.

use serde::{Deserialize, Serialize};

/// Where the battle is in its turn cycle.
///
/// ```text
/// Select → Respond → Resolve → Select (next turn)
///            ↓ (once)        ↘ Post (terminal)
///          Select
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Player builds a card set under the turn budgets.
    Select,
    /// Schedule is visible; player may reorder, toggle or disable enemy cards.
    Respond,
    /// The queue is stepped one action at a time.
    Resolve,
    /// Battle over.
    Post,
}

impl Phase {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Post)
    }

    /// Phases in which the player's selection may still change.
    #[must_use]
    pub const fn is_planning(self) -> bool {
        matches!(self, Self::Select | Self::Respond)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Select => write!(f, "select"),
            Self::Respond => write!(f, "respond"),
            Self::Resolve => write!(f, "resolve"),
            Self::Post => write!(f, "post"),
        }
    }
}
