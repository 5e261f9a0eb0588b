//! Rejected operations.
//!
//! A rejected operation never changes battle state.

use super::phase::Phase;

/// Which per-turn budget a selection would exceed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BudgetKind {
    Energy,
    Speed,
    CardCount,
}

impl BudgetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetKind::Energy => "energy",
            BudgetKind::Speed => "speed",
            BudgetKind::CardCount => "card_count",
        }
    }
}

impl std::fmt::Display for BudgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from changing the player's card selection.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("{kind} budget exceeded: needs {needed}, budget is {budget}")]
    OverBudget {
        kind: BudgetKind,
        needed: i32,
        budget: i32,
    },

    #[error("no card at hand index {0}")]
    UnknownCard(usize),

    #[error("no planned enemy action at index {0}")]
    UnknownEnemyAction(usize),

    #[error("order is not a permutation of the {expected} selected cards")]
    InvalidOrder { expected: usize },

    #[error("selection is locked in {0} phase")]
    WrongPhase(Phase),
}

impl SelectionError {
    /// Budget kind for over-budget rejections.
    #[must_use]
    pub fn budget(&self) -> Option<BudgetKind> {
        match self {
            Self::OverBudget { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Errors from phase transitions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PhaseError {
    #[error("expected {expected} phase, battle is in {actual}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("no actions queued")]
    EmptyQueue,

    #[error("rewind already used this battle")]
    RewindUsed,

    #[error("battle is over")]
    BattleOver,

    #[error("not enough ether for overdrive")]
    NoEtherSlot,
}
