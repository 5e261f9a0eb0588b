//! Battle events.
//!
//! Events are the core's only output channel to the presentation layer.
//! Every resolved action returns one batch; turn-end finalization returns
//! another. The core never formats output itself beyond the `message`.
//!
//! ## Event Values
//!
//! `values` carries the numeric payload; the meaning of each index depends
//! on the kind:
//!
//! | Kind        | values                                  |
//! |-------------|-----------------------------------------|
//! | `Defense`   | block gained, block total               |
//! | `Hit`       | damage taken, defender hp after         |
//! | `Pierce`    | block consumed, damage through, hp after|
//! | `Blocked`   | damage absorbed, block left             |
//! | `Counter`   | counter damage, attacker hp after       |
//! | `Vulnerable`| multiplier × 100                        |
//! | `Multihit`  | hits completed, hits declared           |
//! | `Out`       | hits completed, hits declared           |
//! | `Burn`      | stacks (applied or ticked), damage      |
//! | `Ether`     | accumulated, multiplier × 100, gain     |
//! | `Transfer`  | amount moved, player pool, enemy pool   |

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Side;

/// What happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Defense,
    Hit,
    Pierce,
    Blocked,
    Counter,
    Vulnerable,
    Stun,
    Multihit,
    Burn,
    Out,
    Ghost,
    Stagger,
    Freeze,
    Empower,
    Overdrive,
    Ether,
    NoEther,
    Transfer,
    Recovery,
}

/// One discrete event for logging or animation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleEvent {
    /// The side whose action (or status) produced the event.
    pub actor: Side,
    /// Display name of the card involved, empty for turn-level events.
    pub card_name: String,
    pub kind: EventKind,
    pub values: SmallVec<[i64; 4]>,
    pub message: String,
}

impl BattleEvent {
    /// Create an event with no card, values or message.
    pub fn new(actor: Side, kind: EventKind) -> Self {
        Self {
            actor,
            card_name: String::new(),
            kind,
            values: SmallVec::new(),
            message: String::new(),
        }
    }

    /// Set the card name (builder pattern).
    #[must_use]
    pub fn with_card(mut self, name: impl Into<String>) -> Self {
        self.card_name = name.into();
        self
    }

    /// Add a numeric value (builder pattern).
    #[must_use]
    pub fn with_value(mut self, value: impl Into<i64>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Set the human-readable message (builder pattern).
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get a value by index, or a default.
    #[must_use]
    pub fn value(&self, index: usize, default: i64) -> i64 {
        self.values.get(index).copied().unwrap_or(default)
    }
}

/// A batch of events from one step.
pub type EventBatch = SmallVec<[BattleEvent; 4]>;
