//! Scheduled actions on the shared timeline.

use serde::{Deserialize, Serialize};

use crate::cards::CardView;
use crate::core::Side;

/// One card placed on the timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledAction {
    pub actor: Side,
    pub view: CardView,
    /// Cumulative speed at which the action fires.
    pub sp: i32,
    /// Position in the actor's original submission; ghosts sort after originals.
    pub order: u32,
    /// Injected mid-resolution rather than submitted.
    pub ghost: bool,
}

impl ScheduledAction {
    /// Sort key: speed, then player before enemy, then submission order.
    #[must_use]
    pub fn sort_key(&self) -> (i32, Side, u32) {
        (self.sp, self.actor, self.order)
    }
}
