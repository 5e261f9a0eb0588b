//! Terminal battle outcome.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleResult {
    Victory,
    Defeat,
}

/// Why the battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeReason {
    /// A combatant's hp reached zero.
    Hp,
    /// The enemy's ether pool was emptied by transfer.
    EtherDepleted,
}

/// Reported once when the battle enters `Post`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub result: BattleResult,
    pub reason: OutcomeReason,
    /// Player's ether pool at the end.
    pub final_ether: i64,
    /// `final_ether` minus the pool at battle start.
    pub ether_delta: i64,
    pub hp: i32,
    pub max_hp: i32,
    /// Turn in which the battle ended.
    pub turn: u32,
}

impl BattleOutcome {
    #[must_use]
    pub fn is_victory(&self) -> bool {
        self.result == BattleResult::Victory
    }
}
