//! Battle orchestration: phases, initialization, the turn controller and
//! its outcome.
//!
//! ## Key Types
//!
//! - `TurnController`: owns one battle; the only host-facing entry point
//! - `Phase`: Select → Respond → Resolve → Select | Post
//! - `BattleInit`: the one-shot initialization payload
//! - `StepReport`: what one `advance` call resolved and emitted
//! - `BattleOutcome`: terminal result, reported exactly once
//! - `SelectionError` / `PhaseError`: rejected operations
//!
//! ## Example
//!
//! ```
//! use ether_duel::battle::{BattleInit, EnemyInit, Phase, PlayerInit, TurnController};
//! use ether_duel::cards::{Card, CardCatalog, CardId};
//! use ether_duel::core::{BattleConfig, GameRng, Side};
//! use ether_duel::ether::RelicCatalog;
//!
//! let catalog = CardCatalog::from_cards([Card::attack("strike", "Strike", 1, 5, 10)]);
//! let init = BattleInit::new(
//!     PlayerInit { primary: vec![CardId::new("strike")], ..PlayerInit::default() },
//!     EnemyInit::default(),
//! );
//! let mut battle = TurnController::new(
//!     &init,
//!     catalog,
//!     &RelicCatalog::new(),
//!     BattleConfig::default(),
//!     GameRng::new(7),
//! );
//!
//! battle.toggle_select(0).unwrap();
//! battle.submit().unwrap();
//! battle.confirm().unwrap();
//! let report = battle.advance().unwrap();
//!
//! assert_eq!(report.dealt, 10);
//! assert_eq!(battle.combatant(Side::Enemy).hp, 30);
//! assert_eq!(battle.phase(), Phase::Select);
//! ```

pub mod phase;
pub mod error;
pub mod init;
pub mod outcome;
pub mod disclosure;
pub mod controller;

pub use phase::Phase;
pub use error::{BudgetKind, PhaseError, SelectionError};
pub use init::{BattleInit, EnemyInit, PlayerInit};
pub use outcome::{BattleOutcome, BattleResult, OutcomeReason};
pub use disclosure::{reveal_level, RevealTier, REVEAL_RANGE};
pub use controller::{OutcomeCallback, StepReport, TurnBudgets, TurnController};
