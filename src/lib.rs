//! # ether-duel
//!
//! Resolution core for a turn-based, card-driven duel. Both sides spend an
//! energy budget and a speed budget on cards; the engine interleaves them on
//! a shared speed timeline, resolves them one at a time, and runs an ether
//! economy that pays for overdrive.
//!
//! ## Design Principles
//!
//! 1. **Single Owner**: one `TurnController` owns all state of one battle.
//!    No globals; concurrent battles use separate controllers.
//!
//! 2. **Injected Configuration**: every tuning constant lives in
//!    `BattleConfig`, passed in at construction.
//!
//! 3. **Injectable Randomness**: stance rolls, jam rolls and card draws go
//!    through `RandomSource`, so a seeded `GameRng` replays a battle exactly.
//!
//! 4. **Pure Views**: catalog cards are never mutated; modifiers produce
//!    `CardView`s.
//!
//! ## Modules
//!
//! - `core`: sides, RNG port, configuration
//! - `cards`: card records, traits, catalog, views and the trait pipeline
//! - `combatant`: combatant records, status tokens, turn carry effects
//! - `combo`: combo classification
//! - `timeline`: merged speed timeline and its mutations
//! - `combat`: per-action damage resolution and events
//! - `ether`: accumulation, banking, transfer and relics
//! - `planner`: enemy stance and action search
//! - `battle`: phase state machine and host-facing operations

pub mod core;
pub mod cards;
pub mod combatant;
pub mod combo;
pub mod timeline;
pub mod combat;
pub mod ether;
pub mod planner;
pub mod battle;

// Re-export commonly used types
pub use crate::core::{
    BattleConfig, ComboTable, RarityTable, StanceWeights,
    GameRng, GameRngState, RandomSource,
    Side, SideMap,
};

pub use crate::cards::{
    Card, CardCatalog, CardCategory, CardId, CardKind, CardView, Rarity,
    SpecialEffect, TraitPipeline, TraitTag,
};

pub use crate::combatant::{Combatant, StatusToken, TokenScope, TurnCarryEffects};

pub use crate::combo::{ComboDetector, ComboName, ComboResult};

pub use crate::timeline::{ScheduledAction, TimelineScheduler};

pub use crate::combat::{ApplyOutcome, BattleEvent, CombatResolver, EventKind, ResolveContext};

pub use crate::ether::{
    EtherAccumulator, EtherEconomy, Relic, RelicCatalog, RelicEffect, RelicSet,
    Settlement, TurnBank,
};

pub use crate::planner::{should_overdrive, EnemyPlan, EnemyPlanner, PlanRequest, Stance};

pub use crate::battle::{
    BattleInit, BattleOutcome, BattleResult, BudgetKind, EnemyInit, OutcomeReason,
    Phase, PhaseError, PlayerInit, RevealTier, SelectionError, StepReport,
    TurnController,
};
