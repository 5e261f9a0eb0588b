//! Core engine types: sides, RNG, configuration.
//!
//! This module contains the building blocks every other subsystem depends on.
//! Tuning lives in `BattleConfig` rather than in constants scattered across
//! the resolvers.

pub mod side;
pub mod rng;
pub mod config;

pub use side::{Side, SideMap};
pub use rng::{GameRng, GameRngState, RandomSource};
pub use config::{BattleConfig, ComboTable, RarityTable, StanceWeights};
