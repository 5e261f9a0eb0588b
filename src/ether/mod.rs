//! Ether: per-turn accumulation, combo multipliers, deflation and transfer.
//!
//! ## Key Types
//!
//! - `EtherAccumulator`: per-side gains gathered while the queue resolves
//! - `EtherEconomy`: banking and zero-sum settlement at turn end
//! - `TurnBank` / `Settlement`: what a turn end produced
//! - `Relic` / `RelicCatalog` / `RelicSet`: multiplier adjustments

pub mod economy;
pub mod relics;

pub use economy::{EtherAccumulator, EtherEconomy, Settlement, TurnBank};
pub use relics::{Relic, RelicCatalog, RelicEffect, RelicSet, FULL_HAND_CARDS};
