//! Card system: definitions, tags, catalog, views and the trait pipeline.
//!
//! ## Key Types
//!
//! - `Card`: immutable catalog record (costs, combat stats, tags)
//! - `TraitTag` / `SpecialEffect`: passive modifiers and one-off mechanics
//! - `CardCatalog`: tolerant id lookup over the static catalog
//! - `CardView`: per-turn enhanced view of a card
//! - `TraitPipeline`: pure transform from `Card` to `CardView`
//!
//! Catalog records are never mutated during a battle.

pub mod definition;
pub mod tags;
pub mod registry;
pub mod view;
pub mod pipeline;

pub use definition::{Card, CardCategory, CardId, CardKind, Rarity};
pub use tags::{SpecialEffect, TraitTag};
pub use registry::CardCatalog;
pub use view::CardView;
pub use pipeline::{EnhanceContext, TraitPipeline};
