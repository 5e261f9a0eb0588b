//! Combo detection.
//!
//! ## Key Types
//!
//! - `ComboName`: the named combinations (pair through five-of-a-kind)
//! - `ComboResult`: name plus which energy costs count as members
//! - `ComboDetector`: pure, order-independent classifier
//!
//! The combo drives the ether multiplier at turn end and marks cards as
//! "in combo" for traits that react to membership.

pub mod detector;

pub use detector::{ComboCard, ComboDetector, ComboName, ComboResult};
