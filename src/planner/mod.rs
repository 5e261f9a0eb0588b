//! Enemy planning: stance roll, budgeted subset search and overdrive choice.
//!
//! ## Key Types
//!
//! - `Stance`: aggressive, defensive or balanced bias for one turn
//! - `EnemyPlan`: the chosen cards plus perturbation and overdrive flags
//! - `PlanRequest`: stance, card cap, unit count and budgets
//! - `EnemyPlanner`: bounded backtracking search with stance scoring

pub mod stance;
pub mod search;

pub use stance::{EnemyPlan, Stance};
pub use search::{ether_slots, should_overdrive, EnemyPlanner, PlanRequest};
