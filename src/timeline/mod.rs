//! Shared speed timeline.
//!
//! Both sides spend a speed budget; each card fires at the running total of
//! its side's speed. The scheduler interleaves both sides into a single
//! queue and lets in-combat effects rewrite the part of it that has not yet
//! resolved.

mod action;
mod scheduler;

pub use action::ScheduledAction;
pub use scheduler::TimelineScheduler;
