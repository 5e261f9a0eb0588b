//! Timeline scheduler.
//!
//! Merges both sides' submissions into one queue ordered by cumulative speed
//! and supports targeted mutation of the unresolved tail during resolution.
//!
//! ## Suffix Contract
//!
//! Every mutation takes the queue and a `cursor`: entries at indices
//! `..=cursor` have already executed and are never touched. Only the suffix
//! `cursor + 1..` is filtered, extended or re-sorted. A cursor of `None`
//! means nothing has executed yet.

use serde::{Deserialize, Serialize};

use super::action::ScheduledAction;
use crate::cards::CardView;
use crate::core::{BattleConfig, Side};

/// Uids for ghost actions start here so they never collide with hand slots.
const GHOST_UID_BASE: u32 = 10_000;

/// Merges submissions and mutates the unresolved queue.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimelineScheduler {
    agility_step: f64,
    min_speed: i32,
    disable_window: i32,
    ghost_offset: i32,
    stagger_delta: i32,

    /// Merges left that keep manual order.
    frozen_uses: u32,
    /// The live queue was committed in frozen order; mutations keep it.
    order_locked: bool,
    next_ghost: u32,
}

impl TimelineScheduler {
    /// Create a scheduler from battle configuration.
    #[must_use]
    pub fn new(config: &BattleConfig) -> Self {
        Self {
            agility_step: config.agility_step,
            min_speed: config.min_speed,
            disable_window: config.disable_window,
            ghost_offset: config.ghost_offset,
            stagger_delta: config.stagger_delta,
            frozen_uses: 0,
            order_locked: false,
            next_ghost: GHOST_UID_BASE,
        }
    }

    /// Effective speed cost of a card after agility.
    ///
    /// Each agility point changes the cost by `agility_step`; the result is
    /// rounded and never drops below `min_speed`.
    #[must_use]
    pub fn apply_agility(&self, speed_cost: i32, agility: i32) -> i32 {
        let scale = 1.0 - self.agility_step * f64::from(agility);
        let scaled = (f64::from(speed_cost) * scale).round() as i32;
        scaled.max(self.min_speed)
    }

    /// Merge both sides' cards into one queue.
    ///
    /// Each side accumulates its own `sp`. The combined list is stably sorted
    /// by `sp`, player before enemy on ties, then by submission order. While
    /// frozen, the concatenated submission order is kept as is.
    #[must_use]
    pub fn merge(
        &self,
        player: &[CardView],
        enemy: &[CardView],
        player_agility: i32,
        enemy_agility: i32,
    ) -> Vec<ScheduledAction> {
        let mut queue = Vec::with_capacity(player.len() + enemy.len());
        self.schedule_side(&mut queue, Side::Player, player, player_agility);
        self.schedule_side(&mut queue, Side::Enemy, enemy, enemy_agility);

        if !self.is_frozen() {
            queue.sort_by_key(ScheduledAction::sort_key);
        }
        queue
    }

    fn schedule_side(
        &self,
        queue: &mut Vec<ScheduledAction>,
        actor: Side,
        views: &[CardView],
        agility: i32,
    ) {
        let mut sp = 0;
        for (order, view) in views.iter().enumerate() {
            sp += self.apply_agility(view.speed_cost, agility);
            queue.push(ScheduledAction {
                actor,
                view: view.clone(),
                sp,
                order: order as u32,
                ghost: false,
            });
        }
    }

    /// Request frozen ordering for the next `uses` committed queues.
    pub fn freeze(&mut self, uses: u32) {
        self.frozen_uses = self.frozen_uses.max(uses);
    }

    /// Whether the next merge keeps manual order.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen_uses > 0
    }

    /// Mark the merged queue as committed for resolution.
    ///
    /// Spends one frozen use if any remain; returns whether the committed
    /// queue is in frozen order.
    pub fn commit(&mut self) -> bool {
        self.order_locked = self.frozen_uses > 0;
        if self.order_locked {
            self.frozen_uses -= 1;
        }
        self.order_locked
    }

    /// Release the per-turn order lock.
    pub fn end_turn(&mut self) {
        self.order_locked = false;
    }

    /// Remove unresolved `target` actions with `sp` in
    /// `trigger_sp ..= trigger_sp + disable_window`.
    ///
    /// Returns the removed actions.
    pub fn disable_window(
        &self,
        queue: &mut Vec<ScheduledAction>,
        cursor: Option<usize>,
        trigger_sp: i32,
        target: Side,
    ) -> Vec<ScheduledAction> {
        let start = suffix_start(cursor);
        if start >= queue.len() {
            return Vec::new();
        }

        let window = trigger_sp..=trigger_sp + self.disable_window;
        let suffix = queue.split_off(start);
        let (removed, kept): (Vec<_>, Vec<_>) = suffix
            .into_iter()
            .partition(|a| a.actor == target && window.contains(&a.sp));
        queue.extend(kept);
        self.resort_suffix(queue, start);
        removed
    }

    /// Insert a ghost copy of `view` at `trigger_sp + ghost_offset`.
    ///
    /// The ghost gets a fresh uid; returns the scheduled ghost.
    pub fn insert_ghost(
        &mut self,
        queue: &mut Vec<ScheduledAction>,
        cursor: Option<usize>,
        actor: Side,
        view: &CardView,
        trigger_sp: i32,
    ) -> ScheduledAction {
        let mut ghost_view = view.clone();
        ghost_view.uid = self.next_ghost;
        self.next_ghost += 1;

        let ghost = ScheduledAction {
            actor,
            view: ghost_view,
            sp: trigger_sp + self.ghost_offset,
            order: u32::MAX,
            ghost: true,
        };

        let start = suffix_start(cursor).min(queue.len());
        if self.order_locked {
            let at = queue[start..]
                .iter()
                .position(|a| a.sp > ghost.sp)
                .map_or(queue.len(), |offset| start + offset);
            queue.insert(at, ghost.clone());
        } else {
            queue.push(ghost.clone());
            self.resort_suffix(queue, start);
        }
        ghost
    }

    /// Push every unresolved `target` action back by the stagger delta.
    ///
    /// Returns how many actions moved.
    pub fn stagger(
        &self,
        queue: &mut [ScheduledAction],
        cursor: Option<usize>,
        target: Side,
    ) -> usize {
        self.shift_actor(queue, cursor, target, self.stagger_delta)
    }

    /// Shift every unresolved `target` action by `delta` sp.
    pub fn shift_actor(
        &self,
        queue: &mut [ScheduledAction],
        cursor: Option<usize>,
        target: Side,
        delta: i32,
    ) -> usize {
        let start = suffix_start(cursor);
        if start >= queue.len() {
            return 0;
        }

        let mut moved = 0;
        for action in queue[start..].iter_mut().filter(|a| a.actor == target) {
            action.sp += delta;
            moved += 1;
        }
        self.resort_suffix(queue, start);
        moved
    }

    fn resort_suffix(&self, queue: &mut [ScheduledAction], start: usize) {
        if self.order_locked || start >= queue.len() {
            return;
        }
        queue[start..].sort_by_key(ScheduledAction::sort_key);
    }
}

fn suffix_start(cursor: Option<usize>) -> usize {
    cursor.map_or(0, |c| c + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;

    fn view(id: &str, speed: i32) -> CardView {
        CardView::plain(0, &Card::attack(id, id, 1, speed, 5))
    }

    fn ids(queue: &[ScheduledAction]) -> Vec<&str> {
        queue.iter().map(|a| a.view.id().as_str()).collect()
    }

    fn scheduler() -> TimelineScheduler {
        TimelineScheduler::new(&BattleConfig::default())
    }

    #[test]
    fn test_merge_accumulates_per_side() {
        let s = scheduler();
        let queue = s.merge(
            &[view("p1", 5), view("p2", 5)],
            &[view("e1", 3), view("e2", 8)],
            0,
            0,
        );
        assert_eq!(ids(&queue), vec!["e1", "p1", "p2", "e2"]);
        let sps: Vec<_> = queue.iter().map(|a| a.sp).collect();
        assert_eq!(sps, vec![3, 5, 10, 11]);
    }

    #[test]
    fn test_merge_ties_player_first() {
        let s = scheduler();
        let queue = s.merge(&[view("p", 4)], &[view("e", 4)], 0, 0);
        assert_eq!(ids(&queue), vec!["p", "e"]);
    }

    #[test]
    fn test_merge_applies_agility() {
        let s = scheduler();
        let queue = s.merge(&[view("p", 10)], &[view("e", 9)], 2, 0);
        assert_eq!(queue[0].view.id().as_str(), "p");
        assert_eq!(queue[0].sp, 8);
    }

    #[test]
    fn test_apply_agility() {
        let s = scheduler();
        assert_eq!(s.apply_agility(10, 0), 10);
        assert_eq!(s.apply_agility(10, 2), 8);
        assert_eq!(s.apply_agility(10, -3), 13);
        assert_eq!(s.apply_agility(2, 20), 1);
        assert_eq!(s.apply_agility(0, 0), 1);
    }

    #[test]
    fn test_frozen_merge_keeps_submission_order() {
        let mut s = scheduler();
        s.freeze(1);
        let queue = s.merge(&[view("p1", 9), view("p2", 9)], &[view("e1", 1)], 0, 0);
        assert_eq!(ids(&queue), vec!["p1", "p2", "e1"]);

        assert!(s.commit());
        assert!(!s.is_frozen());
        let queue = s.merge(&[view("p1", 9)], &[view("e1", 1)], 0, 0);
        assert_eq!(ids(&queue), vec!["e1", "p1"]);
    }

    #[test]
    fn test_disable_window_only_touches_suffix() {
        let s = scheduler();
        let mut queue = s.merge(
            &[view("p1", 2), view("p2", 20)],
            &[view("e1", 1), view("e2", 3), view("e3", 3), view("e4", 10)],
            0,
            0,
        );
        // e1@1 p1@2 e2@4 e3@7 e4@17 p2@22
        assert_eq!(ids(&queue), vec!["e1", "p1", "e2", "e3", "e4", "p2"]);

        let removed = s.disable_window(&mut queue, Some(1), 2, Side::Enemy);
        assert_eq!(ids(&removed), vec!["e2", "e3"]);
        assert_eq!(ids(&queue), vec!["e1", "p1", "e4", "p2"]);
    }

    #[test]
    fn test_disable_window_ignores_executed_and_own_side() {
        let s = scheduler();
        let mut queue = s.merge(&[view("p1", 2), view("p2", 1)], &[view("e1", 2)], 0, 0);
        // p1@2 e1@2 p2@3
        let removed = s.disable_window(&mut queue, Some(1), 2, Side::Enemy);
        assert!(removed.is_empty());
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_insert_ghost_lands_in_suffix() {
        let mut s = scheduler();
        let mut queue = s.merge(&[view("p1", 2), view("p2", 10)], &[view("e1", 4)], 0, 0);
        // p1@2 e1@4 p2@12
        let trigger = queue[0].view.clone();
        let ghost = s.insert_ghost(&mut queue, Some(0), Side::Player, &trigger, 2);

        assert!(ghost.ghost);
        assert_eq!(ghost.sp, 5);
        assert!(ghost.view.uid >= GHOST_UID_BASE);
        assert_eq!(ids(&queue), vec!["p1", "e1", "p1", "p2"]);
        assert!(queue[2].ghost);
    }

    #[test]
    fn test_ghost_sorts_after_original_on_tie() {
        let mut s = scheduler();
        let mut queue = s.merge(&[view("p1", 1), view("p2", 3)], &[], 0, 0);
        let trigger = queue[0].view.clone();
        s.insert_ghost(&mut queue, Some(0), Side::Player, &trigger, 1);
        // ghost@4 ties p2@4
        assert_eq!(ids(&queue), vec!["p1", "p2", "p1"]);
    }

    #[test]
    fn test_stagger_shifts_and_resorts_suffix() {
        let s = scheduler();
        let mut queue = s.merge(&[view("p1", 3), view("p2", 3)], &[view("e1", 1), view("e2", 4)], 0, 0);
        // e1@1 p1@3 e2@5 p2@6
        let moved = s.stagger(&mut queue, Some(1), Side::Enemy);
        assert_eq!(moved, 1);
        assert_eq!(ids(&queue), vec!["e1", "p1", "p2", "e2"]);
        assert_eq!(queue[0].sp, 1, "executed entries stay untouched");
        assert_eq!(queue[3].sp, 9);
    }

    #[test]
    fn test_locked_order_survives_mutation() {
        let mut s = scheduler();
        s.freeze(1);
        let mut queue = s.merge(&[view("p1", 9), view("p2", 9)], &[view("e1", 1)], 0, 0);
        s.commit();

        s.shift_actor(&mut queue, Some(0), Side::Enemy, -5);
        assert_eq!(ids(&queue), vec!["p1", "p2", "e1"]);

        s.end_turn();
        s.shift_actor(&mut queue, Some(0), Side::Enemy, 0);
        assert_eq!(ids(&queue), vec!["p1", "e1", "p2"]);
    }

    #[test]
    fn test_mutations_on_exhausted_queue() {
        let s = scheduler();
        let mut queue = s.merge(&[view("p1", 3)], &[], 0, 0);
        assert!(s.disable_window(&mut queue, Some(0), 0, Side::Enemy).is_empty());
        assert_eq!(s.stagger(&mut queue, Some(0), Side::Player), 0);
    }
}
