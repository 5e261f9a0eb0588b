//! Combatant records.
//!
//! Player and enemy share one shape. A combatant is created once per battle
//! and mutated in place for its duration.
//!
//! ## Invariants
//!
//! - `hp` and `block` are never negative
//! - `vulnerability` is always ≥ 1.0
//! - `overdrive_active` only holds during the turn that paid for it

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::status::{StatusToken, TokenScope};
use crate::cards::CardId;
use crate::combo::ComboName;

/// A combatant's full battle state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub energy: i32,
    pub max_energy: i32,
    pub max_speed: i32,
    pub block: i32,
    pub is_defending: bool,
    pub counter: i32,

    /// Incoming-damage multiplier for the next hit taken.
    pub vulnerability: f64,
    /// Turn ends left before an unconsumed vulnerability expires.
    pub vulnerability_turns: u32,

    pub strength: i32,
    pub agility: i32,
    pub insight: i32,
    pub shroud: i32,

    pub ether: i64,
    /// Pool ceiling; `None` for uncapped.
    pub ether_capacity: Option<i64>,
    pub overdrive_active: bool,

    /// Times each combo was banked this battle.
    pub combo_usage: FxHashMap<ComboName, u32>,
    /// Times each card was played this battle.
    pub card_usage: FxHashMap<CardId, u32>,

    pub tokens: SmallVec<[StatusToken; 4]>,
}

impl Combatant {
    /// Create a combatant at full health with default budgets.
    pub fn new(name: impl Into<String>, max_hp: i32) -> Self {
        Self {
            name: name.into(),
            hp: max_hp.max(0),
            max_hp: max_hp.max(0),
            energy: 0,
            max_energy: 0,
            max_speed: 0,
            block: 0,
            is_defending: false,
            counter: 0,
            vulnerability: 1.0,
            vulnerability_turns: 0,
            strength: 0,
            agility: 0,
            insight: 0,
            shroud: 0,
            ether: 0,
            ether_capacity: None,
            overdrive_active: false,
            combo_usage: FxHashMap::default(),
            card_usage: FxHashMap::default(),
            tokens: SmallVec::new(),
        }
    }

    /// Set energy and speed budgets.
    #[must_use]
    pub fn with_budgets(mut self, max_energy: i32, max_speed: i32) -> Self {
        self.max_energy = max_energy;
        self.energy = max_energy;
        self.max_speed = max_speed;
        self
    }

    /// Set the starting ether pool.
    #[must_use]
    pub fn with_ether(mut self, ether: i64) -> Self {
        self.ether = ether.max(0);
        self
    }

    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    /// Reduce hp, flooring at zero. Returns the hp actually lost.
    pub fn lose_hp(&mut self, amount: i32) -> i32 {
        let lost = amount.clamp(0, self.hp);
        self.hp -= lost;
        lost
    }

    /// Make the next incoming hit count `multiplier` times.
    pub fn make_vulnerable(&mut self, multiplier: f64, turns: u32) {
        self.vulnerability = multiplier.max(1.0);
        self.vulnerability_turns = turns;
    }

    /// Take the pending vulnerability multiplier, resetting it to 1.0.
    pub fn consume_vulnerability(&mut self) -> f64 {
        let multiplier = self.vulnerability;
        self.vulnerability = 1.0;
        self.vulnerability_turns = 0;
        multiplier
    }

    /// Number of whole overdrive slots the pool can pay for.
    #[must_use]
    pub fn ether_slots(&self, slot_cost: i64) -> i64 {
        crate::planner::ether_slots(self.ether, slot_cost)
    }

    /// Room left below the ether capacity.
    #[must_use]
    pub fn ether_headroom(&self) -> i64 {
        match self.ether_capacity {
            Some(cap) => (cap - self.ether).max(0),
            None => i64::MAX,
        }
    }

    /// Stacks of a token, 0 if absent.
    #[must_use]
    pub fn token_stacks(&self, id: &str) -> u32 {
        self.tokens
            .iter()
            .find(|t| t.id == id)
            .map_or(0, |t| t.stacks)
    }

    /// Add stacks to a token, creating it if needed.
    ///
    /// An existing token keeps its original scope.
    pub fn add_token(&mut self, id: &str, stacks: u32, scope: TokenScope) {
        if stacks == 0 {
            return;
        }
        match self.tokens.iter_mut().find(|t| t.id == id) {
            Some(token) => token.stacks += stacks,
            None => self.tokens.push(StatusToken::new(id, stacks, scope)),
        }
    }

    /// Remove a token entirely, returning its stacks.
    pub fn consume_token(&mut self, id: &str) -> u32 {
        match self.tokens.iter().position(|t| t.id == id) {
            Some(index) => self.tokens.remove(index).stacks,
            None => 0,
        }
    }

    /// Remove one stack from a token, dropping it when empty.
    pub fn decay_token(&mut self, id: &str) {
        if let Some(index) = self.tokens.iter().position(|t| t.id == id) {
            self.tokens[index].stacks = self.tokens[index].stacks.saturating_sub(1);
            if self.tokens[index].stacks == 0 {
                self.tokens.remove(index);
            }
        }
    }

    /// Clear per-turn combat state at turn end.
    ///
    /// Block, defending, counter and overdrive reset; per-turn tokens are
    /// dropped; an unconsumed vulnerability counts down and expires at zero.
    pub fn end_turn(&mut self) {
        self.block = 0;
        self.is_defending = false;
        self.counter = 0;
        self.overdrive_active = false;
        self.tokens.retain(|t| t.scope != TokenScope::PerTurn);

        if self.vulnerability_turns > 0 {
            self.vulnerability_turns -= 1;
        }
        if self.vulnerability_turns == 0 {
            self.vulnerability = 1.0;
        }
    }

    /// Record one play of a card.
    pub fn record_card_use(&mut self, id: &CardId) {
        *self.card_usage.entry(id.clone()).or_insert(0) += 1;
    }

    /// Times a combo has been banked this battle.
    #[must_use]
    pub fn combo_uses(&self, combo: ComboName) -> u32 {
        self.combo_usage.get(&combo).copied().unwrap_or(0)
    }
}
