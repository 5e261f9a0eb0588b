//! Enemy action planning.
//!
//! ## Search
//!
//! Candidates are enumerated by bounded backtracking over deck indices.
//! A branch is pruned as soon as its running speed or energy total leaves
//! the budget, and depth never exceeds the card cap, so the search stays
//! cheap for realistic decks (about ten cards, three or four per plan).
//!
//! ## Selection
//!
//! 1. Keep candidates that satisfy the stance and pick the best by score.
//! 2. If none satisfy it, pick the best candidate ignoring the stance.
//! 3. If nothing fits the budgets, take the single cheapest affordable card.
//! 4. Otherwise the plan is empty.
//!
//! Ties on score go to more cards, then lower speed, then lower energy,
//! then lexicographically smaller card ids.

use std::cmp::Ordering;

use smallvec::SmallVec;
use tracing::debug;

use super::stance::Stance;
use crate::cards::{Card, CardKind};
use crate::core::BattleConfig;

/// Score added per card so larger plans always win over smaller ones.
const CARD_COUNT_BONUS: i64 = 1_000;

/// Budgets and caps for one planning call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanRequest {
    pub stance: Stance,
    pub max_cards: usize,
    /// Enemy units in the encounter; each beyond the first widens budgets.
    pub units: u32,
    pub speed_budget: i32,
    pub energy_budget: i32,
}

impl PlanRequest {
    pub fn new(stance: Stance, max_cards: usize, speed_budget: i32, energy_budget: i32) -> Self {
        Self {
            stance,
            max_cards,
            units: 1,
            speed_budget,
            energy_budget,
        }
    }

    /// Set the unit count (builder pattern).
    #[must_use]
    pub fn with_units(mut self, units: u32) -> Self {
        self.units = units.max(1);
        self
    }
}

/// Overdrive slots a pool can pay for.
#[must_use]
pub fn ether_slots(pool: i64, slot_cost: i64) -> i64 {
    if slot_cost <= 0 {
        return 0;
    }
    (pool / slot_cost).max(0)
}

/// Whether the enemy should spend a slot on overdrive this turn.
///
/// Never on turn 1 or without a slot. Aggressive always does, balanced
/// only with an attack planned, defensive never.
#[must_use]
pub fn should_overdrive(stance: Stance, plan: &[Card], slots: i64, turn: u32) -> bool {
    if turn <= 1 || slots < 1 {
        return false;
    }
    match stance {
        Stance::Aggressive => true,
        Stance::Balanced => plan.iter().any(|c| c.kind == CardKind::Attack),
        Stance::Defensive => false,
    }
}

/// Totals for one candidate subset.
#[derive(Clone, Debug)]
struct Candidate {
    picks: SmallVec<[usize; 8]>,
    score: i64,
    speed: i32,
    energy: i32,
}

#[derive(Clone, Copy, Debug, Default)]
struct Totals {
    speed: i32,
    energy: i32,
    attack_cost: i32,
    defense_cost: i32,
    damage: i32,
    block: i32,
}

impl Totals {
    fn of(deck: &[Card], picks: &[usize]) -> Self {
        let mut totals = Self::default();
        for card in picks.iter().map(|&i| &deck[i]) {
            totals.speed += card.speed_cost.max(0);
            totals.energy += card.energy_cost.max(0);
            match card.kind {
                CardKind::Attack => {
                    totals.attack_cost += card.energy_cost.max(0);
                    totals.damage += card.total_damage().max(0);
                }
                CardKind::Defense => {
                    totals.defense_cost += card.energy_cost.max(0);
                    totals.block += card.block.max(0);
                }
            }
        }
        totals
    }
}

/// Searches the enemy deck for the best action set.
#[derive(Clone, Debug)]
pub struct EnemyPlanner {
    speed_widen: i32,
    energy_widen: i32,
}

impl EnemyPlanner {
    #[must_use]
    pub fn new(config: &BattleConfig) -> Self {
        Self {
            speed_widen: config.planner_speed_widen,
            energy_widen: config.planner_energy_widen,
        }
    }

    /// Budgets after multi-unit widening: (speed, energy, cards).
    #[must_use]
    pub fn effective_budgets(&self, request: &PlanRequest) -> (i32, i32, usize) {
        let extra = request.units.saturating_sub(1);
        let extra_i32 = i32::try_from(extra).unwrap_or(i32::MAX);
        (
            request.speed_budget.saturating_add(self.speed_widen.saturating_mul(extra_i32)),
            request.energy_budget.saturating_add(self.energy_widen.saturating_mul(extra_i32)),
            request.max_cards.saturating_add(extra as usize),
        )
    }

    /// Choose the enemy's cards for one turn.
    #[must_use]
    pub fn plan(&self, deck: &[Card], request: &PlanRequest) -> Vec<Card> {
        let (speed_budget, energy_budget, max_cards) = self.effective_budgets(request);

        let mut best_fit: Option<Candidate> = None;
        let mut best_any: Option<Candidate> = None;
        let mut evaluated = 0usize;

        let mut picks: SmallVec<[usize; 8]> = SmallVec::new();
        let mut visit = |picks: &[usize]| {
            evaluated += 1;
            let totals = Totals::of(deck, picks);
            let candidate = Candidate {
                picks: picks.iter().copied().collect(),
                score: score(request.stance, &totals, picks.len()),
                speed: totals.speed,
                energy: totals.energy,
            };

            if satisfies(request.stance, &totals, request.energy_budget) {
                keep_best(&mut best_fit, &candidate, deck);
            }
            keep_best(&mut best_any, &candidate, deck);
        };

        enumerate(deck, 0, &mut picks, 0, 0, (speed_budget, energy_budget, max_cards), &mut visit);

        let chosen = match (best_fit, best_any) {
            (Some(fit), _) => fit.picks,
            (None, Some(any)) => {
                debug!(stance = %request.stance, "no plan satisfies stance, using best overall");
                any.picks
            }
            (None, None) => cheapest(deck, speed_budget, energy_budget).into_iter().collect(),
        };

        debug!(
            stance = %request.stance,
            evaluated,
            chosen = chosen.len(),
            "enemy plan"
        );

        chosen.iter().map(|&i| deck[i].clone()).collect()
    }
}

fn enumerate(
    deck: &[Card],
    start: usize,
    picks: &mut SmallVec<[usize; 8]>,
    speed: i32,
    energy: i32,
    limits: (i32, i32, usize),
    visit: &mut impl FnMut(&[usize]),
) {
    let (speed_budget, energy_budget, max_cards) = limits;
    if picks.len() >= max_cards {
        return;
    }

    for index in start..deck.len() {
        let card = &deck[index];
        let next_speed = speed + card.speed_cost.max(0);
        let next_energy = energy + card.energy_cost.max(0);
        if next_speed > speed_budget || next_energy > energy_budget {
            continue;
        }

        picks.push(index);
        visit(picks.as_slice());
        enumerate(deck, index + 1, picks, next_speed, next_energy, limits, visit);
        picks.pop();
    }
}

fn satisfies(stance: Stance, totals: &Totals, energy_budget: i32) -> bool {
    match stance {
        Stance::Aggressive => totals.attack_cost * 2 >= energy_budget,
        Stance::Defensive => totals.defense_cost * 2 >= energy_budget,
        Stance::Balanced => totals.attack_cost == totals.defense_cost,
    }
}

fn score(stance: Stance, totals: &Totals, cards: usize) -> i64 {
    let t = |v: i32| i64::from(v);
    let value = match stance {
        Stance::Aggressive => 3 * t(totals.attack_cost) + 2 * t(totals.damage) - t(totals.speed),
        Stance::Defensive => 3 * t(totals.defense_cost) + 2 * t(totals.block) - t(totals.speed),
        Stance::Balanced => {
            2 * t(totals.attack_cost + totals.defense_cost) + t(totals.damage) + t(totals.block)
                - t(totals.speed)
        }
    };
    value + CARD_COUNT_BONUS * cards as i64
}

fn compare(a: &Candidate, b: &Candidate, deck: &[Card]) -> Ordering {
    a.score
        .cmp(&b.score)
        .then(a.picks.len().cmp(&b.picks.len()))
        .then(b.speed.cmp(&a.speed))
        .then(b.energy.cmp(&a.energy))
        .then_with(|| {
            let ids = |c: &Candidate| c.picks.iter().map(|&i| &deck[i].id).collect::<SmallVec<[_; 8]>>();
            ids(b).cmp(&ids(a))
        })
}

fn keep_best(best: &mut Option<Candidate>, candidate: &Candidate, deck: &[Card]) {
    let replace = match best {
        None => true,
        Some(current) => compare(candidate, current, deck) == Ordering::Greater,
    };
    if replace {
        *best = Some(candidate.clone());
    }
}

fn cheapest(deck: &[Card], speed_budget: i32, energy_budget: i32) -> Option<usize> {
    deck.iter()
        .enumerate()
        .filter(|(_, c)| c.speed_cost.max(0) <= speed_budget && c.energy_cost.max(0) <= energy_budget)
        .min_by(|(_, a), (_, b)| {
            a.energy_cost
                .cmp(&b.energy_cost)
                .then(a.speed_cost.cmp(&b.speed_cost))
                .then_with(|| a.id.cmp(&b.id))
        })
        .map(|(i, _)| i)
}
