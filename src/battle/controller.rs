//! Turn controller - the battle state machine.
//!
//! The controller exclusively owns both combatant records, the hand, the
//! enemy plan and the resolve queue, and is the only type with host-facing
//! operations. Every operation runs to completion; auto-advance is the host
//! calling [`TurnController::advance`] on its own cadence.
//!
//! ## Turn Cycle
//!
//! 1. `start_turn`: apply carry effects, deal the hand, plan the enemy
//! 2. Select: `toggle_select` under energy/speed/card budgets, `submit`
//! 3. Respond: `reorder`, `toggle_select`, `disable_enemy_action`, `rewind`
//!    (once per battle), `confirm`
//! 4. Resolve: `advance` one action per call; queue exhaustion banks ether
//!    and starts the next turn, hp reaching zero ends the battle
//!
//! Every mutation is validated before commit; a rejected operation returns
//! an error and leaves state untouched.

use im::Vector;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use super::disclosure::{reveal_level, RevealTier};
use super::error::{BudgetKind, PhaseError, SelectionError};
use super::init::BattleInit;
use super::outcome::{BattleOutcome, BattleResult, OutcomeReason};
use super::phase::Phase;
use crate::cards::{Card, CardCatalog, CardView, EnhanceContext, SpecialEffect, TraitPipeline};
use crate::combat::{ApplyOutcome, BattleEvent, CombatResolver, EventBatch, EventKind, ResolveContext};
use crate::combatant::{Combatant, TokenScope, TurnCarryEffects, BURN, NO_ETHER};
use crate::combo::{ComboDetector, ComboResult};
use crate::core::{BattleConfig, GameRng, RandomSource, Side, SideMap};
use crate::ether::{EtherAccumulator, EtherEconomy, RelicCatalog, RelicSet, Settlement};
use crate::planner::{should_overdrive, EnemyPlan, EnemyPlanner, PlanRequest, Stance};
use crate::timeline::{ScheduledAction, TimelineScheduler};

/// Called once with the outcome when the battle ends.
pub type OutcomeCallback = Box<dyn FnMut(&BattleOutcome)>;

/// The player's budgets for the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnBudgets {
    pub energy: i32,
    pub speed: i32,
    pub cards: usize,
}

/// Result of one `advance` call.
#[derive(Clone, Debug, PartialEq)]
pub struct StepReport {
    /// Turn the step belongs to.
    pub turn: u32,
    /// The action resolved, if any.
    pub action: Option<ScheduledAction>,
    pub dealt: i32,
    pub taken: i32,
    pub hits_completed: u32,
    /// Action events followed by turn-end events.
    pub events: Vec<BattleEvent>,
    /// This step closed the turn.
    pub turn_ended: bool,
    /// Phase after the step.
    pub phase: Phase,
}

/// Owns one battle and drives its phase state machine.
pub struct TurnController<R: RandomSource = GameRng> {
    config: BattleConfig,
    catalog: CardCatalog,
    rng: R,
    scheduler: TimelineScheduler,
    planner: EnemyPlanner,

    combatants: SideMap<Combatant>,
    phase: Phase,
    turn: u32,
    start_ether: i64,

    primary: Vec<Card>,
    secondary: Vec<Card>,
    enemy_deck: Vec<Card>,
    enemy_units: u32,
    pinned_stance: Option<Stance>,
    relics: RelicSet,
    max_submit: usize,

    hand: Vec<Card>,
    selected: Vec<usize>,
    budgets: TurnBudgets,
    overdrive_requested: bool,
    carry: TurnCarryEffects,
    enemy_plan: EnemyPlan,
    combos: SideMap<Option<ComboResult>>,

    queue: Vec<ScheduledAction>,
    snapshot: Vector<ScheduledAction>,
    cursor: Option<usize>,
    accumulator: EtherAccumulator,
    resolved: Vec<CardView>,

    rewind_used: bool,
    outcome: Option<BattleOutcome>,
    on_outcome: Option<OutcomeCallback>,
}

impl<R: RandomSource> TurnController<R> {
    /// Create a battle and start turn 1.
    ///
    /// Card and relic ids missing from the catalogs are dropped.
    pub fn new(
        init: &BattleInit,
        catalog: CardCatalog,
        relics: &RelicCatalog,
        config: BattleConfig,
        rng: R,
    ) -> Self {
        let combatants = init.combatants(&config);
        let primary = catalog.resolve(&init.player.primary);
        let secondary = catalog.resolve(&init.player.secondary);
        let enemy_deck = catalog.resolve(&init.enemy.deck);
        let max_submit = init.player.max_submit.unwrap_or(config.max_submit);

        let mut controller = Self {
            scheduler: TimelineScheduler::new(&config),
            planner: EnemyPlanner::new(&config),
            start_ether: combatants[Side::Player].ether,
            combatants,
            phase: Phase::Select,
            turn: 0,
            primary,
            secondary,
            enemy_deck,
            enemy_units: init.enemy.units.max(1),
            pinned_stance: init.enemy.stance,
            relics: RelicSet::new(relics.resolve(&init.player.relics)),
            max_submit,
            hand: Vec::new(),
            selected: Vec::new(),
            budgets: TurnBudgets {
                energy: 0,
                speed: 0,
                cards: max_submit,
            },
            overdrive_requested: false,
            carry: TurnCarryEffects::default(),
            enemy_plan: EnemyPlan::new(Stance::Balanced, Vec::new()),
            combos: SideMap::default(),
            queue: Vec::new(),
            snapshot: Vector::new(),
            cursor: None,
            accumulator: EtherAccumulator::new(),
            resolved: Vec::new(),
            rewind_used: false,
            outcome: None,
            on_outcome: None,
            config,
            catalog,
            rng,
        };
        controller.start_turn();
        controller
    }

    /// Register the outcome callback (builder pattern).
    #[must_use]
    pub fn with_outcome_callback(mut self, callback: impl FnMut(&BattleOutcome) + 'static) -> Self {
        self.on_outcome = Some(Box::new(callback));
        self
    }

    // === Accessors ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    #[must_use]
    pub fn combatant(&self, side: Side) -> &Combatant {
        &self.combatants[side]
    }

    #[must_use]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// Selected hand indices in submission order.
    #[must_use]
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    #[must_use]
    pub fn budgets(&self) -> TurnBudgets {
        self.budgets
    }

    #[must_use]
    pub fn enemy_plan(&self) -> &EnemyPlan {
        &self.enemy_plan
    }

    /// The player's current combo, if the selection forms one.
    #[must_use]
    pub fn combo(&self) -> Option<&ComboResult> {
        self.combos[Side::Player].as_ref()
    }

    /// The full queue, executed prefix included.
    #[must_use]
    pub fn queue(&self) -> &[ScheduledAction] {
        &self.queue
    }

    /// Actions not yet resolved.
    #[must_use]
    pub fn pending(&self) -> &[ScheduledAction] {
        let start = self.cursor.map_or(0, |c| c + 1).min(self.queue.len());
        &self.queue[start..]
    }

    /// Carry effects applied at the start of the current turn.
    #[must_use]
    pub fn carry(&self) -> &TurnCarryEffects {
        &self.carry
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&BattleOutcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub fn overdrive_requested(&self) -> bool {
        self.overdrive_requested
    }

    /// `clamp(insight - shroud, -3, 3)` for the current combatants.
    #[must_use]
    pub fn reveal_level(&self) -> i32 {
        reveal_level(self.combatants[Side::Player].insight, self.combatants[Side::Enemy].shroud)
    }

    #[must_use]
    pub fn reveal_tier(&self) -> RevealTier {
        RevealTier::from_level(self.reveal_level())
    }

    // === Select / Respond ===

    /// Add or remove a hand card from the selection.
    ///
    /// Returns whether the card is selected afterwards. Adding a card that
    /// would exceed any budget is rejected.
    pub fn toggle_select(&mut self, index: usize) -> Result<bool, SelectionError> {
        if !self.phase.is_planning() {
            return Err(SelectionError::WrongPhase(self.phase));
        }
        if index >= self.hand.len() {
            return Err(SelectionError::UnknownCard(index));
        }

        if let Some(pos) = self.selected.iter().position(|&i| i == index) {
            self.selected.remove(pos);
            debug!(index, "card deselected");
            self.refresh_schedule();
            return Ok(false);
        }

        self.check_budgets(index).map_err(|err| {
            debug!(index, %err, "selection rejected");
            err
        })?;

        self.selected.push(index);
        debug!(index, card = %self.hand[index].id, "card selected");
        self.refresh_schedule();
        Ok(true)
    }

    fn check_budgets(&self, adding: usize) -> Result<(), SelectionError> {
        let count = self.selected.len() + 1;
        if count > self.budgets.cards {
            return Err(SelectionError::OverBudget {
                kind: BudgetKind::CardCount,
                needed: count as i32,
                budget: self.budgets.cards as i32,
            });
        }

        let picks = self.selected.iter().copied().chain(std::iter::once(adding));
        let (energy, speed) = picks.fold((0, 0), |(e, s), i| {
            (e + self.hand[i].energy_cost, s + self.effective_speed(&self.hand[i]))
        });

        if energy > self.budgets.energy {
            return Err(SelectionError::OverBudget {
                kind: BudgetKind::Energy,
                needed: energy,
                budget: self.budgets.energy,
            });
        }
        if speed > self.budgets.speed {
            return Err(SelectionError::OverBudget {
                kind: BudgetKind::Speed,
                needed: speed,
                budget: self.budgets.speed,
            });
        }
        Ok(())
    }

    /// Speed a hand card will occupy on the timeline.
    #[must_use]
    pub fn effective_speed(&self, card: &Card) -> i32 {
        let view = TraitPipeline::enhance(card, 0, EnhanceContext::default());
        self.scheduler
            .apply_agility(view.speed_cost, self.combatants[Side::Player].agility)
    }

    /// Total timeline speed of the current selection.
    #[must_use]
    pub fn selected_speed(&self) -> i32 {
        self.selected.iter().map(|&i| self.effective_speed(&self.hand[i])).sum()
    }

    /// Total energy cost of the current selection.
    #[must_use]
    pub fn selected_energy(&self) -> i32 {
        self.selected.iter().map(|&i| self.hand[i].energy_cost).sum()
    }

    /// Request (or cancel) player overdrive for this turn.
    pub fn set_overdrive(&mut self, active: bool) -> Result<(), PhaseError> {
        self.require_planning()?;
        if active && self.combatants[Side::Player].ether_slots(self.config.ether_slot_cost) < 1 {
            return Err(PhaseError::NoEtherSlot);
        }
        self.overdrive_requested = active;
        Ok(())
    }

    /// Lock in the selection and show the merged schedule.
    pub fn submit(&mut self) -> Result<(), PhaseError> {
        self.require(Phase::Select)?;
        self.refresh_schedule();
        self.phase = Phase::Respond;
        info!(
            turn = self.turn,
            cards = self.selected.len(),
            queued = self.queue.len(),
            combo = ?self.combos[Side::Player].as_ref().map(|c| c.name),
            "selection submitted"
        );
        Ok(())
    }

    /// Reorder the selection; `order[k]` is the current position of the card
    /// that should come k-th.
    pub fn reorder(&mut self, order: &[usize]) -> Result<(), SelectionError> {
        if !self.phase.is_planning() {
            return Err(SelectionError::WrongPhase(self.phase));
        }

        let expected = self.selected.len();
        let mut seen: SmallVec<[bool; 8]> = SmallVec::from_elem(false, expected);
        let valid = order.len() == expected
            && order.iter().all(|&pos| pos < expected && !std::mem::replace(&mut seen[pos], true));
        if !valid {
            return Err(SelectionError::InvalidOrder { expected });
        }

        self.selected = order.iter().map(|&pos| self.selected[pos]).collect();
        self.refresh_schedule();
        Ok(())
    }

    /// Remove a planned enemy action. The plan is not regenerated this turn.
    pub fn disable_enemy_action(&mut self, index: usize) -> Result<Card, SelectionError> {
        if self.phase != Phase::Respond {
            return Err(SelectionError::WrongPhase(self.phase));
        }
        let card = self
            .enemy_plan
            .remove(index)
            .ok_or(SelectionError::UnknownEnemyAction(index))?;

        info!(card = %card.id, "enemy action disabled");
        self.refresh_schedule();
        Ok(card)
    }

    /// Go back from Respond to Select. Allowed once per battle.
    pub fn rewind(&mut self) -> Result<(), PhaseError> {
        self.require(Phase::Respond)?;
        if self.rewind_used {
            return Err(PhaseError::RewindUsed);
        }
        self.rewind_used = true;
        self.phase = Phase::Select;
        info!(turn = self.turn, "rewound to select");
        Ok(())
    }

    /// Commit the schedule and enter Resolve.
    ///
    /// Pays overdrive and energy. With nothing queued the battle returns to
    /// Select instead.
    pub fn confirm(&mut self) -> Result<EventBatch, PhaseError> {
        self.require(Phase::Respond)?;
        self.refresh_schedule();

        if self.queue.is_empty() {
            warn!(turn = self.turn, "confirm with empty queue, back to select");
            self.phase = Phase::Select;
            return Err(PhaseError::EmptyQueue);
        }

        let mut events = EventBatch::new();
        let slot_cost = self.config.ether_slot_cost;

        if self.overdrive_requested {
            self.pay_overdrive(Side::Player, slot_cost, &mut events);
        }
        if self.enemy_plan.overdrive {
            self.pay_overdrive(Side::Enemy, slot_cost, &mut events);
        }

        let spent = self.selected_energy();
        let player = &mut self.combatants[Side::Player];
        player.energy = (player.energy - spent).max(0);
        let enemy_spent: i32 = self.enemy_plan.actions.iter().map(|c| c.energy_cost).sum();
        let enemy = &mut self.combatants[Side::Enemy];
        enemy.energy = (enemy.energy - enemy_spent).max(0);

        let frozen = self.scheduler.commit();
        self.snapshot = self.queue.iter().cloned().collect();
        self.cursor = None;
        self.accumulator.reset();
        self.resolved.clear();
        self.phase = Phase::Resolve;

        info!(turn = self.turn, actions = self.queue.len(), frozen, "resolution started");
        Ok(events)
    }

    fn pay_overdrive(&mut self, side: Side, slot_cost: i64, events: &mut EventBatch) {
        let combatant = &mut self.combatants[side];
        if combatant.ether_slots(slot_cost) < 1 {
            warn!(%side, ether = combatant.ether, "overdrive skipped, no ether slot");
            return;
        }
        combatant.ether -= slot_cost;
        combatant.overdrive_active = true;
        info!(%side, ether = combatant.ether, "overdrive");
        events.push(
            BattleEvent::new(side, EventKind::Overdrive)
                .with_value(slot_cost)
                .with_value(combatant.ether)
                .with_message(format!("{} enters overdrive", combatant.name)),
        );
    }

    // === Resolve ===

    /// Resolve the next queued action.
    ///
    /// When the queue runs out the turn is closed in the same call: ether is
    /// banked and settled, carry effects are collected and the next turn
    /// starts. If either side's hp reaches zero the rest of the queue is
    /// abandoned and the battle ends.
    pub fn advance(&mut self) -> Result<StepReport, PhaseError> {
        if self.phase.is_terminal() {
            return Err(PhaseError::BattleOver);
        }
        self.require(Phase::Resolve)?;

        let turn = self.turn;
        let mut events = Vec::new();
        self.repair_queue(&mut events);

        let next = self.cursor.map_or(0, |c| c + 1);
        let Some(action) = self.queue.get(next).cloned() else {
            self.close_turn(&mut events);
            return Ok(self.report(turn, None, ApplyOutcome::default(), events, true));
        };
        self.cursor = Some(next);

        let outcome = self.execute(&action, &mut events);

        let defeated = Side::BOTH.iter().any(|&s| self.combatants[s].is_defeated());
        let exhausted = next + 1 >= self.queue.len();
        if defeated || exhausted {
            if defeated && !exhausted {
                info!(abandoned = self.queue.len() - next - 1, "hp reached zero, queue abandoned");
            }
            self.close_turn(&mut events);
        }

        Ok(self.report(turn, Some(action), outcome, events, defeated || exhausted))
    }

    fn report(
        &self,
        turn: u32,
        action: Option<ScheduledAction>,
        outcome: ApplyOutcome,
        events: Vec<BattleEvent>,
        turn_ended: bool,
    ) -> StepReport {
        StepReport {
            turn,
            action,
            dealt: outcome.dealt,
            taken: outcome.taken,
            hits_completed: outcome.hits_completed,
            events,
            turn_ended,
            phase: self.phase,
        }
    }

    /// Rebuild the live queue from the confirm snapshot if it lost entries
    /// it should still hold.
    fn repair_queue(&mut self, events: &mut Vec<BattleEvent>) {
        let executed = self.cursor.map_or(0, |c| c + 1);
        let inconsistent = executed > self.queue.len() || (self.queue.is_empty() && !self.snapshot.is_empty());
        if !inconsistent {
            return;
        }

        self.queue = self.snapshot.iter().cloned().collect();
        if executed > self.queue.len() {
            self.cursor = self.queue.len().checked_sub(1);
        }

        warn!(turn = self.turn, restored = self.queue.len(), executed, "resolve queue rebuilt from snapshot");
        events.push(
            BattleEvent::new(Side::Player, EventKind::Recovery)
                .with_value(self.queue.len() as i64)
                .with_value(executed as i64)
                .with_message("queue restored from snapshot"),
        );
    }

    fn execute(&mut self, action: &ScheduledAction, events: &mut Vec<BattleEvent>) -> ApplyOutcome {
        let actor = action.actor;
        let view = &action.view;

        if !action.ghost {
            self.combatants[actor].record_card_use(view.id());
            if actor == Side::Player {
                self.resolved.push(view.clone());
            }
        }
        self.accumulator.record(actor, view, action.ghost, &self.config);

        let mut ctx = ResolveContext::new(&self.config, &mut self.rng);
        let outcome = CombatResolver::apply(actor, view, &mut self.combatants, &mut ctx);
        debug!(
            %actor,
            card = view.name(),
            sp = action.sp,
            dealt = outcome.dealt,
            taken = outcome.taken,
            "action resolved"
        );
        events.extend(outcome.events.iter().cloned());

        if let Some(effect) = view.special() {
            self.apply_timeline_effect(effect, action, events);
        }
        outcome
    }

    fn apply_timeline_effect(&mut self, effect: SpecialEffect, action: &ScheduledAction, events: &mut Vec<BattleEvent>) {
        let actor = action.actor;
        let target = actor.opponent();
        let name = action.view.name();

        match effect {
            SpecialEffect::Disrupt => {
                let removed = self
                    .scheduler
                    .disable_window(&mut self.queue, self.cursor, action.sp, target);
                if target == Side::Enemy && !removed.is_empty() {
                    self.enemy_plan.perturbed = true;
                }
                events.push(
                    BattleEvent::new(actor, EventKind::Stun)
                        .with_card(name)
                        .with_value(removed.len() as i64)
                        .with_message(format!("{} stuns {} action(s)", name, removed.len())),
                );
            }
            SpecialEffect::Echo if !action.ghost => {
                let ghost = self
                    .scheduler
                    .insert_ghost(&mut self.queue, self.cursor, actor, &action.view, action.sp);
                events.push(
                    BattleEvent::new(actor, EventKind::Ghost)
                        .with_card(name)
                        .with_value(ghost.sp)
                        .with_message(format!("{} echoes at {}", name, ghost.sp)),
                );
            }
            SpecialEffect::Stagger => {
                let moved = self.scheduler.stagger(&mut self.queue, self.cursor, target);
                events.push(
                    BattleEvent::new(actor, EventKind::Stagger)
                        .with_card(name)
                        .with_value(moved as i64)
                        .with_message(format!("{} staggers {} action(s)", name, moved)),
                );
            }
            SpecialEffect::Freeze => {
                self.scheduler.freeze(self.config.freeze_uses);
                events.push(
                    BattleEvent::new(actor, EventKind::Freeze)
                        .with_card(name)
                        .with_value(self.config.freeze_uses)
                        .with_message("next schedule keeps submission order"),
                );
            }
            _ => {}
        }
    }

    /// Turn-end bookkeeping: burn, ether, carry, then next turn or Post.
    fn close_turn(&mut self, events: &mut Vec<BattleEvent>) {
        let hp_ended = Side::BOTH.iter().any(|&s| self.combatants[s].is_defeated());
        if !hp_ended {
            self.tick_burn(events);
        }

        let settlement = self.bank_ether(events);
        self.carry = TurnCarryEffects::collect(&self.resolved);

        for side in Side::BOTH {
            self.combatants[side].end_turn();
        }
        self.scheduler.end_turn();
        self.queue.clear();
        self.snapshot = Vector::new();
        self.cursor = None;

        let player_down = self.combatants[Side::Player].is_defeated();
        let enemy_down = self.combatants[Side::Enemy].is_defeated();
        let ending = if player_down {
            Some((BattleResult::Defeat, OutcomeReason::Hp))
        } else if enemy_down {
            Some((BattleResult::Victory, OutcomeReason::Hp))
        } else if settlement.enemy_depleted {
            Some((BattleResult::Victory, OutcomeReason::EtherDepleted))
        } else {
            None
        };

        match ending {
            Some((result, reason)) => self.finish(result, reason),
            None => self.start_turn(),
        }
    }

    fn tick_burn(&mut self, events: &mut Vec<BattleEvent>) {
        for side in Side::BOTH {
            let combatant = &mut self.combatants[side];
            let stacks = combatant.token_stacks(BURN);
            if stacks == 0 {
                continue;
            }
            let lost = combatant.lose_hp(stacks as i32);
            combatant.decay_token(BURN);
            events.push(
                BattleEvent::new(side, EventKind::Burn)
                    .with_value(stacks)
                    .with_value(lost)
                    .with_message(format!("{} burns for {}", combatant.name, lost)),
            );
        }
    }

    fn bank_ether(&mut self, events: &mut Vec<BattleEvent>) -> Settlement {
        let mut batch = EventBatch::new();
        let mut gains = SideMap::with_value(0i64);

        for side in Side::BOTH {
            let cards = self.accumulator.cards_played(side);
            let relic_multiplier = match side {
                Side::Player => self.relics.multiplier(cards),
                Side::Enemy => 1.0,
            };
            let combo = self.combos[side].as_ref().map(|c| c.name);
            let bank = EtherEconomy::bank(
                side,
                &mut self.combatants[side],
                combo,
                self.accumulator.total(side),
                relic_multiplier,
                &self.config,
            );
            EtherEconomy::bank_events(&bank, &mut batch);
            gains[side] = bank.gain;
        }

        let settlement = EtherEconomy::settle(&mut self.combatants, gains[Side::Player], gains[Side::Enemy]);
        if let Some(event) = EtherEconomy::settlement_event(&settlement, &self.combatants) {
            batch.push(event);
        }
        events.extend(batch);
        self.accumulator.reset();
        settlement
    }

    fn finish(&mut self, result: BattleResult, reason: OutcomeReason) {
        self.phase = Phase::Post;
        if self.outcome.is_some() {
            return;
        }

        let player = &self.combatants[Side::Player];
        let outcome = BattleOutcome {
            result,
            reason,
            final_ether: player.ether,
            ether_delta: player.ether - self.start_ether,
            hp: player.hp,
            max_hp: player.max_hp,
            turn: self.turn,
        };
        info!(?result, ?reason, turn = self.turn, ether = outcome.final_ether, "battle over");

        if let Some(callback) = self.on_outcome.as_mut() {
            callback(&outcome);
        }
        self.outcome = Some(outcome);
    }

    // === Turn setup ===

    fn start_turn(&mut self) {
        self.turn += 1;
        let carry = std::mem::take(&mut self.carry);

        let player = &mut self.combatants[Side::Player];
        let energy = (player.max_energy + carry.energy_delta).max(0);
        player.energy = energy;
        if carry.no_ether {
            player.add_token(NO_ETHER, 1, TokenScope::PerTurn);
        }
        self.budgets = TurnBudgets {
            energy,
            speed: player.max_speed + carry.extra_speed,
            cards: self.max_submit + carry.extra_slots,
        };

        let enemy = &mut self.combatants[Side::Enemy];
        enemy.energy = enemy.max_energy;

        self.deal_hand(&carry);
        self.plan_enemy();
        self.carry = carry;

        self.selected.clear();
        self.overdrive_requested = false;
        self.combos = SideMap::default();
        self.queue.clear();
        self.cursor = None;
        self.phase = Phase::Select;

        info!(
            turn = self.turn,
            hand = self.hand.len(),
            stance = %self.enemy_plan.stance,
            enemy_actions = self.enemy_plan.actions.len(),
            "turn started"
        );
    }

    fn deal_hand(&mut self, carry: &TurnCarryEffects) {
        let mut hand = self.primary.clone();

        if !carry.only_primary {
            let odds = (self.config.secondary_odds + carry.secondary_boost).min(1.0);
            for card in &self.secondary {
                if self.rng.chance(odds) {
                    hand.push(card.clone());
                }
            }
        }

        for id in &carry.guaranteed {
            if hand.iter().any(|c| &c.id == id) {
                continue;
            }
            match self.catalog.get(id) {
                Some(card) => hand.push(card.clone()),
                None => debug!(card = %id, "guaranteed card missing from catalog"),
            }
        }

        self.hand = hand;
    }

    fn plan_enemy(&mut self) {
        let stance = match self.pinned_stance {
            Some(stance) => stance,
            None => Stance::roll(&mut self.rng, &self.config.stance_weights),
        };

        let enemy = &self.combatants[Side::Enemy];
        let request = PlanRequest::new(stance, self.config.enemy_max_cards, enemy.max_speed, enemy.max_energy)
            .with_units(self.enemy_units);
        let actions = self.planner.plan(&self.enemy_deck, &request);

        let slots = enemy.ether_slots(self.config.ether_slot_cost);
        let mut plan = EnemyPlan::new(stance, actions);
        plan.overdrive = should_overdrive(stance, &plan.actions, slots, self.turn);
        self.enemy_plan = plan;
    }

    // === Scheduling ===

    /// Recompute combos and the merged schedule from the current selection
    /// and enemy plan. Only valid while planning.
    fn refresh_schedule(&mut self) {
        let player_cards: Vec<(u32, Card)> = self
            .selected
            .iter()
            .map(|&i| (i as u32, self.hand[i].clone()))
            .collect();
        let enemy_cards: Vec<(u32, Card)> = self
            .enemy_plan
            .actions
            .iter()
            .enumerate()
            .map(|(i, c)| (i as u32, c.clone()))
            .collect();

        let plain: Vec<Card> = player_cards.iter().map(|(_, c)| c.clone()).collect();
        let player_combo = ComboDetector::classify(&plain);
        let enemy_combo = ComboDetector::classify(&self.enemy_plan.actions);

        let player_views = TraitPipeline::enhance_set(
            &player_cards,
            player_combo.as_ref(),
            &self.combatants[Side::Player].card_usage,
        );
        let enemy_views = TraitPipeline::enhance_set(
            &enemy_cards,
            enemy_combo.as_ref(),
            &self.combatants[Side::Enemy].card_usage,
        );

        self.queue = self.scheduler.merge(
            &player_views,
            &enemy_views,
            self.combatants[Side::Player].agility,
            self.combatants[Side::Enemy].agility,
        );
        self.combos = SideMap::new(player_combo, enemy_combo);
    }

    // === Phase guards ===

    fn require(&self, expected: Phase) -> Result<(), PhaseError> {
        if self.phase == Phase::Post {
            return Err(PhaseError::BattleOver);
        }
        if self.phase != expected {
            warn!(%expected, actual = %self.phase, "rejected phase transition");
            return Err(PhaseError::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    fn require_planning(&self) -> Result<(), PhaseError> {
        if self.phase.is_planning() {
            return Ok(());
        }
        self.require(Phase::Select)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{EnemyInit, PlayerInit};
    use crate::cards::CardId;

    fn catalog() -> CardCatalog {
        CardCatalog::from_cards([
            Card::attack("strike", "Strike", 1, 5, 10),
            Card::attack("jab", "Jab", 1, 4, 3),
            Card::defense("guard", "Guard", 1, 6, 5),
            Card::attack("slam", "Slam", 3, 20, 12),
            Card::attack("claw", "Claw", 1, 8, 4),
        ])
    }

    fn ids(list: &[&str]) -> Vec<CardId> {
        list.iter().map(|s| CardId::new(*s)).collect()
    }

    fn controller(primary: &[&str], enemy_deck: &[&str]) -> TurnController {
        let init = BattleInit::new(
            PlayerInit {
                primary: ids(primary),
                ..PlayerInit::default()
            },
            EnemyInit {
                deck: ids(enemy_deck),
                stance: Some(Stance::Aggressive),
                ..EnemyInit::default()
            },
        );
        TurnController::new(
            &init,
            catalog(),
            &RelicCatalog::new(),
            BattleConfig::default(),
            GameRng::new(3),
        )
    }

    #[test]
    fn test_new_starts_turn_one() {
        let c = controller(&["strike", "guard", "ghost-card"], &["claw"]);
        assert_eq!(c.phase(), Phase::Select);
        assert_eq!(c.turn(), 1);
        // Unknown ids are dropped
        assert_eq!(c.hand().len(), 2);
        assert_eq!(c.enemy_plan().actions.len(), 1);
        assert_eq!(c.budgets().energy, 6);
    }

    #[test]
    fn test_toggle_rejects_over_budget_without_change() {
        let mut c = controller(&["slam", "slam", "jab"], &[]);
        assert_eq!(c.toggle_select(0), Ok(true));
        // 40 speed > 30
        let err = c.toggle_select(1).unwrap_err();
        assert_eq!(err.budget(), Some(BudgetKind::Speed));
        assert_eq!(c.selected(), &[0]);

        assert_eq!(c.toggle_select(0), Ok(false));
        assert!(c.selected().is_empty());
        assert_eq!(c.toggle_select(9), Err(SelectionError::UnknownCard(9)));
    }

    #[test]
    fn test_confirm_with_empty_queue_returns_to_select() {
        let mut c = controller(&["strike"], &[]);
        c.submit().unwrap();
        assert_eq!(c.confirm(), Err(PhaseError::EmptyQueue));
        assert_eq!(c.phase(), Phase::Select);
    }

    #[test]
    fn test_rewind_only_once() {
        let mut c = controller(&["strike"], &[]);
        c.toggle_select(0).unwrap();
        c.submit().unwrap();
        c.rewind().unwrap();
        assert_eq!(c.phase(), Phase::Select);
        c.submit().unwrap();
        assert_eq!(c.rewind(), Err(PhaseError::RewindUsed));
        assert_eq!(c.phase(), Phase::Respond);
    }

    #[test]
    fn test_advance_outside_resolve() {
        let mut c = controller(&["strike"], &[]);
        assert_eq!(
            c.advance(),
            Err(PhaseError::WrongPhase {
                expected: Phase::Resolve,
                actual: Phase::Select
            })
        );
    }

    #[test]
    fn test_repair_rebuilds_queue_from_snapshot() {
        let mut c = controller(&["strike", "jab"], &[]);
        c.toggle_select(0).unwrap();
        c.toggle_select(1).unwrap();
        c.submit().unwrap();
        c.confirm().unwrap();

        c.queue.clear();
        let report = c.advance().unwrap();
        assert_eq!(report.events[0].kind, EventKind::Recovery);
        assert!(report.action.is_some());
        assert_eq!(c.pending().len(), 1);
    }

    #[test]
    fn test_outcome_callback_fires_once() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let calls = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&calls);
        let mut c = controller(&["strike"], &[]).with_outcome_callback(move |_| *seen.borrow_mut() += 1);

        c.combatants[Side::Enemy].hp = 5;
        c.toggle_select(0).unwrap();
        c.submit().unwrap();
        c.confirm().unwrap();
        let report = c.advance().unwrap();

        assert_eq!(report.phase, Phase::Post);
        assert!(c.outcome().unwrap().is_victory());
        assert_eq!(c.advance(), Err(PhaseError::BattleOver));
        c.finish(BattleResult::Defeat, OutcomeReason::Hp);
        assert_eq!(*calls.borrow(), 1);
        assert!(c.outcome().unwrap().is_victory());
    }
}
