//! Combat resolution - applying one scheduled action to both combatants.
//!
//! ## Defense
//!
//! Adds `block + strength` to the actor, marks it defending and overwrites
//! its counter value when the card carries one.
//!
//! ## Attack
//!
//! Resolved once per declared hit:
//!
//! ```text
//! damage = (card damage + strength + empower) × (2 if overdrive)
//! ```
//!
//! Against block, `Crush` doubles the damage for the comparison only.
//! Damage below the block is absorbed and leaves the attacker vulnerable
//! (`1 + remaining block × factor`) for its next incoming hit. Otherwise the
//! block breaks and the rest goes through, scaled by the defender's pending
//! vulnerability, and the defender's counter strikes back. Weapon cards roll
//! a jam check before every hit after the first.
//!
//! The resolver mutates the two records it is handed and returns events;
//! it performs no I/O and owns no state.

use tracing::debug;

use super::event::{BattleEvent, EventBatch, EventKind};
use crate::cards::{CardView, SpecialEffect, TraitTag};
use crate::combatant::{Combatant, TokenScope, BURN, EMPOWER};
use crate::core::{BattleConfig, RandomSource, Side, SideMap};

/// What the resolver needs besides the combatants.
pub struct ResolveContext<'a> {
    pub config: &'a BattleConfig,
    pub rng: &'a mut dyn RandomSource,
}

impl<'a> ResolveContext<'a> {
    pub fn new(config: &'a BattleConfig, rng: &'a mut dyn RandomSource) -> Self {
        Self { config, rng }
    }
}

/// Result of applying one action.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApplyOutcome {
    /// Hp the defender lost.
    pub dealt: i32,
    /// Hp the actor lost to counters.
    pub taken: i32,
    /// Hits that actually landed (0 for defense cards).
    pub hits_completed: u32,
    pub events: EventBatch,
}

/// Applies cards to combatant records.
pub struct CombatResolver;

impl CombatResolver {
    /// Apply `view`, played by `actor`, to both combatants.
    pub fn apply(
        actor: Side,
        view: &CardView,
        combatants: &mut SideMap<Combatant>,
        ctx: &mut ResolveContext<'_>,
    ) -> ApplyOutcome {
        let mut outcome = if view.is_attack() {
            Self::attack(actor, view, combatants, ctx)
        } else {
            Self::defend(actor, view, &mut combatants[actor])
        };

        match view.special() {
            Some(SpecialEffect::Burn(stacks)) if stacks > 0 => {
                let defender = &mut combatants[actor.opponent()];
                defender.add_token(BURN, stacks, TokenScope::Permanent);
                outcome.events.push(
                    BattleEvent::new(actor, EventKind::Burn)
                        .with_card(view.name())
                        .with_value(stacks)
                        .with_value(0)
                        .with_message(format!("{} is set ablaze ({} stacks)", defender.name, stacks)),
                );
            }
            Some(SpecialEffect::Empower(amount)) if amount > 0 => {
                combatants[actor].add_token(EMPOWER, amount, TokenScope::PerUse);
                outcome.events.push(
                    BattleEvent::new(actor, EventKind::Empower)
                        .with_card(view.name())
                        .with_value(amount)
                        .with_message(format!("next attack +{amount} damage")),
                );
            }
            _ => {}
        }

        outcome
    }

    fn defend(actor: Side, view: &CardView, combatant: &mut Combatant) -> ApplyOutcome {
        let gained = (view.block + combatant.strength).max(0);
        combatant.block += gained;
        combatant.is_defending = true;
        if let Some(counter) = view.counter {
            combatant.counter = counter.max(0);
        }

        debug!(%actor, card = view.name(), gained, total = combatant.block, "defense");

        let mut outcome = ApplyOutcome::default();
        outcome.events.push(
            BattleEvent::new(actor, EventKind::Defense)
                .with_card(view.name())
                .with_value(gained)
                .with_value(combatant.block)
                .with_message(format!("{} raises {} block", view.name(), gained)),
        );
        outcome
    }

    fn attack(
        actor: Side,
        view: &CardView,
        combatants: &mut SideMap<Combatant>,
        ctx: &mut ResolveContext<'_>,
    ) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::default();
        let declared = view.hits.max(1);
        let crush = view.has_trait(TraitTag::Crush);
        let (defender, attacker) = combatants.pair_mut(actor.opponent());

        let empower = attacker.consume_token(EMPOWER) as i32;
        let mut base = (view.damage + attacker.strength + empower).max(0);
        if attacker.overdrive_active {
            base *= 2;
        }

        for hit in 0..declared {
            if hit > 0 && view.is_weapon() && ctx.rng.chance(ctx.config.jam_chance) {
                outcome.events.push(
                    BattleEvent::new(actor, EventKind::Out)
                        .with_card(view.name())
                        .with_value(outcome.hits_completed)
                        .with_value(declared)
                        .with_message(format!("{} jams after {} hits", view.name(), hit)),
                );
                break;
            }

            Self::strike(actor, view, base, crush, defender, attacker, ctx.config, &mut outcome);
            outcome.hits_completed += 1;

            if defender.is_defeated() || attacker.is_defeated() {
                break;
            }
        }

        if declared > 1 {
            outcome.events.push(
                BattleEvent::new(actor, EventKind::Multihit)
                    .with_card(view.name())
                    .with_value(outcome.hits_completed)
                    .with_value(declared)
                    .with_message(format!(
                        "{} landed {}/{} hits",
                        view.name(),
                        outcome.hits_completed,
                        declared
                    )),
            );
        }

        outcome
    }

    #[allow(clippy::too_many_arguments)]
    fn strike(
        actor: Side,
        view: &CardView,
        damage: i32,
        crush: bool,
        defender: &mut Combatant,
        attacker: &mut Combatant,
        config: &BattleConfig,
        outcome: &mut ApplyOutcome,
    ) {
        let name = view.name();

        if defender.block > 0 {
            let against_block = if crush { damage * 2 } else { damage };

            if against_block < defender.block {
                defender.block -= against_block;
                let remaining = defender.block;
                let multiplier = 1.0 + f64::from(remaining) * config.vulnerability_factor;
                attacker.make_vulnerable(multiplier, config.vulnerability_turns);

                debug!(%actor, card = name, absorbed = against_block, remaining, multiplier, "blocked");

                outcome.events.push(
                    BattleEvent::new(actor, EventKind::Blocked)
                        .with_card(name)
                        .with_value(against_block)
                        .with_value(remaining)
                        .with_message(format!("{} absorbs {} ({} block left)", defender.name, against_block, remaining)),
                );
                outcome.events.push(
                    BattleEvent::new(actor, EventKind::Vulnerable)
                        .with_card(name)
                        .with_value((multiplier * 100.0).round() as i64)
                        .with_message(format!("{} is exposed (x{:.1})", attacker.name, multiplier)),
                );
                return;
            }

            let consumed = defender.block;
            defender.block = 0;
            let raw = (damage - consumed).max(0);
            // A pending vulnerability is only spent by damage that reaches hp
            let through = if raw > 0 {
                Self::scaled(raw, defender.consume_vulnerability())
            } else {
                0
            };
            let lost = defender.lose_hp(through);
            outcome.dealt += lost;

            debug!(%actor, card = name, consumed, through, hp = defender.hp, "pierce");

            outcome.events.push(
                BattleEvent::new(actor, EventKind::Pierce)
                    .with_card(name)
                    .with_value(consumed)
                    .with_value(through)
                    .with_value(defender.hp)
                    .with_message(format!("{} breaks the guard for {}", name, through)),
            );
            Self::counter(actor, name, through, defender, attacker, outcome);
            return;
        }

        let through = if damage > 0 {
            Self::scaled(damage, defender.consume_vulnerability())
        } else {
            0
        };
        let lost = defender.lose_hp(through);
        outcome.dealt += lost;

        debug!(%actor, card = name, through, hp = defender.hp, "hit");

        outcome.events.push(
            BattleEvent::new(actor, EventKind::Hit)
                .with_card(name)
                .with_value(through)
                .with_value(defender.hp)
                .with_message(format!("{} hits {} for {}", name, defender.name, through)),
        );
        Self::counter(actor, name, through, defender, attacker, outcome);
    }

    fn counter(
        actor: Side,
        name: &str,
        through: i32,
        defender: &Combatant,
        attacker: &mut Combatant,
        outcome: &mut ApplyOutcome,
    ) {
        if defender.counter <= 0 || through <= 0 {
            return;
        }

        let lost = attacker.lose_hp(defender.counter);
        outcome.taken += lost;
        outcome.events.push(
            BattleEvent::new(actor.opponent(), EventKind::Counter)
                .with_card(name)
                .with_value(lost)
                .with_value(attacker.hp)
                .with_message(format!("{} counters for {}", defender.name, lost)),
        );
    }

    fn scaled(damage: i32, multiplier: f64) -> i32 {
        (f64::from(damage) * multiplier).round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardCategory};
    use crate::core::GameRng;

    fn duel() -> SideMap<Combatant> {
        SideMap::new(Combatant::new("hero", 50), Combatant::new("brute", 50))
    }

    fn attack(damage: i32) -> CardView {
        CardView::plain(0, &Card::attack("strike", "Strike", 1, 5, damage))
    }

    fn apply(actor: Side, view: &CardView, combatants: &mut SideMap<Combatant>) -> ApplyOutcome {
        let config = BattleConfig::default();
        let mut rng = GameRng::new(1);
        let mut ctx = ResolveContext::new(&config, &mut rng);
        CombatResolver::apply(actor, view, combatants, &mut ctx)
    }

    fn kinds(outcome: &ApplyOutcome) -> Vec<EventKind> {
        outcome.events.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_defense_adds_block_and_counter() {
        let mut c = duel();
        c[Side::Player].strength = 2;
        let guard = CardView::plain(0, &Card::defense("guard", "Guard", 1, 4, 5).with_counter(3));

        let outcome = apply(Side::Player, &guard, &mut c);
        assert_eq!(c[Side::Player].block, 7);
        assert!(c[Side::Player].is_defending);
        assert_eq!(c[Side::Player].counter, 3);
        assert_eq!(kinds(&outcome), vec![EventKind::Defense]);
    }

    #[test]
    fn test_negative_strength_never_lowers_block() {
        let mut c = duel();
        c[Side::Player].strength = -10;
        c[Side::Player].block = 4;
        let guard = CardView::plain(0, &Card::defense("guard", "Guard", 1, 4, 5));
        apply(Side::Player, &guard, &mut c);
        assert_eq!(c[Side::Player].block, 4);
    }

    #[test]
    fn test_unblocked_hit() {
        let mut c = duel();
        let outcome = apply(Side::Player, &attack(10), &mut c);
        assert_eq!(c[Side::Enemy].hp, 40);
        assert_eq!(outcome.dealt, 10);
        assert_eq!(outcome.hits_completed, 1);
        assert_eq!(kinds(&outcome), vec![EventKind::Hit]);
    }

    #[test]
    fn test_strength_and_overdrive() {
        let mut c = duel();
        c[Side::Player].strength = 2;
        c[Side::Player].overdrive_active = true;
        apply(Side::Player, &attack(5), &mut c);
        assert_eq!(c[Side::Enemy].hp, 36);
    }

    #[test]
    fn test_pierce_with_counter() {
        let mut c = duel();
        c[Side::Enemy].block = 5;
        c[Side::Enemy].counter = 4;

        let outcome = apply(Side::Player, &attack(8), &mut c);
        assert_eq!(c[Side::Enemy].block, 0);
        assert_eq!(c[Side::Enemy].hp, 47);
        assert_eq!(c[Side::Player].hp, 46);
        assert_eq!(outcome.dealt, 3);
        assert_eq!(outcome.taken, 4);
        assert_eq!(kinds(&outcome), vec![EventKind::Pierce, EventKind::Counter]);
    }

    #[test]
    fn test_exact_block_breaks_without_counter() {
        let mut c = duel();
        c[Side::Enemy].block = 8;
        c[Side::Enemy].counter = 4;

        let outcome = apply(Side::Player, &attack(8), &mut c);
        assert_eq!(c[Side::Enemy].block, 0);
        assert_eq!(c[Side::Enemy].hp, 50);
        assert_eq!(c[Side::Player].hp, 50);
        assert_eq!(kinds(&outcome), vec![EventKind::Pierce]);
    }

    #[test]
    fn test_overblock_makes_attacker_vulnerable() {
        let mut c = duel();
        c[Side::Enemy].block = 10;

        let outcome = apply(Side::Player, &attack(6), &mut c);
        assert_eq!(c[Side::Enemy].block, 4);
        assert_eq!(c[Side::Enemy].hp, 50);
        assert_eq!(c[Side::Player].vulnerability, 3.0);
        assert_eq!(kinds(&outcome), vec![EventKind::Blocked, EventKind::Vulnerable]);
        assert_eq!(outcome.events[1].value(0, 0), 300);

        // The exposed attacker takes the next hit tripled, once
        apply(Side::Enemy, &attack(4), &mut c);
        assert_eq!(c[Side::Player].hp, 38);
        apply(Side::Enemy, &attack(4), &mut c);
        assert_eq!(c[Side::Player].hp, 34);
    }

    #[test]
    fn test_crush_only_affects_block_comparison() {
        let mut c = duel();
        c[Side::Enemy].block = 10;
        let crush = CardView::plain(0, &Card::attack("maul", "Maul", 2, 6, 6).with_trait(TraitTag::Crush));

        let outcome = apply(Side::Player, &crush, &mut c);
        // 12 vs 10 breaks the guard, but only 6 - 10 passes: nothing
        assert_eq!(c[Side::Enemy].block, 0);
        assert_eq!(c[Side::Enemy].hp, 50);
        assert_eq!(outcome.dealt, 0);
        assert_eq!(c[Side::Player].vulnerability, 1.0);
    }

    #[test]
    fn test_blocked_out_crush_keeps_vulnerability() {
        let mut c = duel();
        c[Side::Enemy].block = 10;
        c[Side::Enemy].make_vulnerable(3.0, 1);
        let crush = CardView::plain(0, &Card::attack("maul", "Maul", 2, 6, 6).with_trait(TraitTag::Crush));

        let outcome = apply(Side::Player, &crush, &mut c);
        assert_eq!(outcome.dealt, 0);
        assert_eq!(c[Side::Enemy].vulnerability, 3.0);

        // The next hit that lands still takes the multiplier
        apply(Side::Player, &attack(4), &mut c);
        assert_eq!(c[Side::Enemy].hp, 38);
        assert_eq!(c[Side::Enemy].vulnerability, 1.0);
    }

    #[test]
    fn test_zero_damage_hit_keeps_vulnerability() {
        let mut c = duel();
        c[Side::Enemy].make_vulnerable(2.0, 1);
        let outcome = apply(Side::Player, &attack(0), &mut c);
        assert_eq!(outcome.dealt, 0);
        assert_eq!(c[Side::Enemy].vulnerability, 2.0);
    }

    #[test]
    fn test_vulnerability_scales_pierce() {
        let mut c = duel();
        c[Side::Enemy].block = 2;
        c[Side::Enemy].make_vulnerable(1.5, 1);
        apply(Side::Player, &attack(6), &mut c);
        assert_eq!(c[Side::Enemy].hp, 44);
        assert_eq!(c[Side::Enemy].vulnerability, 1.0);
    }

    #[test]
    fn test_multihit_stops_on_defeat() {
        let mut c = duel();
        c[Side::Enemy].hp = 7;
        let flurry = CardView::plain(0, &Card::attack("flurry", "Flurry", 1, 5, 3).with_hits(4));

        let outcome = apply(Side::Player, &flurry, &mut c);
        assert_eq!(c[Side::Enemy].hp, 0);
        assert_eq!(outcome.hits_completed, 3);
        assert_eq!(outcome.dealt, 7);
        let multihit = outcome.events.last().unwrap();
        assert_eq!(multihit.kind, EventKind::Multihit);
        assert_eq!(multihit.values.as_slice(), &[3, 4]);
    }

    #[test]
    fn test_weapon_jam_cuts_hits_short() {
        let mut c = duel();
        let gun = CardView::plain(
            0,
            &Card::attack("gun", "Gun", 1, 5, 2)
                .with_hits(5)
                .with_category(CardCategory::Weapon),
        );

        let config = BattleConfig::default().with_jam_chance(1.0);
        let mut rng = GameRng::new(1);
        let mut ctx = ResolveContext::new(&config, &mut rng);
        let outcome = CombatResolver::apply(Side::Player, &gun, &mut c, &mut ctx);

        assert_eq!(outcome.hits_completed, 1);
        assert_eq!(c[Side::Enemy].hp, 48);
        assert_eq!(
            kinds(&outcome),
            vec![EventKind::Hit, EventKind::Out, EventKind::Multihit]
        );
    }

    #[test]
    fn test_weapon_never_jams_at_zero_chance() {
        let mut c = duel();
        let gun = CardView::plain(
            0,
            &Card::attack("gun", "Gun", 1, 5, 2)
                .with_hits(5)
                .with_category(CardCategory::Weapon),
        );
        let config = BattleConfig::default().with_jam_chance(0.0);
        let mut rng = GameRng::new(1);
        let mut ctx = ResolveContext::new(&config, &mut rng);
        let outcome = CombatResolver::apply(Side::Player, &gun, &mut c, &mut ctx);
        assert_eq!(outcome.hits_completed, 5);
        assert_eq!(c[Side::Enemy].hp, 40);
    }

    #[test]
    fn test_empower_and_burn_specials() {
        let mut c = duel();
        let rally = CardView::plain(
            0,
            &Card::defense("rally", "Rally", 1, 3, 2).with_special(SpecialEffect::Empower(4)),
        );
        let brand = CardView::plain(
            1,
            &Card::attack("brand", "Brand", 1, 3, 5).with_special(SpecialEffect::Burn(2)),
        );

        apply(Side::Player, &rally, &mut c);
        assert_eq!(c[Side::Player].token_stacks(EMPOWER), 4);

        let outcome = apply(Side::Player, &brand, &mut c);
        assert_eq!(c[Side::Enemy].hp, 41);
        assert_eq!(c[Side::Player].token_stacks(EMPOWER), 0);
        assert_eq!(c[Side::Enemy].token_stacks(BURN), 2);
        assert_eq!(kinds(&outcome), vec![EventKind::Hit, EventKind::Burn]);
    }
}
