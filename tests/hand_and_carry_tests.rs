//! Hand dealing, turn carry effects and relic tests.
//!
//! Secondary-card draws go through the injected `RandomSource`, so most of
//! these tests script the rolls instead of relying on a seed.

use std::collections::VecDeque;

use ether_duel::battle::{BattleInit, EnemyInit, PlayerInit, TurnController};
use ether_duel::cards::{Card, CardCatalog, CardId, TraitTag};
use ether_duel::combat::EventKind;
use ether_duel::core::{BattleConfig, GameRng, RandomSource, Side};
use ether_duel::ether::{Relic, RelicCatalog, RelicEffect};
use ether_duel::planner::Stance;

/// Replays fixed rolls, then keeps returning a high roll.
struct Scripted {
    rolls: VecDeque<f64>,
}

impl Scripted {
    fn new(rolls: &[f64]) -> Self {
        Self {
            rolls: rolls.iter().copied().collect(),
        }
    }
}

impl RandomSource for Scripted {
    fn next_f64(&mut self) -> f64 {
        self.rolls.pop_front().unwrap_or(0.99)
    }
}

fn catalog() -> CardCatalog {
    CardCatalog::from_cards([
        Card::attack("strike", "Strike", 1, 5, 10),
        Card::attack("recall", "Recall", 1, 3, 2).with_trait(TraitTag::Recall),
        Card::defense("surge", "Surge", 1, 3, 4).with_trait(TraitTag::Surge),
        Card::attack("void", "Void", 2, 3, 2).with_trait(TraitTag::Void),
        Card::attack("focus", "Focus", 2, 3, 2).with_trait(TraitTag::Focus),
        Card::attack("lucky", "Lucky", 2, 3, 2).with_trait(TraitTag::Lucky),
        Card::attack("drain", "Drain", 3, 3, 2).with_trait(TraitTag::Drain),
        Card::defense("sprint", "Sprint", 2, 3, 2)
            .with_trait(TraitTag::Haste)
            .with_trait(TraitTag::Expand),
    ])
}

fn ids(list: &[&str]) -> Vec<CardId> {
    list.iter().map(|s| CardId::new(*s)).collect()
}

fn init(primary: &[&str], secondary: &[&str]) -> BattleInit {
    BattleInit::new(
        PlayerInit {
            primary: ids(primary),
            secondary: ids(secondary),
            ..PlayerInit::default()
        },
        EnemyInit {
            stance: Some(Stance::Balanced),
            ether_points: 1_000,
            ..EnemyInit::default()
        },
    )
}

fn hand_ids<R: RandomSource>(battle: &TurnController<R>) -> Vec<&str> {
    battle.hand().iter().map(|c| c.id.as_str()).collect()
}

fn play_turn<R: RandomSource>(battle: &mut TurnController<R>, picks: &[usize]) -> Vec<ether_duel::combat::BattleEvent> {
    for &index in picks {
        battle.toggle_select(index).unwrap();
    }
    battle.submit().unwrap();
    battle.confirm().unwrap();

    let mut events = Vec::new();
    loop {
        let report = battle.advance().unwrap();
        events.extend(report.events);
        if report.turn_ended {
            return events;
        }
    }
}

#[test]
fn test_recall_and_surge_carry_into_next_turn() {
    let config = BattleConfig::default().with_secondary_odds(0.5);
    // Turn 1 draws the secondary card, turn 2 misses it
    let rng = Scripted::new(&[0.0, 0.9]);
    let mut battle = TurnController::new(&init(&["surge"], &["recall"]), catalog(), &RelicCatalog::new(), config, rng);
    assert_eq!(hand_ids(&battle), vec!["surge", "recall"]);

    play_turn(&mut battle, &[0, 1]);

    assert_eq!(battle.turn(), 2);
    assert_eq!(battle.carry().guaranteed, ids(&["recall"]));
    assert_eq!(battle.carry().energy_delta, 1);
    assert_eq!(battle.budgets().energy, 7);
    assert_eq!(battle.combatant(Side::Player).energy, 7);
    assert_eq!(hand_ids(&battle), vec!["surge", "recall"]);
}

#[test]
fn test_guaranteed_card_not_duplicated() {
    let config = BattleConfig::default().with_secondary_odds(0.5);
    let rng = Scripted::new(&[0.0, 0.0]);
    let mut battle = TurnController::new(&init(&["surge"], &["recall"]), catalog(), &RelicCatalog::new(), config, rng);

    play_turn(&mut battle, &[1]);
    assert_eq!(hand_ids(&battle), vec!["surge", "recall"]);
}

#[test]
fn test_void_suppresses_next_bank() {
    let mut battle = TurnController::new(
        &init(&["void", "strike"], &[]),
        catalog(),
        &RelicCatalog::new(),
        BattleConfig::default(),
        GameRng::new(1),
    );

    play_turn(&mut battle, &[0]);
    assert_eq!(battle.combatant(Side::Player).ether, 10);
    assert!(battle.carry().no_ether);
    assert_eq!(battle.combatant(Side::Player).token_stacks("no_ether"), 1);

    let events = play_turn(&mut battle, &[1]);
    assert!(events
        .iter()
        .any(|e| e.kind == EventKind::NoEther && e.actor == Side::Player));
    assert_eq!(battle.combatant(Side::Player).ether, 10);

    // The token lasts one turn
    assert_eq!(battle.combatant(Side::Player).token_stacks("no_ether"), 0);
    play_turn(&mut battle, &[1]);
    assert_eq!(battle.combatant(Side::Player).ether, 20);
}

#[test]
fn test_focus_deals_only_primary() {
    let config = BattleConfig::default().with_secondary_odds(1.0);
    let mut battle = TurnController::new(
        &init(&["focus"], &["strike"]),
        catalog(),
        &RelicCatalog::new(),
        config,
        GameRng::new(1),
    );
    assert_eq!(hand_ids(&battle), vec!["focus", "strike"]);

    play_turn(&mut battle, &[0]);
    assert!(battle.carry().only_primary);
    assert_eq!(hand_ids(&battle), vec!["focus"]);
}

#[test]
fn test_lucky_raises_secondary_odds() {
    let config = BattleConfig::default().with_secondary_odds(0.5);
    // Turn 1 misses; turn 2 rolls 0.6, under 0.5 + 0.25
    let rng = Scripted::new(&[0.9, 0.6]);
    let mut battle = TurnController::new(&init(&["lucky"], &["strike"]), catalog(), &RelicCatalog::new(), config, rng);
    assert_eq!(hand_ids(&battle), vec!["lucky"]);

    play_turn(&mut battle, &[0]);
    assert_eq!(battle.carry().secondary_boost, 0.25);
    assert_eq!(hand_ids(&battle), vec!["lucky", "strike"]);
}

#[test]
fn test_drain_haste_and_expand_budgets() {
    let mut battle = TurnController::new(
        &init(&["drain", "sprint"], &[]),
        catalog(),
        &RelicCatalog::new(),
        BattleConfig::default(),
        GameRng::new(1),
    );
    assert_eq!(battle.budgets().cards, 5);

    play_turn(&mut battle, &[0, 1]);
    let budgets = battle.budgets();
    assert_eq!(budgets.energy, 5);
    assert_eq!(budgets.speed, 35);
    assert_eq!(budgets.cards, 6);
}

#[test]
fn test_secondary_never_dealt_at_zero_odds() {
    let config = BattleConfig::default().with_secondary_odds(0.0);
    let battle = TurnController::new(
        &init(&["strike"], &["recall", "surge"]),
        catalog(),
        &RelicCatalog::new(),
        config,
        GameRng::new(9),
    );
    assert_eq!(hand_ids(&battle), vec!["strike"]);
}

#[test]
fn test_amplifier_relic_spent_on_first_bank() {
    let relics = RelicCatalog::from_relics([Relic::new("prism", "Prism", RelicEffect::EtherAmplifier(2.0))]);
    let mut battle_init = init(&["strike"], &[]);
    battle_init.player.relics = vec!["prism".to_string(), "missing".to_string()];

    let mut battle = TurnController::new(&battle_init, catalog(), &relics, BattleConfig::default(), GameRng::new(1));

    play_turn(&mut battle, &[0]);
    assert_eq!(battle.combatant(Side::Player).ether, 20);

    play_turn(&mut battle, &[0]);
    assert_eq!(battle.combatant(Side::Player).ether, 30);
}

#[test]
fn test_agility_shortens_selection_speed() {
    let mut battle_init = init(&["strike"], &[]);
    battle_init.player.agility = 2;
    let mut battle = TurnController::new(&battle_init, catalog(), &RelicCatalog::new(), BattleConfig::default(), GameRng::new(1));

    let strike = battle.hand()[0].clone();
    // round(5 × 0.8)
    assert_eq!(battle.effective_speed(&strike), 4);
    battle.toggle_select(0).unwrap();
    assert_eq!(battle.selected_speed(), 4);
    assert_eq!(battle.queue()[0].sp, 4);
}
