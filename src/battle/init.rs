//! Battle initialization payload.
//!
//! Consumed once by `TurnController::new`. Missing optional fields fall
//! back to `BattleConfig` defaults; card and relic ids are resolved against
//! the catalogs and unknown ids are dropped.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::combatant::{Combatant, StatusToken};
use crate::core::{BattleConfig, SideMap};
use crate::planner::Stance;

/// Player side of the payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerInit {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    /// Defaults to `max_energy`.
    pub energy: Option<i32>,
    pub max_energy: Option<i32>,
    pub block: i32,
    pub strength: i32,
    pub agility: i32,
    pub insight: i32,
    /// Falls back to `BattleInit::starting_ether`.
    pub ether_points: Option<i64>,
    pub max_speed: Option<i32>,
    pub max_submit: Option<usize>,
    pub tokens: Vec<StatusToken>,
    /// Always dealt.
    pub primary: Vec<CardId>,
    /// Dealt by chance each turn.
    pub secondary: Vec<CardId>,
    pub relics: Vec<String>,
}

impl Default for PlayerInit {
    fn default() -> Self {
        Self {
            name: "Player".to_string(),
            hp: 50,
            max_hp: 50,
            energy: None,
            max_energy: None,
            block: 0,
            strength: 0,
            agility: 0,
            insight: 0,
            ether_points: None,
            max_speed: None,
            max_submit: None,
            tokens: Vec::new(),
            primary: Vec::new(),
            secondary: Vec::new(),
            relics: Vec::new(),
        }
    }
}

/// Enemy side of the payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyInit {
    pub name: String,
    pub deck: Vec<CardId>,
    pub hp: i32,
    pub max_hp: i32,
    pub ether_points: i64,
    pub ether_capacity: Option<i64>,
    pub shroud: i32,
    pub max_speed: Option<i32>,
    /// Units in a multi-enemy encounter.
    pub units: u32,
    /// Fixes the stance instead of rolling it each turn.
    pub stance: Option<Stance>,
}

impl Default for EnemyInit {
    fn default() -> Self {
        Self {
            name: "Enemy".to_string(),
            deck: Vec::new(),
            hp: 40,
            max_hp: 40,
            ether_points: 0,
            ether_capacity: None,
            shroud: 0,
            max_speed: None,
            units: 1,
            stance: None,
        }
    }
}

/// The full initialization payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleInit {
    pub player: PlayerInit,
    pub enemy: EnemyInit,
    /// Player ether when the player payload carries none.
    pub starting_ether: i64,
}

impl BattleInit {
    pub fn new(player: PlayerInit, enemy: EnemyInit) -> Self {
        Self {
            player,
            enemy,
            starting_ether: 0,
        }
    }

    /// Build both combatant records.
    #[must_use]
    pub fn combatants(&self, config: &BattleConfig) -> SideMap<Combatant> {
        let p = &self.player;
        let max_energy = p.max_energy.unwrap_or(config.max_energy);
        let mut player = Combatant::new(p.name.clone(), p.max_hp)
            .with_budgets(max_energy, p.max_speed.unwrap_or(config.max_speed))
            .with_ether(p.ether_points.unwrap_or(self.starting_ether));
        player.hp = p.hp.clamp(0, player.max_hp);
        player.energy = p.energy.unwrap_or(max_energy).max(0);
        player.block = p.block.max(0);
        player.strength = p.strength;
        player.agility = p.agility;
        player.insight = p.insight;
        player.tokens = p.tokens.iter().cloned().collect();

        let e = &self.enemy;
        let mut enemy = Combatant::new(e.name.clone(), e.max_hp)
            .with_budgets(config.enemy_max_energy, e.max_speed.unwrap_or(config.max_speed))
            .with_ether(e.ether_points);
        enemy.hp = e.hp.clamp(0, enemy.max_hp);
        enemy.shroud = e.shroud;
        enemy.ether_capacity = e.ether_capacity;
        if let Some(cap) = enemy.ether_capacity {
            enemy.ether = enemy.ether.min(cap.max(0));
        }

        SideMap::new(player, enemy)
    }
}
