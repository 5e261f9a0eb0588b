//! Battle sides and per-side data storage.
//!
//! ## Side
//!
//! A battle always has exactly two sides: the player and a single adversary.
//! Multi-unit encounters are still one `Enemy` side whose planner is given a
//! wider budget.
//!
//! ## SideMap
//!
//! Fixed two-slot storage indexed by `Side`, used wherever both combatants
//! carry the same kind of data (turn accumulators, combo usage counts).

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two combatants in a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// The human-controlled side.
    Player,
    /// The planner-controlled adversary.
    Enemy,
}

impl Side {
    /// Both sides, player first.
    pub const BOTH: [Side; 2] = [Side::Player, Side::Enemy];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    /// Slot index (player = 0, enemy = 1).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Enemy => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Enemy => write!(f, "enemy"),
        }
    }
}

/// Per-side data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use ether_duel::core::{Side, SideMap};
///
/// let mut gains: SideMap<i64> = SideMap::with_value(0);
/// gains[Side::Enemy] += 15;
///
/// assert_eq!(gains[Side::Player], 0);
/// assert_eq!(gains[Side::Enemy], 15);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create from explicit player and enemy values.
    pub fn new(player: T, enemy: T) -> Self {
        Self { data: [player, enemy] }
    }

    /// Create with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(value.clone(), value)
    }

    /// Create with values from a factory function.
    pub fn from_fn(factory: impl Fn(Side) -> T) -> Self {
        Self::new(factory(Side::Player), factory(Side::Enemy))
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        &self.data[side.index()]
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        &mut self.data[side.index()]
    }

    /// Mutable references to both entries at once: (`side`, opponent).
    pub fn pair_mut(&mut self, side: Side) -> (&mut T, &mut T) {
        let [player, enemy] = &mut self.data;
        match side {
            Side::Player => (player, enemy),
            Side::Enemy => (enemy, player),
        }
    }

    /// Iterate over (Side, &T) pairs, player first.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::BOTH.into_iter().zip(self.data.iter())
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Player.opponent(), Side::Enemy);
        assert_eq!(Side::Enemy.opponent(), Side::Player);
        assert_eq!(format!("{}", Side::Enemy), "enemy");
    }

    #[test]
    fn test_side_ordering_player_first() {
        assert!(Side::Player < Side::Enemy);
    }

    #[test]
    fn test_side_map_pair_mut() {
        let mut map = SideMap::new(1, 2);
        {
            let (mine, theirs) = map.pair_mut(Side::Enemy);
            *mine += 10;
            *theirs += 100;
        }
        assert_eq!(map[Side::Enemy], 12);
        assert_eq!(map[Side::Player], 101);
    }

    #[test]
    fn test_side_map_iter() {
        let map = SideMap::from_fn(|s| s.index() * 10);
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(Side::Player, &0), (Side::Enemy, &10)]);
    }

    #[test]
    fn test_side_map_serialization() {
        let map = SideMap::new(3i64, 4i64);
        let json = serde_json::to_string(&map).unwrap();
        let back: SideMap<i64> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, back);
    }
}
