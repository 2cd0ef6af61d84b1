//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulation tick counter
pub type Tick = u64;

/// Stable identifier for a unit in a battle
///
/// Ids are indices into the battle's unit arena. They are assigned in
/// deployment order and never reused within a battle, so iterating units
/// by ascending id is the canonical processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub usize);

impl UnitId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier for a player (the owner of a roster)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Which half of the board a roster fights from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Deploys without mirroring (rows toward the bottom of the board)
    Home,
    /// Deploys mirrored into the top half
    Away,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Side::Home => 0,
            Side::Away => 1,
        }
    }

    pub fn both() -> [Side; 2] {
        [Side::Home, Side::Away]
    }
}
