//! Combat units: the per-battle arena entries
//!
//! A `CombatUnit` is one piece on the board for one battle. Units are kept
//! in a `Vec` indexed by `UnitId` and never removed, so downed units stay
//! around for kill hooks and the final report.

use serde::{Deserialize, Serialize};

use crate::battle::constants::{by_star, LEAP_COOLDOWN_BY_STAR};
use crate::battle::hex::HexCoord;
use crate::battle::status::StatusTable;
use crate::battle::unit_type::{SynergyTag, UnitDefinition, UnitKind};
use crate::core::types::{PlayerId, Side, UnitId};

/// An in-flight leap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leap {
    pub landing: HexCoord,
    pub lands_at: f32,
}

/// Leap bookkeeping for units that can leap
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LeapState {
    /// Simulated time at which the next leap may start
    pub ready_at: f32,
    pub airborne: Option<Leap>,
}

/// One unit in a battle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatUnit {
    pub id: UnitId,
    pub side: Side,
    pub owner: PlayerId,
    pub definition: UnitDefinition,
    pub summoned: bool,

    // Position
    pub position: Option<HexCoord>,
    pub deploy_position: Option<HexCoord>,

    // Health
    pub hp: f32,
    pub max_hp: f32,
    /// False once HP hits zero; the unit leaves the grid at the next death check
    pub alive: bool,
    pub downed_by: Option<UnitId>,

    // Targeting and timers
    pub current_target: Option<UnitId>,
    /// `None` until the first in-range tick against the current target
    pub attack_ready_at: Option<f32>,
    pub last_move_time: f32,

    pub status: StatusTable,

    /// Per-unit crit overrides; `None` uses the battle config
    pub crit_chance: Option<f32>,
    pub crit_multiplier: Option<f32>,

    // Ability state
    pub attack_count: u32,
    pub streak_target: Option<UnitId>,
    pub dash_pending: bool,
    pub leap: LeapState,
    pub invisibility_triggered: bool,

    // Synergy state
    pub clan_triggered: bool,
    pub ranger_stacks: u32,
}

impl CombatUnit {
    pub fn new(
        id: UnitId,
        side: Side,
        owner: PlayerId,
        definition: UnitDefinition,
        position: Option<HexCoord>,
    ) -> Self {
        let hp = definition.health;
        let leap_ready = by_star(&LEAP_COOLDOWN_BY_STAR, definition.star);
        Self {
            id,
            side,
            owner,
            definition,
            summoned: false,
            position,
            deploy_position: position,
            hp,
            max_hp: hp,
            alive: true,
            downed_by: None,
            current_target: None,
            attack_ready_at: None,
            last_move_time: 0.0,
            status: StatusTable::new(),
            crit_chance: None,
            crit_multiplier: None,
            attack_count: 0,
            streak_target: None,
            dash_pending: false,
            leap: LeapState {
                ready_at: leap_ready,
                airborne: None,
            },
            invisibility_triggered: false,
            clan_triggered: false,
            ranger_stacks: 0,
        }
    }

    /// A summoned unit; summons never count toward the survivor total
    pub fn summon(
        id: UnitId,
        side: Side,
        owner: PlayerId,
        definition: UnitDefinition,
        position: HexCoord,
    ) -> Self {
        Self {
            summoned: true,
            ..Self::new(id, side, owner, definition, Some(position))
        }
    }

    /// Restore deploy-time state ahead of a battle
    pub fn reset(&mut self) {
        let fresh = Self::new(
            self.id,
            self.side,
            self.owner,
            self.definition.clone(),
            self.deploy_position,
        );
        *self = Self {
            summoned: self.summoned,
            crit_chance: self.crit_chance,
            crit_multiplier: self.crit_multiplier,
            ..fresh
        };
    }

    /// Give this unit its own crit chance and multiplier
    pub fn with_crit(mut self, chance: f32, multiplier: f32) -> Self {
        self.crit_chance = Some(chance);
        self.crit_multiplier = Some(multiplier);
        self
    }

    pub fn kind(&self) -> UnitKind {
        self.definition.kind
    }

    pub fn name(&self) -> &'static str {
        self.definition.name()
    }

    pub fn star(&self) -> u8 {
        self.definition.star
    }

    pub fn range(&self) -> u32 {
        self.definition.range
    }

    pub fn has_tag(&self, tag: SynergyTag) -> bool {
        self.definition.has_tag(tag)
    }

    /// Alive and on the board
    pub fn is_standing(&self) -> bool {
        self.alive && self.position.is_some()
    }

    /// Standing and visible to enemies
    pub fn is_targetable(&self) -> bool {
        self.is_standing() && !self.status.is_invisible()
    }

    pub fn is_stunned(&self) -> bool {
        self.status.is_stunned()
    }

    pub fn is_airborne(&self) -> bool {
        self.leap.airborne.is_some()
    }

    pub fn is_enemy_of(&self, other: &CombatUnit) -> bool {
        self.side != other.side
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp <= 0.0 {
            0.0
        } else {
            self.hp / self.max_hp
        }
    }

    /// Heal up to max HP, returning the amount restored
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.alive || amount <= 0.0 {
            return 0.0;
        }
        let before = self.hp;
        self.hp = (self.hp + amount).min(self.max_hp);
        self.hp - before
    }

    /// Raise max HP by a fraction, healing by the same amount
    pub fn scale_max_hp(&mut self, fraction: f32) {
        let extra = self.max_hp * fraction;
        self.max_hp += extra;
        self.hp += extra;
    }

    /// Apply final damage; returns true if this hit downed the unit
    ///
    /// Non-positive and NaN amounts are ignored.
    pub fn take_damage(&mut self, amount: f32, attacker: Option<UnitId>) -> bool {
        if !self.alive || amount.is_nan() || amount <= 0.0 {
            return false;
        }
        self.hp -= amount;
        if self.hp <= 0.0 {
            self.hp = 0.0;
            self.alive = false;
            self.downed_by = attacker;
            return true;
        }
        false
    }

    /// Switch targets, restarting the attack wind-up if the target changed
    pub fn set_target(&mut self, target: Option<UnitId>) {
        if self.current_target != target {
            self.current_target = target;
            self.attack_ready_at = None;
        }
    }

    /// Effective move interval in seconds
    pub fn move_interval(&self) -> f32 {
        if self.definition.speed > 0.0 {
            1.0 / self.definition.speed
        } else {
            f32::INFINITY
        }
    }
}

/// Star-1 unit at `(row, col)` for module tests
#[cfg(test)]
pub(crate) fn test_unit(id: usize, kind: UnitKind, side: Side, row: i32, col: i32) -> CombatUnit {
    let owner = PlayerId(side.index() as u32 + 1);
    let def = UnitDefinition::new(kind, 1).expect("star 1 is valid");
    CombatUnit::new(UnitId(id), side, owner, def, Some(HexCoord::new(row, col)))
}
