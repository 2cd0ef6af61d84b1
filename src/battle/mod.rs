//! Battle system - deterministic auto-battler combat on a hex board
//!
//! Two rosters deploy onto opposite halves of a small hex board and fight
//! on their own: every unit picks the enemy it can reach soonest, walks
//! until it is in range, and attacks on a cooldown. Unit kinds add special
//! attacks, team synergies add roster-wide modifiers.
//!
//! Key properties:
//! - Same seed, same rosters, same battle (one seeded RNG, fixed unit order)
//! - Grid and unit positions never disagree
//! - Every battle terminates (tick bound)

pub mod abilities;
pub mod board;
pub mod constants;
pub mod execution;
pub mod grid;
pub mod hex;
pub mod pathfinding;
pub mod resolution;
pub mod roster;
pub mod status;
pub mod synergy;
pub mod unit_type;
pub mod units;

// Re-exports for convenient access
pub use abilities::{Ability, Attack, LeapProgress};
pub use board::{HexBoard, UNREACHABLE};
pub use constants::*;
pub use execution::{
    check_battle_end, BattleEvent, BattleEventLog, BattleEventType, BattleOutcome, BattlePhase,
    BattleReport, BattleSnapshot, BattleState, EndReason, UnitSnapshot,
};
pub use grid::Grid;
pub use hex::HexCoord;
pub use pathfinding::{is_in_range, nearest_free_cell, occupied_set, path_steps, path_to_range, CellSet};
pub use resolution::{Battlefield, Bomb, Crit, HitOutcome, SpawnRequest};
pub use roster::{deploy, Roster, RosterEntry, Scenario};
pub use status::{EffectKind, EffectState, StatusTable};
pub use synergy::{BenchGrant, SynergySet, Tier};
pub use unit_type::{star_multiplier, SynergyTag, UnitDefinition, UnitKind};
pub use units::CombatUnit;
