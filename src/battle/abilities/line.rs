//! Piercing line: an axe that flies through the target and comes back

use crate::battle::constants::PIERCE_MAX_CELLS;
use crate::battle::hex::HexCoord;
use crate::battle::resolution::{Battlefield, Crit};
use crate::core::types::UnitId;

/// Board cells the axe crosses on its way out, attacker excluded
pub fn axe_path(field: &Battlefield, origin: HexCoord, target: HexCoord, extra: usize) -> Vec<HexCoord> {
    let reach = field.board.distance(origin, target) as usize;
    let len = (reach + extra).min(PIERCE_MAX_CELLS);
    origin
        .ray(&target, len)
        .into_iter()
        .take_while(|cell| field.board.in_bounds(*cell))
        .collect()
}

/// Every enemy on the path is hit once going out and once coming back
pub fn piercing_line(field: &mut Battlefield, attacker: UnitId, target: UnitId) -> bool {
    let (Some(origin), Some(aim)) = (field.unit(attacker).position, field.unit(target).position) else {
        return false;
    };
    let side = field.unit(attacker).side;
    let outbound = axe_path(field, origin, aim, field.unit(attacker).star() as usize);
    let inbound: Vec<HexCoord> = outbound.iter().rev().copied().collect();

    let mut landed = false;
    for cell in outbound.iter().chain(inbound.iter()) {
        if let Some(victim) = field.enemy_at(*cell, side) {
            landed |= field.strike(attacker, victim, 1.0, Crit::Roll).is_some();
        }
    }
    landed
}
