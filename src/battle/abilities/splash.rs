//! Area attacks around the target or the attacker

use crate::battle::hex::HexCoord;
use crate::battle::resolution::{Battlefield, Crit};
use crate::core::types::UnitId;

/// Hit the target, then every other enemy on `cells`
fn strike_with_extras(field: &mut Battlefield, attacker: UnitId, target: UnitId, cells: &[HexCoord]) -> bool {
    let side = field.unit(attacker).side;
    let extras: Vec<UnitId> = cells
        .iter()
        .filter_map(|cell| field.enemy_at(*cell, side))
        .filter(|id| *id != target)
        .collect();

    if field.strike(attacker, target, 1.0, Crit::Roll).is_none() {
        return false;
    }
    for id in extras {
        field.strike(attacker, id, 1.0, Crit::Roll);
    }
    true
}

/// Enemies adjacent to the target take full damage too
pub fn splash(field: &mut Battlefield, attacker: UnitId, target: UnitId) -> bool {
    let Some(center) = field.unit(target).position else {
        return false;
    };
    let cells = field.board.neighbors(center);
    strike_with_extras(field, attacker, target, &cells)
}

/// Enemies adjacent to the attacker take full damage too
pub fn self_splash(field: &mut Battlefield, attacker: UnitId, target: UnitId) -> bool {
    let Some(center) = field.unit(attacker).position else {
        return false;
    };
    let cells = field.board.neighbors(center);
    strike_with_extras(field, attacker, target, &cells)
}

/// Cells next to `target` that lie further from `origin` than the target does
pub fn cone_cells(field: &Battlefield, origin: HexCoord, target: HexCoord) -> Vec<HexCoord> {
    let reach = field.board.distance(origin, target);
    field
        .board
        .neighbors(target)
        .into_iter()
        .filter(|cell| field.board.distance(origin, *cell) > reach)
        .collect()
}

/// Target plus the cells fanning out behind it
pub fn cone(field: &mut Battlefield, attacker: UnitId, target: UnitId) -> bool {
    let (Some(origin), Some(center)) = (field.unit(attacker).position, field.unit(target).position) else {
        return false;
    };
    let cells = cone_cells(field, origin, center);
    strike_with_extras(field, attacker, target, &cells)
}
