//! Leap: jump onto the most crowded free cell and stun on landing
//!
//! A leap reserves its landing cell for the whole flight so nobody else
//! walks onto it. The leaping unit keeps its old cell until it lands and
//! does nothing else while airborne.

use tracing::info;

use crate::battle::constants::{
    by_star, LEAP_COOLDOWN_BY_STAR, LEAP_SEARCH_RADIUS, LEAP_STUN_RADIUS_BY_STAR, LEAP_STUN_SECONDS,
    LEAP_TRAVEL_SECONDS, TIME_EPSILON,
};
use crate::battle::execution::BattleEventType;
use crate::battle::hex::HexCoord;
use crate::battle::resolution::Battlefield;
use crate::battle::units::Leap;
use crate::core::types::UnitId;

/// What the leap phase did for a unit this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeapProgress {
    /// No leap involved; act normally
    Grounded,
    /// Took off this tick or still in the air
    Airborne,
    /// Came down this tick; the turn is spent
    Landed,
}

/// Free cell within search radius with the most adjacent enemies
///
/// Cells are scanned row-major and the first best cell wins. Cells with no
/// adjacent enemy are never chosen.
pub fn best_landing(field: &Battlefield, unit: UnitId) -> Option<(HexCoord, usize)> {
    let leaper = field.unit(unit);
    let origin = leaper.position?;
    let side = leaper.side;

    let mut best: Option<(HexCoord, usize)> = None;
    for cell in field.board.cells_within(origin, LEAP_SEARCH_RADIUS) {
        if cell == origin || !field.is_open(cell) {
            continue;
        }
        let crowd = field
            .board
            .neighbors(cell)
            .into_iter()
            .filter(|n| {
                field
                    .grid
                    .get(*n)
                    .is_some_and(|id| field.unit(id).side != side && field.unit(id).is_standing())
            })
            .count();
        if crowd > 0 && best.map_or(true, |(_, score)| crowd > score) {
            best = Some((cell, crowd));
        }
    }
    best
}

/// Advance the leap state machine for one unit
pub fn progress(field: &mut Battlefield, unit: UnitId) -> LeapProgress {
    let now = field.now;
    let state = field.unit(unit).leap;

    if let Some(leap) = state.airborne {
        if now + TIME_EPSILON >= leap.lands_at {
            land(field, unit, leap);
            return LeapProgress::Landed;
        }
        return LeapProgress::Airborne;
    }

    if now + TIME_EPSILON < state.ready_at {
        return LeapProgress::Grounded;
    }

    let Some((landing, crowd)) = best_landing(field, unit) else {
        return LeapProgress::Grounded;
    };
    field.reserved.insert(landing);
    field.unit_mut(unit).leap.airborne = Some(Leap {
        landing,
        lands_at: now + LEAP_TRAVEL_SECONDS,
    });
    let name = field.unit(unit).name();
    info!(%unit, %landing, crowd, "leap started");
    field.log(
        BattleEventType::LeapStarted { unit, landing },
        format!("{} {} leaps toward {}", name, unit, landing),
    );
    LeapProgress::Airborne
}

fn land(field: &mut Battlefield, unit: UnitId, leap: Leap) {
    let star = field.unit(unit).star();
    let side = field.unit(unit).side;

    field.reserved.remove(&leap.landing);
    let ready_at = field.now + by_star(&LEAP_COOLDOWN_BY_STAR, star);
    let leaper = field.unit_mut(unit);
    leaper.leap.airborne = None;
    leaper.leap.ready_at = ready_at;

    // The landing cell was reserved, so this only fails on a desynced grid
    let landed = field.relocate(unit, leap.landing);
    let center = field.unit(unit).position.unwrap_or(leap.landing);

    let radius = by_star(&LEAP_STUN_RADIUS_BY_STAR, star);
    let stunned: Vec<UnitId> = field
        .units
        .iter()
        .filter(|u| u.side != side && u.is_standing())
        .filter(|u| matches!(u.position, Some(p) if field.board.distance(center, p) <= radius))
        .map(|u| u.id)
        .collect();
    for &victim in &stunned {
        field.stun(victim, LEAP_STUN_SECONDS);
    }

    let next_target = field
        .board
        .neighbors(center)
        .into_iter()
        .filter_map(|cell| field.enemy_at(cell, side))
        .min();
    field.unit_mut(unit).set_target(next_target);

    let name = field.unit(unit).name();
    info!(%unit, cell = %center, landed, stunned = stunned.len(), "leap landed");
    field.log(
        BattleEventType::LeapLanded { unit, cell: center },
        format!("{} {} lands at {} stunning {}", name, unit, center, stunned.len()),
    );
}
