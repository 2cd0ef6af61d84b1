//! Opening charge: the prince takes the nearest enemy's cell and throws it back

use tracing::{debug, warn};

use crate::battle::constants::KNOCKBACK_STUN_SECONDS;
use crate::battle::execution::BattleEventType;
use crate::battle::hex::HexCoord;
use crate::battle::pathfinding::nearest_free_cell;
use crate::battle::resolution::Battlefield;
use crate::core::types::UnitId;

/// Nearest standing enemy, lowest id on ties
pub fn nearest_enemy(field: &Battlefield, unit: UnitId) -> Option<UnitId> {
    let side = field.unit(unit).side;
    field
        .units
        .iter()
        .filter(|u| u.side != side && u.is_standing())
        .map(|u| (field.distance_between(unit, u.id), u.id))
        .min()
        .map(|(_, id)| id)
}

/// Where the victim lands: along the charge line if possible, else the closest free cell
pub fn throw_destination(field: &Battlefield, charger: UnitId, victim: UnitId) -> Option<HexCoord> {
    let (Some(from), Some(at)) = (field.unit(charger).position, field.unit(victim).position) else {
        return None;
    };
    let throw = field.unit(charger).star() as usize;
    let reach = field.board.distance(from, at) as usize;
    let usable = |cell: HexCoord| cell != at && field.is_open(cell);

    let line = from.ray(&at, reach + throw);
    let along = line
        .iter()
        .skip(reach)
        .copied()
        .take_while(|cell| field.board.in_bounds(*cell))
        .collect::<Vec<_>>();
    if let Some(cell) = along.into_iter().rev().find(|cell| usable(*cell)) {
        return Some(cell);
    }

    let mut blocked = field.occupied(Some(charger));
    blocked.insert(at);
    nearest_free_cell(&field.board, at, &blocked)
}

/// Run the opening charge; false if there was nobody to hit or nowhere to throw
pub fn knockback(field: &mut Battlefield, charger: UnitId) -> bool {
    let Some(victim) = nearest_enemy(field, charger) else {
        return false;
    };
    let Some(dest) = throw_destination(field, charger, victim) else {
        debug!(unit = %charger, %victim, "knockback has no landing cell");
        return false;
    };
    let (Some(from), Some(at)) = (field.unit(charger).position, field.unit(victim).position) else {
        return false;
    };

    if !swap_in(field, charger, victim, from, at, dest) {
        return false;
    }

    field.stun(victim, KNOCKBACK_STUN_SECONDS);
    field.unit_mut(charger).set_target(Some(victim));
    let name = field.unit(charger).name();
    field.log(
        BattleEventType::KnockedBack {
            unit: charger,
            target: victim,
            to: dest,
        },
        format!("{} {} throws {} to {}", name, charger, victim, dest),
    );
    true
}

/// Throw `victim` from `at` to `dest` and put `charger` on `at`
///
/// The charger's own cell is freed first since the victim may be thrown
/// onto it. Any rejected step rolls the grid back to where it started.
fn swap_in(field: &mut Battlefield, charger: UnitId, victim: UnitId, from: HexCoord, at: HexCoord, dest: HexCoord) -> bool {
    field.grid.vacate(charger, from);
    if !field.relocate(victim, dest) {
        restore(field, charger, from);
        return false;
    }
    if let Err(err) = field.grid.place(charger, at) {
        warn!(unit = %charger, error = %err, "charge landing rejected");
        field.relocate(victim, at);
        restore(field, charger, from);
        return false;
    }
    field.unit_mut(charger).position = Some(at);
    true
}

fn restore(field: &mut Battlefield, charger: UnitId, from: HexCoord) {
    if let Err(err) = field.grid.place(charger, from) {
        warn!(unit = %charger, error = %err, "charger could not return to its cell");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::resolution::test_field;
    use crate::battle::unit_type::UnitKind;
    use crate::battle::units::test_unit;
    use crate::core::types::Side;

    #[test]
    fn test_prince_swaps_in_and_throws_back() {
        let mut field = test_field(vec![
            test_unit(0, UnitKind::Prince, Side::Home, 5, 2),
            test_unit(1, UnitKind::Knight, Side::Away, 3, 2),
        ]);
        assert!(knockback(&mut field, UnitId(0)));

        assert_eq!(field.unit(UnitId(0)).position, Some(HexCoord::new(3, 2)));
        let thrown = field.unit(UnitId(1)).position.expect("still on board");
        assert_eq!(field.board.distance(HexCoord::new(5, 2), thrown), 3);
        assert_eq!(field.grid.get(thrown), Some(UnitId(1)));
        assert!(field.grid.is_free(HexCoord::new(5, 2)));
        assert!(field.unit(UnitId(1)).is_stunned());
        assert_eq!(field.unit(UnitId(0)).current_target, Some(UnitId(1)));
    }

    #[test]
    fn test_edge_falls_back_to_nearest_free_cell() {
        let mut field = test_field(vec![
            test_unit(0, UnitKind::Prince, Side::Home, 1, 2),
            test_unit(1, UnitKind::Knight, Side::Away, 0, 2),
        ]);
        assert!(knockback(&mut field, UnitId(0)));
        let thrown = field.unit(UnitId(1)).position.expect("still on board");
        assert_ne!(thrown, HexCoord::new(0, 2));
        assert_eq!(field.unit(UnitId(0)).position, Some(HexCoord::new(0, 2)));
        assert_eq!(field.grid.occupied_count(), 2);
    }

    #[test]
    fn test_rejected_landing_rolls_back() {
        let mut field = test_field(vec![
            test_unit(0, UnitKind::Prince, Side::Home, 5, 2),
            test_unit(1, UnitKind::Knight, Side::Away, 3, 2),
            test_unit(2, UnitKind::Archer, Side::Away, 0, 0),
        ]);
        let (from, at, dest) = (HexCoord::new(5, 2), HexCoord::new(0, 0), HexCoord::new(2, 2));
        assert!(!swap_in(&mut field, UnitId(0), UnitId(1), from, at, dest));

        assert_eq!(field.unit(UnitId(0)).position, Some(from));
        assert_eq!(field.grid.get(from), Some(UnitId(0)));
        assert_eq!(field.unit(UnitId(1)).position, Some(HexCoord::new(3, 2)));
        assert_eq!(field.grid.get(HexCoord::new(3, 2)), Some(UnitId(1)));
        assert!(field.grid.is_free(dest));
        assert_eq!(field.grid.occupied_count(), 3);
    }

    #[test]
    fn test_no_enemy_no_charge() {
        let mut field = test_field(vec![test_unit(0, UnitKind::Prince, Side::Home, 5, 2)]);
        assert!(!knockback(&mut field, UnitId(0)));
        assert_eq!(field.unit(UnitId(0)).position, Some(HexCoord::new(5, 2)));
    }
}
