//! Dashing attacks
//!
//! The escalating dash charges up over consecutive hits on one target and
//! then cuts through enemies to land beside the farthest reachable one. The
//! chain dash fires only on kills and keeps going while it keeps killing.

use tracing::debug;

use crate::battle::constants::{
    by_star, CHAIN_DASH_MULTIPLIER_BY_STAR, DASH_BONUS_BY_STAR, DASH_RADIUS, DASH_STUN_SECONDS,
    DASH_THRESHOLD_BY_STAR,
};
use crate::battle::execution::BattleEventType;
use crate::battle::hex::HexCoord;
use crate::battle::resolution::{Battlefield, Crit};
use crate::core::types::UnitId;

/// Farthest enemy within dash radius that has a free neighbor in reach
///
/// Returns the enemy and the landing cell next to it. Ties keep the lowest
/// enemy id and the first neighbor in table order.
pub fn dash_destination(field: &Battlefield, dasher: UnitId) -> Option<(UnitId, HexCoord)> {
    let unit = field.unit(dasher);
    let start = unit.position?;
    let occupied = field.occupied(Some(dasher));

    let mut best: Option<(UnitId, HexCoord, u32)> = None;
    for enemy in field.targetable_enemies(unit.side) {
        let Some(cell) = field.unit(enemy).position else {
            continue;
        };
        if field.board.distance(start, cell) > DASH_RADIUS {
            continue;
        }
        let mut landing: Option<(HexCoord, u32)> = None;
        for n in field.board.neighbors(cell) {
            let reach = field.board.distance(start, n);
            if occupied.contains(&n) || reach > DASH_RADIUS {
                continue;
            }
            if landing.map_or(true, |(_, d)| reach > d) {
                landing = Some((n, reach));
            }
        }
        if let Some((n, reach)) = landing {
            if best.map_or(true, |(_, _, d)| reach > d) {
                best = Some((enemy, n, reach));
            }
        }
    }
    best.map(|(enemy, n, _)| (enemy, n))
}

/// Charge up on repeated hits, then dash through enemies
pub fn escalating_dash(field: &mut Battlefield, attacker: UnitId, target: UnitId) -> bool {
    let star = field.unit(attacker).star();

    if field.unit(attacker).dash_pending {
        field.unit_mut(attacker).dash_pending = false;
        if perform_dash(field, attacker, star) {
            return true;
        }
        debug!(unit = %attacker, "no dash destination, striking instead");
    }

    if field.strike(attacker, target, 1.0, Crit::Roll).is_none() {
        return false;
    }

    let unit = field.unit_mut(attacker);
    if unit.streak_target == Some(target) {
        unit.attack_count += 1;
    } else {
        unit.streak_target = Some(target);
        unit.attack_count = 1;
    }
    if unit.attack_count >= by_star(&DASH_THRESHOLD_BY_STAR, star) {
        unit.dash_pending = true;
        unit.attack_count = 0;
        unit.streak_target = None;
    }
    true
}

fn perform_dash(field: &mut Battlefield, attacker: UnitId, star: u8) -> bool {
    let Some((enemy, landing)) = dash_destination(field, attacker) else {
        return false;
    };
    let Some(start) = field.unit(attacker).position else {
        return false;
    };
    let side = field.unit(attacker).side;

    let mut victims: Vec<UnitId> = start
        .line_to(&landing)
        .into_iter()
        .skip(1)
        .filter_map(|cell| field.enemy_at(cell, side))
        .collect();
    if !victims.contains(&enemy) {
        victims.push(enemy);
    }

    let multiplier = 1.0 + by_star(&DASH_BONUS_BY_STAR, star);
    for victim in victims {
        if field.strike(attacker, victim, multiplier, Crit::Never).is_some() {
            field.stun(victim, DASH_STUN_SECONDS);
        }
    }

    // A downed dasher still lands its hits but stays on its cell
    if field.unit(attacker).alive && field.relocate(attacker, landing) {
        let name = field.unit(attacker).name();
        field.log(
            BattleEventType::Dashed {
                unit: attacker,
                from: start,
                to: landing,
            },
            format!("{} {} dashes {} -> {}", name, attacker, start, landing),
        );
    }
    true
}

/// Strike; on a kill, dash to the weakest enemy and keep chaining
pub fn chain_dash(field: &mut Battlefield, attacker: UnitId, target: UnitId) -> bool {
    let Some(first) = field.strike(attacker, target, 1.0, Crit::Roll) else {
        return false;
    };
    let multiplier = by_star(&CHAIN_DASH_MULTIPLIER_BY_STAR, field.unit(attacker).star());
    let side = field.unit(attacker).side;

    let mut killed = first.downed;
    while killed && field.unit(attacker).alive {
        let Some(next) = field
            .targetable_enemies(side)
            .into_iter()
            .min_by(|a, b| field.unit(*a).hp.total_cmp(&field.unit(*b).hp).then(a.cmp(b)))
        else {
            break;
        };
        let Some(cell) = field.unit(next).position else {
            break;
        };
        let occupied = field.occupied(Some(attacker));
        let Some(landing) = field
            .board
            .neighbors(cell)
            .into_iter()
            .find(|n| !occupied.contains(n))
        else {
            break;
        };
        let from = field.unit(attacker).position;
        if !field.relocate(attacker, landing) {
            break;
        }
        if let Some(from) = from {
            field.log(
                BattleEventType::Dashed {
                    unit: attacker,
                    from,
                    to: landing,
                },
                format!("{} chains to {}", attacker, next),
            );
        }
        field.unit_mut(attacker).set_target(Some(next));
        killed = field
            .strike(attacker, next, multiplier, Crit::Never)
            .is_some_and(|hit| hit.downed);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::resolution::test_field;
    use crate::battle::unit_type::UnitKind;
    use crate::battle::units::test_unit;
    use crate::core::types::Side;

    #[test]
    fn test_dash_charges_on_same_target() {
        let mut field = test_field(vec![
            test_unit(0, UnitKind::Bandit, Side::Home, 4, 2),
            test_unit(1, UnitKind::Knight, Side::Away, 3, 2),
        ]);
        for _ in 0..2 {
            assert!(escalating_dash(&mut field, UnitId(0), UnitId(1)));
            assert!(!field.unit(UnitId(0)).dash_pending);
        }
        assert!(escalating_dash(&mut field, UnitId(0), UnitId(1)));
        assert!(field.unit(UnitId(0)).dash_pending);
        assert_eq!(field.unit(UnitId(1)).hp, 1186.0 - 3.0 * 82.0);
    }

    #[test]
    fn test_switching_target_restarts_streak() {
        let mut field = test_field(vec![
            test_unit(0, UnitKind::Bandit, Side::Home, 4, 2),
            test_unit(1, UnitKind::Knight, Side::Away, 3, 2),
            test_unit(2, UnitKind::Knight, Side::Away, 3, 3),
        ]);
        escalating_dash(&mut field, UnitId(0), UnitId(1));
        escalating_dash(&mut field, UnitId(0), UnitId(1));
        escalating_dash(&mut field, UnitId(0), UnitId(2));
        assert!(!field.unit(UnitId(0)).dash_pending);
        assert_eq!(field.unit(UnitId(0)).attack_count, 1);
    }

    #[test]
    fn test_dash_moves_and_stuns() {
        let mut field = test_field(vec![
            test_unit(0, UnitKind::Bandit, Side::Home, 5, 2),
            test_unit(1, UnitKind::Knight, Side::Away, 4, 2),
            test_unit(2, UnitKind::Knight, Side::Away, 2, 2),
        ]);
        field.unit_mut(UnitId(0)).dash_pending = true;
        assert!(escalating_dash(&mut field, UnitId(0), UnitId(1)));

        let (enemy, landing) = (UnitId(2), field.unit(UnitId(0)).position.expect("on board"));
        assert_ne!(landing, HexCoord::new(5, 2));
        assert_eq!(field.distance_between(UnitId(0), enemy), 1);
        assert!(field.unit(enemy).is_stunned());
        assert_eq!(field.unit(enemy).hp, 1186.0 - 82.0 * 1.5);
        assert!(!field.unit(UnitId(0)).dash_pending);
    }

    #[test]
    fn test_chain_dash_on_kill() {
        let mut field = test_field(vec![
            test_unit(0, UnitKind::GoldenKnight, Side::Home, 4, 2),
            test_unit(1, UnitKind::Archer, Side::Away, 3, 2),
            test_unit(2, UnitKind::Archer, Side::Away, 1, 0),
            test_unit(3, UnitKind::Knight, Side::Away, 1, 4),
        ]);
        field.unit_mut(UnitId(1)).hp = 1.0;
        field.unit_mut(UnitId(2)).hp = 50.0;

        assert!(chain_dash(&mut field, UnitId(0), UnitId(1)));
        assert!(!field.unit(UnitId(1)).alive);
        // 139 * 1.5 kills the 50 HP archer, then the chain moves on to the knight
        assert!(!field.unit(UnitId(2)).alive);
        assert_eq!(field.unit(UnitId(3)).hp, 1186.0 - 139.0 * 1.5);
        assert_eq!(field.distance_between(UnitId(0), UnitId(3)), 1);
        assert_eq!(field.unit(UnitId(0)).current_target, Some(UnitId(3)));
    }

    #[test]
    fn test_downed_dasher_does_not_move() {
        let mut field = test_field(vec![
            test_unit(0, UnitKind::Bandit, Side::Home, 5, 2),
            test_unit(1, UnitKind::Knight, Side::Away, 4, 2),
            test_unit(2, UnitKind::Knight, Side::Away, 2, 2),
        ]);
        field.unit_mut(UnitId(0)).dash_pending = true;
        field.unit_mut(UnitId(0)).hp = 1.0;
        field.strike(UnitId(1), UnitId(0), 1.0, Crit::Never);
        assert!(!field.unit(UnitId(0)).alive);

        assert!(escalating_dash(&mut field, UnitId(0), UnitId(1)));
        assert_eq!(field.unit(UnitId(0)).position, Some(HexCoord::new(5, 2)));
        assert_eq!(field.grid.get(HexCoord::new(5, 2)), Some(UnitId(0)));
        assert_eq!(field.unit(UnitId(2)).hp, 1186.0 - 82.0 * 1.5);
    }

    #[test]
    fn test_downed_chainer_does_not_chain() {
        let mut field = test_field(vec![
            test_unit(0, UnitKind::GoldenKnight, Side::Home, 4, 2),
            test_unit(1, UnitKind::Archer, Side::Away, 3, 2),
            test_unit(2, UnitKind::Knight, Side::Away, 1, 4),
        ]);
        field.unit_mut(UnitId(1)).hp = 1.0;
        field.unit_mut(UnitId(0)).hp = 1.0;
        field.strike(UnitId(1), UnitId(0), 1.0, Crit::Never);
        assert!(!field.unit(UnitId(0)).alive);

        assert!(chain_dash(&mut field, UnitId(0), UnitId(1)));
        assert!(!field.unit(UnitId(1)).alive);
        assert_eq!(field.unit(UnitId(0)).position, Some(HexCoord::new(4, 2)));
        assert_eq!(field.unit(UnitId(2)).hp, field.unit(UnitId(2)).max_hp);
    }

    #[test]
    fn test_no_chain_without_kill() {
        let mut field = test_field(vec![
            test_unit(0, UnitKind::GoldenKnight, Side::Home, 4, 2),
            test_unit(1, UnitKind::Knight, Side::Away, 3, 2),
            test_unit(2, UnitKind::Archer, Side::Away, 0, 0),
        ]);
        assert!(chain_dash(&mut field, UnitId(0), UnitId(1)));
        assert_eq!(field.unit(UnitId(0)).position, Some(HexCoord::new(4, 2)));
        assert_eq!(field.unit(UnitId(2)).hp, field.unit(UnitId(2)).max_hp);
    }
}
