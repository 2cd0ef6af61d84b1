//! Rocket barrage: a run of hits on one target charges a volley at the back line

use tracing::debug;

use crate::battle::constants::{
    by_star, BARRAGE_DAMAGE_MULTIPLIER, BARRAGE_ROCKETS_BY_STAR, BARRAGE_STUN_SECONDS,
    BARRAGE_THRESHOLD_BY_STAR,
};
use crate::battle::execution::BattleEventType;
use crate::battle::resolution::{Battlefield, Crit};
use crate::core::types::UnitId;

/// Farthest targetable enemies other than `primary`, farthest first
pub fn rocket_targets(field: &Battlefield, attacker: UnitId, primary: UnitId, rockets: usize) -> Vec<UnitId> {
    let mut others: Vec<(u32, UnitId)> = field
        .targetable_enemies(field.unit(attacker).side)
        .into_iter()
        .filter(|id| *id != primary)
        .map(|id| (field.distance_between(attacker, id), id))
        .collect();
    others.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    others.into_iter().take(rockets).map(|(_, id)| id).collect()
}

pub fn barrage(field: &mut Battlefield, attacker: UnitId, target: UnitId) -> bool {
    let star = field.unit(attacker).star();
    {
        let unit = field.unit_mut(attacker);
        if unit.streak_target != Some(target) {
            unit.streak_target = Some(target);
            unit.attack_count = 0;
        }
    }

    if field.unit(attacker).attack_count >= by_star(&BARRAGE_THRESHOLD_BY_STAR, star) {
        let rockets = rocket_targets(field, attacker, target, by_star(&BARRAGE_ROCKETS_BY_STAR, star));
        if !rockets.is_empty() {
            field.unit_mut(attacker).attack_count = 0;
            for &victim in &rockets {
                if field
                    .strike(attacker, victim, BARRAGE_DAMAGE_MULTIPLIER, Crit::Never)
                    .is_some()
                {
                    field.stun(victim, BARRAGE_STUN_SECONDS);
                }
            }
            let name = field.unit(attacker).name();
            field.log(
                BattleEventType::Barrage {
                    unit: attacker,
                    rockets: rockets.len(),
                },
                format!("{} {} fires {} rockets", name, attacker, rockets.len()),
            );
            return true;
        }
        debug!(unit = %attacker, "barrage ready but no other targets");
    }

    if field.strike(attacker, target, 1.0, Crit::Roll).is_none() {
        return false;
    }
    field.unit_mut(attacker).attack_count += 1;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::resolution::test_field;
    use crate::battle::unit_type::UnitKind;
    use crate::battle::units::test_unit;
    use crate::core::types::Side;

    fn field() -> Battlefield {
        test_field(vec![
            test_unit(0, UnitKind::GoblinMachine, Side::Home, 4, 2),
            test_unit(1, UnitKind::Knight, Side::Away, 3, 2),
            test_unit(2, UnitKind::Archer, Side::Away, 0, 0),
            test_unit(3, UnitKind::Archer, Side::Away, 2, 2),
        ])
    }

    #[test]
    fn test_rocket_targets_farthest_first() {
        let field = field();
        assert_eq!(rocket_targets(&field, UnitId(0), UnitId(1), 1), vec![UnitId(2)]);
        assert_eq!(
            rocket_targets(&field, UnitId(0), UnitId(1), 5),
            vec![UnitId(2), UnitId(3)]
        );
    }

    #[test]
    fn test_barrage_after_threshold() {
        let mut field = field();
        for _ in 0..3 {
            assert!(barrage(&mut field, UnitId(0), UnitId(1)));
        }
        assert_eq!(field.unit(UnitId(1)).hp, 1186.0 - 3.0 * 82.0);
        assert_eq!(field.unit(UnitId(2)).hp, field.unit(UnitId(2)).max_hp);

        assert!(barrage(&mut field, UnitId(0), UnitId(1)));
        // The primary target is left alone; the farthest enemy eats the rocket
        assert_eq!(field.unit(UnitId(1)).hp, 1186.0 - 3.0 * 82.0);
        assert_eq!(field.unit(UnitId(2)).hp, 474.0 - 82.0 * 1.5);
        assert!(field.unit(UnitId(2)).is_stunned());
        assert_eq!(field.unit(UnitId(0)).attack_count, 0);
    }

    #[test]
    fn test_new_target_resets_count() {
        let mut field = field();
        barrage(&mut field, UnitId(0), UnitId(1));
        barrage(&mut field, UnitId(0), UnitId(1));
        barrage(&mut field, UnitId(0), UnitId(3));
        assert_eq!(field.unit(UnitId(0)).attack_count, 1);
        assert_eq!(field.unit(UnitId(0)).streak_target, Some(UnitId(3)));
    }

    #[test]
    fn test_lone_target_gets_normal_hits() {
        let mut field = test_field(vec![
            test_unit(0, UnitKind::GoblinMachine, Side::Home, 4, 2),
            test_unit(1, UnitKind::Knight, Side::Away, 3, 2),
        ]);
        for _ in 0..5 {
            assert!(barrage(&mut field, UnitId(0), UnitId(1)));
        }
        assert_eq!(field.unit(UnitId(1)).hp, 1186.0 - 5.0 * 82.0);
    }
}
