//! Invisibility-based attackers: the royal ghost and the archer queen

use tracing::info;

use crate::battle::constants::{
    by_star, GHOST_ATTACKS_TO_VANISH, GHOST_INVISIBLE_SECONDS_BY_STAR, QUEEN_HP_THRESHOLD,
    QUEEN_INVISIBLE_SECONDS, QUEEN_MAX_TARGETS_BY_STAR, QUEEN_STEALTH_BONUS_BY_STAR,
};
use crate::battle::execution::BattleEventType;
use crate::battle::resolution::{Battlefield, Crit};
use crate::battle::status::EffectKind;
use crate::battle::unit_type::UnitKind;
use crate::core::types::UnitId;

fn vanish(field: &mut Battlefield, unit: UnitId, seconds: f32) {
    field.unit_mut(unit).status.apply(EffectKind::Invisible, seconds, 0.0);
    let name = field.unit(unit).name();
    info!(%unit, seconds, "vanished");
    field.log(
        BattleEventType::Vanished { unit, seconds },
        format!("{} {} turns invisible for {:.1}s", name, unit, seconds),
    );
}

/// Strike, and vanish after every third landed attack
pub fn ghost_strike(field: &mut Battlefield, attacker: UnitId, target: UnitId) -> bool {
    if field.strike(attacker, target, 1.0, Crit::Roll).is_none() {
        return false;
    }
    let unit = field.unit_mut(attacker);
    unit.attack_count += 1;
    if unit.attack_count >= GHOST_ATTACKS_TO_VANISH {
        unit.attack_count = 0;
        let seconds = by_star(&GHOST_INVISIBLE_SECONDS_BY_STAR, unit.star());
        vanish(field, attacker, seconds);
    }
    true
}

/// Enemies a volley hits: the primary target first, then others in range by id
pub fn volley_targets(field: &Battlefield, attacker: UnitId, primary: UnitId) -> Vec<UnitId> {
    let unit = field.unit(attacker);
    let cap = by_star(&QUEEN_MAX_TARGETS_BY_STAR, unit.star());
    let range = unit.range();

    let mut targets = vec![primary];
    targets.extend(
        field
            .targetable_enemies(unit.side)
            .into_iter()
            .filter(|id| *id != primary && field.distance_between(attacker, *id) <= range),
    );
    targets.truncate(cap);
    targets
}

/// Multishot; hits much harder while invisible
pub fn volley(field: &mut Battlefield, attacker: UnitId, target: UnitId) -> bool {
    let multiplier = if field.unit(attacker).status.is_invisible() {
        1.0 + by_star(&QUEEN_STEALTH_BONUS_BY_STAR, field.unit(attacker).star())
    } else {
        1.0
    };
    let mut landed = false;
    for victim in volley_targets(field, attacker, target) {
        landed |= field.strike(attacker, victim, multiplier, Crit::Roll).is_some();
    }
    landed
}

/// One-shot low-health vanish; checked every tick before the unit acts
pub fn check_threshold(field: &mut Battlefield, unit: UnitId) {
    let queen = field.unit(unit);
    if queen.kind() != UnitKind::ArcherQueen
        || queen.invisibility_triggered
        || !queen.alive
        || queen.hp_fraction() > QUEEN_HP_THRESHOLD
    {
        return;
    }
    field.unit_mut(unit).invisibility_triggered = true;
    vanish(field, unit, QUEEN_INVISIBLE_SECONDS);
}
