//! Unit-specific attacks
//!
//! Every unit kind maps to exactly one `Ability`. The attack phase calls
//! [`Attack::attack`] once the attacker is in range and off cooldown; the
//! ability decides who gets hit and how. Leap and knockback also have
//! entry points outside the normal attack (leap progress each tick,
//! knockback once at battle start).

pub mod barrage;
pub mod dash;
pub mod knockback;
pub mod leap;
pub mod line;
pub mod splash;
pub mod stealth;

use serde::{Deserialize, Serialize};

use crate::battle::resolution::{Battlefield, Crit};
use crate::battle::unit_type::UnitKind;
use crate::core::types::UnitId;

pub use leap::LeapProgress;

/// Closed set of attack behaviours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    /// Single target hit
    Default,
    /// Target plus enemies adjacent to the target
    Splash,
    /// Target plus enemies adjacent to the attacker
    SelfSplash,
    /// Target plus the cells behind it; kills raise skeletons
    Cone,
    /// Axe thrown through the target and back
    PiercingLine,
    /// Periodic leap onto the most crowded free cell
    Leap,
    /// Consecutive hits charge a damaging dash
    EscalatingDash,
    /// Consecutive hits charge a rocket volley
    Barrage,
    /// Each kill chains into a dash at the weakest enemy
    ChainDash,
    /// Vanishes after a run of attacks
    GhostStealth,
    /// Hits several enemies; vanishes once at low health
    Volley,
    /// Throws the nearest enemy aside when the battle starts
    Knockback,
    /// Leaves a bomb behind on death
    DeathBomb,
}

impl Ability {
    pub fn for_kind(kind: UnitKind) -> Self {
        match kind {
            UnitKind::Bomber | UnitKind::Princess => Ability::Splash,
            UnitKind::Valkyrie => Ability::SelfSplash,
            UnitKind::SkeletonKing => Ability::Cone,
            UnitKind::Executioner => Ability::PiercingLine,
            UnitKind::MegaKnight => Ability::Leap,
            UnitKind::Bandit => Ability::EscalatingDash,
            UnitKind::GoblinMachine => Ability::Barrage,
            UnitKind::GoldenKnight => Ability::ChainDash,
            UnitKind::RoyalGhost => Ability::GhostStealth,
            UnitKind::ArcherQueen => Ability::Volley,
            UnitKind::Prince => Ability::Knockback,
            UnitKind::GiantSkeleton => Ability::DeathBomb,
            UnitKind::Knight
            | UnitKind::Archer
            | UnitKind::Goblin
            | UnitKind::SpearGoblin
            | UnitKind::Barbarian
            | UnitKind::Pekka
            | UnitKind::DartGoblin
            | UnitKind::Skeleton => Ability::Default,
        }
    }
}

/// Something that can resolve an attack on the battlefield
pub trait Attack {
    /// Resolve one attack; false means nothing happened
    fn attack(&self, field: &mut Battlefield, attacker: UnitId, target: UnitId) -> bool;
}

impl Attack for Ability {
    fn attack(&self, field: &mut Battlefield, attacker: UnitId, target: UnitId) -> bool {
        if !field.unit(target).is_targetable() {
            return false;
        }
        match self {
            Ability::Default | Ability::Leap | Ability::Knockback | Ability::DeathBomb => {
                basic_strike(field, attacker, target)
            }
            Ability::Splash => splash::splash(field, attacker, target),
            Ability::SelfSplash => splash::self_splash(field, attacker, target),
            Ability::Cone => splash::cone(field, attacker, target),
            Ability::PiercingLine => line::piercing_line(field, attacker, target),
            Ability::EscalatingDash => dash::escalating_dash(field, attacker, target),
            Ability::Barrage => barrage::barrage(field, attacker, target),
            Ability::ChainDash => dash::chain_dash(field, attacker, target),
            Ability::GhostStealth => stealth::ghost_strike(field, attacker, target),
            Ability::Volley => stealth::volley(field, attacker, target),
        }
    }
}

/// Plain single-target hit with a crit roll
pub fn basic_strike(field: &mut Battlefield, attacker: UnitId, target: UnitId) -> bool {
    field.strike(attacker, target, 1.0, Crit::Roll).is_some()
}
