//! Avenger: the last avenger standing hits much harder

use serde::{Deserialize, Serialize};

use super::{count_tag, Tier};
use crate::battle::unit_type::SynergyTag;
use crate::battle::units::CombatUnit;
use crate::core::types::Side;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvengerBonus {
    pub tier: Tier,
}

impl AvengerBonus {
    pub fn from_roster(units: &[CombatUnit], side: Side) -> Self {
        Self {
            tier: Tier::from_count(count_tag(units, side, SynergyTag::Avenger)),
        }
    }

    pub fn damage_multiplier(&self, unit: &CombatUnit, units: &[CombatUnit]) -> f32 {
        let Some(multiplier) = self.tier.pick(1.6, 2.2) else {
            return 1.0;
        };
        if !unit.has_tag(SynergyTag::Avenger) {
            return 1.0;
        }
        let standing = units
            .iter()
            .filter(|u| u.side == unit.side && u.alive && u.has_tag(SynergyTag::Avenger))
            .count();
        if standing == 1 && unit.alive {
            multiplier
        } else {
            1.0
        }
    }
}
