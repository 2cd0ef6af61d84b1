//! Thrower: damage grows with distance to the target

use serde::{Deserialize, Serialize};

use super::{count_tag, Tier};
use crate::battle::unit_type::SynergyTag;
use crate::battle::units::CombatUnit;
use crate::core::types::Side;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThrowerBonus {
    pub tier: Tier,
}

impl ThrowerBonus {
    pub fn from_roster(units: &[CombatUnit], side: Side) -> Self {
        Self {
            tier: Tier::from_count(count_tag(units, side, SynergyTag::Thrower)),
        }
    }

    pub fn damage_multiplier(&self, unit: &CombatUnit, distance: u32) -> f32 {
        match self.tier.pick(0.1, 0.2) {
            Some(per_hex) if unit.has_tag(SynergyTag::Thrower) => 1.0 + per_hex * distance as f32,
            _ => 1.0,
        }
    }
}
