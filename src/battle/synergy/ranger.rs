//! Ranger: attack speed that builds up with every shot

use serde::{Deserialize, Serialize};

use super::{count_tag, Tier};
use crate::battle::unit_type::SynergyTag;
use crate::battle::units::CombatUnit;
use crate::core::types::Side;

pub const RANGER_MAX_STACKS: u32 = 6;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RangerBonus {
    pub tier: Tier,
}

impl RangerBonus {
    pub fn from_roster(units: &[CombatUnit], side: Side) -> Self {
        Self {
            tier: Tier::from_count(count_tag(units, side, SynergyTag::Ranger)),
        }
    }

    fn per_stack(&self) -> Option<f32> {
        self.tier.pick(0.05, 0.08)
    }

    /// Record one attack by `unit`
    pub fn on_attack(&self, unit: &mut CombatUnit) {
        if self.per_stack().is_some() && unit.has_tag(SynergyTag::Ranger) {
            unit.ranger_stacks = (unit.ranger_stacks + 1).min(RANGER_MAX_STACKS);
        }
    }

    pub fn interval_multiplier(&self, unit: &CombatUnit) -> f32 {
        match self.per_stack() {
            Some(per_stack) if unit.has_tag(SynergyTag::Ranger) => {
                1.0 - per_stack * unit.ranger_stacks.min(RANGER_MAX_STACKS) as f32
            }
            _ => 1.0,
        }
    }
}
