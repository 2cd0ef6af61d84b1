//! Undead: curse the toughest enemies, grow stronger as they fall

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{count_tag, Tier};
use crate::battle::unit_type::SynergyTag;
use crate::battle::units::CombatUnit;
use crate::core::types::{Side, UnitId};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UndeadBonus {
    pub tier: Tier,
    pub cursed: Vec<UnitId>,
    /// Accumulated damage bonus from cursed deaths
    pub bonus: f32,
}

impl UndeadBonus {
    pub fn from_roster(units: &[CombatUnit], side: Side) -> Self {
        Self {
            tier: Tier::from_count(count_tag(units, side, SynergyTag::Undead)),
            cursed: Vec::new(),
            bonus: 0.0,
        }
    }

    /// Pick curse targets among the enemies of `side`; highest max HP first
    pub fn place_curses(&mut self, units: &[CombatUnit], side: Side) {
        let Some(count) = self.tier.pick(1, 2) else {
            return;
        };
        let mut enemies: Vec<&CombatUnit> = units
            .iter()
            .filter(|u| u.side != side && u.is_standing())
            .collect();
        enemies.sort_by(|a, b| b.max_hp.total_cmp(&a.max_hp).then(a.id.cmp(&b.id)));
        self.cursed = enemies.iter().take(count).map(|u| u.id).collect();
        for id in &self.cursed {
            info!(side = ?side, target = %id, "undead curse placed");
        }
    }

    pub fn is_cursed(&self, unit: UnitId) -> bool {
        self.cursed.contains(&unit)
    }

    /// An enemy died; returns true if it was cursed
    pub fn on_enemy_death(&mut self, victim: UnitId) -> bool {
        let Some(step) = self.tier.pick(0.2, 0.4) else {
            return false;
        };
        if self.is_cursed(victim) {
            self.bonus += step;
            true
        } else {
            false
        }
    }

    pub fn damage_multiplier(&self, unit: &CombatUnit) -> f32 {
        if unit.has_tag(SynergyTag::Undead) {
            1.0 + self.bonus
        } else {
            1.0
        }
    }
}
