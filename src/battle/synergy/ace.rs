//! Ace: one captain carries the team

use serde::{Deserialize, Serialize};

use super::{count_tag, Tier};
use crate::battle::unit_type::SynergyTag;
use crate::battle::units::CombatUnit;
use crate::core::types::{Side, UnitId};

/// Team attack interval multiplier after a captain kill
pub const ACE_HIT_SPEED_MULTIPLIER: f32 = 0.8;
pub const ACE_HIT_SPEED_SECONDS: f32 = 3.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AceBonus {
    pub tier: Tier,
    pub captain: Option<UnitId>,
}

impl AceBonus {
    pub fn from_roster(units: &[CombatUnit], side: Side) -> Self {
        let tier = Tier::from_count(count_tag(units, side, SynergyTag::Ace));
        let captain = if tier.is_active() {
            units
                .iter()
                .filter(|u| u.side == side && !u.summoned && u.has_tag(SynergyTag::Ace))
                // Highest star, then highest cost, then lowest id
                .max_by(|a, b| {
                    (a.star(), a.definition.cost)
                        .cmp(&(b.star(), b.definition.cost))
                        .then(b.id.cmp(&a.id))
                })
                .map(|u| u.id)
        } else {
            None
        };
        Self { tier, captain }
    }

    pub fn damage_multiplier(&self, unit: UnitId) -> f32 {
        if self.captain == Some(unit) {
            self.tier.pick(1.2, 1.5).unwrap_or(1.0)
        } else {
            1.0
        }
    }

    /// Fraction of damage dealt that heals the captain
    pub fn lifesteal(&self, unit: UnitId) -> f32 {
        if self.captain == Some(unit) {
            self.tier.pick(0.2, 0.4).unwrap_or(0.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::unit_type::UnitKind;
    use crate::battle::units::test_unit;

    #[test]
    fn test_captain_highest_cost() {
        let units = vec![
            test_unit(0, UnitKind::Pekka, Side::Home, 4, 0),
            test_unit(1, UnitKind::Bandit, Side::Home, 4, 1),
            test_unit(2, UnitKind::Executioner, Side::Home, 4, 2),
        ];
        let ace = AceBonus::from_roster(&units, Side::Home);
        assert_eq!(ace.captain, Some(UnitId(1)));
        assert_eq!(ace.damage_multiplier(UnitId(1)), 1.2);
        assert_eq!(ace.damage_multiplier(UnitId(0)), 1.0);
        assert_eq!(ace.lifesteal(UnitId(1)), 0.2);
    }

    #[test]
    fn test_captain_tie_goes_to_lowest_id() {
        let units = vec![
            test_unit(0, UnitKind::Pekka, Side::Home, 4, 0),
            test_unit(1, UnitKind::Executioner, Side::Home, 4, 1),
        ];
        let ace = AceBonus::from_roster(&units, Side::Home);
        assert_eq!(ace.captain, Some(UnitId(0)));
    }

    #[test]
    fn test_no_captain_when_inactive() {
        let units = vec![test_unit(0, UnitKind::Pekka, Side::Home, 4, 0)];
        let ace = AceBonus::from_roster(&units, Side::Home);
        assert_eq!(ace.captain, None);
        assert_eq!(ace.lifesteal(UnitId(0)), 0.0);
    }
}
