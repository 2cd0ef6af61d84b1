//! Brawler: bigger health pools at battle start

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{count_tag, Tier};
use crate::battle::unit_type::SynergyTag;
use crate::battle::units::CombatUnit;
use crate::core::types::Side;

const BRAWLER_HP_MINOR: f32 = 0.4;
const BRAWLER_HP_MAJOR: f32 = 0.8;
const TEAM_HP_MAJOR: f32 = 0.3;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrawlerBonus {
    pub tier: Tier,
}

impl BrawlerBonus {
    pub fn from_roster(units: &[CombatUnit], side: Side) -> Self {
        Self {
            tier: Tier::from_count(count_tag(units, side, SynergyTag::Brawler)),
        }
    }

    /// Max HP fraction added to a unit of this side
    pub fn hp_bonus(&self, unit: &CombatUnit) -> f32 {
        if unit.has_tag(SynergyTag::Brawler) {
            self.tier.pick(BRAWLER_HP_MINOR, BRAWLER_HP_MAJOR).unwrap_or(0.0)
        } else if self.tier == Tier::Major {
            TEAM_HP_MAJOR
        } else {
            0.0
        }
    }

    /// Raise max HP for every deployed unit of `side`
    pub fn apply(&self, units: &mut [CombatUnit], side: Side) {
        for unit in units.iter_mut().filter(|u| u.side == side && !u.summoned) {
            let bonus = self.hp_bonus(unit);
            if bonus > 0.0 {
                unit.scale_max_hp(bonus);
                debug!(unit = %unit.id, name = unit.name(), max_hp = unit.max_hp, "brawler bonus");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::unit_type::UnitKind;
    use crate::battle::units::test_unit;

    #[test]
    fn test_minor_brawler_bonus() {
        let mut units = vec![
            test_unit(0, UnitKind::Barbarian, Side::Home, 4, 0),
            test_unit(1, UnitKind::Prince, Side::Home, 4, 1),
            test_unit(2, UnitKind::Knight, Side::Home, 4, 2),
        ];
        let bonus = BrawlerBonus::from_roster(&units, Side::Home);
        bonus.apply(&mut units, Side::Home);
        assert!((units[0].max_hp - 830.0 * 1.4).abs() < 1e-3);
        assert_eq!(units[0].hp, units[0].max_hp);
        assert_eq!(units[2].max_hp, 1186.0);
    }

    #[test]
    fn test_major_brawler_boosts_team() {
        let mut units: Vec<_> = (0..4)
            .map(|i| test_unit(i, UnitKind::Barbarian, Side::Home, 4, i as i32))
            .collect();
        units.push(test_unit(4, UnitKind::Knight, Side::Home, 5, 0));
        let bonus = BrawlerBonus::from_roster(&units, Side::Home);
        bonus.apply(&mut units, Side::Home);
        assert!((units[0].max_hp - 830.0 * 1.8).abs() < 1e-3);
        assert!((units[4].max_hp - 1186.0 * 1.3).abs() < 1e-3);
    }

    #[test]
    fn test_other_side_untouched() {
        let mut units = vec![
            test_unit(0, UnitKind::Barbarian, Side::Home, 4, 0),
            test_unit(1, UnitKind::Barbarian, Side::Home, 4, 1),
            test_unit(2, UnitKind::Barbarian, Side::Away, 0, 0),
        ];
        let bonus = BrawlerBonus::from_roster(&units, Side::Home);
        bonus.apply(&mut units, Side::Home);
        assert_eq!(units[2].max_hp, 830.0);
    }
}
