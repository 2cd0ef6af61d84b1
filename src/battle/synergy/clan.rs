//! Clan: heal and haste when a unit first drops to half health

use serde::{Deserialize, Serialize};

use super::{count_tag, Tier};
use crate::battle::unit_type::SynergyTag;
use crate::battle::units::CombatUnit;
use crate::core::types::Side;

pub const CLAN_HP_TRIGGER: f32 = 0.5;
pub const CLAN_BUFF_SECONDS: f32 = 3.0;

/// Heal and haste handed to one unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClanBuff {
    /// Fraction of max HP healed over the buff duration
    pub heal_fraction: f32,
    /// Attack interval multiplier while the buff lasts
    pub interval_multiplier: f32,
}

const STRONG: ClanBuff = ClanBuff {
    heal_fraction: 0.6,
    interval_multiplier: 0.4,
};

const WEAK: ClanBuff = ClanBuff {
    heal_fraction: 0.3,
    interval_multiplier: 0.7,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClanBonus {
    pub tier: Tier,
    pub count: usize,
}

impl ClanBonus {
    pub fn from_roster(units: &[CombatUnit], side: Side) -> Self {
        let count = count_tag(units, side, SynergyTag::Clan);
        Self {
            tier: Tier::from_count(count),
            count,
        }
    }

    /// Buff a unit should receive now, if it qualifies and has not triggered yet
    pub fn buff_for(&self, unit: &CombatUnit) -> Option<ClanBuff> {
        if unit.clan_triggered || !unit.alive || unit.hp_fraction() > CLAN_HP_TRIGGER {
            return None;
        }
        let is_clan = unit.has_tag(SynergyTag::Clan);
        match self.tier {
            Tier::Inactive => None,
            Tier::Minor if is_clan => Some(WEAK),
            Tier::Minor => None,
            Tier::Major if is_clan => Some(STRONG),
            Tier::Major => Some(WEAK),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::unit_type::UnitKind;
    use crate::battle::units::test_unit;

    fn roster(clan: usize) -> Vec<CombatUnit> {
        let mut units: Vec<_> = (0..clan)
            .map(|i| test_unit(i, UnitKind::Barbarian, Side::Home, 4, i as i32))
            .collect();
        units.push(test_unit(clan, UnitKind::Knight, Side::Home, 5, 0));
        units
    }

    #[test]
    fn test_no_buff_above_half() {
        let units = roster(2);
        let clan = ClanBonus::from_roster(&units, Side::Home);
        assert_eq!(clan.tier, Tier::Minor);
        assert!(clan.buff_for(&units[0]).is_none());
    }

    #[test]
    fn test_minor_tier_only_clan_units() {
        let mut units = roster(2);
        let clan = ClanBonus::from_roster(&units, Side::Home);
        for u in units.iter_mut() {
            u.hp = u.max_hp * 0.4;
        }
        assert_eq!(clan.buff_for(&units[0]), Some(WEAK));
        assert!(clan.buff_for(&units[2]).is_none());
    }

    #[test]
    fn test_major_tier_everyone_qualifies() {
        let mut units = roster(4);
        let clan = ClanBonus::from_roster(&units, Side::Home);
        assert_eq!(clan.tier, Tier::Major);
        for u in units.iter_mut() {
            u.hp = u.max_hp * 0.5;
        }
        assert_eq!(clan.buff_for(&units[0]), Some(STRONG));
        assert_eq!(clan.buff_for(&units[4]), Some(WEAK));
    }

    #[test]
    fn test_triggers_once() {
        let mut units = roster(2);
        let clan = ClanBonus::from_roster(&units, Side::Home);
        units[0].hp = 1.0;
        units[0].clan_triggered = true;
        assert!(clan.buff_for(&units[0]).is_none());
    }
}
