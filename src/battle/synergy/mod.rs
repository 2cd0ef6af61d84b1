//! Team synergies
//!
//! Each side gets one `SynergySet` per battle, computed from its roster at
//! setup. Every tag has its own small manager; they never read each other.
//! Most bonuses unlock at 2 tagged units and grow at 4.

pub mod ace;
pub mod avenger;
pub mod brawler;
pub mod clan;
pub mod goblin;
pub mod noble;
pub mod ranger;
pub mod thrower;
pub mod undead;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::battle::board::HexBoard;
use crate::battle::unit_type::SynergyTag;
use crate::battle::units::CombatUnit;
use crate::core::types::{PlayerId, Side, UnitId};

pub use ace::AceBonus;
pub use avenger::AvengerBonus;
pub use brawler::BrawlerBonus;
pub use clan::{ClanBonus, ClanBuff};
pub use goblin::{BenchGrant, GoblinReward};
pub use noble::{NobleBonus, RowClass};
pub use ranger::RangerBonus;
pub use thrower::ThrowerBonus;
pub use undead::UndeadBonus;

/// Unit count needed for the minor tier
pub const MINOR_THRESHOLD: usize = 2;
/// Unit count needed for the major tier
pub const MAJOR_THRESHOLD: usize = 4;

/// Strength of a synergy for one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Tier {
    #[default]
    Inactive,
    Minor,
    Major,
}

impl Tier {
    pub fn from_count(count: usize) -> Self {
        if count >= MAJOR_THRESHOLD {
            Tier::Major
        } else if count >= MINOR_THRESHOLD {
            Tier::Minor
        } else {
            Tier::Inactive
        }
    }

    pub fn is_active(&self) -> bool {
        *self != Tier::Inactive
    }

    /// Choose the value for this tier, `None` when inactive
    pub fn pick<T>(&self, minor: T, major: T) -> Option<T> {
        match self {
            Tier::Inactive => None,
            Tier::Minor => Some(minor),
            Tier::Major => Some(major),
        }
    }
}

/// Non-summoned units of `side` that carry `tag`
pub fn count_tag(units: &[CombatUnit], side: Side, tag: SynergyTag) -> usize {
    units
        .iter()
        .filter(|u| u.side == side && !u.summoned && u.has_tag(tag))
        .count()
}

/// All synergy managers for one side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynergySet {
    pub side: Side,
    pub owner: PlayerId,
    pub clan: ClanBonus,
    pub brawler: BrawlerBonus,
    pub noble: NobleBonus,
    pub ranger: RangerBonus,
    pub undead: UndeadBonus,
    pub avenger: AvengerBonus,
    pub ace: AceBonus,
    pub thrower: ThrowerBonus,
    pub goblin: GoblinReward,
}

impl SynergySet {
    /// Count tags and derive every manager from the deployed roster
    pub fn from_roster(side: Side, owner: PlayerId, units: &[CombatUnit], board: &HexBoard) -> Self {
        Self {
            side,
            owner,
            clan: ClanBonus::from_roster(units, side),
            brawler: BrawlerBonus::from_roster(units, side),
            noble: NobleBonus::from_roster(units, side, board),
            ranger: RangerBonus::from_roster(units, side),
            undead: UndeadBonus::from_roster(units, side),
            avenger: AvengerBonus::from_roster(units, side),
            ace: AceBonus::from_roster(units, side),
            thrower: ThrowerBonus::from_roster(units, side),
            goblin: GoblinReward::from_roster(units, side),
        }
    }

    /// Active tags with their tiers, for logging and snapshots
    pub fn active(&self) -> Vec<(SynergyTag, Tier)> {
        [
            (SynergyTag::Clan, self.clan.tier),
            (SynergyTag::Brawler, self.brawler.tier),
            (SynergyTag::Noble, self.noble.tier),
            (SynergyTag::Ranger, self.ranger.tier),
            (SynergyTag::Undead, self.undead.tier),
            (SynergyTag::Avenger, self.avenger.tier),
            (SynergyTag::Ace, self.ace.tier),
            (SynergyTag::Thrower, self.thrower.tier),
            (SynergyTag::Goblin, self.goblin.tier),
        ]
        .into_iter()
        .filter(|(_, tier)| tier.is_active())
        .collect()
    }

    pub fn log_active(&self) {
        for (tag, tier) in self.active() {
            info!(side = ?self.side, ?tag, ?tier, "synergy active");
        }
    }

    /// Outgoing damage multiplier for one hit from `attacker`
    ///
    /// `distance` is the hop distance from attacker to the unit being hit.
    pub fn damage_dealt_multiplier(&self, attacker: &CombatUnit, distance: u32, units: &[CombatUnit]) -> f32 {
        self.noble.damage_dealt_multiplier(attacker)
            * self.thrower.damage_multiplier(attacker, distance)
            * self.undead.damage_multiplier(attacker)
            * self.avenger.damage_multiplier(attacker, units)
            * self.ace.damage_multiplier(attacker.id)
    }

    /// Incoming damage multiplier for `defender`
    pub fn damage_taken_multiplier(&self, defender: &CombatUnit) -> f32 {
        self.noble.damage_taken_multiplier(defender)
    }

    /// Attack interval multiplier from roster-derived synergies
    pub fn interval_multiplier(&self, unit: &CombatUnit) -> f32 {
        self.ranger.interval_multiplier(unit)
    }

    pub fn is_captain(&self, unit: UnitId) -> bool {
        self.ace.captain == Some(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(Tier::from_count(0), Tier::Inactive);
        assert_eq!(Tier::from_count(1), Tier::Inactive);
        assert_eq!(Tier::from_count(2), Tier::Minor);
        assert_eq!(Tier::from_count(3), Tier::Minor);
        assert_eq!(Tier::from_count(4), Tier::Major);
        assert_eq!(Tier::from_count(9), Tier::Major);
    }

    #[test]
    fn test_tier_pick() {
        assert_eq!(Tier::Inactive.pick(1, 2), None);
        assert_eq!(Tier::Minor.pick(1, 2), Some(1));
        assert_eq!(Tier::Major.pick(1, 2), Some(2));
    }
}
