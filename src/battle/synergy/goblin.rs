//! Goblin: a free unit for the next shop phase
//!
//! The reward never touches combat. It is queued as a `BenchGrant` that the
//! economy layer drains after the battle.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{count_tag, Tier};
use crate::battle::unit_type::{SynergyTag, UnitKind};
use crate::battle::units::CombatUnit;
use crate::core::types::{PlayerId, Side};

/// "Give `unit` at `star` to `player`'s bench"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchGrant {
    pub player: PlayerId,
    pub unit: UnitKind,
    pub star: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoblinReward {
    pub tier: Tier,
}

impl GoblinReward {
    pub fn from_roster(units: &[CombatUnit], side: Side) -> Self {
        Self {
            tier: Tier::from_count(count_tag(units, side, SynergyTag::Goblin)),
        }
    }

    /// Goblin kinds the current tier can hand out
    pub fn pool(&self) -> Vec<UnitKind> {
        let goblins = UnitKind::purchasable().filter(|k| k.has_tag(SynergyTag::Goblin));
        match self.tier {
            Tier::Inactive => Vec::new(),
            Tier::Minor => goblins.filter(|k| k.base_stats().cost == 2).collect(),
            Tier::Major => goblins.filter(|k| k.base_stats().cost >= 3).collect(),
        }
    }

    pub fn roll<R: Rng>(&self, player: PlayerId, rng: &mut R) -> Option<BenchGrant> {
        self.pool().choose(rng).map(|&unit| BenchGrant {
            player,
            unit,
            star: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::units::test_unit;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_minor_pool_is_cheap_goblins() {
        let reward = GoblinReward { tier: Tier::Minor };
        let pool = reward.pool();
        assert!(pool.contains(&UnitKind::Goblin));
        assert!(pool.contains(&UnitKind::SpearGoblin));
        assert!(!pool.contains(&UnitKind::GoblinMachine));
    }

    #[test]
    fn test_major_pool_is_expensive_goblins() {
        let reward = GoblinReward { tier: Tier::Major };
        let pool = reward.pool();
        assert!(pool.contains(&UnitKind::DartGoblin));
        assert!(pool.contains(&UnitKind::GoblinMachine));
        assert!(!pool.contains(&UnitKind::Goblin));
    }

    #[test]
    fn test_roll_from_roster() {
        let units = vec![
            test_unit(0, UnitKind::Goblin, Side::Home, 4, 0),
            test_unit(1, UnitKind::SpearGoblin, Side::Home, 4, 1),
        ];
        let reward = GoblinReward::from_roster(&units, Side::Home);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let grant = reward.roll(PlayerId(1), &mut rng).expect("minor tier grants");
        assert_eq!(grant.player, PlayerId(1));
        assert_eq!(grant.star, 1);
        assert!(reward.pool().contains(&grant.unit));
    }

    #[test]
    fn test_inactive_grants_nothing() {
        let reward = GoblinReward::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert!(reward.roll(PlayerId(1), &mut rng).is_none());
    }
}
