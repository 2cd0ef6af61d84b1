//! Unit catalog and star-scaled definitions
//!
//! Each kind has fixed base stats. A `UnitDefinition` is a kind at a given
//! star level with health and damage already scaled by 2^(star-1).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::battle::constants::{MAX_STAR, MIN_STAR};
use crate::core::error::{Result, SkirmishError};

/// Team-bonus tag carried by a unit kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SynergyTag {
    Clan,
    Brawler,
    Noble,
    Ranger,
    Undead,
    Avenger,
    Ace,
    Thrower,
    Goblin,
    // Catalog-only tags; no bonus attached
    Juggernaut,
    Assassin,
}

/// Every unit the engine knows how to fight with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitKind {
    Knight,
    Archer,
    Goblin,
    SpearGoblin,
    Bomber,
    Barbarian,
    Valkyrie,
    Pekka,
    Prince,
    GiantSkeleton,
    DartGoblin,
    Executioner,
    Princess,
    MegaKnight,
    RoyalGhost,
    Bandit,
    GoblinMachine,
    SkeletonKing,
    GoldenKnight,
    ArcherQueen,
    Skeleton,
}

/// Unscaled stats for a kind (star 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseStats {
    pub health: f32,
    pub damage: f32,
    pub range: u32,
    pub speed: f32,
    pub attack_interval: f32,
    pub cost: u32,
}

const fn stats(health: f32, damage: f32, range: u32, speed: f32, attack_interval: f32, cost: u32) -> BaseStats {
    BaseStats {
        health,
        damage,
        range,
        speed,
        attack_interval,
        cost,
    }
}

impl UnitKind {
    pub const ALL: [UnitKind; 21] = [
        UnitKind::Knight,
        UnitKind::Archer,
        UnitKind::Goblin,
        UnitKind::SpearGoblin,
        UnitKind::Bomber,
        UnitKind::Barbarian,
        UnitKind::Valkyrie,
        UnitKind::Pekka,
        UnitKind::Prince,
        UnitKind::GiantSkeleton,
        UnitKind::DartGoblin,
        UnitKind::Executioner,
        UnitKind::Princess,
        UnitKind::MegaKnight,
        UnitKind::RoyalGhost,
        UnitKind::Bandit,
        UnitKind::GoblinMachine,
        UnitKind::SkeletonKing,
        UnitKind::GoldenKnight,
        UnitKind::ArcherQueen,
        UnitKind::Skeleton,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            UnitKind::Knight => "knight",
            UnitKind::Archer => "archer",
            UnitKind::Goblin => "goblin",
            UnitKind::SpearGoblin => "spear-goblin",
            UnitKind::Bomber => "bomber",
            UnitKind::Barbarian => "barbarian",
            UnitKind::Valkyrie => "valkyrie",
            UnitKind::Pekka => "pekka",
            UnitKind::Prince => "prince",
            UnitKind::GiantSkeleton => "giant-skeleton",
            UnitKind::DartGoblin => "dart-goblin",
            UnitKind::Executioner => "executioner",
            UnitKind::Princess => "princess",
            UnitKind::MegaKnight => "mega-knight",
            UnitKind::RoyalGhost => "royal-ghost",
            UnitKind::Bandit => "bandit",
            UnitKind::GoblinMachine => "goblin-machine",
            UnitKind::SkeletonKing => "skeleton-king",
            UnitKind::GoldenKnight => "golden-knight",
            UnitKind::ArcherQueen => "archer-queen",
            UnitKind::Skeleton => "skeleton",
        }
    }

    pub fn base_stats(&self) -> BaseStats {
        match self {
            UnitKind::Knight => stats(1186.0, 59.0, 1, 2.0, 1.66, 2),
            UnitKind::Archer => stats(474.0, 83.0, 4, 2.0, 1.0, 2),
            UnitKind::Goblin => stats(498.0, 106.0, 1, 2.0, 0.66, 2),
            UnitKind::SpearGoblin => stats(354.0, 153.0, 3, 2.0, 1.66, 2),
            UnitKind::Bomber => stats(474.0, 106.0, 3, 2.0, 1.42, 2),
            UnitKind::Barbarian => stats(830.0, 94.0, 1, 2.0, 1.0, 2),
            UnitKind::Valkyrie => stats(1255.0, 125.0, 1, 2.0, 1.66, 3),
            UnitKind::Pekka => stats(1293.0, 363.0, 1, 1.0, 2.5, 3),
            UnitKind::Prince => stats(858.0, 118.0, 1, 2.0, 1.25, 3),
            UnitKind::GiantSkeleton => stats(969.0, 53.0, 1, 1.0, 1.66, 3),
            UnitKind::DartGoblin => stats(627.0, 79.0, 4, 2.0, 0.83, 3),
            UnitKind::Executioner => stats(757.0, 130.0, 4, 2.0, 2.0, 3),
            UnitKind::Princess => stats(613.0, 163.0, 6, 2.0, 2.0, 4),
            UnitKind::MegaKnight => stats(1527.0, 101.0, 1, 1.0, 1.66, 4),
            UnitKind::RoyalGhost => stats(872.0, 133.0, 1, 2.0, 1.0, 4),
            UnitKind::Bandit => stats(821.0, 82.0, 1, 2.0, 1.11, 4),
            UnitKind::GoblinMachine => stats(1128.0, 82.0, 1, 2.0, 1.0, 4),
            UnitKind::SkeletonKing => stats(1377.0, 177.0, 1, 1.0, 2.0, 5),
            UnitKind::GoldenKnight => stats(1191.0, 139.0, 1, 2.0, 1.25, 5),
            UnitKind::ArcherQueen => stats(840.0, 88.0, 4, 2.0, 1.25, 5),
            UnitKind::Skeleton => stats(610.0, 73.0, 1, 2.0, 1.43, 0),
        }
    }

    pub fn tags(&self) -> &'static [SynergyTag] {
        use SynergyTag::*;
        match self {
            UnitKind::Knight => &[Juggernaut, Noble],
            UnitKind::Archer => &[Clan, Ranger],
            UnitKind::Goblin => &[Goblin, Assassin],
            UnitKind::SpearGoblin => &[Goblin, Thrower],
            UnitKind::Bomber => &[Undead, Thrower],
            UnitKind::Barbarian => &[Clan, Brawler],
            UnitKind::Valkyrie => &[Clan, Avenger],
            UnitKind::Pekka => &[Ace, Juggernaut],
            UnitKind::Prince => &[Noble, Brawler],
            UnitKind::GiantSkeleton => &[Undead, Brawler],
            UnitKind::DartGoblin => &[Goblin, Ranger],
            UnitKind::Executioner => &[Ace, Thrower],
            UnitKind::Princess => &[Noble, Ranger],
            UnitKind::MegaKnight => &[Ace, Brawler],
            UnitKind::RoyalGhost => &[Undead, Assassin],
            UnitKind::Bandit => &[Ace, Avenger],
            UnitKind::GoblinMachine => &[Goblin, Juggernaut],
            UnitKind::SkeletonKing => &[Undead, Juggernaut],
            UnitKind::GoldenKnight => &[Noble, Assassin],
            UnitKind::ArcherQueen => &[Clan, Avenger],
            UnitKind::Skeleton => &[],
        }
    }

    pub fn has_tag(&self, tag: SynergyTag) -> bool {
        self.tags().contains(&tag)
    }

    /// Kinds that can be bought, i.e. everything except summons
    pub fn purchasable() -> impl Iterator<Item = UnitKind> {
        Self::ALL.into_iter().filter(|k| k.base_stats().cost > 0)
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnitKind {
    type Err = SkirmishError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| SkirmishError::UnknownUnit(s.to_string()))
    }
}

/// A unit kind at a star level, with scaled stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDefinition {
    pub kind: UnitKind,
    pub star: u8,
    pub health: f32,
    pub damage: f32,
    pub range: u32,
    pub speed: f32,
    pub attack_interval: f32,
    pub cost: u32,
}

impl UnitDefinition {
    pub fn new(kind: UnitKind, star: u8) -> Result<Self> {
        if !(MIN_STAR..=MAX_STAR).contains(&star) {
            return Err(SkirmishError::InvalidStar(star));
        }
        let base = kind.base_stats();
        let scale = star_multiplier(star);
        Ok(Self {
            kind,
            star,
            health: base.health * scale,
            damage: base.damage * scale,
            range: base.range,
            speed: base.speed,
            attack_interval: base.attack_interval,
            cost: base.cost,
        })
    }

    /// Look a kind up by its catalog name
    pub fn from_name(name: &str, star: u8) -> Result<Self> {
        Self::new(name.parse()?, star)
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn tags(&self) -> &'static [SynergyTag] {
        self.kind.tags()
    }

    pub fn has_tag(&self, tag: SynergyTag) -> bool {
        self.kind.has_tag(tag)
    }
}

/// Stat multiplier for a star level: 1, 2, 4, 8
pub fn star_multiplier(star: u8) -> f32 {
    2f32.powi(star.saturating_sub(1) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_scaling_doubles() {
        for kind in UnitKind::ALL {
            for star in MIN_STAR..MAX_STAR {
                let lo = UnitDefinition::new(kind, star).expect("valid star");
                let hi = UnitDefinition::new(kind, star + 1).expect("valid star");
                assert_eq!(hi.health, lo.health * 2.0);
                assert_eq!(hi.damage, lo.damage * 2.0);
                assert_eq!(hi.range, lo.range);
            }
        }
    }

    #[test]
    fn test_invalid_star_rejected() {
        assert!(matches!(
            UnitDefinition::new(UnitKind::Knight, 0),
            Err(SkirmishError::InvalidStar(0))
        ));
        assert!(UnitDefinition::new(UnitKind::Knight, 5).is_err());
    }

    #[test]
    fn test_name_round_trip() {
        for kind in UnitKind::ALL {
            assert_eq!(kind.name().parse::<UnitKind>().expect("catalog name"), kind);
        }
        assert_eq!("Mega_Knight".parse::<UnitKind>().expect("loose name"), UnitKind::MegaKnight);
    }

    #[test]
    fn test_unknown_name() {
        assert!(matches!(
            "dragon".parse::<UnitKind>(),
            Err(SkirmishError::UnknownUnit(_))
        ));
    }

    #[test]
    fn test_skeleton_not_purchasable() {
        assert!(UnitKind::purchasable().all(|k| k != UnitKind::Skeleton));
        assert_eq!(UnitKind::purchasable().count(), 20);
    }

    #[test]
    fn test_tags() {
        assert!(UnitKind::Barbarian.has_tag(SynergyTag::Clan));
        assert!(UnitKind::Barbarian.has_tag(SynergyTag::Brawler));
        assert!(!UnitKind::Barbarian.has_tag(SynergyTag::Noble));
        assert!(UnitKind::Skeleton.tags().is_empty());
    }
}
