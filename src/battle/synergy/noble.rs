//! Noble: frontline nobles shrug off damage, backline nobles hit harder

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{count_tag, Tier};
use crate::battle::board::HexBoard;
use crate::battle::hex::HexCoord;
use crate::battle::unit_type::SynergyTag;
use crate::battle::units::CombatUnit;
use crate::core::types::{Side, UnitId};

/// Where a unit stood inside its own half at setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowClass {
    Front,
    Back,
}

impl RowClass {
    /// Classify a cell for `side`; rows nearest the centre line are front
    pub fn of(cell: HexCoord, side: Side, board: &HexBoard) -> Self {
        let half = board.rows() / 2;
        let depth = match side {
            Side::Home => cell.row - half,
            Side::Away => (board.rows() - 1 - cell.row) - half,
        };
        if depth < (half + 1) / 2 {
            RowClass::Front
        } else {
            RowClass::Back
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NobleBonus {
    pub tier: Tier,
    pub rows: BTreeMap<UnitId, RowClass>,
}

impl NobleBonus {
    pub fn from_roster(units: &[CombatUnit], side: Side, board: &HexBoard) -> Self {
        let tier = Tier::from_count(count_tag(units, side, SynergyTag::Noble));
        let rows = units
            .iter()
            .filter(|u| u.side == side && u.has_tag(SynergyTag::Noble))
            .filter_map(|u| u.position.map(|cell| (u.id, RowClass::of(cell, side, board))))
            .collect();
        Self { tier, rows }
    }

    pub fn damage_taken_multiplier(&self, unit: &CombatUnit) -> f32 {
        match self.rows.get(&unit.id) {
            Some(RowClass::Front) => self.tier.pick(0.8, 0.6).unwrap_or(1.0),
            _ => 1.0,
        }
    }

    pub fn damage_dealt_multiplier(&self, unit: &CombatUnit) -> f32 {
        match self.rows.get(&unit.id) {
            Some(RowClass::Back) => self.tier.pick(1.2, 1.4).unwrap_or(1.0),
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::unit_type::UnitKind;
    use crate::battle::units::test_unit;

    #[test]
    fn test_row_class_home() {
        let board = HexBoard::default();
        assert_eq!(RowClass::of(HexCoord::new(4, 0), Side::Home, &board), RowClass::Front);
        assert_eq!(RowClass::of(HexCoord::new(5, 0), Side::Home, &board), RowClass::Front);
        assert_eq!(RowClass::of(HexCoord::new(6, 0), Side::Home, &board), RowClass::Back);
        assert_eq!(RowClass::of(HexCoord::new(7, 0), Side::Home, &board), RowClass::Back);
    }

    #[test]
    fn test_row_class_mirrors_for_away() {
        let board = HexBoard::default();
        for cell in board.cells().filter(|c| c.row >= 4) {
            assert_eq!(
                RowClass::of(cell, Side::Home, &board),
                RowClass::of(board.mirror(cell), Side::Away, &board)
            );
        }
    }

    #[test]
    fn test_front_and_back_multipliers() {
        let board = HexBoard::default();
        let units = vec![
            test_unit(0, UnitKind::Knight, Side::Home, 4, 0),
            test_unit(1, UnitKind::Princess, Side::Home, 7, 0),
        ];
        let noble = NobleBonus::from_roster(&units, Side::Home, &board);
        assert_eq!(noble.tier, Tier::Minor);
        assert_eq!(noble.damage_taken_multiplier(&units[0]), 0.8);
        assert_eq!(noble.damage_dealt_multiplier(&units[0]), 1.0);
        assert_eq!(noble.damage_taken_multiplier(&units[1]), 1.0);
        assert_eq!(noble.damage_dealt_multiplier(&units[1]), 1.2);
    }

    #[test]
    fn test_single_noble_inactive() {
        let board = HexBoard::default();
        let units = vec![test_unit(0, UnitKind::Knight, Side::Home, 4, 0)];
        let noble = NobleBonus::from_roster(&units, Side::Home, &board);
        assert_eq!(noble.damage_taken_multiplier(&units[0]), 1.0);
    }
}
