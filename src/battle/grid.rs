//! Cell occupancy for the battle board
//!
//! The grid is the only shared mutable structure during a tick. Every write
//! goes through `place`, `vacate` or `move_unit` so a cell holds a unit id
//! exactly when that unit is standing there.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::battle::board::HexBoard;
use crate::battle::hex::HexCoord;
use crate::core::error::{Result, SkirmishError};
use crate::core::types::UnitId;

/// Row-major occupancy table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    rows: i32,
    cols: i32,
    cells: Vec<Option<UnitId>>,
}

impl Grid {
    pub fn new(board: &HexBoard) -> Self {
        Self {
            rows: board.rows(),
            cols: board.cols(),
            cells: vec![None; board.cell_count()],
        }
    }

    fn index(&self, cell: HexCoord) -> Option<usize> {
        if cell.row >= 0 && cell.row < self.rows && cell.col >= 0 && cell.col < self.cols {
            Some((cell.row * self.cols + cell.col) as usize)
        } else {
            None
        }
    }

    /// Occupant of a cell, `None` if empty or off the board
    pub fn get(&self, cell: HexCoord) -> Option<UnitId> {
        self.index(cell).and_then(|i| self.cells[i])
    }

    pub fn is_free(&self, cell: HexCoord) -> bool {
        matches!(self.index(cell), Some(i) if self.cells[i].is_none())
    }

    /// Put a unit on an empty cell
    pub fn place(&mut self, unit: UnitId, cell: HexCoord) -> Result<()> {
        let idx = self.index(cell).ok_or(SkirmishError::OutOfBounds(cell))?;
        match self.cells[idx] {
            Some(occupant) if occupant != unit => {
                Err(SkirmishError::CellOccupied { cell, occupant })
            }
            _ => {
                self.cells[idx] = Some(unit);
                Ok(())
            }
        }
    }

    /// Clear a unit's cell
    ///
    /// If the cell holds some other unit the grid has drifted from the unit
    /// table; the other unit's entry is left untouched.
    pub fn vacate(&mut self, unit: UnitId, cell: HexCoord) {
        let Some(idx) = self.index(cell) else {
            warn!(%unit, %cell, "vacate outside board");
            return;
        };
        match self.cells[idx] {
            Some(occupant) if occupant == unit => self.cells[idx] = None,
            Some(occupant) => {
                warn!(%unit, %cell, %occupant, "grid desync: cell held by another unit");
            }
            None => {
                warn!(%unit, %cell, "grid desync: cell already empty");
            }
        }
    }

    /// Move a unit from one cell to another in a single step
    ///
    /// Rejected moves leave the grid unchanged.
    pub fn move_unit(&mut self, unit: UnitId, from: HexCoord, to: HexCoord) -> Result<()> {
        let to_idx = self.index(to).ok_or(SkirmishError::OutOfBounds(to))?;
        if let Some(occupant) = self.cells[to_idx] {
            if occupant != unit {
                return Err(SkirmishError::CellOccupied { cell: to, occupant });
            }
        }
        self.vacate(unit, from);
        self.cells[to_idx] = Some(unit);
        Ok(())
    }

    /// Occupied cells with their occupants, row-major
    pub fn occupied(&self) -> impl Iterator<Item = (HexCoord, UnitId)> + '_ {
        let cols = self.cols;
        self.cells.iter().enumerate().filter_map(move |(i, slot)| {
            slot.map(|id| (HexCoord::new(i as i32 / cols, i as i32 % cols), id))
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}
