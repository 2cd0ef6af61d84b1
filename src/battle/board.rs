//! Bounded hex board topology
//!
//! The board is a fixed rectangle of offset hexes. Distances are hop counts
//! over in-bounds cells, precomputed once by breadth-first search from every
//! cell so lookups during a tick are O(1).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::battle::constants::MAX_BOARD_SIDE;
use crate::battle::hex::HexCoord;

/// Distance sentinel for cells that cannot reach each other
pub const UNREACHABLE: u32 = u32::MAX;

/// Rectangular hex board with a cached all-pairs distance table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HexBoard {
    rows: i32,
    cols: i32,
    distances: Vec<u32>,
}

impl HexBoard {
    /// Dimensions are clamped to `0..=MAX_BOARD_SIDE`
    pub fn new(rows: i32, cols: i32) -> Self {
        let rows = rows.clamp(0, MAX_BOARD_SIDE);
        let cols = cols.clamp(0, MAX_BOARD_SIDE);
        let mut board = Self {
            rows,
            cols,
            distances: Vec::new(),
        };
        board.distances = board.compute_distances();
        board
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        (self.rows * self.cols) as usize
    }

    pub fn in_bounds(&self, cell: HexCoord) -> bool {
        cell.row >= 0 && cell.row < self.rows && cell.col >= 0 && cell.col < self.cols
    }

    /// Row-major index of a cell, if it is on the board
    pub fn index(&self, cell: HexCoord) -> Option<usize> {
        if self.in_bounds(cell) {
            Some((cell.row * self.cols + cell.col) as usize)
        } else {
            None
        }
    }

    /// Inverse of [`HexBoard::index`]
    pub fn coord(&self, index: usize) -> HexCoord {
        let index = index as i32;
        HexCoord::new(index / self.cols, index % self.cols)
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = HexCoord> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| HexCoord::new(row, col)))
    }

    /// In-bounds neighbors, in parity-table order
    pub fn neighbors(&self, cell: HexCoord) -> Vec<HexCoord> {
        if !self.in_bounds(cell) {
            return Vec::new();
        }
        cell.neighbors()
            .into_iter()
            .filter(|n| self.in_bounds(*n))
            .collect()
    }

    /// Shortest hop count between two cells, or [`UNREACHABLE`]
    pub fn distance(&self, a: HexCoord, b: HexCoord) -> u32 {
        match (self.index(a), self.index(b)) {
            (Some(ia), Some(ib)) => self.distances[ia * self.cell_count() + ib],
            _ => UNREACHABLE,
        }
    }

    /// Cells within `radius` hops of `center` (inclusive), row-major
    pub fn cells_within(&self, center: HexCoord, radius: u32) -> Vec<HexCoord> {
        self.cells()
            .filter(|c| self.distance(center, *c) <= radius)
            .collect()
    }

    /// Point reflection used to deploy the away side
    pub fn mirror(&self, cell: HexCoord) -> HexCoord {
        HexCoord::new(self.rows - 1 - cell.row, self.cols - 1 - cell.col)
    }

    fn compute_distances(&self) -> Vec<u32> {
        let n = self.cell_count();
        let mut table = vec![UNREACHABLE; n * n];

        for start in 0..n {
            let row = &mut table[start * n..(start + 1) * n];
            row[start] = 0;
            let mut queue = VecDeque::from([self.coord(start)]);

            while let Some(current) = queue.pop_front() {
                let Some(ci) = self.index(current) else {
                    continue;
                };
                let next_dist = row[ci] + 1;
                for neighbor in self.neighbors(current) {
                    if let Some(ni) = self.index(neighbor) {
                        if row[ni] == UNREACHABLE {
                            row[ni] = next_dist;
                            queue.push_back(neighbor);
                        }
                    }
                }
            }
        }

        table
    }
}

impl Default for HexBoard {
    fn default() -> Self {
        Self::new(
            crate::battle::constants::BOARD_ROWS,
            crate::battle::constants::BOARD_COLS,
        )
    }
}
