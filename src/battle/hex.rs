//! Hex coordinate system for the battle board (even-r offset coordinates)
//!
//! Cells are addressed by (row, col). Even rows are shifted half a cell to
//! the right, so the neighbor set depends on row parity. Geometry that needs
//! straight lines converts to cube coordinates and back.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Neighbor offsets (d_row, d_col) for even rows
pub const EVEN_ROW_OFFSETS: [(i32, i32); 6] = [(-1, 0), (-1, 1), (0, 1), (1, 1), (1, 0), (0, -1)];

/// Neighbor offsets (d_row, d_col) for odd rows
pub const ODD_ROW_OFFSETS: [(i32, i32); 6] = [(-1, -1), (-1, 0), (0, 1), (1, 0), (1, -1), (0, -1)];

/// Offset hex coordinate on the battle board
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct HexCoord {
    pub row: i32,
    pub col: i32,
}

impl HexCoord {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Offsets to use for this cell's row parity
    pub fn offsets(&self) -> &'static [(i32, i32); 6] {
        if self.row.rem_euclid(2) == 0 {
            &EVEN_ROW_OFFSETS
        } else {
            &ODD_ROW_OFFSETS
        }
    }

    /// All 6 neighboring coordinates, ignoring board bounds
    pub fn neighbors(&self) -> [HexCoord; 6] {
        let offsets = self.offsets();
        let mut out = [*self; 6];
        for (slot, (dr, dc)) in out.iter_mut().zip(offsets.iter()) {
            *slot = HexCoord::new(self.row + dr, self.col + dc);
        }
        out
    }

    /// Convert to cube coordinates (q, r, s)
    pub fn to_cube(&self) -> (i32, i32, i32) {
        let q = self.col - (self.row + (self.row & 1)) / 2;
        let r = self.row;
        (q, r, -q - r)
    }

    /// Convert axial (q, r) back to offset coordinates
    pub fn from_axial(q: i32, r: i32) -> Self {
        Self::new(r, q + (r + (r & 1)) / 2)
    }

    /// Straight-line hex distance on an unbounded plane
    pub fn cube_distance(&self, other: &Self) -> u32 {
        let (aq, ar, a_s) = self.to_cube();
        let (bq, br, b_s) = other.to_cube();
        (((aq - bq).abs() + (ar - br).abs() + (a_s - b_s).abs()) / 2) as u32
    }

    /// Get hex coordinates in a line from self to other (inclusive)
    pub fn line_to(&self, other: &Self) -> Vec<HexCoord> {
        let n = self.cube_distance(other) as i32;
        if n == 0 {
            return vec![*self];
        }

        // Nudge off hex edges so ties round the same way every time
        let (aq, ar, _) = self.to_cube();
        let (bq, br, _) = other.to_cube();
        let (aq, ar) = (aq as f64 + 1e-6, ar as f64 + 2e-6);
        let (bq, br) = (bq as f64 + 1e-6, br as f64 + 2e-6);

        let mut results = Vec::with_capacity((n + 1) as usize);
        for i in 0..=n {
            let t = i as f64 / n as f64;
            let (rq, rr) = Self::round(aq + (bq - aq) * t, ar + (br - ar) * t);
            results.push(Self::from_axial(rq, rr));
        }
        results
    }

    /// Cells along the ray from self through `through`, excluding self
    ///
    /// Returns exactly `len` cells (unbounded); callers clip to the board.
    pub fn ray(&self, through: &Self, len: usize) -> Vec<HexCoord> {
        let n = self.cube_distance(through) as usize;
        if n == 0 || len == 0 {
            return Vec::new();
        }

        let scale = (len / n + 1) as i32;
        let (aq, ar, _) = self.to_cube();
        let (bq, br, _) = through.to_cube();
        let far = Self::from_axial(aq + (bq - aq) * scale, ar + (br - ar) * scale);

        self.line_to(&far).into_iter().skip(1).take(len).collect()
    }

    /// Round floating point axial coordinates to the nearest hex
    fn round(q: f64, r: f64) -> (i32, i32) {
        let s = -q - r;
        let mut rq = q.round();
        let mut rr = r.round();
        let rs = s.round();

        let q_diff = (rq - q).abs();
        let r_diff = (rr - r).abs();
        let s_diff = (rs - s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            rq = -rr - rs;
        } else if r_diff > s_diff {
            rr = -rq - rs;
        }

        (rq as i32, rr as i32)
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}
