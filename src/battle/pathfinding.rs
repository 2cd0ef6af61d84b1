//! Range-aware breadth-first pathfinding
//!
//! Units never path *to* a target; they path until some cell is within
//! attack range of it. Every step costs the same, so plain BFS over free
//! cells gives shortest paths. Occupied and reserved cells are walls.

use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};

use crate::battle::board::HexBoard;
use crate::battle::hex::HexCoord;
use crate::battle::units::CombatUnit;
use crate::core::types::UnitId;

/// Set of cells treated as blocked by movement and placement
pub type CellSet = AHashSet<HexCoord>;

/// Cells held by standing units, optionally skipping one unit, plus reserved cells
pub fn occupied_set(units: &[CombatUnit], excluding: Option<UnitId>, reserved: &CellSet) -> CellSet {
    let mut occupied: CellSet = units
        .iter()
        .filter(|u| Some(u.id) != excluding)
        .filter_map(|u| u.position)
        .collect();
    occupied.extend(reserved.iter().copied());
    occupied
}

/// Whether `from` can attack `to` with the given range
pub fn is_in_range(board: &HexBoard, from: HexCoord, to: HexCoord, range: u32) -> bool {
    board.distance(from, to) <= range
}

/// Shortest path from `start` to any free cell within `range` of `target`
///
/// The returned path includes `start`. A path of one cell means the start
/// is already in range. `None` means no free route exists this tick.
pub fn path_to_range(
    board: &HexBoard,
    start: HexCoord,
    target: HexCoord,
    range: u32,
    occupied: &CellSet,
) -> Option<Vec<HexCoord>> {
    if !board.in_bounds(start) || !board.in_bounds(target) {
        return None;
    }
    if is_in_range(board, start, target, range) {
        return Some(vec![start]);
    }

    let mut came_from: AHashMap<HexCoord, HexCoord> = AHashMap::new();
    let mut visited: CellSet = AHashSet::new();
    let mut queue = VecDeque::from([start]);
    visited.insert(start);

    while let Some(current) = queue.pop_front() {
        for neighbor in board.neighbors(current) {
            if visited.contains(&neighbor) || occupied.contains(&neighbor) {
                continue;
            }
            visited.insert(neighbor);
            came_from.insert(neighbor, current);

            if is_in_range(board, neighbor, target, range) {
                return Some(reconstruct_path(&came_from, start, neighbor));
            }
            queue.push_back(neighbor);
        }
    }

    None
}

/// Number of moves `path_to_range` needs, or `None` if unreachable
pub fn path_steps(
    board: &HexBoard,
    start: HexCoord,
    target: HexCoord,
    range: u32,
    occupied: &CellSet,
) -> Option<u32> {
    path_to_range(board, start, target, range, occupied).map(|p| (p.len() - 1) as u32)
}

/// Nearest free cell to `origin` by BFS over the whole board (ignoring walls)
///
/// Ties resolve in neighbor-table order. The origin itself counts if free.
pub fn nearest_free_cell(board: &HexBoard, origin: HexCoord, occupied: &CellSet) -> Option<HexCoord> {
    if !board.in_bounds(origin) {
        return None;
    }
    let mut visited: CellSet = AHashSet::new();
    let mut queue = VecDeque::from([origin]);
    visited.insert(origin);

    while let Some(current) = queue.pop_front() {
        if !occupied.contains(&current) {
            return Some(current);
        }
        for neighbor in board.neighbors(current) {
            if visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    None
}

fn reconstruct_path(
    came_from: &AHashMap<HexCoord, HexCoord>,
    start: HexCoord,
    end: HexCoord,
) -> Vec<HexCoord> {
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        match came_from.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocked(cells: &[(i32, i32)]) -> CellSet {
        cells.iter().map(|&(r, c)| HexCoord::new(r, c)).collect()
    }

    #[test]
    fn test_already_in_range_is_zero_steps() {
        let board = HexBoard::default();
        let start = HexCoord::new(4, 2);
        let target = HexCoord::new(3, 2);
        let path = path_to_range(&board, start, target, 1, &CellSet::default()).expect("in range");
        assert_eq!(path, vec![start]);
    }

    #[test]
    fn test_path_ends_in_range() {
        let board = HexBoard::default();
        let start = HexCoord::new(7, 0);
        let target = HexCoord::new(0, 4);
        let occupied = blocked(&[(0, 4)]);
        let path = path_to_range(&board, start, target, 1, &occupied).expect("open board");

        assert_eq!(path.first(), Some(&start));
        let end = *path.last().expect("non-empty");
        assert_eq!(board.distance(end, target), 1);
        // BFS yields a shortest path
        assert_eq!(path.len() as u32 - 1, board.distance(start, target) - 1);
        for pair in path.windows(2) {
            assert_eq!(board.distance(pair[0], pair[1]), 1);
        }
    }

    #[test]
    fn test_path_avoids_occupied() {
        let board = HexBoard::default();
        let start = HexCoord::new(5, 2);
        let target = HexCoord::new(1, 2);
        let occupied = blocked(&[(1, 2), (4, 1), (4, 2)]);
        let path = path_to_range(&board, start, target, 1, &occupied).expect("route around");
        assert!(path.iter().skip(1).all(|c| !occupied.contains(c)));
    }

    #[test]
    fn test_walled_in_has_no_path() {
        let board = HexBoard::default();
        let start = HexCoord::new(0, 0);
        let walls: CellSet = board.neighbors(start).into_iter().collect();
        assert!(path_to_range(&board, start, HexCoord::new(7, 4), 1, &walls).is_none());
        assert!(path_steps(&board, start, HexCoord::new(7, 4), 1, &walls).is_none());
    }

    #[test]
    fn test_longer_range_needs_fewer_steps() {
        let board = HexBoard::default();
        let start = HexCoord::new(7, 2);
        let target = HexCoord::new(0, 2);
        let none = CellSet::default();
        let melee = path_steps(&board, start, target, 1, &none).expect("reachable");
        let ranged = path_steps(&board, start, target, 4, &none).expect("reachable");
        assert!(ranged < melee);
    }

    #[test]
    fn test_nearest_free_cell() {
        let board = HexBoard::default();
        let origin = HexCoord::new(3, 2);
        assert_eq!(nearest_free_cell(&board, origin, &CellSet::default()), Some(origin));

        let occupied = blocked(&[(3, 2)]);
        let found = nearest_free_cell(&board, origin, &occupied).expect("free neighbor");
        assert_eq!(board.distance(origin, found), 1);
    }
}
