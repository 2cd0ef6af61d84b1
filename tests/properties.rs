//! Property-based tests for board geometry and whole battles.
//!
//! Run with: cargo test --release --test properties

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use hex_skirmish::battle::*;
use hex_skirmish::core::{CombatConfig, PlayerId};

fn cell() -> impl Strategy<Value = HexCoord> {
    (0..8i32, 0..5i32).prop_map(|(row, col)| HexCoord::new(row, col))
}

fn deploy_cells() -> Vec<(i32, i32)> {
    (4..8).flat_map(|row| (0..5).map(move |col| (row, col))).collect()
}

/// Up to six purchasable units on distinct cells of a deploy zone
fn roster(player: u32) -> impl Strategy<Value = Roster> {
    let kinds: Vec<UnitKind> = UnitKind::purchasable().collect();
    (
        prop::sample::subsequence(deploy_cells(), 1..=6),
        prop::collection::vec((prop::sample::select(kinds), 1u8..=2), 6),
    )
        .prop_map(move |(cells, picks)| {
            cells
                .into_iter()
                .zip(picks)
                .fold(Roster::new(PlayerId(player)), |roster, ((row, col), (kind, star))| {
                    roster.with(kind.name(), star, row, col)
                })
        })
}

fn scenario() -> impl Strategy<Value = Scenario> {
    (roster(1), roster(2), any::<u64>()).prop_map(|(home, away, seed)| {
        let mut scenario = Scenario::new(home, away);
        scenario.seed = seed;
        scenario
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Distance is a metric on the board
    #[test]
    fn prop_distance_metric(a in cell(), b in cell(), c in cell()) {
        let board = HexBoard::new(8, 5);
        prop_assert_eq!(board.distance(a, a), 0);
        prop_assert_eq!(board.distance(a, b), board.distance(b, a));
        prop_assert_eq!(board.distance(a, b) == 0, a == b);
        prop_assert!(board.distance(a, c) <= board.distance(a, b) + board.distance(b, c));
    }

    /// Every neighbor is one hop away, and interior cells have six of them
    #[test]
    fn prop_neighbors_adjacent(a in cell()) {
        let board = HexBoard::new(8, 5);
        let neighbors = board.neighbors(a);
        for n in &neighbors {
            prop_assert_eq!(board.distance(a, *n), 1);
        }
        let interior = a.row > 0 && a.row < 7 && a.col > 0 && a.col < 4;
        if interior {
            prop_assert_eq!(neighbors.len(), 6);
        }
        prop_assert!(neighbors.len() <= 6);
    }

    /// Mirroring preserves distances
    #[test]
    fn prop_mirror_isometry(a in cell(), b in cell()) {
        let board = HexBoard::new(8, 5);
        prop_assert_eq!(board.distance(board.mirror(a), board.mirror(b)), board.distance(a, b));
        prop_assert_eq!(board.mirror(board.mirror(a)), a);
    }

    /// Health and damage double with every star
    #[test]
    fn prop_star_scaling(index in 0usize..20, star in 1u8..=4) {
        let kind = UnitKind::purchasable().nth(index % UnitKind::purchasable().count()).unwrap();
        let base = kind.base_stats();
        let def = UnitDefinition::new(kind, star).unwrap();
        let factor = 2f32.powi(star as i32 - 1);
        prop_assert_eq!(def.health, base.health * factor);
        prop_assert_eq!(def.damage, base.damage * factor);
        prop_assert_eq!(def.range, base.range);
        prop_assert_eq!(def.speed, base.speed);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Random battles keep the grid consistent and always finish
    #[test]
    fn prop_battle_invariants(scenario in scenario()) {
        let mut state = BattleState::from_scenario(&scenario).unwrap();
        while !state.is_finished() {
            state.run_tick();

            let mut from_units: Vec<_> = state
                .units()
                .iter()
                .filter_map(|u| u.position.map(|p| (p, u.id)))
                .collect();
            let mut from_grid: Vec<_> = state.field.grid.occupied().collect();
            from_units.sort();
            from_grid.sort();
            prop_assert_eq!(from_units, from_grid);

            for u in state.units() {
                prop_assert!(u.hp <= u.max_hp + 1e-3);
                if u.position.is_some() {
                    prop_assert!(u.alive);
                    prop_assert!(u.hp > 0.0);
                }
                if let Some(target) = u.current_target {
                    let target = state.field.unit(target);
                    prop_assert!(target.position.is_some());
                    prop_assert_ne!(target.side, u.side);
                }
            }
            for reserved in state.field.reserved.iter() {
                prop_assert!(state.field.grid.is_free(*reserved));
            }
        }

        let report = state.report();
        prop_assert!(report.ticks <= CombatConfig::default().max_ticks);
        match report.winning_side {
            Some(side) => {
                prop_assert!(report.surviving_units + report.surviving_summons > 0);
                prop_assert_eq!(report.winner, Some(scenario.owners()[side.index()]));
            }
            None => prop_assert_eq!(report.surviving_units, 0),
        }
    }

    /// The same scenario always produces the same battle
    #[test]
    fn prop_battle_deterministic(scenario in scenario()) {
        let mut first = BattleState::from_scenario(&scenario).unwrap();
        let mut second = BattleState::from_scenario(&scenario).unwrap();
        prop_assert_eq!(first.run_to_completion(), second.run_to_completion());
        prop_assert_eq!(first.battle_log.len(), second.battle_log.len());
    }
}
