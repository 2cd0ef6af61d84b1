//! Battle system constants - all tunable values in one place
//!
//! Per-star tables are indexed by `star - 1`; use [`by_star`] to read them.

// Board
pub const BOARD_ROWS: i32 = 8;
pub const BOARD_COLS: i32 = 5;
pub const MAX_BOARD_SIDE: i32 = 64; // the distance table is (rows * cols)^2

// Time
pub const TICK_SECONDS: f32 = 0.1;
pub const MAX_BATTLE_TICKS: u64 = 6000; // 10 simulated minutes
pub const TIME_EPSILON: f32 = 1e-4;

// Critical hits
pub const CRIT_CHANCE: f32 = 0.15;
pub const CRIT_MULTIPLIER: f32 = 1.5;

// Stars
pub const MIN_STAR: u8 = 1;
pub const MAX_STAR: u8 = 4;

// Leap (mega-knight)
pub const LEAP_COOLDOWN_BY_STAR: [f32; 4] = [6.0, 5.0, 4.0, 3.0];
pub const LEAP_STUN_RADIUS_BY_STAR: [u32; 4] = [1, 1, 2, 3];
pub const LEAP_SEARCH_RADIUS: u32 = 3;
pub const LEAP_TRAVEL_SECONDS: f32 = 1.0;
pub const LEAP_STUN_SECONDS: f32 = 2.0;

// Escalating dash (bandit)
pub const DASH_THRESHOLD_BY_STAR: [u32; 4] = [3, 2, 1, 1];
pub const DASH_BONUS_BY_STAR: [f32; 4] = [0.5, 0.5, 0.8, 1.5];
pub const DASH_RADIUS: u32 = 3;
pub const DASH_STUN_SECONDS: f32 = 1.0;

// Barrage (goblin-machine)
pub const BARRAGE_THRESHOLD_BY_STAR: [u32; 4] = [3, 2, 1, 1];
pub const BARRAGE_ROCKETS_BY_STAR: [usize; 4] = [1, 2, 3, 6];
pub const BARRAGE_DAMAGE_MULTIPLIER: f32 = 1.5;
pub const BARRAGE_STUN_SECONDS: f32 = 1.5;

// Chain dash (golden-knight)
pub const CHAIN_DASH_MULTIPLIER_BY_STAR: [f32; 4] = [1.5, 1.8, 2.5, 6.0];

// Invisibility
pub const GHOST_ATTACKS_TO_VANISH: u32 = 3;
pub const GHOST_INVISIBLE_SECONDS_BY_STAR: [f32; 4] = [1.5, 2.0, 2.5, 3.5];
pub const QUEEN_HP_THRESHOLD: f32 = 0.5;
pub const QUEEN_INVISIBLE_SECONDS: f32 = 2.5;
pub const QUEEN_MAX_TARGETS_BY_STAR: [usize; 4] = [2, 3, 4, 6];
pub const QUEEN_STEALTH_BONUS_BY_STAR: [f32; 4] = [0.5, 0.8, 1.5, 5.0];

// Knockback (prince)
pub const KNOCKBACK_STUN_SECONDS: f32 = 2.0;

// Piercing line (executioner)
pub const PIERCE_MAX_CELLS: usize = 10;

// Death bomb (giant-skeleton)
pub const BOMB_DAMAGE_BY_STAR: [f32; 4] = [200.0, 400.0, 800.0, 1600.0];
pub const BOMB_FUSE_SECONDS: f32 = 1.0;
pub const BOMB_STUN_SECONDS: f32 = 1.0;

/// Read a per-star table, clamping out-of-range stars to the nearest tier
pub fn by_star<T: Copy>(table: &[T; 4], star: u8) -> T {
    let idx = star.clamp(MIN_STAR, MAX_STAR) as usize - 1;
    table[idx]
}
