//! Combat configuration with documented constants
//!
//! Every tunable that changes battle outcomes lives here so a scenario file
//! can override it. Defaults reproduce the reference balance.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::constants::{
    BOARD_COLS, BOARD_ROWS, CRIT_CHANCE, CRIT_MULTIPLIER, MAX_BATTLE_TICKS, MAX_BOARD_SIDE,
    TICK_SECONDS,
};
use crate::core::error::{Result, SkirmishError};

/// Configuration for a single battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    // === CRITICAL HITS ===
    /// Probability that any single hit is critical
    ///
    /// Rolled independently per hit, including splash and pierce hits.
    /// Set to 0.0 for fully deterministic damage in tests.
    pub crit_chance: f32,

    /// Damage multiplier applied to a critical hit
    pub crit_multiplier: f32,

    // === TIME ===
    /// Simulated seconds that pass per tick
    ///
    /// Cooldowns and status durations are expressed in seconds, so a smaller
    /// value gives finer ordering between units at the cost of more ticks.
    pub tick_seconds: f32,

    /// Tick count after which an undecided battle ends as a draw
    ///
    /// Guards against permanent stalemates (two units that can never reach
    /// each other). Normal battles end long before this.
    pub max_ticks: u64,

    // === BOARD ===
    /// Number of hex rows; each side owns half of them
    pub board_rows: i32,

    /// Number of hex columns
    pub board_cols: i32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            crit_chance: CRIT_CHANCE,
            crit_multiplier: CRIT_MULTIPLIER,
            tick_seconds: TICK_SECONDS,
            max_ticks: MAX_BATTLE_TICKS,
            board_rows: BOARD_ROWS,
            board_cols: BOARD_COLS,
        }
    }
}

impl CombatConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Config with critical hits disabled
    pub fn without_crits() -> Self {
        Self {
            crit_chance: 0.0,
            ..Self::default()
        }
    }

    /// Parse a config from TOML text; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CombatConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Number of rows a single side deploys into
    pub fn half_rows(&self) -> i32 {
        self.board_rows / 2
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        validate_crit(self.crit_chance, self.crit_multiplier)?;

        if self.tick_seconds <= 0.0 || !self.tick_seconds.is_finite() {
            return Err(SkirmishError::InvalidConfig(format!(
                "tick_seconds ({}) must be positive",
                self.tick_seconds
            )));
        }

        if self.max_ticks == 0 {
            return Err(SkirmishError::InvalidConfig(
                "max_ticks must be greater than zero".into(),
            ));
        }

        if self.board_rows < 2 || self.board_rows % 2 != 0 || self.board_rows > MAX_BOARD_SIDE {
            return Err(SkirmishError::InvalidConfig(format!(
                "board_rows ({}) must be an even number between 2 and {}",
                self.board_rows, MAX_BOARD_SIDE
            )));
        }

        if self.board_cols < 1 || self.board_cols > MAX_BOARD_SIDE {
            return Err(SkirmishError::InvalidConfig(format!(
                "board_cols ({}) must be between 1 and {}",
                self.board_cols, MAX_BOARD_SIDE
            )));
        }

        Ok(())
    }
}

/// Check a crit chance and multiplier pair
///
/// Used for the battle-wide values and for per-unit overrides. NaN and
/// infinities are rejected.
pub fn validate_crit(chance: f32, multiplier: f32) -> Result<()> {
    if !chance.is_finite() || !(0.0..=1.0).contains(&chance) {
        return Err(SkirmishError::InvalidConfig(format!(
            "crit_chance ({}) must be within [0, 1]",
            chance
        )));
    }

    if !multiplier.is_finite() || multiplier < 1.0 {
        return Err(SkirmishError::InvalidConfig(format!(
            "crit_multiplier ({}) must be a finite value of at least 1.0",
            multiplier
        )));
    }

    Ok(())
}
