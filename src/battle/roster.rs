//! Rosters and scenarios
//!
//! A roster lists one player's units in *local* coordinates: every player
//! deploys into rows `half..rows` of its own view of the board. The away
//! roster is mirrored through the board centre when the battle is built,
//! so both players can use the same layouts.

use std::fs;
use std::path::Path;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::battle::board::HexBoard;
use crate::battle::hex::HexCoord;
use crate::battle::unit_type::UnitDefinition;
use crate::battle::units::CombatUnit;
use crate::core::config::{validate_crit, CombatConfig};
use crate::core::error::{Result, SkirmishError};
use crate::core::types::{PlayerId, Side, UnitId};

/// One unit placement in local coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Catalog name, e.g. `"mega-knight"`
    pub unit: String,
    #[serde(default = "default_star")]
    pub star: u8,
    pub row: i32,
    pub col: i32,
    /// Overrides the battle's crit chance for this unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crit_chance: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crit_multiplier: Option<f32>,
}

fn default_star() -> u8 {
    1
}

impl RosterEntry {
    pub fn new(unit: impl Into<String>, star: u8, row: i32, col: i32) -> Self {
        Self {
            unit: unit.into(),
            star,
            row,
            col,
            crit_chance: None,
            crit_multiplier: None,
        }
    }
}

/// A player's battle line-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub player: PlayerId,
    #[serde(default)]
    pub units: Vec<RosterEntry>,
}

impl Roster {
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            units: Vec::new(),
        }
    }

    pub fn with(mut self, unit: impl Into<String>, star: u8, row: i32, col: i32) -> Self {
        self.units.push(RosterEntry::new(unit, star, row, col));
        self
    }

    /// Check names, stars and local placement against a board
    pub fn validate(&self, config: &CombatConfig) -> Result<()> {
        let half = config.half_rows();
        let mut seen: AHashSet<(i32, i32)> = AHashSet::new();
        for entry in &self.units {
            let definition = UnitDefinition::from_name(&entry.unit, entry.star)?;
            if definition.cost == 0 {
                return Err(SkirmishError::InvalidScenario(format!(
                    "{} can only be summoned",
                    entry.unit
                )));
            }
            if entry.row < half || entry.row >= config.board_rows || entry.col < 0 || entry.col >= config.board_cols {
                return Err(SkirmishError::InvalidScenario(format!(
                    "{} at ({}, {}) is outside the deploy zone",
                    entry.unit, entry.row, entry.col
                )));
            }
            if entry.crit_chance.is_some() || entry.crit_multiplier.is_some() {
                validate_crit(
                    entry.crit_chance.unwrap_or(config.crit_chance),
                    entry.crit_multiplier.unwrap_or(config.crit_multiplier),
                )?;
            }
            if !seen.insert((entry.row, entry.col)) {
                return Err(SkirmishError::InvalidScenario(format!(
                    "two units share ({}, {})",
                    entry.row, entry.col
                )));
            }
        }
        Ok(())
    }
}

/// Turn both rosters into battle units with sequential ids
///
/// Home units come first, then away units, each in roster order.
pub fn deploy(home: &Roster, away: &Roster, config: &CombatConfig) -> Result<Vec<CombatUnit>> {
    home.validate(config)?;
    away.validate(config)?;
    let board = HexBoard::new(config.board_rows, config.board_cols);

    let mut units = Vec::with_capacity(home.units.len() + away.units.len());
    for (side, roster) in [(Side::Home, home), (Side::Away, away)] {
        for entry in &roster.units {
            let definition = UnitDefinition::from_name(&entry.unit, entry.star)?;
            let local = HexCoord::new(entry.row, entry.col);
            let cell = match side {
                Side::Home => local,
                Side::Away => board.mirror(local),
            };
            let id = UnitId(units.len());
            debug!(unit = %id, name = definition.name(), %cell, ?side, "deployed");
            let mut unit = CombatUnit::new(id, side, roster.player, definition, Some(cell));
            unit.crit_chance = entry.crit_chance;
            unit.crit_multiplier = entry.crit_multiplier;
            units.push(unit);
        }
    }
    Ok(units)
}

/// Everything needed to replay one battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub config: CombatConfig,
    pub home: Roster,
    pub away: Roster,
}

impl Scenario {
    pub fn new(home: Roster, away: Roster) -> Self {
        Self {
            seed: 0,
            config: CombatConfig::default(),
            home,
            away,
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        if self.home.player == self.away.player {
            return Err(SkirmishError::InvalidScenario(
                "home and away must be different players".into(),
            ));
        }
        self.home.validate(&self.config)?;
        self.away.validate(&self.config)
    }

    pub fn owners(&self) -> [PlayerId; 2] {
        [self.home.player, self.away.player]
    }

    pub fn deploy(&self) -> Result<Vec<CombatUnit>> {
        deploy(&self.home, &self.away, &self.config)
    }
}
