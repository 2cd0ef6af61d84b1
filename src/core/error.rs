use thiserror::Error;

use crate::battle::hex::HexCoord;
use crate::core::types::UnitId;

#[derive(Error, Debug)]
pub enum SkirmishError {
    #[error("Cell {0} is outside the board")]
    OutOfBounds(HexCoord),

    #[error("Cell {cell} is occupied by {occupant}")]
    CellOccupied { cell: HexCoord, occupant: UnitId },

    #[error("Unknown unit type: {0}")]
    UnknownUnit(String),

    #[error("Invalid star level {0} (expected 1-4)")]
    InvalidStar(u8),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SkirmishError>;
