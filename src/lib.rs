//! Hex Skirmish - deterministic auto-battler combat core

pub mod battle;
pub mod core;
