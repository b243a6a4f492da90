//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs: the
//! session inputs (quantity, cash, lot size) and which strategy each seat
//! plays.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use crate::types::DEFAULT_LOT_SIZE;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub agents: AgentsConfig,
}

/// Auction session inputs.
#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Total product units sold across the session.
    pub quantity: i64,
    /// Starting cash budget per bidder.
    pub cash: i64,
    /// Product units per round.
    #[serde(default = "default_lot_size")]
    pub lot_size: i64,
}

/// Strategy assignment for the two seats.
#[derive(Debug, Deserialize, Clone)]
pub struct AgentsConfig {
    pub home: String,
    pub rival: String,
}

fn default_lot_size() -> i64 {
    DEFAULT_LOT_SIZE
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }
}
