// Configuration module for reading Blockade.toml
// Arena size, RNG seed, verbosity and the two player setups

use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::player::PlayerKind;
use crate::scorer::Weights;

pub const MIN_ARENA_SIZE: usize = 10;
pub const MAX_ARENA_SIZE: usize = 20;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub arena: ArenaConfig,
    pub game: GameConfig,
    pub player1: PlayerConfig,
    pub player2: PlayerConfig,
    pub tournament: TournamentConfig,
}

/// Arena dimensions
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ArenaConfig {
    pub size: usize,
}

/// Engine behaviour
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GameConfig {
    pub verbose: bool,
    /// Fixed seed for reproducible games, OS entropy when absent
    pub seed: Option<u64>,
    /// Ask both players for their moves concurrently
    pub parallel_bots: bool,
}

impl GameConfig {
    /// Seed for this run, drawn at random when none is configured
    pub fn resolved_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

/// One player's setup
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PlayerConfig {
    /// arrows, wsad, random, heuristic, optimized or rl
    pub kind: String,
    #[serde(default)]
    pub verbose: bool,
    /// Optimized bot weights (area, distance, collision, continuation)
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
}

impl PlayerConfig {
    pub fn kind(&self) -> Result<PlayerKind, ConfigError> {
        self.kind.parse()
    }

    /// Configured weights, the tuned defaults when none are given
    pub fn weights(&self) -> Result<Weights, ConfigError> {
        match &self.weights {
            Some(values) => Weights::from_slice(values),
            None => Ok(Weights::OPTIMIZED),
        }
    }
}

/// Batch play settings used by the tournament binary
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TournamentConfig {
    pub games: usize,
    /// Worker threads, 0 lets rayon decide
    pub threads: usize,
}

impl Config {
    /// Loads and validates configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads default configuration from Blockade.toml in the project root
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::from_file("Blockade.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the values in Blockade.toml
    pub fn default_hardcoded() -> Self {
        Config {
            arena: ArenaConfig { size: 10 },
            game: GameConfig {
                verbose: false,
                seed: Some(42),
                parallel_bots: false,
            },
            player1: PlayerConfig {
                kind: "optimized".to_string(),
                verbose: false,
                weights: Some(Weights::OPTIMIZED.to_array().to_vec()),
            },
            player2: PlayerConfig {
                kind: "heuristic".to_string(),
                verbose: false,
                weights: None,
            },
            tournament: TournamentConfig {
                games: 200,
                threads: 0,
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            warn!("Could not load Blockade.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }

    /// Rejects settings a game cannot be built from
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_ARENA_SIZE..=MAX_ARENA_SIZE).contains(&self.arena.size) {
            return Err(ConfigError::ArenaSize(self.arena.size));
        }

        let kind1 = self.player1.kind()?;
        let kind2 = self.player2.kind()?;
        self.player1.weights()?;
        self.player2.weights()?;

        if kind1.is_human() && kind1 == kind2 {
            return Err(ConfigError::SharedInput(kind1.as_str().to_string()));
        }

        Ok(())
    }
}
