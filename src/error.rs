// Error types for configuration, grid construction and the turn engine

use thiserror::Error;

use crate::types::{GameOutcome, Move, PlayerId};

/// Configuration problems, reported when players or games are built
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Arena size {0} is outside the supported range 10..=20")]
    ArenaSize(usize),
    #[error("Wrong number of weights: {0} (should be 4)")]
    WeightCount(usize),
    #[error("Unknown player type: {0}")]
    UnknownPlayerType(String),
    #[error("Two human players use the same input method: {0}")]
    SharedInput(String),
    #[error("Player type 'rl' requires a policy model")]
    MissingPolicy,
    #[error("Player type {0} cannot be used here")]
    UnsupportedPlayer(String),
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Problems building a grid from text or integer codes
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Grid must be square: row {row} has {len} cells, expected {expected}")]
    NotSquare { row: usize, len: usize, expected: usize },
    #[error("Grid is empty")]
    Empty,
    #[error("Invalid cell {cell:?} at ({row}, {col})")]
    InvalidCell { row: usize, col: usize, cell: String },
    #[error("More than one head for {0}")]
    DuplicateHead(PlayerId),
}

/// Engine invariant violations; these abort a game
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Game already over: {0}")]
    GameOver(GameOutcome),
    #[error("Move counter {moves} exceeded the maximum of {limit} moves")]
    MoveLimitExceeded { moves: usize, limit: usize },
    #[error("Head of {0} is missing from the grid")]
    MissingHead(PlayerId),
    #[error("{player} returned no move")]
    NoMove { player: PlayerId },
    #[error("{player} chose illegal move {chosen}")]
    IllegalMove { player: PlayerId, chosen: Move },
}

/// Why a tournament game produced no result
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Game {index} (seed {seed}): {source}")]
    Game {
        index: usize,
        seed: u64,
        #[source]
        source: GameError,
    },
    #[error("Game {0} stopped without an outcome")]
    Unfinished(usize),
}
