// Player interface and the built-in players
//
// Every player answers one question per turn: given the pre-move grid, its
// legal moves and both head positions, which way does it go. Bots own their
// random source so games replay identically for a given seed.

use log::{log, Level};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::PlayerConfig;
use crate::error::ConfigError;
use crate::grid::Grid;
use crate::rl::{PolicyModel, RlBot};
use crate::scorer::{choose_move, Weights};
use crate::types::{Move, Position};

/// How a player's moves reach the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// The engine asks for a move every turn
    Automatic,
    /// A person steers; `None` until the first direction is pressed
    Manual(Option<Move>),
}

/// Trait that all players must implement
pub trait Player: Send {
    /// Display name used in logs
    fn name(&self) -> String;

    /// Chooses a move from `legal_moves`, which is never empty when the
    /// engine calls this
    fn get_move(
        &mut self,
        grid: &Grid,
        legal_moves: &[Move],
        my_position: Position,
        opponent_position: Position,
    ) -> Option<Move>;

    fn control(&self) -> Control {
        Control::Automatic
    }
}

pub(crate) fn log_level(verbose: bool) -> Level {
    if verbose {
        Level::Info
    } else {
        Level::Debug
    }
}

/// Uniformly random choice among legal moves
pub struct RandomBot {
    rng: StdRng,
    verbose: bool,
}

impl RandomBot {
    pub fn new(seed: u64, verbose: bool) -> Self {
        RandomBot {
            rng: StdRng::seed_from_u64(seed),
            verbose,
        }
    }
}

impl Player for RandomBot {
    fn name(&self) -> String {
        "RandomBot".to_string()
    }

    fn get_move(
        &mut self,
        _grid: &Grid,
        legal_moves: &[Move],
        _my_position: Position,
        _opponent_position: Position,
    ) -> Option<Move> {
        let chosen = legal_moves.choose(&mut self.rng).copied();
        if let Some(mv) = chosen {
            log!(log_level(self.verbose), "{} selects move \"{}\"", self.name(), mv);
        }
        chosen
    }
}

/// Largest reachable area, closest to the opponent, avoiding head-on contact
pub struct HeuristicBot {
    rng: StdRng,
    verbose: bool,
}

impl HeuristicBot {
    pub fn new(seed: u64, verbose: bool) -> Self {
        HeuristicBot {
            rng: StdRng::seed_from_u64(seed),
            verbose,
        }
    }
}

impl Player for HeuristicBot {
    fn name(&self) -> String {
        "HeuristicBot".to_string()
    }

    fn get_move(
        &mut self,
        grid: &Grid,
        legal_moves: &[Move],
        my_position: Position,
        opponent_position: Position,
    ) -> Option<Move> {
        let (mv, score) = choose_move(
            grid,
            legal_moves,
            my_position,
            opponent_position,
            None,
            &Weights::HEURISTIC,
            &mut self.rng,
        )?;
        log!(
            log_level(self.verbose),
            "{} selects move \"{}\" based on score: {}",
            self.name(),
            mv,
            score
        );
        Some(mv)
    }
}

/// Heuristic bot with tunable weights and a continuation preference
pub struct OptimizedBot {
    weights: Weights,
    previous_move: Option<Move>,
    rng: StdRng,
    verbose: bool,
}

impl OptimizedBot {
    pub fn new(weights: Weights, seed: u64, verbose: bool) -> Self {
        OptimizedBot {
            weights,
            previous_move: None,
            rng: StdRng::seed_from_u64(seed),
            verbose,
        }
    }

    pub fn previous_move(&self) -> Option<Move> {
        self.previous_move
    }
}

impl Player for OptimizedBot {
    fn name(&self) -> String {
        format!("OptimizedBot {}", self.weights)
    }

    fn get_move(
        &mut self,
        grid: &Grid,
        legal_moves: &[Move],
        my_position: Position,
        opponent_position: Position,
    ) -> Option<Move> {
        let (mv, score) = choose_move(
            grid,
            legal_moves,
            my_position,
            opponent_position,
            self.previous_move,
            &self.weights,
            &mut self.rng,
        )?;
        log!(
            log_level(self.verbose),
            "{} selects move \"{}\" based on score: {:.2}",
            self.name(),
            mv,
            score
        );
        self.previous_move = Some(mv);
        Some(mv)
    }
}

/// Keyboard layout a human player steers with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputScheme {
    Arrows,
    Wsad,
}

impl InputScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputScheme::Arrows => "arrows",
            InputScheme::Wsad => "wsad",
        }
    }

    /// Maps a key name from the front end to a move
    pub fn direction_for(&self, key: &str) -> Option<Move> {
        let key = key.to_lowercase();
        match self {
            InputScheme::Arrows => Move::parse(key.strip_prefix("arrow").unwrap_or(&key)),
            InputScheme::Wsad => match key.as_str() {
                "w" => Some(Move::Up),
                "s" => Some(Move::Down),
                "a" => Some(Move::Left),
                "d" => Some(Move::Right),
                _ => None,
            },
        }
    }
}

/// Handle the front end keeps to feed key presses to a human player
#[derive(Debug, Clone)]
pub struct HumanInput {
    scheme: InputScheme,
    selected: Arc<Mutex<Option<Move>>>,
}

impl HumanInput {
    pub fn press(&self, mv: Move) {
        *self.selected.lock() = Some(mv);
    }

    /// Records the key if it belongs to this player's scheme
    pub fn press_key(&self, key: &str) -> bool {
        match self.scheme.direction_for(key) {
            Some(mv) => {
                self.press(mv);
                true
            }
            None => false,
        }
    }

    pub fn selected(&self) -> Option<Move> {
        *self.selected.lock()
    }
}

/// Person at the keyboard; keeps steering in the last direction pressed
pub struct HumanPlayer {
    input: HumanInput,
    verbose: bool,
}

impl HumanPlayer {
    pub fn new(scheme: InputScheme, verbose: bool) -> Self {
        HumanPlayer {
            input: HumanInput {
                scheme,
                selected: Arc::new(Mutex::new(None)),
            },
            verbose,
        }
    }

    pub fn input(&self) -> HumanInput {
        self.input.clone()
    }
}

impl Player for HumanPlayer {
    fn name(&self) -> String {
        format!("HumanPlayer ({})", self.input.scheme.as_str())
    }

    fn get_move(
        &mut self,
        _grid: &Grid,
        _legal_moves: &[Move],
        _my_position: Position,
        _opponent_position: Position,
    ) -> Option<Move> {
        let selected = self.input.selected();
        if let Some(mv) = selected {
            log!(log_level(self.verbose), "{} moves \"{}\"", self.name(), mv);
        }
        selected
    }

    fn control(&self) -> Control {
        Control::Manual(self.input.selected())
    }
}

/// Player types selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    Arrows,
    Wsad,
    Random,
    Heuristic,
    Optimized,
    Rl,
}

impl PlayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerKind::Arrows => "arrows",
            PlayerKind::Wsad => "wsad",
            PlayerKind::Random => "random",
            PlayerKind::Heuristic => "heuristic",
            PlayerKind::Optimized => "optimized",
            PlayerKind::Rl => "rl",
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, PlayerKind::Arrows | PlayerKind::Wsad)
    }
}

impl FromStr for PlayerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "arrows" => Ok(PlayerKind::Arrows),
            "wsad" => Ok(PlayerKind::Wsad),
            "random" => Ok(PlayerKind::Random),
            "heuristic" => Ok(PlayerKind::Heuristic),
            "optimized" => Ok(PlayerKind::Optimized),
            "rl" => Ok(PlayerKind::Rl),
            _ => Err(ConfigError::UnknownPlayerType(s.to_string())),
        }
    }
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds a player from configuration; RL players need a policy model
pub fn build_player(config: &PlayerConfig, seed: u64) -> Result<Box<dyn Player>, ConfigError> {
    build_player_with_policy(config, seed, None)
}

pub fn build_player_with_policy(
    config: &PlayerConfig,
    seed: u64,
    policy: Option<Box<dyn PolicyModel>>,
) -> Result<Box<dyn Player>, ConfigError> {
    let kind = config.kind()?;
    let weights = config.weights()?;

    let player: Box<dyn Player> = match kind {
        PlayerKind::Arrows => Box::new(HumanPlayer::new(InputScheme::Arrows, config.verbose)),
        PlayerKind::Wsad => Box::new(HumanPlayer::new(InputScheme::Wsad, config.verbose)),
        PlayerKind::Random => Box::new(RandomBot::new(seed, config.verbose)),
        PlayerKind::Heuristic => Box::new(HeuristicBot::new(seed, config.verbose)),
        PlayerKind::Optimized => Box::new(OptimizedBot::new(weights, seed, config.verbose)),
        PlayerKind::Rl => {
            let policy = policy.ok_or(ConfigError::MissingPolicy)?;
            Box::new(RlBot::new(policy, seed, config.verbose))
        }
    };

    Ok(player)
}
