// Reinforcement-learning player
//
// The trained policy itself lives outside this crate. It is reached through
// `PolicyModel`, which receives a player-relative observation and answers
// with a raw action index that may well be illegal.

use log::{log, warn};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use crate::grid::Grid;
use crate::player::{log_level, Player};
use crate::types::{Cell, Move, PlayerId, Position};

pub const OBS_EMPTY: u8 = 0;
pub const OBS_TAIL: u8 = 1;
pub const OBS_OWN_HEAD: u8 = 2;
pub const OBS_OPPONENT_HEAD: u8 = 3;

/// Player-relative grid encoding handed to a policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    size: usize,
    cells: Vec<u8>,
}

impl Observation {
    /// Encodes `grid` from `me`'s point of view at the policy's trained size.
    ///
    /// Larger grids are cropped to the top-left corner; smaller ones are
    /// padded with impassable cells.
    pub fn encode(grid: &Grid, me: PlayerId, size: usize) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for row in 0..size as i32 {
            for col in 0..size as i32 {
                let value = match grid.get(Position::new(row, col)) {
                    Some(Cell::Empty) => OBS_EMPTY,
                    Some(Cell::Head(p)) if p == me => OBS_OWN_HEAD,
                    Some(Cell::Head(_)) => OBS_OPPONENT_HEAD,
                    Some(Cell::Tail(_)) | Some(Cell::Collision) | None => OBS_TAIL,
                };
                cells.push(value);
            }
        }
        Observation { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row < self.size && col < self.size {
            Some(self.cells[row * self.size + col])
        } else {
            None
        }
    }

    /// Row-major cell values
    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }
}

/// External policy inference
pub trait PolicyModel: Send {
    fn name(&self) -> String {
        "policy".to_string()
    }

    /// Grid size the policy was trained on
    fn grid_size(&self) -> usize;

    /// Action index: 0 up, 1 down, 2 left, 3 right
    fn predict(&mut self, observation: &Observation) -> usize;
}

pub struct RlBot {
    policy: Box<dyn PolicyModel>,
    rng: StdRng,
    verbose: bool,
    substitutions: usize,
}

impl RlBot {
    pub fn new(policy: Box<dyn PolicyModel>, seed: u64, verbose: bool) -> Self {
        RlBot {
            policy,
            rng: StdRng::seed_from_u64(seed),
            verbose,
            substitutions: 0,
        }
    }

    /// How many times an illegal action was replaced with a random move
    pub fn substitutions(&self) -> usize {
        self.substitutions
    }
}

impl Player for RlBot {
    fn name(&self) -> String {
        format!("ReinforcementLearningBot ({})", self.policy.name())
    }

    fn get_move(
        &mut self,
        grid: &Grid,
        legal_moves: &[Move],
        my_position: Position,
        _opponent_position: Position,
    ) -> Option<Move> {
        let me = match grid.get(my_position) {
            Some(Cell::Head(p)) => p,
            _ => {
                warn!("{}: no head at {}", self.name(), my_position);
                return legal_moves.choose(&mut self.rng).copied();
            }
        };

        let observation = Observation::encode(grid, me, self.policy.grid_size());
        let action = self.policy.predict(&observation);

        match Move::from_index(action) {
            Some(mv) if legal_moves.contains(&mv) => {
                log!(log_level(self.verbose), "{} selects move \"{}\"", self.name(), mv);
                Some(mv)
            }
            predicted => {
                self.substitutions += 1;
                let substitute = legal_moves.choose(&mut self.rng).copied();
                let predicted = predicted.map_or_else(|| format!("#{}", action), |m| m.to_string());
                if let Some(mv) = substitute {
                    log!(
                        log_level(self.verbose),
                        "{} predicted impossible move \"{}\", substituting \"{}\"",
                        self.name(),
                        predicted,
                        mv
                    );
                }
                substitute
            }
        }
    }
}
