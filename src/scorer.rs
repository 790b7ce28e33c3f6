// Weighted move scorer shared by the heuristic and optimized bots

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::area::reachable_area;
use crate::error::ConfigError;
use crate::grid::Grid;
use crate::types::{Move, Position};

/// Penalty distance applied when the target cell touches the opponent's head
const ENEMY_ADJACENT_PENALTY: f64 = 5.0;

/// Weights of the score components, nominally in [-1.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    /// Available area (positive seeks space, negative avoids it)
    pub area: f64,
    /// Manhattan distance (positive closes in, negative keeps away)
    pub distance: f64,
    /// Head-on collision aversion (positive evasive, negative reckless)
    pub collision: f64,
    /// Continuation preference (positive straight lines, negative turns)
    pub continuation: f64,
}

impl Weights {
    pub const COUNT: usize = 4;

    /// The plain heuristic bot
    pub const HEURISTIC: Weights = Weights {
        area: 1.0,
        distance: 1.0,
        collision: 1.0,
        continuation: 0.0,
    };

    pub const ZERO: Weights = Weights {
        area: 0.0,
        distance: 0.0,
        collision: 0.0,
        continuation: 0.0,
    };

    /// Tuned weights of the optimized bot
    pub const OPTIMIZED: Weights = Weights {
        area: 0.25648373,
        distance: -0.31488939,
        collision: -0.12317508,
        continuation: 0.48541348,
    };

    pub fn new(area: f64, distance: f64, collision: f64, continuation: f64) -> Self {
        Weights {
            area,
            distance,
            collision,
            continuation,
        }
    }

    /// Builds weights from an ordered tuple, failing on the wrong arity
    pub fn from_slice(values: &[f64]) -> Result<Self, ConfigError> {
        match values {
            &[area, distance, collision, continuation] => {
                Ok(Weights::new(area, distance, collision, continuation))
            }
            _ => Err(ConfigError::WeightCount(values.len())),
        }
    }

    pub fn to_array(&self) -> [f64; Weights::COUNT] {
        [self.area, self.distance, self.collision, self.continuation]
    }
}

impl Default for Weights {
    fn default() -> Self {
        Weights::OPTIMIZED
    }
}

impl fmt::Display for Weights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.area, self.distance, self.collision, self.continuation
        )
    }
}

/// Scores a single candidate move
pub fn score_move(
    grid: &Grid,
    mv: Move,
    my_position: Position,
    opponent_position: Position,
    previous_move: Option<Move>,
    weights: &Weights,
) -> f64 {
    crate::profile!("score", {
        let target = mv.apply(my_position);
        let area = reachable_area(grid, target) as f64;
        let distance = target.manhattan_distance(opponent_position);

        let continuation_factor = if previous_move == Some(mv) {
            1.0 + weights.continuation
        } else {
            1.0 - weights.continuation
        };

        if distance == 1 {
            let penalty = ENEMY_ADJACENT_PENALTY * weights.collision;
            (area * weights.area - penalty) * continuation_factor
        } else {
            (area * weights.area - distance as f64 * weights.distance) * continuation_factor
        }
    })
}

/// Picks the highest-scoring legal move.
///
/// Ties are folded left to right: each later candidate that ties the current
/// best replaces it with probability 1/2. Returns `None` when there are no
/// legal moves.
pub fn choose_move<R: Rng + ?Sized>(
    grid: &Grid,
    legal_moves: &[Move],
    my_position: Position,
    opponent_position: Position,
    previous_move: Option<Move>,
    weights: &Weights,
    rng: &mut R,
) -> Option<(Move, f64)> {
    let mut candidates = legal_moves.iter().map(|&mv| {
        let score = score_move(grid, mv, my_position, opponent_position, previous_move, weights);
        (mv, score)
    });

    let mut best = candidates.next()?;
    for (mv, score) in candidates {
        if score > best.1 {
            best = (mv, score);
        } else if score == best.1 && rng.random_bool(0.5) {
            best = (mv, score);
        }
    }

    Some(best)
}
