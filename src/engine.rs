// Turn engine
//
// One `process_move` call is one simulation step. Both players choose
// against the same pre-move grid, then both moves are applied at once. A
// head-on collision leaves a single Collision cell; the following step finds
// neither head and declares the draw.

use log::{info, log};

use crate::config::{Config, MAX_ARENA_SIZE, MIN_ARENA_SIZE};
use crate::error::{ConfigError, GameError};
use crate::grid::Grid;
use crate::player::{build_player, log_level, Control, Player};
use crate::simple_profiler::ProfileGuard;
use crate::types::{Cell, GameOutcome, Move, PlayerId, Position};

/// What a single `process_move` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnReport {
    /// A human player has not chosen a direction yet; nothing changed
    Waiting,
    /// Both moves were applied
    Moved {
        player1: Move,
        player2: Move,
        collision: Option<Position>,
    },
    /// The game ended on this step
    Finished(GameOutcome),
}

/// Upper bound on the number of steps a game on an N×N grid can take
pub fn max_moves(size: usize) -> usize {
    ((size * size + 1) / 2).saturating_sub(2)
}

pub struct Game {
    grid: Grid,
    player1: Box<dyn Player>,
    player2: Box<dyn Player>,
    outcome: GameOutcome,
    moves_made: usize,
    max_moves: usize,
    verbose: bool,
    parallel: bool,
}

impl Game {
    /// Starts a game on a fresh arena of the given size
    pub fn new(
        size: usize,
        player1: Box<dyn Player>,
        player2: Box<dyn Player>,
    ) -> Result<Self, ConfigError> {
        if !(MIN_ARENA_SIZE..=MAX_ARENA_SIZE).contains(&size) {
            return Err(ConfigError::ArenaSize(size));
        }
        Ok(Self::from_grid(
            Grid::with_starting_positions(size),
            player1,
            player2,
        ))
    }

    /// Builds both players and the arena from configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.game.resolved_seed();
        info!("Seeding players from {}", seed);

        let player1 = build_player(&config.player1, seed)?;
        let player2 = build_player(&config.player2, seed.wrapping_add(1))?;

        Ok(Self::new(config.arena.size, player1, player2)?
            .with_verbose(config.game.verbose)
            .with_parallel(config.game.parallel_bots))
    }

    /// Continues from an arbitrary grid, e.g. a constructed scenario
    pub fn from_grid(grid: Grid, player1: Box<dyn Player>, player2: Box<dyn Player>) -> Self {
        let max_moves = max_moves(grid.size());
        Game {
            grid,
            player1,
            player2,
            outcome: GameOutcome::InProgress,
            moves_made: 0,
            max_moves,
            verbose: false,
            parallel: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the move counter, for games resumed part-way through
    pub fn with_moves_made(mut self, moves_made: usize) -> Self {
        self.moves_made = moves_made;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn moves_made(&self) -> usize {
        self.moves_made
    }

    pub fn max_moves(&self) -> usize {
        self.max_moves
    }

    pub fn player(&self, id: PlayerId) -> &dyn Player {
        match id {
            PlayerId::One => self.player1.as_ref(),
            PlayerId::Two => self.player2.as_ref(),
        }
    }

    /// Advances the game by one step
    pub fn process_move(&mut self) -> Result<TurnReport, GameError> {
        if self.outcome.is_terminal() {
            return Err(GameError::GameOver(self.outcome));
        }

        let _guard = ProfileGuard::new("turn");
        let level = log_level(self.verbose);

        let head1 = self.grid.find_head(PlayerId::One);
        let head2 = self.grid.find_head(PlayerId::Two);

        // Heads only disappear through a head-on collision
        if !self.grid.has_collision() {
            if head1.is_none() {
                return Err(GameError::MissingHead(PlayerId::One));
            }
            if head2.is_none() {
                return Err(GameError::MissingHead(PlayerId::Two));
            }
        }

        let legal1 = head1.map(|h| self.grid.legal_moves(h)).unwrap_or_default();
        let legal2 = head2.map(|h| self.grid.legal_moves(h)).unwrap_or_default();
        let control1 = self.player1.control();
        let control2 = self.player2.control();

        let outcome = match (is_blocked(&legal1, control1), is_blocked(&legal2, control2)) {
            (true, true) => GameOutcome::Draw,
            (true, false) => GameOutcome::Player2Wins,
            (false, true) => GameOutcome::Player1Wins,
            (false, false) => GameOutcome::InProgress,
        };

        if outcome.is_terminal() {
            self.outcome = outcome;
            log!(level, "Game over after {} moves: {}", self.moves_made, outcome);
            return Ok(TurnReport::Finished(outcome));
        }

        if control1 == Control::Manual(None) || control2 == Control::Manual(None) {
            return Ok(TurnReport::Waiting);
        }

        // Neither player is blocked, so both heads are on the grid
        let (head1, head2) = match (head1, head2) {
            (Some(h1), Some(h2)) => (h1, h2),
            (None, _) => return Err(GameError::MissingHead(PlayerId::One)),
            (_, None) => return Err(GameError::MissingHead(PlayerId::Two)),
        };

        let grid = &self.grid;
        let player1 = self.player1.as_mut();
        let player2 = self.player2.as_mut();
        let (choice1, choice2) = if self.parallel {
            rayon::join(
                || request_move(player1, control1, grid, &legal1, head1, head2),
                || request_move(player2, control2, grid, &legal2, head2, head1),
            )
        } else {
            (
                request_move(player1, control1, grid, &legal1, head1, head2),
                request_move(player2, control2, grid, &legal2, head2, head1),
            )
        };

        let move1 = validate_choice(PlayerId::One, choice1, &legal1)?;
        let move2 = validate_choice(PlayerId::Two, choice2, &legal2)?;
        let collision = self.apply_moves(head1, move1, head2, move2);

        self.moves_made += 1;
        log!(
            level,
            "Move {}: {} goes {}, {} goes {}",
            self.moves_made,
            self.player1.name(),
            move1,
            self.player2.name(),
            move2
        );
        if let Some(pos) = collision {
            log!(level, "Head-on collision at {}", pos);
        }

        if self.moves_made > self.max_moves {
            return Err(GameError::MoveLimitExceeded {
                moves: self.moves_made,
                limit: self.max_moves,
            });
        }

        Ok(TurnReport::Moved {
            player1: move1,
            player2: move2,
            collision,
        })
    }

    /// Steps until the game ends or a human player has to choose a direction.
    ///
    /// Returns the outcome so far, `InProgress` when waiting for input.
    pub fn run(&mut self) -> Result<GameOutcome, GameError> {
        loop {
            match self.process_move()? {
                TurnReport::Finished(outcome) => return Ok(outcome),
                TurnReport::Waiting => return Ok(self.outcome),
                TurnReport::Moved { .. } => {}
            }
        }
    }

    /// Old heads become tails, targets become heads or a shared collision
    fn apply_moves(
        &mut self,
        head1: Position,
        move1: Move,
        head2: Position,
        move2: Move,
    ) -> Option<Position> {
        let target1 = move1.apply(head1);
        let target2 = move2.apply(head2);

        self.grid.set(head1, Cell::Tail(PlayerId::One));
        self.grid.set(head2, Cell::Tail(PlayerId::Two));

        if target1 == target2 {
            self.grid.set(target1, Cell::Collision);
            Some(target1)
        } else {
            self.grid.set(target1, Cell::Head(PlayerId::One));
            self.grid.set(target2, Cell::Head(PlayerId::Two));
            None
        }
    }
}

/// No legal move, or a human steering into something
fn is_blocked(legal_moves: &[Move], control: Control) -> bool {
    match control {
        _ if legal_moves.is_empty() => true,
        Control::Manual(Some(mv)) => !legal_moves.contains(&mv),
        _ => false,
    }
}

/// Humans move in the direction that was checked for blocking; a key
/// pressed later in the step applies from the next step on
fn request_move(
    player: &mut dyn Player,
    control: Control,
    grid: &Grid,
    legal_moves: &[Move],
    my_position: Position,
    opponent_position: Position,
) -> Option<Move> {
    match control {
        Control::Manual(Some(mv)) => Some(mv),
        _ => player.get_move(grid, legal_moves, my_position, opponent_position),
    }
}

fn validate_choice(
    player: PlayerId,
    choice: Option<Move>,
    legal_moves: &[Move],
) -> Result<Move, GameError> {
    match choice {
        Some(mv) if legal_moves.contains(&mv) => Ok(mv),
        Some(mv) => Err(GameError::IllegalMove { player, chosen: mv }),
        None => Err(GameError::NoMove { player }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_moves_formula() {
        assert_eq!(max_moves(10), 48);
        assert_eq!(max_moves(11), 59);
        assert_eq!(max_moves(20), 198);
        assert_eq!(max_moves(1), 0);
    }

    #[test]
    fn test_blocked_rules() {
        let legal = [Move::Up, Move::Left];
        assert!(is_blocked(&[], Control::Automatic));
        assert!(is_blocked(&[], Control::Manual(None)));
        assert!(!is_blocked(&legal, Control::Automatic));
        assert!(!is_blocked(&legal, Control::Manual(None)));
        assert!(!is_blocked(&legal, Control::Manual(Some(Move::Up))));
        assert!(is_blocked(&legal, Control::Manual(Some(Move::Down))));
    }

    #[test]
    fn test_validate_choice() {
        let legal = [Move::Right];
        assert_eq!(
            validate_choice(PlayerId::One, Some(Move::Right), &legal),
            Ok(Move::Right)
        );
        assert_eq!(
            validate_choice(PlayerId::Two, Some(Move::Up), &legal),
            Err(GameError::IllegalMove {
                player: PlayerId::Two,
                chosen: Move::Up
            })
        );
        assert_eq!(
            validate_choice(PlayerId::One, None, &legal),
            Err(GameError::NoMove {
                player: PlayerId::One
            })
        );
    }
}
