// Integration tests for the turn engine
//
// Scenarios are built from text grids and scripted players so every step is
// known in advance: simultaneous moves, head-on collisions followed by the
// draw, blocked players, human input and the move limit.

use std::collections::VecDeque;

use blockade::config::Config;
use blockade::engine::{max_moves, Game, TurnReport};
use blockade::error::GameError;
use blockade::grid::Grid;
use blockade::player::{
    HeuristicBot, HumanInput, HumanPlayer, InputScheme, OptimizedBot, Player, RandomBot,
};
use blockade::scorer::Weights;
use blockade::types::{Cell, GameOutcome, Move, PlayerId, Position};

/// Plays a fixed list of moves, then the first legal move
struct ScriptedPlayer {
    moves: VecDeque<Move>,
}

impl ScriptedPlayer {
    fn new(moves: &[Move]) -> Box<Self> {
        Box::new(ScriptedPlayer {
            moves: moves.iter().copied().collect(),
        })
    }
}

impl Player for ScriptedPlayer {
    fn name(&self) -> String {
        "ScriptedPlayer".to_string()
    }

    fn get_move(
        &mut self,
        _grid: &Grid,
        legal_moves: &[Move],
        _my_position: Position,
        _opponent_position: Position,
    ) -> Option<Move> {
        assert!(!legal_moves.is_empty(), "engine asked a blocked player");
        self.moves.pop_front().or_else(|| legal_moves.first().copied())
    }
}

/// Presses a direction on another player's input while choosing its own move,
/// like a front end delivering a key in the middle of a step
struct KeyPressingPlayer {
    input: HumanInput,
    key: Move,
}

impl Player for KeyPressingPlayer {
    fn name(&self) -> String {
        "KeyPressingPlayer".to_string()
    }

    fn get_move(
        &mut self,
        _grid: &Grid,
        legal_moves: &[Move],
        _my_position: Position,
        _opponent_position: Position,
    ) -> Option<Move> {
        self.input.press(self.key);
        legal_moves.first().copied()
    }
}

/// Boustrophedon walk over `rows` rows of a `size`-wide grid, starting at
/// column 0 and stepping `vertical` between rows
fn serpentine(size: usize, rows: usize, vertical: Move) -> Vec<Move> {
    let mut moves = Vec::new();
    for row in 0..rows {
        let across = if row % 2 == 0 { Move::Right } else { Move::Left };
        moves.extend(std::iter::repeat(across).take(size - 1));
        if row + 1 < rows {
            moves.push(vertical);
        }
    }
    moves
}

fn bots() -> (Box<RandomBot>, Box<RandomBot>) {
    (
        Box::new(RandomBot::new(1, false)),
        Box::new(RandomBot::new(2, false)),
    )
}

fn parse(text: &str) -> Grid {
    Grid::parse(text).expect("test grid should parse")
}

#[test]
fn test_new_game_starting_positions() {
    let (p1, p2) = bots();
    let game = Game::new(10, p1, p2).unwrap();
    assert_eq!(game.grid().find_head(PlayerId::One), Some(Position::new(7, 7)));
    assert_eq!(game.grid().find_head(PlayerId::Two), Some(Position::new(2, 2)));
    assert_eq!(game.grid().occupied_count(), 2);
    assert_eq!(game.outcome(), GameOutcome::InProgress);
    assert_eq!(game.max_moves(), 48);
}

#[test]
fn test_arena_size_is_validated() {
    let (p1, p2) = bots();
    assert!(Game::new(9, p1, p2).is_err());
    let (p1, p2) = bots();
    assert!(Game::new(21, p1, p2).is_err());
    let (p1, p2) = bots();
    assert!(Game::new(20, p1, p2).is_ok());
}

#[test]
fn test_one_step_leaves_head_and_tail_per_player() {
    let (p1, p2) = bots();
    let mut game = Game::new(10, p1, p2).unwrap();
    let report = game.process_move().unwrap();

    let (move1, move2) = match report {
        TurnReport::Moved {
            player1,
            player2,
            collision: None,
        } => (player1, player2),
        other => panic!("unexpected report {:?}", other),
    };

    let grid = game.grid();
    assert_eq!(grid.occupied_count(), 4);
    assert_eq!(grid.count(Cell::Head(PlayerId::One)), 1);
    assert_eq!(grid.count(Cell::Tail(PlayerId::One)), 1);
    assert_eq!(grid.count(Cell::Head(PlayerId::Two)), 1);
    assert_eq!(grid.count(Cell::Tail(PlayerId::Two)), 1);
    assert_eq!(grid.get(Position::new(7, 7)), Some(Cell::Tail(PlayerId::One)));
    assert_eq!(grid.get(Position::new(2, 2)), Some(Cell::Tail(PlayerId::Two)));
    assert_eq!(
        grid.find_head(PlayerId::One),
        Some(move1.apply(Position::new(7, 7)))
    );
    assert_eq!(
        grid.find_head(PlayerId::Two),
        Some(move2.apply(Position::new(2, 2)))
    );
    assert_eq!(game.moves_made(), 1);
}

#[test]
fn test_both_players_see_the_pre_move_grid() {
    // Player 1 is leaving (4, 5), but its head is still there when both
    // choose, so player 2 may not step into it
    let grid = parse(
        "
        ..........
        ..........
        ..........
        ..........
        ....BA....
        ..........
        ..........
        ..........
        ..........
        ..........
        ",
    );
    let mut game = Game::from_grid(
        grid.clone(),
        ScriptedPlayer::new(&[Move::Right]),
        ScriptedPlayer::new(&[Move::Right]),
    );
    assert_eq!(
        game.process_move(),
        Err(GameError::IllegalMove {
            player: PlayerId::Two,
            chosen: Move::Right,
        })
    );
    assert_eq!(game.grid(), &grid);

    let mut game = Game::from_grid(
        grid,
        ScriptedPlayer::new(&[Move::Right]),
        ScriptedPlayer::new(&[Move::Left]),
    );
    game.process_move().unwrap();

    let grid = game.grid();
    assert_eq!(grid.find_head(PlayerId::One), Some(Position::new(4, 6)));
    assert_eq!(grid.find_head(PlayerId::Two), Some(Position::new(4, 3)));
    assert_eq!(grid.get(Position::new(4, 5)), Some(Cell::Tail(PlayerId::One)));
    assert_eq!(grid.get(Position::new(4, 4)), Some(Cell::Tail(PlayerId::Two)));
}

#[test]
fn test_head_on_collision_then_draw() {
    let grid = parse(
        "
        ..........
        ..........
        ..........
        ..........
        ....B.A...
        ..........
        ..........
        ..........
        ..........
        ..........
        ",
    );
    let mut game = Game::from_grid(
        grid,
        ScriptedPlayer::new(&[Move::Left]),
        ScriptedPlayer::new(&[Move::Right]),
    );

    let report = game.process_move().unwrap();
    assert_eq!(
        report,
        TurnReport::Moved {
            player1: Move::Left,
            player2: Move::Right,
            collision: Some(Position::new(4, 5)),
        }
    );

    // The collision step itself is not terminal
    assert_eq!(game.outcome(), GameOutcome::InProgress);
    let grid = game.grid();
    assert_eq!(grid.get(Position::new(4, 5)), Some(Cell::Collision));
    assert_eq!(grid.find_head(PlayerId::One), None);
    assert_eq!(grid.find_head(PlayerId::Two), None);
    assert_eq!(grid.get(Position::new(4, 6)), Some(Cell::Tail(PlayerId::One)));
    assert_eq!(grid.get(Position::new(4, 4)), Some(Cell::Tail(PlayerId::Two)));

    assert_eq!(
        game.process_move().unwrap(),
        TurnReport::Finished(GameOutcome::Draw)
    );
    assert_eq!(game.outcome(), GameOutcome::Draw);
    assert_eq!(game.moves_made(), 1);

    assert_eq!(
        game.process_move(),
        Err(GameError::GameOver(GameOutcome::Draw))
    );
}

#[test]
fn test_blocked_player_loses() {
    let grid = parse(
        "
        Aa........
        a.........
        ..........
        ..........
        ..........
        ..........
        ..........
        ..........
        ..........
        .........B
        ",
    );
    let mut game = Game::from_grid(
        grid.clone(),
        ScriptedPlayer::new(&[]),
        ScriptedPlayer::new(&[]),
    );

    assert_eq!(
        game.process_move().unwrap(),
        TurnReport::Finished(GameOutcome::Player2Wins)
    );
    // Outcome is decided before anyone moves
    assert_eq!(game.grid(), &grid);
    assert_eq!(game.moves_made(), 0);
}

#[test]
fn test_player2_blocked_gives_player1_the_win() {
    let grid = parse(
        "
        A.........
        ..........
        ..........
        ..........
        ..........
        ..........
        ..........
        ..........
        ........b.
        .......bBb
        ",
    );
    let mut game = Game::from_grid(grid, ScriptedPlayer::new(&[]), ScriptedPlayer::new(&[]));
    assert_eq!(game.run().unwrap(), GameOutcome::Player1Wins);
}

#[test]
fn test_both_blocked_is_a_draw() {
    let grid = parse(
        "
        Aa........
        a.........
        ..........
        ..........
        ..........
        ..........
        ..........
        ..........
        .........b
        ........bB
        ",
    );
    let mut game = Game::from_grid(grid, ScriptedPlayer::new(&[]), ScriptedPlayer::new(&[]));
    assert_eq!(
        game.process_move().unwrap(),
        TurnReport::Finished(GameOutcome::Draw)
    );
}

#[test]
fn test_missing_head_without_collision_is_an_error() {
    let grid = parse(
        "
        ..........
        ..........
        ..........
        ..........
        ..........
        ..........
        ..........
        ..........
        ..........
        .........B
        ",
    );
    let mut game = Game::from_grid(grid, ScriptedPlayer::new(&[]), ScriptedPlayer::new(&[]));
    assert_eq!(
        game.process_move(),
        Err(GameError::MissingHead(PlayerId::One))
    );
}

#[test]
fn test_human_without_input_waits() {
    let human = Box::new(HumanPlayer::new(InputScheme::Arrows, false));
    let input = human.input();
    let mut game = Game::new(10, human, Box::new(RandomBot::new(4, false))).unwrap();
    let before = game.grid().clone();

    assert_eq!(game.process_move().unwrap(), TurnReport::Waiting);
    assert_eq!(game.grid(), &before);
    assert_eq!(game.moves_made(), 0);
    assert_eq!(game.run().unwrap(), GameOutcome::InProgress);

    assert!(input.press_key("ArrowLeft"));
    assert!(matches!(
        game.process_move().unwrap(),
        TurnReport::Moved {
            player1: Move::Left,
            ..
        }
    ));
    assert_eq!(game.grid().find_head(PlayerId::One), Some(Position::new(7, 6)));
}

#[test]
fn test_human_steering_into_a_trail_loses() {
    let grid = parse(
        "
        ..........
        ..........
        ..........
        ..........
        .....a....
        .....A....
        ..........
        ..........
        ..........
        .........B
        ",
    );
    let human = Box::new(HumanPlayer::new(InputScheme::Wsad, false));
    let input = human.input();
    let mut game = Game::from_grid(grid, human, ScriptedPlayer::new(&[]));

    input.press(Move::Up);
    assert_eq!(
        game.process_move().unwrap(),
        TurnReport::Finished(GameOutcome::Player2Wins)
    );
}

#[test]
fn test_human_keeps_last_direction() {
    let human = Box::new(HumanPlayer::new(InputScheme::Wsad, false));
    let input = human.input();
    let mut game = Game::new(10, human, ScriptedPlayer::new(&[])).unwrap();

    input.press_key("w");
    game.process_move().unwrap();
    game.process_move().unwrap();
    assert_eq!(game.grid().find_head(PlayerId::One), Some(Position::new(5, 7)));
}

#[test]
fn test_key_pressed_during_a_step_applies_next_step() {
    let grid = parse(
        "
        ..........
        ..........
        ..........
        ..........
        ....bb....
        .....B....
        ..........
        ..........
        ..........
        A.........
        ",
    );
    let human = Box::new(HumanPlayer::new(InputScheme::Arrows, false));
    let input = human.input();
    input.press(Move::Left);
    let presser = Box::new(KeyPressingPlayer {
        input: input.clone(),
        key: Move::Up,
    });
    let mut game = Game::from_grid(grid, presser, human);

    // Up arrives after the blocking check; the step still uses Left
    assert_eq!(
        game.process_move().unwrap(),
        TurnReport::Moved {
            player1: Move::Up,
            player2: Move::Left,
            collision: None,
        }
    );
    assert_eq!(game.grid().find_head(PlayerId::Two), Some(Position::new(5, 4)));
    assert_eq!(input.selected(), Some(Move::Up));

    // Up from (5, 4) runs into the trail: a loss, not an engine error
    assert_eq!(
        game.process_move().unwrap(),
        TurnReport::Finished(GameOutcome::Player1Wins)
    );
}

#[test]
fn test_move_limit_is_enforced() {
    let limit = max_moves(10);
    let mut game = Game::from_grid(
        Grid::with_starting_positions(10),
        Box::new(RandomBot::new(1, false)),
        Box::new(RandomBot::new(2, false)),
    )
    .with_moves_made(limit);

    assert_eq!(
        game.process_move(),
        Err(GameError::MoveLimitExceeded {
            moves: limit + 1,
            limit,
        })
    );
}

#[test]
fn test_move_limit_is_reachable_on_even_grids() {
    // Two serpentines covering one half each fill all 100 cells in 49 legal
    // steps, one more than max_moves(10) allows
    let grid = parse(
        "
        A.........
        ..........
        ..........
        ..........
        ..........
        ..........
        ..........
        ..........
        ..........
        B.........
        ",
    );
    let script1 = serpentine(10, 5, Move::Down);
    let script2 = serpentine(10, 5, Move::Up);
    assert_eq!(script1.len(), 49);

    let mut game = Game::from_grid(
        grid,
        ScriptedPlayer::new(&script1),
        ScriptedPlayer::new(&script2),
    );
    for _ in 0..max_moves(10) {
        assert!(matches!(
            game.process_move().unwrap(),
            TurnReport::Moved {
                collision: None,
                ..
            }
        ));
    }
    assert_eq!(game.grid().count(Cell::Empty), 2);

    assert_eq!(
        game.process_move(),
        Err(GameError::MoveLimitExceeded {
            moves: 49,
            limit: 48,
        })
    );
    assert_eq!(game.grid().count(Cell::Empty), 0);
}

#[test]
fn test_bots_always_finish_within_the_limit() {
    for seed in 0..20 {
        let mut game = Game::new(
            10 + (seed as usize % 11),
            Box::new(HeuristicBot::new(seed, false)),
            Box::new(RandomBot::new(seed + 1, false)),
        )
        .unwrap();
        let outcome = game.run().unwrap();
        assert!(outcome.is_terminal());
        assert!(game.moves_made() <= game.max_moves());
        assert_eq!(game.process_move(), Err(GameError::GameOver(outcome)));
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let play = |parallel: bool| {
        let mut game = Game::new(
            12,
            Box::new(OptimizedBot::new(Weights::OPTIMIZED, 21, false)),
            Box::new(HeuristicBot::new(22, false)),
        )
        .unwrap()
        .with_parallel(parallel);
        let outcome = game.run().unwrap();
        (outcome, game.moves_made(), game.grid().clone())
    };

    assert_eq!(play(false), play(true));
}

#[test]
fn test_configured_game_is_reproducible() {
    let config = Config::default_hardcoded();
    let play = || {
        let mut game = Game::from_config(&config).unwrap();
        let outcome = game.run().unwrap();
        (outcome, game.grid().to_string())
    };

    let (outcome, grid) = play();
    assert!(outcome.is_terminal());
    assert_eq!(play(), (outcome, grid));
}
