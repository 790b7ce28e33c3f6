// Blockade core types
// Positions, moves, player identifiers, cell states and game outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D position on the grid, row grows downward
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    /// Manhattan distance between two positions
    pub fn manhattan_distance(&self, other: Position) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Represents the four possible movement directions
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Returns all moves in canonical order
    pub fn all() -> [Move; 4] {
        [Move::Up, Move::Down, Move::Left, Move::Right]
    }

    /// Converts move to its lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        }
    }

    /// (Δrow, Δcol) offset of this move
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    /// Calculates the next position when moving in this direction
    pub fn apply(&self, position: Position) -> Position {
        let (d_row, d_col) = self.offset();
        Position {
            row: position.row + d_row,
            col: position.col + d_col,
        }
    }

    /// Action index used by policy models: up=0, down=1, left=2, right=3
    pub fn index(&self) -> usize {
        match self {
            Move::Up => 0,
            Move::Down => 1,
            Move::Left => 2,
            Move::Right => 3,
        }
    }

    pub fn from_index(idx: usize) -> Option<Move> {
        Move::all().get(idx).copied()
    }

    /// Parses a move name, case-insensitive
    pub fn parse(s: &str) -> Option<Move> {
        match s.to_lowercase().as_str() {
            "up" => Some(Move::Up),
            "down" => Some(Move::Down),
            "left" => Some(Move::Left),
            "right" => Some(Move::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the two players
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub fn number(&self) -> i8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    pub fn from_number(n: i8) -> Option<PlayerId> {
        match n {
            1 => Some(PlayerId::One),
            2 => Some(PlayerId::Two),
            _ => None,
        }
    }

    pub fn opponent(&self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.number())
    }
}

/// Integer code of a head-on collision cell
pub const COLLISION_CODE: i8 = 3;

/// State of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Head(PlayerId),
    Tail(PlayerId),
    Collision,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Stable integer code: 0 empty, +p head, -p tail, 3 collision
    pub fn code(&self) -> i8 {
        match self {
            Cell::Empty => 0,
            Cell::Head(p) => p.number(),
            Cell::Tail(p) => -p.number(),
            Cell::Collision => COLLISION_CODE,
        }
    }

    pub fn from_code(code: i8) -> Option<Cell> {
        match code {
            0 => Some(Cell::Empty),
            COLLISION_CODE => Some(Cell::Collision),
            c if c > 0 => PlayerId::from_number(c).map(Cell::Head),
            c => c
                .checked_neg()
                .and_then(PlayerId::from_number)
                .map(Cell::Tail),
        }
    }

    /// Single-character tile used by the text rendering
    pub fn symbol(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Head(PlayerId::One) => 'A',
            Cell::Head(PlayerId::Two) => 'B',
            Cell::Tail(PlayerId::One) => 'a',
            Cell::Tail(PlayerId::Two) => 'b',
            Cell::Collision => 'X',
        }
    }

    pub fn from_symbol(c: char) -> Option<Cell> {
        match c {
            '.' => Some(Cell::Empty),
            'A' => Some(Cell::Head(PlayerId::One)),
            'B' => Some(Cell::Head(PlayerId::Two)),
            'a' => Some(Cell::Tail(PlayerId::One)),
            'b' => Some(Cell::Tail(PlayerId::Two)),
            'X' => Some(Cell::Collision),
            _ => None,
        }
    }
}

/// Result of a game, terminal once not `InProgress`
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    InProgress,
    Draw,
    Player1Wins,
    Player2Wins,
}

impl GameOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            GameOutcome::Player1Wins => Some(PlayerId::One),
            GameOutcome::Player2Wins => Some(PlayerId::Two),
            _ => None,
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::InProgress => f.write_str("In progress"),
            GameOutcome::Draw => f.write_str("Draw"),
            GameOutcome::Player1Wins => f.write_str("Player1 wins"),
            GameOutcome::Player2Wins => f.write_str("Player2 wins"),
        }
    }
}
