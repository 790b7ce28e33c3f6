// Grid and move resolver
//
// The grid is a square matrix of cells stored row-major. Heads are never
// cached outside the grid: callers locate them with `find_head`.

use std::fmt;

use crate::error::GridError;
use crate::simple_profiler::ProfileGuard;
use crate::types::{Cell, Move, PlayerId, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an empty `size`×`size` grid
    pub fn new(size: usize) -> Self {
        Grid {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Creates a grid with both players seeded at their starting positions
    pub fn with_starting_positions(size: usize) -> Self {
        let mut grid = Grid::new(size);
        let (p1, p2) = starting_positions(size);
        grid.set(p1, Cell::Head(PlayerId::One));
        grid.set(p2, Cell::Head(PlayerId::Two));
        grid
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        let n = self.size as i32;
        pos.row >= 0 && pos.row < n && pos.col >= 0 && pos.col < n
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.row as usize * self.size + pos.col as usize)
        } else {
            None
        }
    }

    /// Cell at `pos`, `None` when out of bounds
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    pub(crate) fn set(&mut self, pos: Position, cell: Cell) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.get(pos).map_or(false, |c| c.is_empty())
    }

    /// Iterates all positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |i| Position {
            row: (i / self.size) as i32,
            col: (i % self.size) as i32,
        })
    }

    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Locates a player's head by scanning the grid
    pub fn find_head(&self, player: PlayerId) -> Option<Position> {
        self.positions()
            .find(|&pos| self.get(pos) == Some(Cell::Head(player)))
    }

    pub fn has_collision(&self) -> bool {
        self.cells.iter().any(|c| *c == Cell::Collision)
    }

    /// Number of non-empty cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }

    /// Legal moves from a head position, in canonical order.
    ///
    /// A move is legal when its target is in bounds and empty. A position
    /// that does not hold a head yields no moves.
    pub fn legal_moves(&self, head: Position) -> Vec<Move> {
        let _guard = ProfileGuard::new("legal_moves");

        if !matches!(self.get(head), Some(Cell::Head(_))) {
            return vec![];
        }

        Move::all()
            .iter()
            .filter(|mv| self.is_empty_at(mv.apply(head)))
            .copied()
            .collect()
    }

    /// Legal moves for a player, empty when its head is gone
    pub fn legal_moves_for(&self, player: PlayerId) -> Vec<Move> {
        self.find_head(player)
            .map(|head| self.legal_moves(head))
            .unwrap_or_default()
    }

    /// Integer-code matrix for rendering front ends
    pub fn to_codes(&self) -> Vec<Vec<i8>> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(Cell::code).collect())
            .collect()
    }

    pub fn from_codes(rows: &[Vec<i8>]) -> Result<Self, GridError> {
        let cells = rows
            .iter()
            .enumerate()
            .map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .map(|(c, &code)| {
                        Cell::from_code(code).ok_or_else(|| GridError::InvalidCell {
                            row: r,
                            col: c,
                            cell: code.to_string(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(cells)
    }

    /// Parses the text rendering produced by `Display`.
    ///
    /// One row per line, whitespace inside a row is ignored, blank lines are
    /// skipped.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let cells = text
            .lines()
            .map(|line| line.split_whitespace().collect::<String>())
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(r, line)| {
                line.chars()
                    .enumerate()
                    .map(|(c, ch)| {
                        Cell::from_symbol(ch).ok_or_else(|| GridError::InvalidCell {
                            row: r,
                            col: c,
                            cell: ch.to_string(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(cells)
    }

    fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let size = rows.len();
        if size == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(size * size);
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(GridError::NotSquare {
                    row: r,
                    len: row.len(),
                    expected: size,
                });
            }
            cells.extend(row);
        }

        for player in [PlayerId::One, PlayerId::Two] {
            if cells.iter().filter(|c| **c == Cell::Head(player)).count() > 1 {
                return Err(GridError::DuplicateHead(player));
            }
        }

        Ok(Grid { size, cells })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            let line: String = row.iter().map(Cell::symbol).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Starting heads: player 1 at (N - N/4 - 1) on both axes, player 2 at N/4
pub fn starting_positions(size: usize) -> (Position, Position) {
    let offset = (size / 4) as i32;
    let n = size as i32;
    (
        Position::new(n - offset - 1, n - offset - 1),
        Position::new(offset, offset),
    )
}
