// Reachable-area heuristic
//
// 4-connected flood fill counting the empty cells reachable from a
// hypothetical position. The fill runs over an owned scratch buffer with an
// explicit stack, so the caller's grid is never touched and large grids do
// not risk deep recursion.

use crate::grid::Grid;
use crate::simple_profiler::ProfileGuard;
use crate::types::{Move, Position};

/// Number of empty cells 4-connected to `start`, including `start` itself.
///
/// Returns 0 when `start` is out of bounds or not empty.
pub fn reachable_area(grid: &Grid, start: Position) -> usize {
    let _guard = ProfileGuard::new("flood_fill");

    if !grid.is_empty_at(start) {
        return 0;
    }

    let size = grid.size();
    // true = still open; visited cells are closed as they are pushed
    let mut open: Vec<bool> = grid.cells().iter().map(|c| c.is_empty()).collect();
    let index = |pos: Position| pos.row as usize * size + pos.col as usize;

    let mut stack = Vec::with_capacity(size * size);
    open[index(start)] = false;
    stack.push(start);

    let mut count = 0;
    while let Some(pos) = stack.pop() {
        count += 1;
        for mv in Move::all() {
            let next = mv.apply(pos);
            if grid.in_bounds(next) && open[index(next)] {
                open[index(next)] = false;
                stack.push(next);
            }
        }
    }

    count
}
