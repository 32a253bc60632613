use pathfinding::directed::bfs::bfs_reach;

use crate::board::{Board, Pos, EMPTY};

/// Whether a 4-connected chain of empty cells joins `start` and `end`.
///
/// Both endpoints must themselves be empty, so a puzzle only counts as open once
/// the marked cells are vacated. Coordinates outside the board are never open.
pub fn is_open(board: &Board, start: Pos, end: Pos) -> bool {
    if board.get(start) != Some(EMPTY) || board.get(end) != Some(EMPTY) {
        return false;
    }
    if start == end {
        return true;
    }

    bfs_reach(start, move |&pos| {
        board
            .neighbours(pos)
            .filter(move |&next| board[next] == EMPTY)
    })
    .any(|pos| pos == end)
}
