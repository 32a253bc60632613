//! Sliding-block solver where the goal is not a target arrangement but an
//! unobstructed chain of empty cells between two marked cells.
//!
//! Two searches are offered: [`solve_shortest`] always finds a solution with
//! the fewest moves, [`solve_guided`] uses a corridor heuristic to get there
//! faster without that guarantee.

pub mod board;
pub mod corridor;
pub mod goal;
pub mod heuristic;
mod parse;
pub mod solve;

pub use board::{Board, BlockId, Direction, Move, Pos, EMPTY, WALL};
pub use goal::is_open;
pub use solve::{solve, solve_guided, solve_shortest, Method, Solution, Stats};

/// A board together with the two cells that have to be joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub board: Board,
    pub start: Pos,
    pub end: Pos,
}

impl Puzzle {
    pub fn is_open(&self) -> bool {
        goal::is_open(&self.board, self.start, self.end)
    }
}
