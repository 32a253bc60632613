use crate::{
    board::{is_block, Board},
    corridor::Corridor,
};

/// Number of distinct blocks sitting on the cheapest corridor.
///
/// Each blocking block has to move at least once to clear that corridor. This
/// is not a proven lower bound: a block may need several moves, and moving it
/// can push others into the way. `None` when there are no corridors at all.
pub fn estimate(board: &Board, corridors: &[Corridor]) -> Option<usize> {
    let mut best = None;
    for corridor in corridors {
        let limit = best.unwrap_or(usize::MAX);
        if limit == 0 {
            break;
        }
        let count = blocking(board, corridor, limit);
        if count < limit {
            best = Some(count);
        }
    }
    best
}

/// Distinct blocks on `corridor`, counting no further than `limit`.
fn blocking(board: &Board, corridor: &Corridor, limit: usize) -> usize {
    // block ids are below WALL, so one bit per id fits
    let mut seen = 0u128;
    let mut count = 0;
    for &pos in corridor.cells() {
        let value = board[pos];
        if is_block(value) && seen & (1u128 << value) == 0 {
            seen |= 1u128 << value;
            count += 1;
            if count >= limit {
                break;
            }
        }
    }
    count
}
